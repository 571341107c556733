//! Route guard: decides whether a protected page may render.
//!
//! `Loading -> Authenticated(user) | Unauthenticated`. A guard never leaves
//! a final state; a fresh [`RouteGuard::check`] starts over from `Loading`.

use tracing::debug;

use crate::application::api::{users, ConsoleApi};
use crate::application::cache::{QueryKey, QueryState};
use crate::domain::User;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl GuardState {
    pub fn user(&self) -> Option<&User> {
        match self {
            GuardState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, GuardState::Authenticated(_))
    }
}

/// Holds the identity query subscribed while the guarded page is shown
pub struct RouteGuard {
    api: ConsoleApi,
    state: GuardState,
    subscription: Option<QueryKey>,
}

impl RouteGuard {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            api,
            state: GuardState::Loading,
            subscription: None,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Resolve the identity.
    ///
    /// No token in storage means `Unauthenticated` without a network call.
    /// Otherwise `userInfo` decides: a failure or a body without a user id
    /// is `Unauthenticated`.
    pub async fn check(&mut self) -> &GuardState {
        self.release();
        self.state = GuardState::Loading;

        let has_token = match self.api.has_token().await {
            Ok(has_token) => has_token,
            Err(err) => {
                debug!(error = %err, "Token storage unreadable");
                false
            }
        };
        if !has_token {
            debug!("No session token, redirecting to login");
            self.state = GuardState::Unauthenticated;
            return &self.state;
        }

        let query = users::user_info();
        let result = self.api.cache().subscribe(&query).await;
        self.subscription = Some(query.key().clone());

        self.state = match result {
            QueryState::Ready(user) if user.id.is_some() => GuardState::Authenticated(user),
            QueryState::Failed(err) => {
                debug!(error = %err, "Identity query failed");
                GuardState::Unauthenticated
            }
            _ => GuardState::Unauthenticated,
        };

        if !self.state.is_authenticated() {
            self.release();
        }
        &self.state
    }

    /// Identity as cached now; differs from [`RouteGuard::user`] once a
    /// mutation refetched `userInfo` while the page was shown
    pub fn current_user(&self) -> Option<User> {
        self.subscription.as_ref()?;
        match self.api.cache().read(&users::user_info()) {
            QueryState::Ready(user) if user.id.is_some() => Some(user),
            _ => None,
        }
    }

    pub(crate) fn identity_key(&self) -> Option<&QueryKey> {
        self.subscription.as_ref()
    }

    /// Drop interest in the identity query (page unmount)
    pub fn release(&mut self) {
        if let Some(key) = self.subscription.take() {
            self.api.cache().unsubscribe(&key);
        }
    }
}

impl Drop for RouteGuard {
    fn drop(&mut self) {
        self.release();
    }
}

//! `/account`: own profile, profile update and logout

use tracing::warn;

use super::{failure_message, remember, ActionOutcome, Subscriptions};
use crate::application::api::{users, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::UpdateUserForm;
use crate::domain::User;
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::View;

pub struct AccountPage {
    api: ConsoleApi,
    subs: Subscriptions,
    me: Query<User>,
    banner: Option<Banner>,
}

impl AccountPage {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            me: users::user_info(),
            banner: None,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(Some(&self.me)).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn profile(&self) -> Option<User> {
        self.subs.read(Some(&self.me)).into_data()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    /// "Apply": send the changed profile fields
    pub async fn apply(&mut self, form: &UpdateUserForm) -> ActionOutcome {
        let Some(user_id) = self.profile().and_then(|u| u.id) else {
            return self.record(ActionOutcome::failure("User not found"));
        };
        let request = match form.submit(user_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match users::update_user(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success("Your details have been updated"),
            Err(err) => ActionOutcome::failure(failure_message("Profile update error", &err)),
        };
        self.record(outcome)
    }

    /// Always ends on `/login`; the local session is gone even if the
    /// backend could not be told.
    pub async fn logout(&mut self) -> ActionOutcome {
        self.subs.release();
        match self.api.logout().await {
            Ok(()) => ActionOutcome::success("Signed out").redirect_to(Route::Login),
            Err(err) => {
                warn!(error = %err, "Clearing the session failed");
                ActionOutcome::failure(err.user_message()).redirect_to(Route::Login)
            }
        }
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::Account.title()).with_banner(self.banner.as_ref());
        let user = match self.subs.read(Some(&self.me)) {
            QueryState::Ready(user) => user,
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load the profile", &err));
                return view;
            }
            QueryState::Loading | QueryState::Skipped => {
                view.loading();
                return view;
            }
        };

        view.field("Username", user.username.clone().unwrap_or_default());
        view.field("Role", user.role.map(|r| r.to_string()).unwrap_or_default());
        view.heading("Avatar");
        view.field("Initials", user.initials());
        view.heading("Personal information");
        view.field("First Name", user.first_name.clone().unwrap_or_default());
        view.field("Last Name", user.last_name.clone().unwrap_or_default());
        view.field("Patronymic", user.patronymic.clone().unwrap_or_default());
        view.field("Email", user.email.clone().unwrap_or_default());
        view
    }
}

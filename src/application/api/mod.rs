//! Typed endpoint catalogue of the tracking backend.
//!
//! Every resource module returns [`Query`](crate::application::cache::Query)
//! and [`Mutation`](crate::application::cache::Mutation) descriptors that
//! carry their cache tags. [`ConsoleApi`] adds the flows that touch the
//! session credential.

pub mod auth;
pub mod companies;
pub mod monitoring_settings;
pub mod resources;
pub mod tasks;
pub mod users;

use serde_json::Value;
use tracing::{info, warn};

use crate::application::cache::{QueryCache, SharedQueryCache};
use crate::domain::{LoginRequest, RegisterRequest, Task};
use crate::infrastructure::{HttpClient, SharedTokenStore};
use crate::shared::{ApiError, ApiResult};

/// Id returned by a create endpoint, when the backend sends one
pub fn created_id(body: &Value) -> Option<i64> {
    match body {
        Value::Number(n) => n.as_i64(),
        Value::Object(map) => map.get("id").and_then(Value::as_i64),
        _ => None,
    }
}

/// Session-aware entry point shared by every page
#[derive(Clone)]
pub struct ConsoleApi {
    cache: SharedQueryCache,
}

impl ConsoleApi {
    pub fn new(cache: SharedQueryCache) -> Self {
        Self { cache }
    }

    pub fn from_client(client: HttpClient) -> Self {
        Self::new(QueryCache::shared(client))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn shared_cache(&self) -> SharedQueryCache {
        self.cache.clone()
    }

    pub fn client(&self) -> &HttpClient {
        self.cache.client()
    }

    pub fn tokens(&self) -> &SharedTokenStore {
        self.client().tokens()
    }

    pub async fn has_token(&self) -> ApiResult<bool> {
        Ok(self.tokens().load().await?.is_some())
    }

    /// Sign in; the token is stored before the `User` tag is invalidated so
    /// the refetched identity query already carries it.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<()> {
        let mutation = auth::login(request)?;
        let body: Value = self.client().request(mutation.request()).await?;
        let token = auth::token_from_response(&body)
            .ok_or_else(|| ApiError::Decode("login response carries no token".to_string()))?;
        self.tokens().save(&token).await?;
        self.cache.invalidate(mutation.invalidates()).await;
        info!(username = %request.username, "Signed in");
        Ok(())
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.cache.mutate(auth::register(request)?).await?;
        info!(username = %request.username, "Account registered");
        Ok(())
    }

    /// Sign out. The local token and cache are cleared even when the
    /// backend call fails; that failure is only logged.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(err) = self.client().execute(&auth::logout()).await {
            warn!(error = %err, "Backend logout failed, clearing session anyway");
        }
        self.tokens().clear().await?;
        self.cache.reset();
        info!("Signed out");
        Ok(())
    }

    pub async fn fetch_task(&self, task_id: i64) -> ApiResult<Task> {
        tasks::fetch_task(self.client(), task_id).await
    }
}

//! Session credential storage trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::shared::ApiResult;

/// Holder of the bearer token.
///
/// The token's presence is the only authentication signal the console
/// checks locally. Every outgoing request reads it; only the login and
/// logout flows write it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> ApiResult<Option<String>>;
    async fn save(&self, token: &str) -> ApiResult<()>;
    async fn clear(&self) -> ApiResult<()>;
}

pub type SharedTokenStore = Arc<dyn TokenStore>;

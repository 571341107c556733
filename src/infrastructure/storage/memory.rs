//! In-memory token storage

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::shared::ApiResult;

/// Token kept for the lifetime of the process only
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

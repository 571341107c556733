//! File-backed token storage
//!
//! Persists the bearer token between console runs, the way a browser keeps
//! it in local storage across page reloads.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::TokenStore;
use crate::shared::{ApiError, ApiResult};

pub struct FileTokenStore {
    path: PathBuf,
}

/// Owner read/write only
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_private(&self, token: &str) -> std::io::Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(TOKEN_FILE_MODE);

        let mut file = options.open(&self.path).await?;
        // mode() only applies on creation; an older file may be wider
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(TOKEN_FILE_MODE))
                .await?;
        }
        file.write_all(token.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        self.write_private(token)
            .await
            .map_err(|e| ApiError::Storage(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }
}

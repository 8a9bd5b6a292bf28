//! Local-disk asset storage served under `/uploads`.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};

use crate::domain::repositories::AssetStorage;
use crate::error::AppError;

/// Writes uploaded assets below `root` and returns `{public_base_url}/uploads/{path}`.
pub struct LocalAssetStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` below the root, rejecting absolute paths and `..` segments.
    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !safe {
            return Err(AppError::bad_request(
                "Invalid asset path",
                json!({ "path": path }),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStorage for LocalAssetStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("Failed to create upload directory {}: {}", parent.display(), e);
                AppError::transport("Asset storage unavailable", json!({ "path": path }))
            })?;
        }

        tokio::fs::write(&target, &bytes).await.map_err(|e| {
            error!("Failed to write asset {}: {}", target.display(), e);
            AppError::transport("Asset storage unavailable", json!({ "path": path }))
        })?;

        debug!(path, size = bytes.len(), "asset stored");
        Ok(format!("{}/uploads/{}", self.public_base_url, path))
    }
}

//! Binary asset storage contract (article cover images).

use async_trait::async_trait;

use crate::error::AppError;

/// Pass-through upload of an opaque binary asset.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::LocalAssetStorage`] - files on local disk served under `/uploads`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns a URL the asset can be retrieved from.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] when the backend write fails.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, AppError>;
}

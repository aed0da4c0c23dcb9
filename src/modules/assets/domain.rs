use async_trait::async_trait;

use crate::shared::errors::AppResult;

/// Raw uploaded binary plus its file extension ("jpg", "png", ...).
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Vec<u8>,
    pub extension: String,
}

impl AssetUpload {
    pub fn new(bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: extension.into(),
        }
    }
}

/// Durable binary storage behind the movie poster and actor picture fields.
///
/// `replace` removes the superseded asset before storing the new one, so a
/// previously handed-out URL never keeps resolving to stale content. Failures
/// abort the enclosing write before anything is persisted.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a new binary under `container`, returning its public URL.
    async fn store(&self, container: &str, upload: &AssetUpload) -> AppResult<String>;

    /// Replace `existing` (if any) with a new binary. The old asset is
    /// deleted first; the returned URL supersedes it.
    async fn replace(
        &self,
        existing: Option<&str>,
        container: &str,
        upload: &AssetUpload,
    ) -> AppResult<String>;

    /// Remove a stored asset. Deleting an already-absent asset is not an error.
    async fn delete(&self, url: &str) -> AppResult<()>;
}

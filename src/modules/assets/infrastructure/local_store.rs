use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::log_debug;
use crate::modules::assets::domain::{AssetStore, AssetUpload};
use crate::shared::errors::{AppError, AppResult};

/// Filesystem-backed asset store. Files land under `<root>/<container>/` with
/// uuid names and are served from `<base_url>/<container>/<file>`.
pub struct LocalAssetStore {
    root: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Configuration from `ASSETS_ROOT` / `ASSETS_BASE_URL`, with local-dev defaults.
    pub fn from_env() -> Self {
        let root = std::env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string());
        let base_url = std::env::var("ASSETS_BASE_URL").unwrap_or_else(|_| "/assets".to_string());
        Self::new(root, base_url)
    }

    /// Map a public URL back to its path on disk. Foreign URLs are rejected so
    /// a malformed reference can never escape the asset root.
    fn path_for_url(&self, url: &str) -> AppResult<PathBuf> {
        let relative = url
            .strip_prefix(&self.base_url)
            .map(|r| r.trim_start_matches('/'))
            .ok_or_else(|| {
                AppError::AssetStoreError(format!("URL '{}' is not managed by this store", url))
            })?;

        if relative.is_empty() || relative.split('/').any(|seg| seg == "..") {
            return Err(AppError::AssetStoreError(format!(
                "URL '{}' does not name a stored asset",
                url
            )));
        }

        Ok(self.root.join(Path::new(relative)))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, container: &str, upload: &AssetUpload) -> AppResult<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), upload.extension);
        let dir = self.root.join(container);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(&file_name);
        fs::write(&path, &upload.bytes).await?;

        let url = format!("{}/{}/{}", self.base_url, container, file_name);
        log_debug!("Stored asset at {} ({} bytes)", url, upload.bytes.len());
        Ok(url)
    }

    async fn replace(
        &self,
        existing: Option<&str>,
        container: &str,
        upload: &AssetUpload,
    ) -> AppResult<String> {
        if let Some(url) = existing {
            self.delete(url).await?;
        }
        self.store(container, upload).await
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let path = self.path_for_url(url)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                log_debug!("Deleted asset {}", url);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

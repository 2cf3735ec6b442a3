use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::ImageRecord,
    services::catalog::{CatalogQuery, ImageCatalog},
};

/// Static JSON feed: a file holding an array of image records
///
/// The file is re-read on every fetch so edits by the curation process are
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> AppResult<Vec<ImageRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::CatalogUnavailable(format!(
                "Failed to read catalog file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::CatalogUnavailable(format!(
                "Failed to parse catalog file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait::async_trait]
impl ImageCatalog for JsonFileCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>> {
        let images = self.load().await?;
        Ok(query.apply(&images))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

use crate::{
    error::AppResult,
    models::ImageRecord,
    services::catalog::{CatalogQuery, ImageCatalog},
};

/// Fixed set of records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    images: Vec<ImageRecord>,
}

impl InMemoryCatalog {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait::async_trait]
impl ImageCatalog for InMemoryCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>> {
        Ok(query.apply(&self.images))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

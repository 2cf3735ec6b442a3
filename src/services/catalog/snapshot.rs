use tokio::sync::OnceCell;

use crate::{
    error::AppResult,
    models::ImageRecord,
    services::catalog::{CatalogQuery, ImageCatalog},
};

/// Request-scoped view over another catalog
///
/// The first fetch pulls every selectable record from the inner catalog; all
/// later queries, including that first one, are answered from memory. One
/// snapshot is meant to live for a single resolution so the fallback chain
/// costs one round trip instead of one per stage.
pub struct SnapshotCatalog<'a> {
    inner: &'a dyn ImageCatalog,
    images: OnceCell<Vec<ImageRecord>>,
}

impl<'a> SnapshotCatalog<'a> {
    pub fn new(inner: &'a dyn ImageCatalog) -> Self {
        Self {
            inner,
            images: OnceCell::new(),
        }
    }

    async fn images(&self) -> AppResult<&[ImageRecord]> {
        let images = self
            .images
            .get_or_try_init(|| async {
                let images = self.inner.fetch(&CatalogQuery::all()).await?;
                tracing::debug!(
                    catalog = self.inner.name(),
                    images = images.len(),
                    "Catalog snapshot loaded"
                );
                Ok::<_, crate::error::AppError>(images)
            })
            .await?;
        Ok(images.as_slice())
    }
}

#[async_trait::async_trait]
impl ImageCatalog for SnapshotCatalog<'_> {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>> {
        let images = self.images().await?;
        Ok(query.apply(images))
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::catalog::test_support::image;
    use crate::services::catalog::MockImageCatalog;

    #[tokio::test]
    async fn test_inner_fetched_once() {
        let mut inner = MockImageCatalog::new();
        inner
            .expect_fetch()
            .withf(|query| *query == CatalogQuery::all())
            .times(1)
            .returning(|_| {
                Ok(vec![
                    image("a", "Sunny", "Morning"),
                    image("b", "Rainy", "Night"),
                ])
            });
        inner.expect_name().return_const("mock");

        let snapshot = SnapshotCatalog::new(&inner);

        let sunny = snapshot
            .fetch(&CatalogQuery::new(Some("Sunny"), None, None))
            .await
            .unwrap();
        assert_eq!(sunny.len(), 1);

        let others = snapshot
            .fetch(&CatalogQuery::new(None, None, Some("a")))
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, "b");
    }

    #[tokio::test]
    async fn test_inner_failure_propagates() {
        let mut inner = MockImageCatalog::new();
        inner
            .expect_fetch()
            .returning(|_| Err(AppError::CatalogUnavailable("offline".to_string())));
        inner.expect_name().return_const("mock");

        let snapshot = SnapshotCatalog::new(&inner);
        let result = snapshot.fetch(&CatalogQuery::all()).await;
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(AppError::CatalogUnavailable(_))));
    }
}

/// Image catalog abstraction
///
/// The gallery lives in an externally curated store (a Notion database in
/// production, a static JSON feed or fixed records elsewhere). Every backend
/// answers the same filtered query and applies the same selectability gate, so
/// the resolver never has to know where records come from.
use crate::{error::AppResult, models::ImageRecord};

pub mod file;
pub mod memory;
pub mod notion;
pub mod snapshot;

pub use file::JsonFileCatalog;
pub use memory::InMemoryCatalog;
pub use notion::NotionCatalog;
pub use snapshot::SnapshotCatalog;

/// Filter for a catalog fetch. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub weather: Option<String>,
    pub time_period: Option<String>,
    pub exclude_id: Option<String>,
    /// Order results by rating, best first. Diagnostic only.
    pub sort_by_rating: bool,
}

impl CatalogQuery {
    pub fn new(weather: Option<&str>, time_period: Option<&str>, exclude_id: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            weather: non_empty(weather),
            time_period: non_empty(time_period),
            exclude_id: non_empty(exclude_id),
            sort_by_rating: false,
        }
    }

    /// Every selectable record, nothing excluded
    pub fn all() -> Self {
        Self::default()
    }

    pub fn sorted_by_rating(mut self) -> Self {
        self.sort_by_rating = true;
        self
    }

    /// Whether `image` belongs in this query's result
    pub fn matches(&self, image: &ImageRecord) -> bool {
        fn label_matches(wanted: Option<&str>, actual: &str) -> bool {
            wanted.map_or(true, |w| w.eq_ignore_ascii_case(actual.trim()))
        }

        image.is_selectable()
            && self.exclude_id.as_deref() != Some(image.id.as_str())
            && label_matches(self.weather.as_deref(), &image.weather)
            && label_matches(self.time_period.as_deref(), &image.time_period)
    }

    /// Filters (and optionally sorts) records in memory
    pub fn apply<'a, I>(&self, images: I) -> Vec<ImageRecord>
    where
        I: IntoIterator<Item = &'a ImageRecord>,
    {
        let mut matched: Vec<ImageRecord> = images
            .into_iter()
            .filter(|image| self.matches(image))
            .cloned()
            .collect();

        if self.sort_by_rating {
            matched.sort_by(|a, b| b.rating_score.cmp(&a.rating_score));
        }

        matched
    }
}

/// Trait for image catalog backends
///
/// `fetch` returns only selectable records matching the query, never the
/// excluded id. Backends fail with `CatalogUnavailable` when the store cannot
/// be reached or returns data that cannot be parsed; an empty result is never
/// used to signal failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageCatalog: Send + Sync {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::test_support::{image, rated};
    use super::*;

    #[test]
    fn test_query_trims_blank_criteria() {
        let query = CatalogQuery::new(Some("  "), Some("Night"), Some(""));
        assert_eq!(query.weather, None);
        assert_eq!(query.time_period.as_deref(), Some("Night"));
        assert_eq!(query.exclude_id, None);
    }

    #[test]
    fn test_matches_case_insensitive() {
        let query = CatalogQuery::new(Some("sunny"), Some("MORNING"), None);
        assert!(query.matches(&image("a", "Sunny", "Morning")));
        assert!(!query.matches(&image("b", "Sunny", "Night")));
    }

    #[test]
    fn test_matches_excludes_id() {
        let query = CatalogQuery::new(None, None, Some("a"));
        assert!(!query.matches(&image("a", "Sunny", "Morning")));
        assert!(query.matches(&image("b", "Sunny", "Morning")));
    }

    #[test]
    fn test_matches_requires_selectable() {
        let mut unverified = image("a", "Sunny", "Morning");
        unverified.verified = false;
        assert!(!CatalogQuery::all().matches(&unverified));
    }

    #[test]
    fn test_apply_sorts_by_rating() {
        let images = vec![
            rated(image("low", "Sunny", "Morning"), -3, 5),
            rated(image("high", "Sunny", "Morning"), 9, 12),
            rated(image("mid", "Sunny", "Morning"), 2, 1),
        ];

        let ids: Vec<String> = CatalogQuery::all()
            .sorted_by_rating()
            .apply(&images)
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }
}

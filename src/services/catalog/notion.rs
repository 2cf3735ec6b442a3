/// Notion gallery catalog
///
/// Queries the gallery database through the Notion REST API and maps each page
/// onto an `ImageRecord`.
///
/// API Flow:
/// 1. `POST /v1/databases/{id}/query` with URL/weather/time filters
/// 2. Repeat with `start_cursor` while `has_more` is set
///
/// Notion's `select.equals` is case-sensitive, so the server-side filters only
/// narrow the transfer; the case-insensitive selectability filter is always
/// re-applied locally.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{
        notion::{NotionQueryRequest, NotionQueryResponse},
        ImageRecord,
    },
    services::catalog::{CatalogQuery, ImageCatalog},
};

/// Upper bound on followed result pages per fetch; a gallery that needs more
/// is reported as unavailable rather than returned partially
pub const MAX_PAGES: usize = 50;

#[derive(Clone)]
pub struct NotionCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    api_version: String,
    database_id: String,
    page_size: u32,
}

impl NotionCatalog {
    /// Creates a catalog whose every request is bounded by `timeout`
    pub fn new(
        api_key: String,
        api_url: String,
        api_version: String,
        database_id: String,
        page_size: u32,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            api_version,
            database_id,
            page_size,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/v1/databases/{}/query", self.api_url, self.database_id)
    }

    /// Fetches one page of results
    async fn query_page(&self, request: &NotionQueryRequest) -> AppResult<NotionQueryResponse> {
        let response = self
            .http_client
            .post(self.query_url())
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.api_version)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogUnavailable(format!(
                "Notion API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                "Failed to deserialize Notion query response"
            );
            AppError::CatalogUnavailable(format!("Failed to parse Notion response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl ImageCatalog for NotionCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>> {
        let mut request = NotionQueryRequest::gallery(
            query.weather.as_deref(),
            query.time_period.as_deref(),
            query.sort_by_rating,
            self.page_size,
        );

        let mut pages = Vec::new();
        let mut complete = false;
        for _ in 0..MAX_PAGES {
            let response = self.query_page(&request).await?;
            pages.extend(response.results);

            match response.next_cursor {
                Some(cursor) if response.has_more => request.start_cursor = Some(cursor),
                _ => {
                    complete = true;
                    break;
                }
            }
        }

        // Never hand back a partial gallery
        if !complete {
            tracing::warn!(
                max_pages = MAX_PAGES,
                fetched = pages.len(),
                catalog = "notion",
                "Gallery query still paginating at page limit"
            );
            return Err(AppError::CatalogUnavailable(format!(
                "Notion pagination exceeded {} pages",
                MAX_PAGES
            )));
        }

        let records: Vec<ImageRecord> = pages.into_iter().map(ImageRecord::from).collect();
        let images = query.apply(&records);

        tracing::debug!(
            weather = ?query.weather,
            time_period = ?query.time_period,
            fetched = records.len(),
            selectable = images.len(),
            catalog = "notion",
            "Gallery query completed"
        );

        Ok(images)
    }

    fn name(&self) -> &'static str {
        "notion"
    }
}

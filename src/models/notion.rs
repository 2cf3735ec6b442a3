//! Notion database wire types for the image gallery.
//!
//! Property payloads vary by property type, so pages keep their properties as
//! raw JSON and expose typed accessors for the handful of shapes we read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ImageRecord;

pub const PROP_TITLE: &str = "Title";
pub const PROP_NAME: &str = "Name";
pub const PROP_DISPLAY_URL: &str = "Cloudinary URL";
pub const PROP_WEATHER: &str = "Weather";
pub const PROP_TIME_PERIOD: &str = "Time Period";
pub const PROP_ACTIVITY: &str = "Activity";
pub const PROP_RATING_SCORE: &str = "Rating Score";
pub const PROP_TOTAL_RATINGS: &str = "Total Ratings";
pub const PROP_VERIFIED: &str = "Verified";
pub const PROP_SPECIAL_OCCASION: &str = "Special Occasion";

/// Body of `POST /v1/databases/{id}/query`
#[derive(Debug, Clone, Serialize)]
pub struct NotionQueryRequest {
    pub filter: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl NotionQueryRequest {
    /// Builds the gallery query. Weather and time filters are only added when set.
    pub fn gallery(
        weather: Option<&str>,
        time_period: Option<&str>,
        sort_by_rating: bool,
        page_size: u32,
    ) -> Self {
        let mut conditions = vec![json!({
            "property": PROP_DISPLAY_URL,
            "url": { "is_not_empty": true }
        })];

        if let Some(weather) = weather {
            conditions.push(json!({
                "property": PROP_WEATHER,
                "select": { "equals": weather }
            }));
        }

        if let Some(time_period) = time_period {
            conditions.push(json!({
                "property": PROP_TIME_PERIOD,
                "select": { "equals": time_period }
            }));
        }

        let sorts = if sort_by_rating {
            vec![json!({ "property": PROP_RATING_SCORE, "direction": "descending" })]
        } else {
            Vec::new()
        };

        Self {
            filter: json!({ "and": conditions }),
            sorts,
            page_size,
            start_cursor: None,
        }
    }
}

/// One page of database query results
#[derive(Debug, Deserialize)]
pub struct NotionQueryResponse {
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database row
#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl NotionPage {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    fn url(&self, name: &str) -> Option<&str> {
        self.property(name)?.get("url")?.as_str()
    }

    fn select(&self, name: &str) -> Option<&str> {
        self.property(name)?.get("select")?.get("name")?.as_str()
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.property(name)?.get("number")?.as_f64()
    }

    fn checkbox(&self, name: &str) -> Option<bool> {
        self.property(name)?.get("checkbox")?.as_bool()
    }

    /// Concatenated text of a `title` or `rich_text` property
    fn text(&self, name: &str) -> Option<String> {
        let prop = self.property(name)?;
        let segments = prop
            .get("title")
            .or_else(|| prop.get("rich_text"))?
            .as_array()?;

        let text: String = segments
            .iter()
            .filter_map(|segment| {
                segment
                    .get("plain_text")
                    .or_else(|| segment.get("text").and_then(|t| t.get("content")))
                    .and_then(Value::as_str)
            })
            .collect();

        Some(text)
    }

    fn select_or_text(&self, name: &str) -> Option<String> {
        self.select(name)
            .map(str::to_string)
            .or_else(|| self.text(name))
            .filter(|s| !s.trim().is_empty())
    }
}

impl From<NotionPage> for ImageRecord {
    fn from(page: NotionPage) -> Self {
        let title = page
            .text(PROP_TITLE)
            .or_else(|| page.text(PROP_NAME))
            .unwrap_or_default();

        let rating_score = page
            .number(PROP_RATING_SCORE)
            .map(|n| n.round() as i64)
            .unwrap_or(0);

        let total_ratings = page
            .number(PROP_TOTAL_RATINGS)
            .map(|n| n.max(0.0).round() as u32)
            .unwrap_or(0);

        ImageRecord {
            title,
            display_url: page.url(PROP_DISPLAY_URL).unwrap_or_default().to_string(),
            weather: page.select(PROP_WEATHER).unwrap_or_default().to_string(),
            time_period: page.select(PROP_TIME_PERIOD).unwrap_or_default().to_string(),
            activity: page.text(PROP_ACTIVITY).filter(|s| !s.is_empty()),
            rating_score,
            total_ratings,
            verified: page.checkbox(PROP_VERIFIED).unwrap_or(false),
            special_occasion_tag: page.select_or_text(PROP_SPECIAL_OCCASION),
            id: page.id,
        }
    }
}

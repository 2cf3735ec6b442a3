use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::services::compatibility;

pub mod notion;

const MAX_LABEL_LEN: usize = 64;

/// One selectable (or not) gallery image, as read from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "cloudinary_url")]
    pub display_url: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub time_period: String,
    #[serde(default)]
    pub activity: Option<String>,
    /// Likes minus dislikes
    #[serde(default)]
    pub rating_score: i64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub verified: bool,
    /// Holiday-style tag; tagged images are reserved for occasion-specific display
    #[serde(default)]
    pub special_occasion_tag: Option<String>,
}

impl ImageRecord {
    /// Whether ordinary context-based selection may ever return this record
    pub fn is_selectable(&self) -> bool {
        !self.display_url.trim().is_empty()
            && self.verified
            && self
                .special_occasion_tag
                .as_deref()
                .map_or(true, |tag| tag.trim().is_empty())
    }
}

/// Caller-supplied selection criteria, already validated and normalized
///
/// `None` means "no constraint" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    pub weather: Option<String>,
    pub time_period: Option<String>,
    pub exclude_id: Option<String>,
}

impl SelectionContext {
    pub fn new(
        weather: Option<&str>,
        time_period: Option<&str>,
        exclude_id: Option<&str>,
    ) -> Self {
        Self {
            weather: weather.and_then(compatibility::canonical_weather),
            time_period: time_period.and_then(compatibility::canonical_time_period),
            exclude_id: exclude_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }
}

/// Labels used when a request leaves weather or time out entirely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDefaults {
    pub weather: String,
    pub time_period: String,
}

/// Request body for `POST /api/image/change`
///
/// Fields are kept loosely typed so that malformed values surface as
/// `InvalidContext` instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeImageRequest {
    #[serde(default)]
    pub current_image_id: Option<Value>,
    #[serde(default)]
    pub context: Option<RequestContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub weather: Option<Value>,
    #[serde(default)]
    pub time_period: Option<Value>,
}

impl ChangeImageRequest {
    /// Validates the request and applies defaults for absent labels.
    ///
    /// An absent or null label takes the default; an explicit empty string
    /// means "no constraint".
    pub fn into_context(self, defaults: &ContextDefaults) -> AppResult<SelectionContext> {
        let context = self.context.unwrap_or_default();

        let weather = label_or_default("weather", context.weather, &defaults.weather)?;
        let time_period =
            label_or_default("time_period", context.time_period, &defaults.time_period)?;
        let exclude_id = optional_string("current_image_id", self.current_image_id)?;

        Ok(SelectionContext::new(
            Some(weather.as_str()),
            Some(time_period.as_str()),
            exclude_id.as_deref(),
        ))
    }
}

fn label_or_default(field: &str, value: Option<Value>, default: &str) -> AppResult<String> {
    let label = optional_string(field, value)?.unwrap_or_else(|| default.to_string());

    if label.chars().count() > MAX_LABEL_LEN {
        return Err(AppError::InvalidContext(format!(
            "{} must be at most {} characters",
            field, MAX_LABEL_LEN
        )));
    }
    if label.chars().any(char::is_control) {
        return Err(AppError::InvalidContext(format!(
            "{} contains control characters",
            field
        )));
    }

    Ok(label)
}

fn optional_string(field: &str, value: Option<Value>) -> AppResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(AppError::InvalidContext(format!(
            "{} must be a string, got {}",
            field,
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Public view of a selected image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageView {
    pub id: String,
    pub title: String,
    pub display_url: String,
    pub weather: String,
    pub time_period: String,
    pub activity: Option<String>,
    pub rating_score: i64,
}

impl From<&ImageRecord> for ImageView {
    fn from(image: &ImageRecord) -> Self {
        Self {
            id: image.id.clone(),
            title: image.title.clone(),
            display_url: image.display_url.clone(),
            weather: image.weather.clone(),
            time_period: image.time_period.clone(),
            activity: image.activity.clone(),
            rating_score: image.rating_score,
        }
    }
}

/// How a selection was reached
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchInfo {
    pub stage: crate::services::resolver::MatchStage,
    pub weather: Option<String>,
    pub time_period: Option<String>,
    pub candidates: usize,
}

/// Response body for `POST /api/image/change`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChangeImageResponse {
    Found {
        success: bool,
        image: ImageView,
        #[serde(rename = "match")]
        match_info: MatchInfo,
    },
    NotFound {
        success: bool,
        error: &'static str,
        message: &'static str,
    },
}

impl ChangeImageResponse {
    pub fn found(image: &ImageRecord, match_info: MatchInfo) -> Self {
        ChangeImageResponse::Found {
            success: true,
            image: ImageView::from(image),
            match_info,
        }
    }

    pub fn not_found() -> Self {
        ChangeImageResponse::NotFound {
            success: false,
            error: "no_alternatives_found",
            message: "No alternative images found matching current context",
        }
    }
}

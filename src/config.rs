use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Notion integration token; required unless a catalog file is configured
    #[serde(default)]
    pub notion_api_key: Option<String>,

    /// Notion database holding the image gallery
    #[serde(default = "default_gallery_database_id")]
    pub gallery_database_id: String,

    /// Notion API base URL
    #[serde(default = "default_notion_api_url")]
    pub notion_api_url: String,

    /// Pinned Notion API version header
    #[serde(default = "default_notion_api_version")]
    pub notion_api_version: String,

    /// Upper bound on a single catalog round trip
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Page size used when querying the gallery database
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,

    /// Static JSON feed used instead of Notion when set
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// Weather assumed when a request omits it
    #[serde(default = "default_weather")]
    pub default_weather: String,

    /// Time period assumed when a request omits it
    #[serde(default = "default_time_period")]
    pub default_time_period: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where the image catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Notion {
        api_key: String,
        api_url: String,
        api_version: String,
        database_id: String,
        page_size: u32,
        timeout: Duration,
    },
    File(PathBuf),
}

fn default_gallery_database_id() -> String {
    "2fc41906-4d30-8189-a748-c6b715faf485".to_string()
}

fn default_notion_api_url() -> String {
    "https://api.notion.com".to_string()
}

fn default_notion_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    8
}

fn default_catalog_page_size() -> u32 {
    100
}

fn default_weather() -> String {
    "Sunny".to_string()
}

fn default_time_period() -> String {
    "Afternoon".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Picks the catalog backend. A configured file wins over Notion.
    pub fn catalog_source(&self) -> anyhow::Result<CatalogSource> {
        if let Some(path) = &self.catalog_file {
            return Ok(CatalogSource::File(path.clone()));
        }

        let api_key = self
            .notion_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Notion API key not configured"))?;

        Ok(CatalogSource::Notion {
            api_key: api_key.to_string(),
            api_url: self.notion_api_url.trim_end_matches('/').to_string(),
            api_version: self.notion_api_version.clone(),
            database_id: self.gallery_database_id.clone(),
            page_size: self.catalog_page_size.clamp(1, 100),
            timeout: Duration::from_secs(self.catalog_timeout_secs.max(1)),
        })
    }
}

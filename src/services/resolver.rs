//! Context-aware candidate resolution.
//!
//! Strategies run strictly in order and the first non-empty candidate set
//! wins:
//!
//! 1. exact weather and time
//! 2. each substitute weather, same time
//! 3. any weather, same time
//! 4. each compatible time period: same weather, then any weather
//! 5. sweep of every image whose time period is compatible, weather ignored
//!
//! When all of them come back empty there is no alternative. An image from an
//! incompatible time group is never returned.

use rand::Rng;
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{ImageRecord, MatchInfo, SelectionContext},
    services::{
        catalog::{CatalogQuery, ImageCatalog},
        compatibility, selector,
    },
};

/// Which strategy produced the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    WeatherFallback,
    AnyWeather,
    CompatibleTime,
    CompatibleSweep,
}

/// A non-empty set of candidates and the criteria that found it
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub stage: MatchStage,
    pub weather: Option<String>,
    pub time_period: Option<String>,
    candidates: Vec<ImageRecord>,
}

impl CandidateSet {
    fn new(
        stage: MatchStage,
        query: &CatalogQuery,
        candidates: Vec<ImageRecord>,
    ) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            stage,
            weather: query.weather.clone(),
            time_period: query.time_period.clone(),
            candidates,
        })
    }

    pub fn candidates(&self) -> &[ImageRecord] {
        &self.candidates
    }

    /// Weighted draw among the candidates
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ImageRecord> {
        selector::select(&self.candidates, rng)
    }

    pub fn match_info(&self) -> MatchInfo {
        MatchInfo {
            stage: self.stage,
            weather: self.weather.clone(),
            time_period: self.time_period.clone(),
            candidates: self.candidates.len(),
        }
    }
}

/// Runs the fallback chain and returns the first non-empty candidate set.
///
/// `Ok(None)` means every strategy came back empty. Catalog failures are
/// returned unchanged.
pub async fn find_candidates(
    catalog: &dyn ImageCatalog,
    context: &SelectionContext,
) -> AppResult<Option<CandidateSet>> {
    let weather = context.weather.as_deref();
    let time_period = context.time_period.as_deref();
    let exclude_id = context.exclude_id.as_deref();

    let mut attempts: Vec<(MatchStage, CatalogQuery)> = Vec::new();
    let mut push = |stage, weather: Option<&str>, time: Option<&str>| {
        let query = CatalogQuery::new(weather, time, exclude_id);
        if !attempts.iter().any(|(_, q)| *q == query) {
            attempts.push((stage, query));
        }
    };

    push(MatchStage::Exact, weather, time_period);

    if let Some(weather) = weather {
        for &substitute in compatibility::weather_fallbacks(weather) {
            push(MatchStage::WeatherFallback, Some(substitute), time_period);
        }
        push(MatchStage::AnyWeather, None, time_period);
    }

    if let Some(time_period) = time_period {
        for alt_time in compatibility::alternative_periods(time_period) {
            push(MatchStage::CompatibleTime, weather, Some(alt_time.as_str()));
            push(MatchStage::CompatibleTime, None, Some(alt_time.as_str()));
        }
    }

    for (stage, query) in &attempts {
        let candidates = catalog.fetch(query).await?;
        tracing::debug!(
            stage = ?stage,
            weather = ?query.weather,
            time_period = ?query.time_period,
            candidates = candidates.len(),
            "Resolution attempt"
        );
        if let Some(set) = CandidateSet::new(*stage, query, candidates) {
            return Ok(Some(set));
        }
    }

    let sweep = CatalogQuery::new(None, None, exclude_id);
    let candidates: Vec<ImageRecord> = catalog
        .fetch(&sweep)
        .await?
        .into_iter()
        .filter(|image| {
            time_period.map_or(true, |t| compatibility::is_time_compatible(t, &image.time_period))
        })
        .collect();

    tracing::debug!(
        stage = ?MatchStage::CompatibleSweep,
        candidates = candidates.len(),
        "Resolution attempt"
    );

    Ok(CandidateSet::new(MatchStage::CompatibleSweep, &sweep, candidates))
}

/// Resolves a context to a single image using the given random source.
///
/// `Ok(None)` is the "no alternative found" outcome.
pub async fn resolve<R>(
    catalog: &dyn ImageCatalog,
    context: &SelectionContext,
    rng: &mut R,
) -> AppResult<Option<ImageRecord>>
where
    R: Rng + Send + ?Sized,
{
    let found = find_candidates(catalog, context).await?;
    Ok(found.and_then(|set| set.choose(rng).cloned()))
}

use crate::domain::location::Location;
use crate::domain::model::{
    ComparablesRecord, CrimeProfile, DemographicsRecord, MarketRecord, PlacesProfile,
    ProviderKind, WalkabilityProfile,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Per-provider failure. Recovered inside the engine and never returned to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("timed out after {0} ms")]
    Timeout(u64),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::MalformedResponse(_) => "malformed_response",
            ProviderError::NotFound(_) => "not_found",
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[async_trait]
pub trait Provider: Send + Sync {
    type Output: Send;

    fn kind(&self) -> ProviderKind;

    async fn fetch(&self, location: &Location) -> ProviderResult<Self::Output>;
}

/// The six adapters the engine fans out to.
#[derive(Clone)]
pub struct Providers {
    pub walkability: Arc<dyn Provider<Output = WalkabilityProfile>>,
    pub places: Arc<dyn Provider<Output = PlacesProfile>>,
    pub crime: Arc<dyn Provider<Output = CrimeProfile>>,
    pub census: Arc<dyn Provider<Output = DemographicsRecord>>,
    pub market: Arc<dyn Provider<Output = MarketRecord>>,
    pub comparables: Arc<dyn Provider<Output = ComparablesRecord>>,
}

/// Metrics handed to the tip generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub walk_score: u8,
    pub transit_score: u8,
    pub bike_score: u8,
    pub safety_score: u8,
    pub amenity_count: usize,
    pub school_count: usize,
    pub median_household_income: u64,
    pub median_home_value: u64,
    pub bachelors_or_higher: u8,
    pub median_age: f64,
}

#[async_trait]
pub trait TipGenerator: Send + Sync {
    async fn generate_agent_tips(
        &self,
        address: &str,
        summary: &MetricsSummary,
    ) -> ProviderResult<Vec<String>>;
}

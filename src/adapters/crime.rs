use crate::adapters::http::ApiClient;
use crate::domain::location::Location;
use crate::domain::model::{CrimeProfile, CrimeTrend, NationalComparison, ProviderKind};
use crate::domain::ports::{Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::Deserialize;

/// National offences per 100k residents used as the comparison baseline.
pub const NATIONAL_CRIME_RATE: f64 = 2580.0;

#[derive(Debug, Deserialize)]
struct EstimatesResponse {
    #[serde(default)]
    results: Vec<StateEstimate>,
}

#[derive(Debug, Deserialize)]
struct StateEstimate {
    population: Option<u64>,
    violent_crime: Option<u64>,
    property_crime: Option<u64>,
    #[serde(alias = "data_year")]
    year: Option<i32>,
}

/// 由原始數字計算 CrimeProfile
pub fn crime_profile(violent: u64, property: u64, population: u64, year: i32) -> CrimeProfile {
    let total = violent + property;
    let rate = total as f64 / population.max(1) as f64 * 100_000.0;
    let safety = (100.0 - rate / 50.0).clamp(0.0, 100.0).round() as u8;

    let trend = if rate < 2000.0 {
        CrimeTrend::Improving
    } else if rate < 3500.0 {
        CrimeTrend::Stable
    } else {
        CrimeTrend::Worsening
    };

    let compared_to_national = if rate < NATIONAL_CRIME_RATE * 0.8 {
        NationalComparison::Better
    } else if rate < NATIONAL_CRIME_RATE * 1.2 {
        NationalComparison::Average
    } else {
        NationalComparison::Worse
    };

    CrimeProfile {
        violent_crime: violent,
        property_crime: property,
        total_crime: total,
        crime_rate: rate.round() as u32,
        safety_score: safety,
        trend,
        compared_to_national,
        year,
    }
}

/// FBI Crime Data Explorer state estimates.
pub struct FbiCrimeProvider {
    client: ApiClient,
    year: i32,
}

impl FbiCrimeProvider {
    pub fn new(client: ApiClient, year: i32) -> Self {
        Self { client, year }
    }
}

#[async_trait]
impl Provider for FbiCrimeProvider {
    type Output = CrimeProfile;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Crime
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<CrimeProfile> {
        let api_key = self.client.api_key()?;
        let state = location
            .state_abbr()
            .ok_or_else(|| ProviderError::NotFound(format!("no state in '{}'", location.address)))?;

        let path = format!("/estimates/states/{}/{}", state, self.year);
        let request = self.client.get(&path).query(&[("API_KEY", api_key)]);
        let body: EstimatesResponse = self.client.send_json(request).await?;

        let estimate = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("no crime estimates for {}", state)))?;

        let population = estimate.population.unwrap_or(0);
        if population == 0 {
            return Err(ProviderError::MalformedResponse(format!(
                "crime estimate for {} has no population",
                state
            )));
        }

        Ok(crime_profile(
            estimate.violent_crime.unwrap_or(0),
            estimate.property_crime.unwrap_or(0),
            population,
            estimate.year.unwrap_or(self.year),
        ))
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use neighborhood_insights::core::{Location, Provider, Providers, TipGenerator};
use neighborhood_insights::domain::model::*;
use neighborhood_insights::domain::ports::{MetricsSummary, ProviderError, ProviderResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const SEATTLE: &str = "400 Broad St, Seattle, WA 98109";

pub fn seattle() -> Location {
    Location::new(47.6205, -122.3493, SEATTLE)
}

/// 可設定延遲與失敗的假提供者
pub struct StubProvider<T> {
    kind: ProviderKind,
    result: ProviderResult<T>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Provider for StubProvider<T> {
    type Output = T;

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, _location: &Location) -> ProviderResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

#[derive(Default)]
pub struct StubSet {
    failing: Vec<ProviderKind>,
    delays: Vec<(ProviderKind, Duration)>,
    calls: Arc<AtomicUsize>,
}

impl StubSet {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn failing(mut self, kinds: &[ProviderKind]) -> Self {
        self.failing.extend_from_slice(kinds);
        self
    }

    pub fn delayed(mut self, kind: ProviderKind, delay: Duration) -> Self {
        self.delays.push((kind, delay));
        self
    }

    pub fn delayed_all(mut self, delay: Duration) -> Self {
        for kind in ProviderKind::ALL {
            self.delays.push((kind, delay));
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn stub<T: Clone + Send + Sync + 'static>(
        &self,
        kind: ProviderKind,
        payload: T,
    ) -> Arc<dyn Provider<Output = T>> {
        let result = if self.failing.contains(&kind) {
            Err(ProviderError::Network(format!("{} is down", kind)))
        } else {
            Ok(payload)
        };
        let delay = self
            .delays
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, d)| *d)
            .unwrap_or(Duration::ZERO);

        Arc::new(StubProvider {
            kind,
            result,
            delay,
            calls: self.calls.clone(),
        })
    }

    pub fn build(&self) -> Providers {
        Providers {
            walkability: self.stub(ProviderKind::Walkability, sample_walkability()),
            places: self.stub(ProviderKind::Places, sample_places()),
            crime: self.stub(ProviderKind::Crime, sample_crime()),
            census: self.stub(ProviderKind::Census, sample_census()),
            market: self.stub(ProviderKind::Market, sample_market()),
            comparables: self.stub(ProviderKind::Comparables, sample_comparables()),
        }
    }
}

pub struct StubTips {
    pub result: ProviderResult<Vec<String>>,
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl StubTips {
    pub fn returning(result: ProviderResult<Vec<String>>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl TipGenerator for StubTips {
    async fn generate_agent_tips(
        &self,
        _address: &str,
        _summary: &MetricsSummary,
    ) -> ProviderResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

pub fn sample_walkability() -> WalkabilityProfile {
    WalkabilityProfile {
        walk_score: 85,
        walk_description: "Very Walkable".to_string(),
        transit_score: 75,
        transit_description: "Excellent Transit".to_string(),
        bike_score: 60,
        bike_description: "Bikeable".to_string(),
        updated: None,
    }
}

pub fn place(name: &str, distance_miles: f64) -> PlaceRecord {
    PlaceRecord {
        name: name.to_string(),
        formatted_address: format!("{}, Seattle, WA", name),
        categories: vec!["catering.restaurant".to_string()],
        latitude: 47.62,
        longitude: -122.35,
        distance_miles,
        place_id: format!("id-{}", name),
    }
}

fn places_named(prefix: &str, count: usize) -> Vec<PlaceRecord> {
    (0..count)
        .map(|i| place(&format!("{} {}", prefix, i + 1), 0.1 * (i + 1) as f64))
        .collect()
}

pub fn sample_places() -> PlacesProfile {
    let mut profile = PlacesProfile {
        restaurants: places_named("Cafe", 15),
        shopping: places_named("Market", 4),
        entertainment: places_named("Park", 3),
        services: places_named("Pharmacy", 2),
        schools: places_named("School", 9),
        transportation: places_named("Station", 4),
        safety_services: places_named("Fire Station", 6),
        category_availability: BTreeMap::new(),
        total_count: 24,
        talking_points: Vec::new(),
    };
    for category in PlaceCategory::ALL {
        profile.category_availability.insert(category, true);
    }
    profile
}

pub fn sample_crime() -> CrimeProfile {
    CrimeProfile {
        violent_crime: 120,
        property_crime: 880,
        total_crime: 1000,
        crime_rate: 1000,
        safety_score: 80,
        trend: CrimeTrend::Improving,
        compared_to_national: NationalComparison::Better,
        year: 2022,
    }
}

pub fn sample_census() -> DemographicsRecord {
    DemographicsRecord {
        population: PopulationStats {
            total: 750_000,
            median_age: 35.5,
        },
        economics: EconomicStats {
            median_household_income: 90_000,
            unemployment_rate: 3.9,
        },
        education: EducationStats {
            high_school_graduate: 20,
            bachelors_or_higher: 55,
        },
        housing: HousingStats {
            total_units: 350_000,
            owner_occupied: 45,
            renter_occupied: 55,
            median_home_value: 850_000,
            median_rent: 2_100,
        },
        year: 2022,
    }
}

pub fn sample_market() -> MarketRecord {
    MarketRecord {
        median_sale_price: 820_000,
        average_sale_price: 870_000,
        total_sales: 95,
        price_change_percent: 6.4,
        market_trend: MarketTrend::Seller,
    }
}

pub fn sample_comparables() -> ComparablesRecord {
    ComparablesRecord {
        average_price: 810_000,
        price_min: 540_000,
        price_max: 1_250_000,
        average_square_footage: 1_650,
        total_count: 32,
    }
}

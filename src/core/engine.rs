use crate::core::demo::{demo_profile, is_demo_address};
use crate::core::fallback::{default_for, Fallback};
use crate::core::insights::{self, MergedData};
use crate::core::quality::quality_score;
use crate::domain::location::Location;
use crate::domain::model::{
    AvailabilityMap, DataSources, DemographicsProfile, NeighborhoodProfile, OverviewSection,
    ProviderKind, SafetyProfile, SchoolsProfile, TransportationProfile, DEFAULT_DATA_SOURCE,
};
use crate::domain::ports::{Provider, ProviderError, ProviderResult, Providers, TipGenerator};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

/// Fans a location out to the six providers and assembles one complete profile.
pub struct NeighborhoodEngine {
    providers: Providers,
    tip_generator: Option<Arc<dyn TipGenerator>>,
    deadline: Duration,
}

/// 單一提供者呼叫，超過期限視為 Timeout
async fn run_provider<T: Send>(
    provider: &dyn Provider<Output = T>,
    location: &Location,
    deadline: Duration,
) -> ProviderResult<T> {
    match tokio::time::timeout(deadline, provider.fetch(location)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(deadline.as_millis() as u64)),
    }
}

/// Records availability/provenance for one settled provider and returns real or fallback data.
fn settle<T: Fallback>(
    kind: ProviderKind,
    result: ProviderResult<T>,
    availability: &mut AvailabilityMap,
    data_sources: &mut DataSources,
) -> T {
    let subsystem = kind.subsystem();
    match result {
        Ok(payload) => {
            availability.insert(subsystem, true);
            data_sources.insert(subsystem, kind.provenance().to_string());
            payload
        }
        Err(e) => {
            tracing::warn!(
                provider = %kind,
                subsystem = %subsystem,
                error = %e,
                error_kind = e.kind(),
                "⚠️ Provider failed, using default data"
            );
            availability.insert(subsystem, false);
            data_sources.insert(subsystem, DEFAULT_DATA_SOURCE.to_string());
            default_for()
        }
    }
}

impl NeighborhoodEngine {
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            tip_generator: None,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_tip_generator(mut self, generator: Arc<dyn TipGenerator>) -> Self {
        self.tip_generator = Some(generator);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn has_tip_generator(&self) -> bool {
        self.tip_generator.is_some()
    }

    /// Always returns a structurally complete profile; provider failures only
    /// show up in `availability`, `data_sources` and `quality_score`.
    pub async fn fetch_comprehensive_data(&self, location: &Location) -> NeighborhoodProfile {
        if is_demo_address(&location.address) {
            tracing::info!(address = %location.address, "🎭 Demo address detected, returning fixture profile");
            return demo_profile(location);
        }

        tracing::info!(
            address = %location.address,
            latitude = location.latitude,
            longitude = location.longitude,
            "🔍 Fetching neighborhood data"
        );
        let started = Instant::now();
        let deadline = self.deadline;
        let p = &self.providers;

        // 六個提供者同時執行，全部結束後才進入後處理
        let (walkability, places, crime, census, market, comparables) = tokio::join!(
            run_provider(p.walkability.as_ref(), location, deadline),
            run_provider(p.places.as_ref(), location, deadline),
            run_provider(p.crime.as_ref(), location, deadline),
            run_provider(p.census.as_ref(), location, deadline),
            run_provider(p.market.as_ref(), location, deadline),
            run_provider(p.comparables.as_ref(), location, deadline),
        );

        let mut availability = AvailabilityMap::new();
        let mut data_sources = DataSources::new();
        let merged = MergedData {
            walkability: settle(ProviderKind::Walkability, walkability, &mut availability, &mut data_sources),
            places: settle(ProviderKind::Places, places, &mut availability, &mut data_sources),
            crime: settle(ProviderKind::Crime, crime, &mut availability, &mut data_sources),
            census: settle(ProviderKind::Census, census, &mut availability, &mut data_sources),
            market: settle(ProviderKind::Market, market, &mut availability, &mut data_sources),
            comparables: settle(ProviderKind::Comparables, comparables, &mut availability, &mut data_sources),
        };
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "All providers settled");

        let summary = insights::metrics_summary(&merged);
        // 建議產生只能用剩下的時間
        let remaining = deadline.saturating_sub(started.elapsed());
        let agent_tips = insights::agent_tips(
            self.tip_generator.as_deref(),
            &location.address,
            &summary,
            remaining,
        )
        .await;

        let profile = assemble(location, merged, agent_tips, availability, data_sources);
        tracing::info!(
            quality_score = profile.quality_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "✅ Neighborhood profile ready"
        );
        profile
    }
}

fn assemble(
    location: &Location,
    merged: MergedData,
    agent_tips: Vec<String>,
    availability: AvailabilityMap,
    data_sources: DataSources,
) -> NeighborhoodProfile {
    // 規則使用截斷前的數量
    let highlights = insights::highlights(&merged);
    let talking_points = insights::places_talking_points(&merged.places);
    let safety_pitch = insights::safety_pitch(&merged.crime);
    let buyer_profiles = insights::buyer_profiles(&merged.census);

    let MergedData {
        walkability,
        mut places,
        crime,
        census,
        market,
        comparables,
    } = merged;

    let school_count = places.schools.len();
    let commute_count = places.transportation.len();
    let family_appeal = insights::family_appeal(school_count);
    let marketing_angles = insights::education_marketing_angles(school_count);
    let benefits = insights::transportation_benefits(&walkability, commute_count);

    places.talking_points = talking_points;
    places.truncate_lists();

    let quality_score = quality_score(&availability);

    NeighborhoodProfile {
        address: location.address.clone(),
        safety: SafetyProfile {
            crime,
            safety_services: places.safety_services.clone(),
            safety_pitch,
        },
        schools: SchoolsProfile {
            schools: places.schools.clone(),
            college_educated_percent: census.education.bachelors_or_higher,
            median_age: census.population.median_age,
            family_appeal,
            marketing_angles,
        },
        transportation: TransportationProfile {
            transit_score: walkability.transit_score,
            transit_description: walkability.transit_description.clone(),
            commute_options: places.transportation.clone(),
            benefits,
        },
        demographics: DemographicsProfile {
            census,
            market,
            comparables,
            buyer_profiles,
        },
        overview: OverviewSection {
            walkability,
            highlights,
            agent_tips,
        },
        places,
        availability,
        data_sources,
        quality_score,
        generated_at: Utc::now(),
    }
}

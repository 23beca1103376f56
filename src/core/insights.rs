use crate::domain::labels::{
    crime_rate_label, format_price, market_trend_label, safety_label, with_commas,
};
use crate::domain::model::{
    ComparablesRecord, CrimeProfile, CrimeTrend, DemographicsRecord, MarketRecord, MarketTrend,
    NationalComparison, PlacesProfile, WalkabilityProfile,
};
use crate::domain::ports::{MetricsSummary, TipGenerator};
use std::time::Duration;

pub const MAX_HIGHLIGHTS: usize = 5;
pub const MAX_BUYER_PROFILES: usize = 3;
pub const AGENT_TIP_COUNT: usize = 3;

pub const FALLBACK_AGENT_TIPS: [&str; AGENT_TIP_COUNT] = [
    "Highlight the walkability score to attract urban professionals and empty nesters",
    "Use local amenity count to demonstrate convenience and lifestyle value",
    "Emphasize safety ratings and community features for family buyers",
];

pub const GENERIC_HIGHLIGHT: &str =
    "Established neighborhood with local amenities and a distinct community character";

/// Provider payloads after fallback substitution, before list truncation.
#[derive(Debug, Clone)]
pub struct MergedData {
    pub walkability: WalkabilityProfile,
    pub places: PlacesProfile,
    pub crime: CrimeProfile,
    pub census: DemographicsRecord,
    pub market: MarketRecord,
    pub comparables: ComparablesRecord,
}

/// 依固定順序檢查門檻，取前五項
pub fn highlights(data: &MergedData) -> Vec<String> {
    let walk = &data.walkability;
    let mut out = Vec::new();

    if walk.walk_score > 70 {
        out.push(format!(
            "Excellent walkability ({}/100) - most errands can be completed on foot",
            walk.walk_score
        ));
    }
    if walk.transit_score > 70 {
        out.push(format!(
            "Great public transit access ({}/100) for easy commuting",
            walk.transit_score
        ));
    }
    if data.places.restaurants.len() > 10 {
        out.push(format!(
            "Rich dining scene with {}+ restaurants nearby",
            data.places.restaurants.len()
        ));
    }
    if data.crime.safety_score > 70 {
        out.push(format!(
            "Safe neighborhood with {} rating",
            safety_label(data.crime.safety_score).to_lowercase()
        ));
    }
    let income = data.census.economics.median_household_income;
    if income > 75_000 {
        out.push(format!(
            "Affluent area with median income of ${}",
            with_commas(income)
        ));
    }
    if data.census.education.bachelors_or_higher > 50 {
        out.push(format!(
            "Highly educated community ({}% college graduates)",
            data.census.education.bachelors_or_higher
        ));
    }
    let market = &data.market;
    if market.market_trend == MarketTrend::Seller {
        out.push("Strong seller's market with high demand and limited inventory".to_string());
    } else if market.median_sale_price > 0 {
        out.push(format!(
            "{} with a median sale price of {}",
            market_trend_label(market.market_trend),
            format_price(market.median_sale_price)
        ));
    }

    out.truncate(MAX_HIGHLIGHTS);
    if out.is_empty() {
        out.push(GENERIC_HIGHLIGHT.to_string());
    }
    out
}

pub fn places_talking_points(places: &PlacesProfile) -> Vec<String> {
    let mut points = Vec::new();
    if !places.restaurants.is_empty() {
        points.push(format!(
            "{} dining options within walking distance",
            places.restaurants.len()
        ));
    }
    if !places.shopping.is_empty() {
        points.push(format!(
            "Convenient shopping with {} retail locations nearby",
            places.shopping.len()
        ));
    }
    if !places.entertainment.is_empty() {
        points.push(format!(
            "Rich entertainment options with {} venues",
            places.entertainment.len()
        ));
    }
    points
}

pub fn safety_pitch(crime: &CrimeProfile) -> Vec<String> {
    let mut pitch = vec![format!(
        "Safety score of {}/100 - {}",
        crime.safety_score,
        safety_label(crime.safety_score)
    )];
    // 預設資料沒有犯罪數，不提犯罪率
    if crime.total_crime > 0 {
        pitch.push(format!(
            "{} area with {} reported offences per 100,000 residents",
            crime_rate_label(crime.crime_rate),
            with_commas(u64::from(crime.crime_rate))
        ));
    }

    match crime.compared_to_national {
        NationalComparison::Better => {
            pitch.push("Crime rates are below the national average".to_string())
        }
        NationalComparison::Average => {
            pitch.push("Crime rates are in line with national averages".to_string())
        }
        NationalComparison::Worse => {}
    }
    if crime.trend == CrimeTrend::Improving {
        pitch.push("Crime trends show neighborhood improvement over time".to_string());
    }
    pitch
}

pub fn buyer_profiles(census: &DemographicsRecord) -> Vec<String> {
    let mut profiles = Vec::new();
    let income = census.economics.median_household_income;
    let median_age = census.population.median_age;

    if income > 100_000 {
        profiles.push("High-income professionals seeking premium amenities");
    } else if income > 60_000 {
        profiles.push("Middle-class families looking for value and community");
    }
    if census.education.bachelors_or_higher > 60 {
        profiles.push("Educated professionals prioritizing schools and culture");
    }
    // 0 代表缺資料，不列入年齡族群判斷
    if median_age > 0.0 && median_age < 35.0 {
        profiles.push("Young professionals and millennials seeking urban lifestyle");
    } else if median_age > 50.0 {
        profiles.push("Empty nesters looking for low-maintenance living");
    }

    profiles
        .into_iter()
        .take(MAX_BUYER_PROFILES)
        .map(str::to_string)
        .collect()
}

pub fn family_appeal(school_count: usize) -> Vec<String> {
    let mut appeal = Vec::new();
    if school_count > 3 {
        appeal.push(format!(
            "{} educational institutions within the area",
            school_count
        ));
    }
    appeal.push("Family-friendly neighborhood with educational opportunities".to_string());
    appeal.push("Close proximity to schools reduces commute time for families".to_string());
    appeal
}

pub fn education_marketing_angles(school_count: usize) -> Vec<String> {
    if school_count == 0 {
        return Vec::new();
    }
    vec![
        "Emphasize school proximity for families with children".to_string(),
        "Highlight educational opportunities for property value stability".to_string(),
        "Market to families prioritizing their children's education".to_string(),
    ]
}

pub fn transportation_benefits(walk: &WalkabilityProfile, commute_options: usize) -> Vec<String> {
    let mut benefits = Vec::new();
    if walk.walk_score > 70 {
        benefits.push("Reduced car dependency saves money on transportation costs".to_string());
    }
    if walk.transit_score > 50 {
        benefits.push("Easy access to public transit for city commuters".to_string());
    }
    if commute_options > 0 {
        benefits.push(format!("{} transportation options nearby", commute_options));
    }
    benefits
}

pub fn metrics_summary(data: &MergedData) -> MetricsSummary {
    MetricsSummary {
        walk_score: data.walkability.walk_score,
        transit_score: data.walkability.transit_score,
        bike_score: data.walkability.bike_score,
        safety_score: data.crime.safety_score,
        amenity_count: data.places.total_count,
        school_count: data.places.schools.len(),
        median_household_income: data.census.economics.median_household_income,
        median_home_value: data.census.housing.median_home_value,
        bachelors_or_higher: data.census.education.bachelors_or_higher,
        median_age: data.census.population.median_age,
    }
}

pub fn fallback_tips() -> Vec<String> {
    FALLBACK_AGENT_TIPS.iter().map(|t| t.to_string()).collect()
}

/// Keeps up to three non-empty tips, padding from the static list.
pub fn normalize_tips(tips: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = tips
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(AGENT_TIP_COUNT)
        .collect();

    if kept.is_empty() {
        return fallback_tips();
    }
    for fallback in FALLBACK_AGENT_TIPS.iter().skip(kept.len()) {
        kept.push(fallback.to_string());
    }
    kept
}

/// Asks the generator for tips; any failure or timeout yields the static tips.
pub async fn agent_tips(
    generator: Option<&dyn TipGenerator>,
    address: &str,
    summary: &MetricsSummary,
    deadline: Duration,
) -> Vec<String> {
    let Some(generator) = generator else {
        tracing::debug!("No tip generator configured, using static agent tips");
        return fallback_tips();
    };
    if deadline.is_zero() {
        tracing::warn!("⏱️ No time left for agent tip generation, using static tips");
        return fallback_tips();
    }

    match tokio::time::timeout(deadline, generator.generate_agent_tips(address, summary)).await {
        Ok(Ok(tips)) => normalize_tips(tips),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, kind = e.kind(), "⚠️ Agent tip generation failed, using static tips");
            fallback_tips()
        }
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "⏱️ Agent tip generation timed out, using static tips"
            );
            fallback_tips()
        }
    }
}

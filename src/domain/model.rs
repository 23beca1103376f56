use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 六個頂層子系統，availability / data sources / profile 欄位共用同一組 key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Overview,
    Places,
    Safety,
    Demographics,
    Schools,
    Transportation,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::Overview,
        Subsystem::Places,
        Subsystem::Safety,
        Subsystem::Demographics,
        Subsystem::Schools,
        Subsystem::Transportation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Overview => "overview",
            Subsystem::Places => "places",
            Subsystem::Safety => "safety",
            Subsystem::Demographics => "demographics",
            Subsystem::Schools => "schools",
            Subsystem::Transportation => "transportation",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 六個外部資料提供者；每個提供者對應唯一一個子系統
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Walkability,
    Places,
    Crime,
    Census,
    Market,
    Comparables,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Walkability,
        ProviderKind::Places,
        ProviderKind::Crime,
        ProviderKind::Census,
        ProviderKind::Market,
        ProviderKind::Comparables,
    ];

    /// 可用性與資料來源的鍵
    ///
    /// `Schools` and `Transportation` are keyed by the ATTOM market and
    /// comparables providers, so their `data_sources` entries name ATTOM even
    /// though the school and commute fields come from other records.
    pub fn subsystem(&self) -> Subsystem {
        match self {
            ProviderKind::Walkability => Subsystem::Overview,
            ProviderKind::Places => Subsystem::Places,
            ProviderKind::Crime => Subsystem::Safety,
            ProviderKind::Census => Subsystem::Demographics,
            ProviderKind::Market => Subsystem::Schools,
            ProviderKind::Comparables => Subsystem::Transportation,
        }
    }

    pub fn provenance(&self) -> &'static str {
        match self {
            ProviderKind::Walkability => "WalkScore API",
            ProviderKind::Places => "Geoapify Places API",
            ProviderKind::Crime => "FBI Crime Data API",
            ProviderKind::Census => "US Census API",
            ProviderKind::Market => "ATTOM Market Data API",
            ProviderKind::Comparables => "ATTOM Property API",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Walkability => "walkability",
            ProviderKind::Places => "places",
            ProviderKind::Crime => "crime",
            ProviderKind::Census => "census",
            ProviderKind::Market => "market",
            ProviderKind::Comparables => "comparables",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type AvailabilityMap = BTreeMap<Subsystem, bool>;
pub type DataSources = BTreeMap<Subsystem, String>;

pub const DEFAULT_DATA_SOURCE: &str = "Default Data";

// ---------------------------------------------------------------------------
// Provider payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkabilityProfile {
    pub walk_score: u8,
    pub walk_description: String,
    pub transit_score: u8,
    pub transit_description: String,
    pub bike_score: u8,
    pub bike_description: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Restaurants,
    Shopping,
    Entertainment,
    Services,
    Schools,
    Transportation,
    SafetyServices,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 7] = [
        PlaceCategory::Restaurants,
        PlaceCategory::Shopping,
        PlaceCategory::Entertainment,
        PlaceCategory::Services,
        PlaceCategory::Schools,
        PlaceCategory::Transportation,
        PlaceCategory::SafetyServices,
    ];

    /// Geoapify category filters for this sub-query.
    pub fn geoapify_filters(&self) -> &'static [&'static str] {
        match self {
            PlaceCategory::Restaurants => {
                &["catering.restaurant", "catering.fast_food", "catering.cafe"]
            }
            PlaceCategory::Shopping => &[
                "commercial.supermarket",
                "commercial.shopping_mall",
                "commercial.convenience",
            ],
            PlaceCategory::Entertainment => &[
                "entertainment.cinema",
                "entertainment.museum",
                "leisure.park",
                "entertainment.theme_park",
            ],
            PlaceCategory::Services => &[
                "service",
                "commercial.health_and_beauty.pharmacy",
                "healthcare",
            ],
            PlaceCategory::Schools => &[
                "education.school",
                "education.college",
                "education.university",
                "childcare.kindergarten",
            ],
            PlaceCategory::Transportation => &["public_transport", "parking"],
            PlaceCategory::SafetyServices => &["emergency", "healthcare.hospital", "service"],
        }
    }

    /// 每個類別保留的筆數上限
    pub fn max_results(&self) -> usize {
        match self {
            PlaceCategory::Schools | PlaceCategory::Transportation => 8,
            PlaceCategory::SafetyServices => 5,
            _ => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurants => "restaurants",
            PlaceCategory::Shopping => "shopping",
            PlaceCategory::Entertainment => "entertainment",
            PlaceCategory::Services => "services",
            PlaceCategory::Schools => "schools",
            PlaceCategory::Transportation => "transportation",
            PlaceCategory::SafetyServices => "safety_services",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub name: String,
    pub formatted_address: String,
    pub categories: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_miles: f64,
    pub place_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesProfile {
    pub restaurants: Vec<PlaceRecord>,
    pub shopping: Vec<PlaceRecord>,
    pub entertainment: Vec<PlaceRecord>,
    pub services: Vec<PlaceRecord>,
    pub schools: Vec<PlaceRecord>,
    pub transportation: Vec<PlaceRecord>,
    pub safety_services: Vec<PlaceRecord>,
    /// Per-category availability of the sub-queries.
    pub category_availability: BTreeMap<PlaceCategory, bool>,
    /// Fetched amenity count before truncation (restaurants + shopping + entertainment + services).
    pub total_count: usize,
    pub talking_points: Vec<String>,
}

impl PlacesProfile {
    pub fn category(&self, category: PlaceCategory) -> &[PlaceRecord] {
        match category {
            PlaceCategory::Restaurants => &self.restaurants,
            PlaceCategory::Shopping => &self.shopping,
            PlaceCategory::Entertainment => &self.entertainment,
            PlaceCategory::Services => &self.services,
            PlaceCategory::Schools => &self.schools,
            PlaceCategory::Transportation => &self.transportation,
            PlaceCategory::SafetyServices => &self.safety_services,
        }
    }

    pub fn category_mut(&mut self, category: PlaceCategory) -> &mut Vec<PlaceRecord> {
        match category {
            PlaceCategory::Restaurants => &mut self.restaurants,
            PlaceCategory::Shopping => &mut self.shopping,
            PlaceCategory::Entertainment => &mut self.entertainment,
            PlaceCategory::Services => &mut self.services,
            PlaceCategory::Schools => &mut self.schools,
            PlaceCategory::Transportation => &mut self.transportation,
            PlaceCategory::SafetyServices => &mut self.safety_services,
        }
    }

    /// Cuts every category list down to its display limit.
    pub fn truncate_lists(&mut self) {
        for category in PlaceCategory::ALL {
            self.category_mut(category).truncate(category.max_results());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeTrend {
    Improving,
    Stable,
    Worsening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NationalComparison {
    Better,
    Average,
    Worse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeProfile {
    pub violent_crime: u64,
    pub property_crime: u64,
    pub total_crime: u64,
    /// Offences per 100k residents.
    pub crime_rate: u32,
    /// 0-100, higher is safer.
    pub safety_score: u8,
    pub trend: CrimeTrend,
    pub compared_to_national: NationalComparison,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationStats {
    pub total: u64,
    pub median_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicStats {
    pub median_household_income: u64,
    pub unemployment_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationStats {
    pub high_school_graduate: u8,
    pub bachelors_or_higher: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingStats {
    pub total_units: u64,
    pub owner_occupied: u8,
    pub renter_occupied: u8,
    pub median_home_value: u64,
    pub median_rent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsRecord {
    pub population: PopulationStats,
    pub economics: EconomicStats,
    pub education: EducationStats,
    pub housing: HousingStats,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    Seller,
    Buyer,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub median_sale_price: u64,
    pub average_sale_price: u64,
    pub total_sales: u64,
    pub price_change_percent: f64,
    pub market_trend: MarketTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparablesRecord {
    pub average_price: u64,
    pub price_min: u64,
    pub price_max: u64,
    pub average_square_footage: u64,
    pub total_count: usize,
}

// ---------------------------------------------------------------------------
// Aggregate profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSection {
    pub walkability: WalkabilityProfile,
    pub highlights: Vec<String>,
    pub agent_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyProfile {
    pub crime: CrimeProfile,
    pub safety_services: Vec<PlaceRecord>,
    pub safety_pitch: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsProfile {
    pub census: DemographicsRecord,
    pub market: MarketRecord,
    pub comparables: ComparablesRecord,
    pub buyer_profiles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolsProfile {
    pub schools: Vec<PlaceRecord>,
    pub college_educated_percent: u8,
    pub median_age: f64,
    pub family_appeal: Vec<String>,
    pub marketing_angles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationProfile {
    pub transit_score: u8,
    pub transit_description: String,
    pub commute_options: Vec<PlaceRecord>,
    pub benefits: Vec<String>,
}

/// Aggregate root returned for every request; never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodProfile {
    pub address: String,
    pub overview: OverviewSection,
    pub places: PlacesProfile,
    pub safety: SafetyProfile,
    pub demographics: DemographicsProfile,
    pub schools: SchoolsProfile,
    pub transportation: TransportationProfile,
    pub availability: AvailabilityMap,
    pub data_sources: DataSources,
    pub quality_score: u8,
    pub generated_at: DateTime<Utc>,
}

impl NeighborhoodProfile {
    pub fn is_available(&self, subsystem: Subsystem) -> bool {
        self.availability.get(&subsystem).copied().unwrap_or(false)
    }
}

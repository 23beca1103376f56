// Neutral default records substituted for failed providers.
//
// Every default has the same shape as a real payload and reads as "unknown"
// rather than "bad": a missing safety score is 50, not 0.

use crate::domain::model::{
    ComparablesRecord, CrimeProfile, CrimeTrend, DemographicsRecord, EconomicStats,
    EducationStats, HousingStats, MarketRecord, MarketTrend, NationalComparison, PlaceCategory,
    PlacesProfile, PopulationStats, WalkabilityProfile,
};
use chrono::{Datelike, Utc};

pub const NEUTRAL_SAFETY_SCORE: u8 = 50;

pub trait Fallback: Sized {
    fn fallback() -> Self;
}

pub fn default_for<T: Fallback>() -> T {
    T::fallback()
}

impl Fallback for WalkabilityProfile {
    fn fallback() -> Self {
        Self {
            walk_score: 0,
            walk_description: "Walk Score unavailable".to_string(),
            transit_score: 0,
            transit_description: "Transit Score unavailable".to_string(),
            bike_score: 0,
            bike_description: "Bike Score unavailable".to_string(),
            updated: None,
        }
    }
}

impl Fallback for PlacesProfile {
    fn fallback() -> Self {
        let mut profile = PlacesProfile::default();
        for category in PlaceCategory::ALL {
            profile.category_availability.insert(category, false);
        }
        profile
    }
}

impl Fallback for CrimeProfile {
    fn fallback() -> Self {
        Self {
            violent_crime: 0,
            property_crime: 0,
            total_crime: 0,
            crime_rate: 0,
            safety_score: NEUTRAL_SAFETY_SCORE,
            trend: CrimeTrend::Stable,
            compared_to_national: NationalComparison::Average,
            year: Utc::now().year() - 1,
        }
    }
}

impl Fallback for DemographicsRecord {
    fn fallback() -> Self {
        Self {
            population: PopulationStats {
                total: 0,
                median_age: 0.0,
            },
            economics: EconomicStats {
                median_household_income: 0,
                unemployment_rate: 0.0,
            },
            education: EducationStats {
                high_school_graduate: 0,
                bachelors_or_higher: 0,
            },
            housing: HousingStats {
                total_units: 0,
                owner_occupied: 0,
                renter_occupied: 0,
                median_home_value: 0,
                median_rent: 0,
            },
            year: Utc::now().year(),
        }
    }
}

impl Fallback for MarketRecord {
    fn fallback() -> Self {
        Self {
            median_sale_price: 0,
            average_sale_price: 0,
            total_sales: 0,
            price_change_percent: 0.0,
            market_trend: MarketTrend::Balanced,
        }
    }
}

impl Fallback for ComparablesRecord {
    fn fallback() -> Self {
        Self {
            average_price: 0,
            price_min: 0,
            price_max: 0,
            average_square_footage: 0,
            total_count: 0,
        }
    }
}

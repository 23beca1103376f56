use crate::adapters::http::ApiClient;
use crate::domain::location::Location;
use crate::domain::model::{
    DemographicsRecord, EconomicStats, EducationStats, HousingStats, PopulationStats, ProviderKind,
};
use crate::domain::ports::{Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use std::collections::HashMap;

const TOTAL_POPULATION: &str = "B01003_001E";
const HOUSING_UNITS: &str = "B25003_001E";
const OWNER_OCCUPIED: &str = "B25003_002E";
const RENTER_OCCUPIED: &str = "B25003_003E";
const MEDIAN_INCOME: &str = "B19013_001E";
const MEDIAN_HOME_VALUE: &str = "B25077_001E";
const MEDIAN_RENT: &str = "B25064_001E";
const MEDIAN_AGE: &str = "B01002_001E";
const EDUCATION_POPULATION: &str = "B15003_001E";
const HIGH_SCHOOL_DIPLOMA: &str = "B15003_017E";
const BACHELORS_DEGREE: &str = "B15003_022E";
const UNEMPLOYED: &str = "B23025_005E";
const LABOR_FORCE: &str = "B23025_002E";

const ACS_VARIABLES: [&str; 13] = [
    TOTAL_POPULATION,
    HOUSING_UNITS,
    OWNER_OCCUPIED,
    RENTER_OCCUPIED,
    MEDIAN_INCOME,
    MEDIAN_HOME_VALUE,
    MEDIAN_RENT,
    MEDIAN_AGE,
    EDUCATION_POPULATION,
    HIGH_SCHOOL_DIPLOMA,
    BACHELORS_DEGREE,
    UNEMPLOYED,
    LABOR_FORCE,
];

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn to_percent_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// ACS 回傳的表格：第一列為欄位名稱，第二列為數值
pub fn parse_acs_table(rows: &[Vec<Option<String>>], year: i32) -> ProviderResult<DemographicsRecord> {
    let (headers, values) = match rows {
        [headers, values, ..] => (headers, values),
        _ => return Err(ProviderError::NotFound("census returned no data rows".into())),
    };

    let cells: HashMap<&str, f64> = headers
        .iter()
        .zip(values.iter())
        .filter_map(|(header, value)| {
            let header = header.as_deref()?;
            // 負值是 ACS 的缺值標記
            let number = value
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite() && *n >= 0.0)
                .unwrap_or(0.0);
            Some((header, number))
        })
        .collect();
    let get = |name: &str| cells.get(name).copied().unwrap_or(0.0);

    let housing_units = get(HOUSING_UNITS);
    let owner_percent = percent(get(OWNER_OCCUPIED), housing_units);
    let renter_percent = percent(get(RENTER_OCCUPIED), housing_units);
    let unemployment = percent(get(UNEMPLOYED), get(LABOR_FORCE));
    let education_pop = get(EDUCATION_POPULATION);

    Ok(DemographicsRecord {
        population: PopulationStats {
            total: get(TOTAL_POPULATION) as u64,
            median_age: (get(MEDIAN_AGE) * 10.0).round() / 10.0,
        },
        economics: EconomicStats {
            median_household_income: get(MEDIAN_INCOME) as u64,
            unemployment_rate: (unemployment * 10.0).round() / 10.0,
        },
        education: EducationStats {
            high_school_graduate: to_percent_u8(percent(get(HIGH_SCHOOL_DIPLOMA), education_pop)),
            bachelors_or_higher: to_percent_u8(percent(get(BACHELORS_DEGREE), education_pop)),
        },
        housing: HousingStats {
            total_units: housing_units as u64,
            owner_occupied: to_percent_u8(owner_percent),
            renter_occupied: to_percent_u8(renter_percent),
            median_home_value: get(MEDIAN_HOME_VALUE) as u64,
            median_rent: get(MEDIAN_RENT) as u64,
        },
        year,
    })
}

/// US Census ACS 1-year estimates at state level.
pub struct CensusProvider {
    client: ApiClient,
    year: i32,
}

impl CensusProvider {
    pub fn new(client: ApiClient, year: i32) -> Self {
        Self { client, year }
    }
}

#[async_trait]
impl Provider for CensusProvider {
    type Output = DemographicsRecord;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Census
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<DemographicsRecord> {
        let api_key = self.client.api_key()?;
        let fips = location.state_fips().ok_or_else(|| {
            ProviderError::NotFound(format!("no state FIPS for '{}'", location.address))
        })?;

        let path = format!("/{}/acs/acs1", self.year);
        let request = self.client.get(&path).query(&[
            ("get", ACS_VARIABLES.join(",")),
            ("for", format!("state:{}", fips)),
            ("key", api_key.to_string()),
        ]);

        let rows: Vec<Vec<Option<String>>> = self.client.send_json(request).await?;
        parse_acs_table(&rows, self.year)
    }
}

use crate::utils::error::{InsightsError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DEADLINE_SECONDS: u64 = 15;
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PLACES_RADIUS_METERS: u32 = 2000;
pub const DEFAULT_DATA_YEAR: i32 = 2022;
pub const DEFAULT_TIPS_MODEL: &str = "gpt-4o-mini";

/// Which external service a `[providers.<name>]` section configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderName {
    WalkScore,
    Geoapify,
    Fbi,
    Census,
    Attom,
}

impl ProviderName {
    pub const ALL: [ProviderName; 5] = [
        ProviderName::WalkScore,
        ProviderName::Geoapify,
        ProviderName::Fbi,
        ProviderName::Census,
        ProviderName::Attom,
    ];

    pub fn section(&self) -> &'static str {
        match self {
            ProviderName::WalkScore => "walkscore",
            ProviderName::Geoapify => "geoapify",
            ProviderName::Fbi => "fbi",
            ProviderName::Census => "census",
            ProviderName::Attom => "attom",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderName::WalkScore => "https://api.walkscore.com",
            ProviderName::Geoapify => "https://api.geoapify.com",
            ProviderName::Fbi => "https://api.usa.gov/crime/fbi/cde",
            ProviderName::Census => "https://api.census.gov/data",
            ProviderName::Attom => "https://api.gateway.attomdata.com/propertyapi/v1.0.0",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderName::WalkScore => "WALKSCORE_API_KEY",
            ProviderName::Geoapify => "GEOAPIFY_API_KEY",
            ProviderName::Fbi => "FBI_API_KEY",
            ProviderName::Census => "CENSUS_API_KEY",
            ProviderName::Attom => "ATTOM_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aggregation: AggregationConfig,
    pub providers: ProvidersConfig,
    pub tips: TipsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub deadline_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub walkscore: ProviderSection,
    pub geoapify: ProviderSection,
    pub fbi: ProviderSection,
    pub census: ProviderSection,
    pub attom: ProviderSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// geoapify only
    pub radius_meters: Option<u32>,
    /// fbi / census only
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Provider settings after defaults and environment fallbacks are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        // 未替換的 ${VAR} 視為未設定
        .filter(|v| !v.is_empty() && !v.starts_with("${"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InsightsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InsightsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WALKSCORE_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| InsightsError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn section(&self, name: ProviderName) -> &ProviderSection {
        match name {
            ProviderName::WalkScore => &self.providers.walkscore,
            ProviderName::Geoapify => &self.providers.geoapify,
            ProviderName::Fbi => &self.providers.fbi,
            ProviderName::Census => &self.providers.census,
            ProviderName::Attom => &self.providers.attom,
        }
    }

    /// 取得提供者設定，缺值時套用預設與環境變數
    pub fn provider(&self, name: ProviderName) -> ResolvedProvider {
        let section = self.section(name);
        ResolvedProvider {
            base_url: non_blank(section.base_url.as_ref())
                .unwrap_or_else(|| name.default_base_url().to_string()),
            api_key: non_blank(section.api_key.as_ref()).or_else(|| env_value(name.api_key_env())),
            timeout: Duration::from_secs(
                section
                    .timeout_seconds
                    .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
            ),
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(
            self.aggregation
                .deadline_seconds
                .unwrap_or(DEFAULT_DEADLINE_SECONDS),
        )
    }

    pub fn places_radius_meters(&self) -> u32 {
        self.providers
            .geoapify
            .radius_meters
            .unwrap_or(DEFAULT_PLACES_RADIUS_METERS)
    }

    pub fn crime_year(&self) -> i32 {
        self.providers.fbi.year.unwrap_or(DEFAULT_DATA_YEAR)
    }

    pub fn census_year(&self) -> i32 {
        self.providers.census.year.unwrap_or(DEFAULT_DATA_YEAR)
    }

    pub fn tips_enabled(&self) -> bool {
        self.tips.enabled.unwrap_or(true)
    }

    pub fn tips_endpoint(&self) -> String {
        non_blank(self.tips.endpoint.as_ref())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    pub fn tips_api_key(&self) -> Option<String> {
        non_blank(self.tips.api_key.as_ref()).or_else(|| env_value("OPENAI_API_KEY"))
    }

    pub fn tips_model(&self) -> String {
        non_blank(self.tips.model.as_ref()).unwrap_or_else(|| DEFAULT_TIPS_MODEL.to_string())
    }

    pub fn tips_timeout(&self) -> Duration {
        Duration::from_secs(
            self.tips
                .timeout_seconds
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(deadline) = self.aggregation.deadline_seconds {
            validate_range("aggregation.deadline_seconds", deadline, 1, 120)?;
        }

        for name in ProviderName::ALL {
            let section = self.section(name);
            let resolved = self.provider(name);
            validate_url(
                &format!("providers.{}.base_url", name.section()),
                &resolved.base_url,
            )?;
            if let Some(timeout) = section.timeout_seconds {
                validate_positive_number(
                    &format!("providers.{}.timeout_seconds", name.section()),
                    timeout,
                    1,
                )?;
            }
            if let Some(year) = section.year {
                validate_range(&format!("providers.{}.year", name.section()), year, 2000, 2100)?;
            }
        }

        if let Some(radius) = self.providers.geoapify.radius_meters {
            validate_range("providers.geoapify.radius_meters", radius, 1, 50_000)?;
        }

        if self.tips_enabled() {
            validate_url("tips.endpoint", &self.tips_endpoint())?;
            if let Some(timeout) = self.tips.timeout_seconds {
                validate_positive_number("tips.timeout_seconds", timeout, 1)?;
            }
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

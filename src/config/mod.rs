pub mod lambda;
pub mod toml_config;

pub use toml_config::{AppConfig, ProviderName};

#[cfg(feature = "cli")]
use crate::domain::location::Location;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "neighborhood-insights")]
#[command(about = "Aggregate neighborhood data for a property address")]
pub struct CliConfig {
    /// Full street address, e.g. "1600 Pennsylvania Ave NW, Washington, DC 20500"
    #[arg(long)]
    pub address: String,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Write the profile JSON to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Pretty-print the profile JSON")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng, self.address.trim())
    }

    /// 有指定 --config 就讀檔，否則使用預設值
    pub fn app_config(&self) -> crate::utils::error::Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::from_file(path),
            None => Ok(AppConfig::default()),
        }
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("address", &self.address)?;
        validate_coordinates(self.lat, self.lng)?;

        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(path) = &self.output {
            validate_path("output", path)?;
        }

        Ok(())
    }
}

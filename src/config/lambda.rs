#[cfg(feature = "lambda")]
use crate::config::toml_config::AppConfig;
#[cfg(feature = "lambda")]
use crate::utils::error::{InsightsError, Result};
#[cfg(feature = "lambda")]
use std::env;

/// Lambda 執行環境的配置，來源為環境變數
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub config_path: Option<String>,
    pub deadline_seconds: Option<u64>,
    pub app: AppConfig,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let config_path = env::var("INSIGHTS_CONFIG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let mut app = match &config_path {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        let deadline_seconds = match env::var("AGGREGATION_DEADLINE_SECONDS") {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                InsightsError::InvalidConfigValueError {
                    field: "AGGREGATION_DEADLINE_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: "must be a whole number of seconds".to_string(),
                }
            })?),
            Err(_) => None,
        };
        if deadline_seconds.is_some() {
            app.aggregation.deadline_seconds = deadline_seconds;
        }

        Ok(Self {
            config_path,
            deadline_seconds,
            app,
        })
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(path) = &self.config_path {
            validate_path("INSIGHTS_CONFIG_PATH", path)?;
        }
        self.app.validate()?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // 環境變數是全域狀態，同一個測試內完成設定與清除
    #[test]
    fn test_from_env_reads_file_and_deadline_override() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[aggregation]\ndeadline_seconds = 20\n\n[tips]\nenabled = false\n")
            .unwrap();

        env::set_var("INSIGHTS_CONFIG_PATH", temp_file.path());
        env::set_var("AGGREGATION_DEADLINE_SECONDS", "9");

        let config = LambdaConfig::from_env().unwrap();
        assert_eq!(config.app.deadline(), std::time::Duration::from_secs(9));
        assert!(!config.app.tips_enabled());
        assert!(config.validate().is_ok());

        env::set_var("AGGREGATION_DEADLINE_SECONDS", "soon");
        assert!(LambdaConfig::from_env().is_err());

        env::remove_var("INSIGHTS_CONFIG_PATH");
        env::remove_var("AGGREGATION_DEADLINE_SECONDS");
    }
}

use clap::Parser;
use neighborhood_insights::utils::error::{ErrorSeverity, InsightsError};
use neighborhood_insights::utils::{logger, validation::Validate};
use neighborhood_insights::{build_engine, CliConfig, NeighborhoodProfile};

fn exit_with(e: &InsightsError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Neighborhood lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn render(profile: &NeighborhoodProfile, pretty: bool) -> neighborhood_insights::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(profile)?
    } else {
        serde_json::to_string(profile)?
    };
    Ok(json)
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting neighborhood-insights CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let app_config = match config.app_config() {
        Ok(app_config) => app_config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = app_config.validate() {
        exit_with(&e);
    }

    let engine = match build_engine(&app_config) {
        Ok(engine) => engine,
        Err(e) => exit_with(&e),
    };

    let location = config.location();
    let profile = engine.fetch_comprehensive_data(&location).await;

    let json = match render(&profile, config.pretty) {
        Ok(json) => json,
        Err(e) => exit_with(&e),
    };

    match &config.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                exit_with(&InsightsError::IoError(e));
            }
            tracing::info!("📁 Profile saved to: {}", path);
            eprintln!("✅ Quality score {} / 100", profile.quality_score);
            eprintln!("📁 Output saved to: {}", path);
        }
        None => println!("{}", json),
    }
}

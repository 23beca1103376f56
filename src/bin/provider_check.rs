use anyhow::Context;
use clap::Parser;
use neighborhood_insights::app::build_providers;
use neighborhood_insights::core::{Location, Provider};
use neighborhood_insights::utils::{logger, validation::Validate};
use neighborhood_insights::CliConfig;
use std::time::{Duration, Instant};

/// 單獨呼叫一個提供者並印出結果
async fn check<T: Send>(
    provider: &dyn Provider<Output = T>,
    location: &Location,
    deadline: Duration,
) -> bool {
    let started = Instant::now();
    let result = tokio::time::timeout(deadline, provider.fetch(location)).await;
    let elapsed = started.elapsed().as_millis();

    match result {
        Ok(Ok(_)) => {
            println!("  ✅ {:<12} ok ({} ms)", provider.kind().as_str(), elapsed);
            true
        }
        Ok(Err(e)) => {
            println!("  ❌ {:<12} {} [{}] ({} ms)", provider.kind().as_str(), e, e.kind(), elapsed);
            false
        }
        Err(_) => {
            println!("  ⏱️ {:<12} timed out after {} ms", provider.kind().as_str(), deadline.as_millis());
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    config.validate().context("invalid command line arguments")?;
    let app_config = config.app_config().context("failed to load configuration")?;
    app_config.validate().context("invalid configuration")?;

    let providers = build_providers(&app_config).context("failed to build provider clients")?;
    let location = config.location();
    let deadline = app_config.deadline();

    println!("🚀 Checking providers for {}", location.address);

    let results = [
        check(providers.walkability.as_ref(), &location, deadline).await,
        check(providers.places.as_ref(), &location, deadline).await,
        check(providers.crime.as_ref(), &location, deadline).await,
        check(providers.census.as_ref(), &location, deadline).await,
        check(providers.market.as_ref(), &location, deadline).await,
        check(providers.comparables.as_ref(), &location, deadline).await,
    ];

    let healthy = results.iter().filter(|ok| **ok).count();
    println!("📊 {}/{} providers responded", healthy, results.len());

    if healthy < results.len() {
        std::process::exit(2);
    }
    Ok(())
}

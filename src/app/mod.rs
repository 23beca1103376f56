// Application wiring: turns an `AppConfig` into a ready-to-run engine.

use crate::adapters::openai::TIPS_SOURCE;
use crate::adapters::{
    ApiClient, AttomComparablesProvider, AttomMarketProvider, CensusProvider, FbiCrimeProvider,
    GeoapifyPlacesProvider, OpenAiTipGenerator, WalkScoreProvider,
};
use crate::config::{AppConfig, ProviderName};
use crate::core::NeighborhoodEngine;
use crate::domain::model::ProviderKind;
use crate::domain::ports::Providers;
use crate::utils::error::Result;
use std::sync::Arc;

fn client_for(config: &AppConfig, name: ProviderName, kind: ProviderKind) -> Result<ApiClient> {
    let resolved = config.provider(name);
    if resolved.api_key.is_none() {
        tracing::warn!(
            provider = %kind,
            env = name.api_key_env(),
            "🔑 No API key configured, provider will fall back to default data"
        );
    }
    ApiClient::new(kind.as_str(), &resolved.base_url, resolved.api_key, resolved.timeout)
}

/// 建立六個提供者
pub fn build_providers(config: &AppConfig) -> Result<Providers> {
    // ATTOM 同一把 key 供市場與比較物件兩個提供者使用
    let market_client = client_for(config, ProviderName::Attom, ProviderKind::Market)?;
    let comparables_client = client_for(config, ProviderName::Attom, ProviderKind::Comparables)?;

    Ok(Providers {
        walkability: Arc::new(WalkScoreProvider::new(client_for(
            config,
            ProviderName::WalkScore,
            ProviderKind::Walkability,
        )?)),
        places: Arc::new(GeoapifyPlacesProvider::new(
            client_for(config, ProviderName::Geoapify, ProviderKind::Places)?,
            config.places_radius_meters(),
        )),
        crime: Arc::new(FbiCrimeProvider::new(
            client_for(config, ProviderName::Fbi, ProviderKind::Crime)?,
            config.crime_year(),
        )),
        census: Arc::new(CensusProvider::new(
            client_for(config, ProviderName::Census, ProviderKind::Census)?,
            config.census_year(),
        )),
        market: Arc::new(AttomMarketProvider::new(market_client)),
        comparables: Arc::new(AttomComparablesProvider::new(comparables_client)),
    })
}

/// 依配置建立引擎；沒有 LLM key 或停用時只用靜態建議
pub fn build_engine(config: &AppConfig) -> Result<NeighborhoodEngine> {
    let providers = build_providers(config)?;
    let mut engine = NeighborhoodEngine::new(providers).with_deadline(config.deadline());

    match (config.tips_enabled(), config.tips_api_key()) {
        (true, Some(api_key)) => {
            let client = ApiClient::new(
                TIPS_SOURCE,
                &config.tips_endpoint(),
                Some(api_key),
                config.tips_timeout(),
            )?;
            engine = engine.with_tip_generator(Arc::new(OpenAiTipGenerator::new(
                client,
                config.tips_model(),
            )));
        }
        (true, None) => {
            tracing::info!("💡 No LLM API key configured, agent tips will use the static list");
        }
        (false, _) => {
            tracing::debug!("Agent tip generation disabled by configuration");
        }
    }

    Ok(engine)
}

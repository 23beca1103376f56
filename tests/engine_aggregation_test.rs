mod common;

use common::{seattle, StubSet, StubTips};
use neighborhood_insights::core::insights::{FALLBACK_AGENT_TIPS, GENERIC_HIGHLIGHT};
use neighborhood_insights::domain::model::{ProviderKind, Subsystem, DEFAULT_DATA_SOURCE};
use neighborhood_insights::domain::ports::ProviderError;
use neighborhood_insights::{Location, NeighborhoodEngine, NeighborhoodProfile};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn failing_subset(mask: usize) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, kind)| *kind)
        .collect()
}

fn assert_complete(profile: &NeighborhoodProfile) {
    assert_eq!(profile.availability.len(), 6);
    assert_eq!(profile.data_sources.len(), 6);
    assert!(!profile.overview.highlights.is_empty());
    assert!(profile.overview.highlights.len() <= 5);
    assert_eq!(profile.overview.agent_tips.len(), 3);
    assert!(profile.demographics.buyer_profiles.len() <= 3);
    assert!(!profile.safety.safety_pitch.is_empty());
    assert!(profile.schools.family_appeal.len() >= 2);
    assert!(profile.places.restaurants.len() <= 10);
    assert!(profile.places.schools.len() <= 8);
    assert!(profile.places.transportation.len() <= 8);
    assert!(profile.places.safety_services.len() <= 5);
}

#[tokio::test]
async fn test_every_failure_combination_yields_complete_profile() {
    let expected_quality = [100u8, 83, 67, 50, 33, 17, 0];

    for mask in 0..64usize {
        let failing = failing_subset(mask);
        let stubs = StubSet::healthy().failing(&failing);
        let engine = NeighborhoodEngine::new(stubs.build());

        let profile = engine.fetch_comprehensive_data(&seattle()).await;

        assert_complete(&profile);
        assert_eq!(stubs.call_count(), 6, "mask {}", mask);
        assert_eq!(profile.quality_score, expected_quality[failing.len()], "mask {}", mask);

        for kind in ProviderKind::ALL {
            let subsystem = kind.subsystem();
            let failed = failing.contains(&kind);
            assert_eq!(profile.is_available(subsystem), !failed, "{} in mask {}", kind, mask);
            let expected_source = if failed {
                DEFAULT_DATA_SOURCE
            } else {
                kind.provenance()
            };
            assert_eq!(profile.data_sources[&subsystem], expected_source);
        }
    }
}

#[tokio::test]
async fn test_all_providers_failing_uses_defaults() {
    let stubs = StubSet::healthy().failing(&ProviderKind::ALL);
    let engine = NeighborhoodEngine::new(stubs.build());

    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert_eq!(profile.quality_score, 0);
    assert!(Subsystem::ALL.iter().all(|s| !profile.is_available(*s)));
    assert_eq!(profile.overview.highlights, vec![GENERIC_HIGHLIGHT.to_string()]);
    assert_eq!(profile.overview.agent_tips, FALLBACK_AGENT_TIPS.to_vec());
    assert_eq!(profile.overview.walkability.walk_score, 0);
    assert_eq!(profile.safety.crime.safety_score, 50);
    assert_eq!(profile.places.total_count, 0);
    assert!(profile.places.restaurants.is_empty());
    assert!(profile.demographics.buyer_profiles.is_empty());
}

#[tokio::test]
async fn test_rules_see_lists_before_truncation() {
    let stubs = StubSet::healthy();
    let engine = NeighborhoodEngine::new(stubs.build());

    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert_eq!(profile.quality_score, 100);
    assert_eq!(profile.places.restaurants.len(), 10);
    assert_eq!(profile.places.schools.len(), 8);
    assert_eq!(profile.places.safety_services.len(), 5);
    assert_eq!(profile.overview.highlights.len(), 5);
    assert!(profile
        .overview
        .highlights
        .iter()
        .any(|h| h.contains("15+ restaurants")));
    assert!(profile
        .places
        .talking_points
        .contains(&"15 dining options within walking distance".to_string()));
    assert!(profile
        .schools
        .family_appeal
        .contains(&"9 educational institutions within the area".to_string()));
    assert_eq!(profile.schools.college_educated_percent, 55);
    assert_eq!(profile.transportation.transit_score, 75);
}

#[tokio::test]
async fn test_demo_address_skips_providers_and_tips() {
    let stubs = StubSet::healthy();
    let tips = Arc::new(StubTips::returning(Ok(vec!["unused".to_string()])));
    let engine = NeighborhoodEngine::new(stubs.build()).with_tip_generator(tips.clone());

    let location = Location::new(40.0, -75.0, "123 Demo Dr, Demo City, DM 12345");
    let profile = engine.fetch_comprehensive_data(&location).await;

    assert_eq!(stubs.call_count(), 0);
    assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    assert_eq!(profile.quality_score, 95);
    assert!(Subsystem::ALL.iter().all(|s| profile.is_available(*s)));
    assert_complete(&profile);
}

#[tokio::test]
async fn test_tip_generator_failure_returns_static_tips() {
    let stubs = StubSet::healthy();
    let tips = Arc::new(StubTips::returning(Err(ProviderError::RateLimited(
        "quota exceeded".to_string(),
    ))));
    let engine = NeighborhoodEngine::new(stubs.build()).with_tip_generator(tips.clone());

    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert_eq!(tips.calls.load(Ordering::SeqCst), 1);
    assert_eq!(profile.overview.agent_tips, FALLBACK_AGENT_TIPS.to_vec());
    assert_eq!(profile.quality_score, 100);
}

#[tokio::test]
async fn test_generated_tips_are_used_and_padded() {
    let stubs = StubSet::healthy();
    let tips = Arc::new(StubTips::returning(Ok(vec![
        "Lead with the 85 walk score when touring young buyers".to_string(),
    ])));
    let engine = NeighborhoodEngine::new(stubs.build()).with_tip_generator(tips);

    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert_eq!(profile.overview.agent_tips.len(), 3);
    assert_eq!(
        profile.overview.agent_tips[0],
        "Lead with the 85 walk score when touring young buyers"
    );
    assert_eq!(profile.overview.agent_tips[1], FALLBACK_AGENT_TIPS[1]);
    assert_eq!(profile.overview.agent_tips[2], FALLBACK_AGENT_TIPS[2]);
}

#[tokio::test(start_paused = true)]
async fn test_providers_run_concurrently() {
    let stubs = StubSet::healthy().delayed_all(Duration::from_secs(2));
    let engine = NeighborhoodEngine::new(stubs.build());

    let started = tokio::time::Instant::now();
    let profile = engine.fetch_comprehensive_data(&seattle()).await;
    let elapsed = started.elapsed();

    assert_eq!(profile.quality_score, 100);
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_is_cut_off_at_deadline() {
    let stubs = StubSet::healthy().delayed(ProviderKind::Census, Duration::from_secs(60));
    let engine = NeighborhoodEngine::new(stubs.build()).with_deadline(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    let profile = engine.fetch_comprehensive_data(&seattle()).await;
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(6), "took {:?}", elapsed);
    assert!(!profile.is_available(Subsystem::Demographics));
    assert_eq!(
        profile.data_sources[&Subsystem::Demographics],
        DEFAULT_DATA_SOURCE
    );
    assert_eq!(profile.quality_score, 83);
    assert_eq!(profile.demographics.census.population.total, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_tip_generator_falls_back() {
    let stubs = StubSet::healthy();
    let mut tips = StubTips::returning(Ok(vec!["late".to_string()]));
    tips.delay = Duration::from_secs(120);
    let engine = NeighborhoodEngine::new(stubs.build())
        .with_tip_generator(Arc::new(tips))
        .with_deadline(Duration::from_secs(5));

    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert_eq!(profile.overview.agent_tips, FALLBACK_AGENT_TIPS.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_tip_generator_shares_the_overall_deadline() {
    let stubs = StubSet::healthy().delayed_all(Duration::from_millis(4_900));
    let mut tips = StubTips::returning(Ok(vec!["late".to_string()]));
    tips.delay = Duration::from_millis(4_900);
    let tips = Arc::new(tips);
    let engine = NeighborhoodEngine::new(stubs.build())
        .with_tip_generator(tips.clone())
        .with_deadline(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    let profile = engine.fetch_comprehensive_data(&seattle()).await;
    let elapsed = started.elapsed();

    assert!(elapsed <= Duration::from_secs(5), "took {:?}", elapsed);
    assert_eq!(tips.calls.load(Ordering::SeqCst), 1);
    assert_eq!(profile.quality_score, 100);
    assert_eq!(profile.overview.agent_tips, FALLBACK_AGENT_TIPS.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_deadline_skips_tip_generator() {
    let stubs = StubSet::healthy().delayed(ProviderKind::Crime, Duration::from_secs(60));
    let tips = Arc::new(StubTips::returning(Ok(vec!["never asked".to_string()])));
    let engine = NeighborhoodEngine::new(stubs.build())
        .with_tip_generator(tips.clone())
        .with_deadline(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    let profile = engine.fetch_comprehensive_data(&seattle()).await;

    assert!(started.elapsed() <= Duration::from_secs(5));
    assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    assert!(!profile.is_available(Subsystem::Safety));
    assert_eq!(profile.overview.agent_tips, FALLBACK_AGENT_TIPS.to_vec());
}

#[tokio::test]
async fn test_profile_serializes_with_camel_case_keys() {
    let stubs = StubSet::healthy().failing(&[ProviderKind::Market]);
    let engine = NeighborhoodEngine::new(stubs.build());

    let profile = engine.fetch_comprehensive_data(&seattle()).await;
    let json = serde_json::to_value(&profile).unwrap();

    assert_eq!(json["qualityScore"], 83);
    assert_eq!(json["dataSources"]["schools"], DEFAULT_DATA_SOURCE);
    assert_eq!(json["availability"]["overview"], true);
    assert!(json["overview"]["agentTips"].is_array());
    assert!(json["generatedAt"].is_string());
}

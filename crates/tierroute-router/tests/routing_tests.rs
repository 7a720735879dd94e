// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing behaviour over real and mock embedding providers.

use std::io::Write;
use std::sync::Arc;

use proptest::prelude::*;
use tierroute_config::RouterConfig;
use tierroute_core::{OperatingMode, Tier};
use tierroute_router::{ExampleStore, HashingEmbedder, Router, ThresholdTable};
use tierroute_test_utils::MockEmbedder;

fn scenario_router() -> Router {
    Router::new(Arc::new(HashingEmbedder::default()))
        .with_examples(ExampleStore::from_examples([
            (Tier::Local, "format this csv"),
            (Tier::Reasoning, "design a fraud detection architecture"),
        ]))
        .with_thresholds(
            ThresholdTable::empty()
                .with(Tier::Local, 0.75)
                .with(Tier::Reasoning, 0.70),
        )
}

#[test]
fn close_paraphrase_routes_semantically() {
    let d = scenario_router().route("reformat this csv file");
    assert_eq!(d.target, Tier::Local);
    assert_eq!(d.mode, OperatingMode::Semantic);
    assert!(d.confidence >= 0.75, "confidence {}", d.confidence);
    assert_eq!(d.matched_example.as_deref(), Some("format this csv"));
}

#[test]
fn gibberish_falls_back_to_default_via_keywords() {
    let d = scenario_router().route("xyzzy unrelated gibberish");
    assert_eq!(d.target, Tier::Local);
    assert_eq!(d.mode, OperatingMode::Keyword);
    assert_eq!(d.confidence, 0.5);
    assert_eq!(d.reason, "No keyword match, using default");
}

#[test]
fn builtin_examples_route_common_tasks() {
    let router = Router::new(Arc::new(HashingEmbedder::default()));
    let d = router.route("design a fraud detection system architecture");
    assert_eq!(d.target, Tier::Reasoning);
    assert_eq!(d.mode, OperatingMode::Semantic);
}

#[test]
fn added_example_is_usable_after_embedding() {
    let router = scenario_router();
    router.precompute().unwrap();
    router
        .add_example("build a rest api endpoint for invoices", Tier::Production)
        .unwrap();

    assert!(router.stats().embeddings_computed);
    let d = router.route("build a rest api endpoint for invoices");
    assert_eq!(d.target, Tier::Production);
    assert_eq!(d.mode, OperatingMode::Semantic);
    assert!((d.confidence - 1.0).abs() < 1e-6);
}

#[test]
fn concurrent_first_route_embeds_once() {
    let embedder = Arc::new(
        MockEmbedder::new()
            .with_vector("format this csv", vec![1.0, 0.0])
            .with_vector("design a fraud detection architecture", vec![0.0, 1.0]),
    );
    let router = Arc::new(
        Router::new(embedder.clone()).with_examples(ExampleStore::from_examples([
            (Tier::Local, "format this csv"),
            (Tier::Reasoning, "design a fraud detection architecture"),
        ])),
    );

    std::thread::scope(|scope| {
        for _ in 0..16 {
            let router = router.clone();
            scope.spawn(move || {
                let d = router.route("format this csv");
                assert_eq!(d.target, Tier::Local);
                assert_eq!(d.mode, OperatingMode::Semantic);
            });
        }
    });

    // Two examples embedded exactly once, plus one query per route.
    assert_eq!(embedder.embedded_texts(), 2 + 16);
    assert_eq!(embedder.load_count(), 1);
}

#[test]
fn evicted_embedder_is_reloaded() {
    let embedder = Arc::new(MockEmbedder::new().with_vector("format this csv", vec![1.0, 0.0]));
    let router = Router::new(embedder.clone())
        .with_examples(ExampleStore::from_examples([(Tier::Local, "format this csv")]));
    router.precompute().unwrap();

    embedder.evict();
    let d = router.route("format this csv");
    assert_eq!(d.mode, OperatingMode::Semantic);
    assert_eq!(embedder.load_count(), 2);
}

#[test]
fn examples_file_from_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"azure": ["build a rest api endpoint"], "gpu": ["ignored"], "claude": ["threat model the platform"]}}"#
    )
    .unwrap();

    let config = RouterConfig {
        examples_path: Some(file.path().display().to_string()),
        ..RouterConfig::default()
    };
    let router = Router::from_config(&config, Arc::new(HashingEmbedder::default()));

    let stats = router.stats();
    assert_eq!(stats.examples["local"], 0);
    assert_eq!(stats.examples["production"], 1);
    assert_eq!(stats.examples["reasoning"], 1);

    let d = router.route("build a rest api endpoint");
    assert_eq!(d.target, Tier::Production);
    assert_eq!(d.mode, OperatingMode::Semantic);
}

#[test]
fn malformed_examples_file_leaves_router_usable() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json at all").unwrap();

    let config = RouterConfig {
        examples_path: Some(file.path().display().to_string()),
        ..RouterConfig::default()
    };
    let router = Router::from_config(&config, Arc::new(HashingEmbedder::default()));
    assert!(router.examples().is_empty());

    let d = router.route("review the security of the payment api");
    assert_eq!(d.target, Tier::Reasoning);
    assert_eq!(d.mode, OperatingMode::Keyword);
}

proptest! {
    #[test]
    fn manual_mode_always_returns_default(task in ".{0,80}", tier_idx in 0usize..3) {
        let tier = [Tier::Local, Tier::Production, Tier::Reasoning][tier_idx];
        let router = Router::new(Arc::new(MockEmbedder::new()))
            .with_mode(OperatingMode::Manual)
            .with_default_tier(tier);
        let d = router.route(&task);
        prop_assert_eq!(d.target, tier);
        prop_assert_eq!(d.confidence, 1.0);
        prop_assert_eq!(d.mode, OperatingMode::Manual);
    }

    #[test]
    fn threshold_decides_semantic_or_keyword(threshold in 0.05f64..0.95, cos in 0.0f64..1.0) {
        prop_assume!((cos - threshold).abs() > 1e-4);
        let sin = (1.0 - cos * cos).sqrt();
        let embedder = MockEmbedder::new()
            .with_vector("anchor", vec![1.0, 0.0])
            .with_vector("query", vec![cos as f32, sin as f32]);
        let router = Router::new(Arc::new(embedder))
            .with_examples(ExampleStore::from_examples([(Tier::Reasoning, "anchor")]))
            .with_thresholds(ThresholdTable::empty().with(Tier::Reasoning, threshold));

        let d = router.route("query");
        if cos >= threshold {
            prop_assert_eq!(d.mode, OperatingMode::Semantic);
            prop_assert_eq!(d.target, Tier::Reasoning);
        } else {
            prop_assert_eq!(d.mode, OperatingMode::Keyword);
        }
    }
}

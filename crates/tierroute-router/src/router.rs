// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing orchestration: operating mode, semantic classification and
//! keyword fallback.
//!
//! Manual mode returns the default tier outright. Keyword mode goes straight
//! to the keyword table. Semantic mode tries the classifier first and falls
//! back to keywords when the best match is below threshold or the embedding
//! provider is unusable; such decisions carry mode `keyword`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tierroute_config::RouterConfig;
use tierroute_core::{EmbeddingProvider, OperatingMode, Tier, TierRouteError};
use tracing::{debug, warn};

use crate::classifier::{Classification, Classifier, ThresholdTable};
use crate::decision::RouteDecision;
use crate::examples::ExampleStore;
use crate::keywords::KeywordTable;

/// Snapshot of router configuration and example state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterStats {
    pub mode: OperatingMode,
    pub thresholds: BTreeMap<String, f64>,
    pub examples: BTreeMap<String, usize>,
    pub embeddings_computed: bool,
    pub default_tier: Tier,
}

/// Decides which tier handles a task.
pub struct Router {
    classifier: Classifier,
    keywords: KeywordTable,
    default_tier: Tier,
    mode: OperatingMode,
}

impl Router {
    /// A semantic router over the built-in examples, thresholds and keywords,
    /// defaulting to the local tier.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            classifier: Classifier::new(
                embedder,
                ExampleStore::builtin(),
                ThresholdTable::default(),
            ),
            keywords: KeywordTable::builtin(),
            default_tier: Tier::Local,
            mode: OperatingMode::Semantic,
        }
    }

    /// Builds a router from the `[router]` configuration section.
    ///
    /// An unusable examples file is logged and leaves the router without
    /// reference examples.
    pub fn from_config(config: &RouterConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let store = ExampleStore::load_or_builtin(config.examples_path.as_deref().map(Path::new));
        Self {
            classifier: Classifier::new(
                embedder,
                store,
                ThresholdTable::from_config(&config.thresholds),
            ),
            keywords: KeywordTable::from_config(&config.keywords),
            default_tier: config.default_tier,
            mode: config.mode,
        }
    }

    pub fn with_examples(mut self, store: ExampleStore) -> Self {
        self.classifier = self.classifier.with_store(store);
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.classifier = self.classifier.with_thresholds(thresholds);
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_default_tier(mut self, tier: Tier) -> Self {
        self.default_tier = tier;
        self
    }

    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn default_tier(&self) -> Tier {
        self.default_tier
    }

    pub fn examples(&self) -> &ExampleStore {
        self.classifier.store()
    }

    /// Routes `task` according to the operating mode. Never fails.
    pub fn route(&self, task: &str) -> RouteDecision {
        match self.mode {
            OperatingMode::Manual => RouteDecision::new(
                self.default_tier,
                1.0,
                OperatingMode::Manual,
                "Manual routing mode",
            ),
            OperatingMode::Keyword => self.keywords.classify(task, self.default_tier),
            OperatingMode::Semantic => match self.classifier.classify(task) {
                Ok(Classification::Accepted(decision)) => decision,
                Ok(Classification::Inconclusive { best }) => {
                    debug!(
                        best_similarity = best.as_ref().map(|b| b.similarity),
                        best_tier = ?best.as_ref().map(|b| b.tier),
                        "semantic match below threshold, falling back to keywords"
                    );
                    self.keywords.classify(task, self.default_tier)
                }
                Err(e) => {
                    warn!(error = %e, "semantic routing unavailable, falling back to keywords");
                    self.keywords.classify(task, self.default_tier)
                }
            },
        }
    }

    /// Adds a reference example; embedded immediately once the store has
    /// been embedded.
    pub fn add_example(&self, text: impl Into<String>, tier: Tier) -> Result<(), TierRouteError> {
        self.classifier.add_example(text, tier)
    }

    /// Computes all reference embeddings ahead of the first route call.
    pub fn precompute(&self) -> Result<(), TierRouteError> {
        self.classifier.precompute()
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            mode: self.mode,
            thresholds: self.classifier.thresholds().to_map(),
            examples: self.classifier.store().counts(),
            embeddings_computed: self.classifier.store().is_embedded(),
            default_tier: self.default_tier,
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("mode", &self.mode)
            .field("default_tier", &self.default_tier)
            .field("embedder", &self.classifier.embedder().name())
            .field("examples", &self.classifier.store().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tierroute_test_utils::MockEmbedder;

    use super::*;

    fn mock() -> Arc<MockEmbedder> {
        Arc::new(MockEmbedder::new().with_vector("format this csv", vec![1.0, 0.0]))
    }

    #[test]
    fn manual_mode_ignores_task_content() {
        let router = Router::new(mock())
            .with_mode(OperatingMode::Manual)
            .with_default_tier(Tier::Production);
        for task in ["", "design a fraud detection architecture", "format this csv"] {
            let d = router.route(task);
            assert_eq!(d.target, Tier::Production);
            assert_eq!(d.confidence, 1.0);
            assert_eq!(d.mode, OperatingMode::Manual);
        }
    }

    #[test]
    fn keyword_mode_skips_embeddings() {
        let embedder = mock();
        let router = Router::new(embedder.clone()).with_mode(OperatingMode::Keyword);
        let d = router.route("review this security design");
        assert_eq!(d.target, Tier::Reasoning);
        assert_eq!(embedder.embed_calls(), 0);
    }

    #[test]
    fn embedding_failure_falls_back_per_call() {
        let embedder = mock();
        let router = Router::new(embedder.clone())
            .with_examples(ExampleStore::from_examples([(Tier::Local, "format this csv")]));

        embedder.fail_load(true);
        let d = router.route("format this csv");
        assert_eq!(d.mode, OperatingMode::Keyword);

        embedder.fail_load(false);
        let d = router.route("format this csv");
        assert_eq!(d.mode, OperatingMode::Semantic);
        assert_eq!(d.target, Tier::Local);
    }

    #[test]
    #[tracing_test::traced_test]
    fn embedding_failure_is_logged() {
        let embedder = mock();
        embedder.fail_load(true);
        let router = Router::new(embedder)
            .with_examples(ExampleStore::from_examples([(Tier::Local, "format this csv")]));

        router.route("format this csv");
        assert!(logs_contain("semantic routing unavailable"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn from_config_loads_only_the_configured_examples() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"local": ["tidy imports"]}"#).unwrap();
        let config = RouterConfig {
            examples_path: Some(file.path().display().to_string()),
            ..RouterConfig::default()
        };

        let router = Router::from_config(&config, mock());
        assert_eq!(router.examples().len(), 1);
        assert!(logs_contain("routing examples loaded"));
        assert!(!logs_contain("<builtin>"));
    }

    #[test]
    fn stats_reflect_configuration() {
        let router = Router::new(mock())
            .with_examples(ExampleStore::from_examples([(Tier::Local, "format this csv")]))
            .with_default_tier(Tier::Reasoning);
        let stats = router.stats();
        assert_eq!(stats.mode, OperatingMode::Semantic);
        assert_eq!(stats.default_tier, Tier::Reasoning);
        assert_eq!(stats.examples["local"], 1);
        assert_eq!(stats.examples["production"], 0);
        assert!(!stats.embeddings_computed);

        router.precompute().unwrap();
        assert!(router.stats().embeddings_computed);
    }

    #[test]
    fn from_config_applies_every_setting() {
        let config = RouterConfig {
            mode: OperatingMode::Keyword,
            default_tier: Tier::Production,
            examples_path: Some("/nonexistent/examples.json".into()),
            ..RouterConfig::default()
        };
        let router = Router::from_config(&config, mock());
        assert_eq!(router.mode(), OperatingMode::Keyword);
        assert_eq!(router.default_tier(), Tier::Production);
        assert!(router.examples().is_empty());
        assert_eq!(router.route("xyzzy").target, Tier::Production);
    }
}

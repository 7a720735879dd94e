// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic classification against reference examples.
//!
//! The classifier finds the single most similar example across every tier
//! and accepts it only if its similarity clears that example's tier
//! threshold. Anything else is inconclusive and left to the keyword path.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tierroute_config::ThresholdConfig;
use tierroute_core::{EmbeddingProvider, OperatingMode, Tier, TierRouteError};

use crate::decision::RouteDecision;
use crate::examples::{BestMatch, ExampleStore};

/// Threshold applied to a tier with no explicit entry.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Per-tier acceptance thresholds for semantic matches.
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    values: HashMap<Tier, f64>,
}

impl ThresholdTable {
    /// A table with no explicit entries; every tier uses [`DEFAULT_THRESHOLD`].
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self {
            values: Tier::all().map(|t| (t, config.for_tier(t))).collect(),
        }
    }

    pub fn with(mut self, tier: Tier, threshold: f64) -> Self {
        self.values.insert(tier, threshold);
        self
    }

    pub fn get(&self, tier: Tier) -> f64 {
        self.values.get(&tier).copied().unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Effective threshold for every tier, keyed by tier name.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        Tier::all().map(|t| (t.to_string(), self.get(t))).collect()
    }
}

impl Default for ThresholdTable {
    /// local 0.75, production 0.70, reasoning 0.70.
    fn default() -> Self {
        Self::from_config(&ThresholdConfig::default())
    }
}

/// Result of a semantic classification attempt.
#[derive(Debug, Clone)]
pub enum Classification {
    /// The best match cleared its tier threshold.
    Accepted(RouteDecision),
    /// No examples, or the best match fell below its tier threshold.
    Inconclusive { best: Option<BestMatch> },
}

/// Embedding-similarity classifier over an [`ExampleStore`].
pub struct Classifier {
    embedder: Arc<dyn EmbeddingProvider>,
    store: ExampleStore,
    thresholds: ThresholdTable,
}

impl Classifier {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: ExampleStore,
        thresholds: ThresholdTable,
    ) -> Self {
        Self {
            embedder,
            store,
            thresholds,
        }
    }

    pub fn store(&self) -> &ExampleStore {
        &self.store
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    pub(crate) fn with_store(mut self, store: ExampleStore) -> Self {
        self.store = store;
        self
    }

    pub(crate) fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Computes every missing example embedding now.
    pub fn precompute(&self) -> Result<(), TierRouteError> {
        self.store.ensure_embedded(self.embedder.as_ref())
    }

    pub fn add_example(&self, text: impl Into<String>, tier: Tier) -> Result<(), TierRouteError> {
        self.store.add(text, tier, self.embedder.as_ref())
    }

    /// Classifies `task`. Errors mean the embedding provider is unusable for
    /// this call.
    pub fn classify(&self, task: &str) -> Result<Classification, TierRouteError> {
        self.store.ensure_embedded(self.embedder.as_ref())?;
        if !self.embedder.is_loaded() {
            self.embedder.load()?;
        }

        let query = self.embedder.embed_query(task)?;
        let best = self.store.best_match(&query)?;

        match best {
            Some(m) if m.similarity >= self.thresholds.get(m.tier) => {
                let reason = format!(
                    "Best semantic match '{}' (similarity: {:.3})",
                    m.text, m.similarity
                );
                Ok(Classification::Accepted(
                    RouteDecision::new(m.tier, m.similarity, OperatingMode::Semantic, reason)
                        .with_match(m.text),
                ))
            }
            best => Ok(Classification::Inconclusive { best }),
        }
    }
}

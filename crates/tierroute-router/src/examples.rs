// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference examples per tier with lazily computed embeddings.
//!
//! The store owns its embedding state: the first call to
//! [`ExampleStore::ensure_embedded`] computes every missing embedding under
//! the store's write lock, so concurrent first callers neither embed twice
//! nor observe a partially embedded store. Later calls take the read-lock
//! fast path.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tierroute_core::{EmbeddingProvider, Tier, TierRouteError};
use tracing::{debug, info, warn};

use crate::similarity::cosine_similarity;

const BUILTIN_EXAMPLES: &str = include_str!("../data/routing_examples.json");

/// A pre-classified task description used as a semantic anchor for a tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceExample {
    pub text: String,
    pub tier: Tier,
    pub embedding: Option<Vec<f32>>,
}

impl ReferenceExample {
    pub fn new(text: impl Into<String>, tier: Tier) -> Self {
        Self {
            text: text.into(),
            tier,
            embedding: None,
        }
    }
}

/// The most similar reference example for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub tier: Tier,
    pub text: String,
    pub similarity: f64,
}

#[derive(Debug, Default)]
struct StoreState {
    examples: HashMap<Tier, Vec<ReferenceExample>>,
    embedded: bool,
}

/// Reference examples grouped by tier.
#[derive(Debug, Default)]
pub struct ExampleStore {
    state: RwLock<StoreState>,
}

impl ExampleStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `examples` in the given order.
    pub fn from_examples<I, S>(examples: I) -> Self
    where
        I: IntoIterator<Item = (Tier, S)>,
        S: Into<String>,
    {
        let mut map: HashMap<Tier, Vec<ReferenceExample>> = HashMap::new();
        for (tier, text) in examples {
            map.entry(tier)
                .or_default()
                .push(ReferenceExample::new(text, tier));
        }
        Self {
            state: RwLock::new(StoreState {
                examples: map,
                embedded: false,
            }),
        }
    }

    /// The reference examples shipped with this crate.
    pub fn builtin() -> Self {
        match parse_reference_examples("<builtin>", BUILTIN_EXAMPLES) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "built-in routing examples unusable");
                Self::new()
            }
        }
    }

    /// Loads a reference file mapping tier names to lists of example texts.
    ///
    /// A missing or unparseable file is an error. Unknown tier names and
    /// non-string entries are skipped with a warning.
    pub fn from_file(path: &Path) -> Result<Self, TierRouteError> {
        let label = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TierRouteError::MalformedReferenceData {
                path: label.clone(),
                message: e.to_string(),
            }
        })?;
        parse_reference_examples(&label, &content)
    }

    /// Loads `path`, or the built-in examples when `path` is `None`.
    ///
    /// Never fails: an unusable file is logged and yields an empty store.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path {
            None => Self::builtin(),
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                warn!(error = %e, "routing examples load failed, continuing without examples");
                Self::new()
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, TierRouteError> {
        self.state
            .read()
            .map_err(|_| TierRouteError::Internal("example store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, TierRouteError> {
        self.state
            .write()
            .map_err(|_| TierRouteError::Internal("example store lock poisoned".into()))
    }

    /// Total number of examples across all tiers.
    pub fn len(&self) -> usize {
        self.read()
            .map(|s| s.examples.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of examples per tier name, every tier present.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let state = self.read().ok();
        Tier::all()
            .map(|tier| {
                let n = state
                    .as_ref()
                    .and_then(|s| s.examples.get(&tier))
                    .map_or(0, Vec::len);
                (tier.to_string(), n)
            })
            .collect()
    }

    /// Snapshot of the examples for `tier`, in insertion order.
    pub fn examples(&self, tier: Tier) -> Vec<ReferenceExample> {
        self.read()
            .ok()
            .and_then(|s| s.examples.get(&tier).cloned())
            .unwrap_or_default()
    }

    /// Whether every example currently has an embedding.
    pub fn is_embedded(&self) -> bool {
        self.read().map(|s| s.embedded).unwrap_or(false)
    }

    /// Computes embeddings for every example that lacks one, at most once.
    ///
    /// On failure the store stays marked as not embedded and the next call
    /// retries; examples embedded by an earlier partial run are kept.
    pub fn ensure_embedded(&self, embedder: &dyn EmbeddingProvider) -> Result<(), TierRouteError> {
        if self.read()?.embedded {
            return Ok(());
        }

        let mut state = self.write()?;
        if state.embedded {
            return Ok(());
        }

        if !embedder.is_loaded() {
            embedder.load()?;
        }

        let pending: Vec<(Tier, usize)> = Tier::all()
            .flat_map(|tier| {
                state
                    .examples
                    .get(&tier)
                    .into_iter()
                    .flat_map(|list| list.iter().enumerate())
                    .filter(|(_, ex)| ex.embedding.is_none())
                    .map(move |(idx, _)| (tier, idx))
                    .collect::<Vec<_>>()
            })
            .collect();

        if !pending.is_empty() {
            let vectors = {
                let texts: Vec<&str> = pending
                    .iter()
                    .map(|(tier, idx)| state.examples[tier][*idx].text.as_str())
                    .collect();
                embedder.embed(&texts)?
            };
            if vectors.len() != pending.len() {
                return Err(TierRouteError::embedding(format!(
                    "provider returned {} vectors for {} examples",
                    vectors.len(),
                    pending.len()
                )));
            }
            for ((tier, idx), vector) in pending.iter().zip(vectors) {
                if let Some(example) = state
                    .examples
                    .get_mut(tier)
                    .and_then(|list| list.get_mut(*idx))
                {
                    example.embedding = Some(vector);
                }
            }
        }

        state.embedded = true;
        info!(
            computed = pending.len(),
            provider = embedder.name(),
            "reference example embeddings computed"
        );
        Ok(())
    }

    /// Appends an example. If the store is already embedded, the new example
    /// is embedded immediately so the store never stays partially embedded.
    pub fn add(
        &self,
        text: impl Into<String>,
        tier: Tier,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<(), TierRouteError> {
        let mut example = ReferenceExample::new(text, tier);
        let mut state = self.write()?;

        if state.embedded {
            match embedder.embed_query(&example.text) {
                Ok(vector) => example.embedding = Some(vector),
                Err(e) => {
                    // Next ensure_embedded call picks it up.
                    warn!(error = %e, tier = %tier, "could not embed new example");
                    state.embedded = false;
                }
            }
        }

        debug!(tier = %tier, embedded = example.embedding.is_some(), "reference example added");
        state.examples.entry(tier).or_default().push(example);
        Ok(())
    }

    /// The single most similar embedded example across every tier.
    ///
    /// Iterates tiers in declaration order, then insertion order; the first
    /// example with the highest similarity wins ties.
    pub fn best_match(&self, query: &[f32]) -> Result<Option<BestMatch>, TierRouteError> {
        let state = self.read()?;
        let mut best: Option<BestMatch> = None;

        for tier in Tier::all() {
            let Some(list) = state.examples.get(&tier) else {
                continue;
            };
            for example in list {
                let Some(embedding) = &example.embedding else {
                    continue;
                };
                let similarity = cosine_similarity(query, embedding);
                let better = best.as_ref().is_none_or(|b| similarity > b.similarity);
                if better {
                    best = Some(BestMatch {
                        tier,
                        text: example.text.clone(),
                        similarity,
                    });
                }
            }
        }

        Ok(best)
    }
}

/// Parses reference-file JSON: an object mapping tier names (aliases
/// accepted) to arrays of example strings.
pub fn parse_reference_examples(path: &str, content: &str) -> Result<ExampleStore, TierRouteError> {
    let malformed = |message: String| TierRouteError::MalformedReferenceData {
        path: path.to_string(),
        message,
    };

    let root: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(map) = root else {
        return Err(malformed("expected an object of tier name to examples".into()));
    };

    let mut examples = Vec::new();
    for (name, value) in map {
        let tier = match Tier::from_str(&name) {
            Ok(tier) => tier,
            Err(_) => {
                warn!(path, tier = %name, "unknown tier in routing examples, skipping");
                continue;
            }
        };
        let Value::Array(items) = value else {
            warn!(path, tier = %tier, "routing examples for tier are not a list, skipping");
            continue;
        };
        for item in items {
            match item {
                Value::String(text) => examples.push((tier, text)),
                other => warn!(path, tier = %tier, entry = %other, "non-string routing example skipped"),
            }
        }
    }

    let store = ExampleStore::from_examples(examples);
    let counts = store.counts();
    info!(
        path,
        local = counts.get("local").copied().unwrap_or(0),
        production = counts.get("production").copied().unwrap_or(0),
        reasoning = counts.get("reasoning").copied().unwrap_or(0),
        "routing examples loaded"
    );
    Ok(store)
}

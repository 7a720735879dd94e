// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding provider with an explicit text-to-vector table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tierroute_core::{EmbeddingProvider, TierRouteError};

/// Returns the registered vector for a known text and a zero vector for
/// anything else. Load and embed failures can be injected at runtime.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimensions: usize,
    loaded: AtomicBool,
    fail_load: AtomicBool,
    fail_embed: AtomicBool,
    load_count: AtomicUsize,
    embed_calls: AtomicUsize,
    embedded_texts: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the vector returned for `text`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.dimensions = self.dimensions.max(vector.len());
        self.vectors.insert(text.into(), vector);
        self
    }

    pub fn fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_embed(&self, fail: bool) {
        self.fail_embed.store(fail, Ordering::SeqCst);
    }

    /// Mark the provider unloaded, as if the model had been evicted.
    pub fn evict(&self) {
        self.loaded.store(false, Ordering::SeqCst);
    }

    /// Number of successful unloaded-to-loaded transitions.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Number of successful `embed` calls (batches).
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Total texts embedded across all successful calls.
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn load(&self) -> Result<(), TierRouteError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(TierRouteError::embedding("injected load failure"));
        }
        if !self.loaded.swap(true, Ordering::SeqCst) {
            self.load_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TierRouteError> {
        if !self.is_loaded() {
            return Err(TierRouteError::embedding("mock embedder is not loaded"));
        }
        if self.fail_embed.load(Ordering::SeqCst) {
            return Err(TierRouteError::embedding("injected embed failure"));
        }
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(*t)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dimensions])
            })
            .collect())
    }
}

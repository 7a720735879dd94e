// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in embedding provider based on character-trigram feature hashing.
//!
//! Each whitespace-separated word is lowercased and padded with one space on
//! either side; every character trigram of the padded word is hashed with
//! 64-bit FNV-1a into one of `dimensions` buckets. The resulting count
//! vector is L2-normalized. No model download, no network, deterministic
//! across runs and platforms.

use std::sync::atomic::{AtomicBool, Ordering};

use tierroute_core::{EmbeddingProvider, TierRouteError};
use tracing::debug;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Lexical embedding provider; see the module docs for the feature scheme.
#[derive(Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
    loaded: AtomicBool,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 512;

    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            loaded: AtomicBool::new(false),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        for word in lower.split_whitespace() {
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();
            for gram in padded.windows(3) {
                let bucket = (fnv1a(gram) % self.dimensions as u64) as usize;
                vector[bucket] += 1.0;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut buf = [0u8; 4];
    for c in chars {
        for byte in c.encode_utf8(&mut buf).as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing-trigram"
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn load(&self) -> Result<(), TierRouteError> {
        if self.dimensions == 0 {
            return Err(TierRouteError::embedding(
                "hashing embedder needs at least one dimension",
            ));
        }
        if !self.loaded.swap(true, Ordering::AcqRel) {
            debug!(dimensions = self.dimensions, "hashing embedder ready");
        }
        Ok(())
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TierRouteError> {
        if !self.is_loaded() {
            return Err(TierRouteError::embedding("hashing embedder is not loaded"));
        }
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider trait for converting text into vectors.

use crate::error::TierRouteError;

/// Converts text into fixed-length vectors for semantic routing.
///
/// Providers have an explicit loaded/unloaded lifecycle; callers load a
/// provider before the first embedding request. Loading an already loaded
/// provider is a no-op.
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &str;

    /// Whether the underlying model is ready.
    fn is_loaded(&self) -> bool;

    /// Loads the underlying model.
    fn load(&self) -> Result<(), TierRouteError>;

    /// Embeds a batch of texts. The output is order-preserving and 1:1 with
    /// the input.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TierRouteError>;

    /// Embeds a single query string.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, TierRouteError> {
        self.embed(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| TierRouteError::embedding("embedding returned no results"))
    }
}

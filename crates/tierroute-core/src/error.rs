// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the TierRoute dispatch engine.
//!
//! Only [`TierRouteError::NotLoaded`] and failures raised by the backend that
//! actually serves a call reach dispatch callers. The remaining variants are
//! absorbed inside the router and dispatcher and surface only in logs and in
//! the `reason` text of a routing decision.

use thiserror::Error;

use crate::types::Tier;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type shared by every TierRoute crate.
#[derive(Debug, Error)]
pub enum TierRouteError {
    /// Generation was attempted before `load()` (or after `unload()`).
    #[error("not loaded: {0}")]
    NotLoaded(String),

    /// The decided tier has no configured, loaded backend.
    #[error("tier unavailable: {tier}")]
    TierUnavailable { tier: Tier },

    /// The embedding provider failed to load or to embed a batch.
    #[error("embedding unavailable: {message}")]
    EmbeddingUnavailable {
        message: String,
        source: Option<BoxError>,
    },

    /// The reference examples file is missing, unreadable, or malformed.
    #[error("malformed reference data in {path}: {message}")]
    MalformedReferenceData { path: String, message: String },

    /// A generation backend failed while serving a call.
    #[error("backend error ({backend}): {message}")]
    Backend {
        backend: String,
        message: String,
        source: Option<BoxError>,
    },

    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TierRouteError {
    /// Shorthand for an [`TierRouteError::EmbeddingUnavailable`] without a source.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`TierRouteError::Backend`] without a source.
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must be surfaced to the dispatch caller.
    pub fn is_fatal_to_call(&self) -> bool {
        matches!(self, Self::NotLoaded(_) | Self::Backend { .. })
    }
}

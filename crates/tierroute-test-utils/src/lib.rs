// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for TierRoute integration tests.
//!
//! Provides deterministic stand-ins for the two external collaborators of
//! the routing engine so tests run without models or network access.
//!
//! # Components
//!
//! - [`MockBackend`] - Generation backend with queued responses and call counters
//! - [`MockEmbedder`] - Embedding provider backed by an explicit text-to-vector table

pub mod mock_backend;
pub mod mock_embedder;

pub use mock_backend::MockBackend;
pub use mock_embedder::MockEmbedder;

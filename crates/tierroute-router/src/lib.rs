// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task routing for the TierRoute dispatch engine.
//!
//! This crate provides:
//! - [`ExampleStore`]: reference examples per tier with compute-once embeddings
//! - [`Classifier`]: global-best cosine similarity checked against per-tier thresholds
//! - [`KeywordTable`]: deterministic, priority-ordered keyword fallback
//! - [`Router`]: semantic / keyword / manual orchestration producing a [`RouteDecision`]
//! - [`HashingEmbedder`]: a built-in, download-free [`EmbeddingProvider`](tierroute_core::EmbeddingProvider)

pub mod classifier;
pub mod decision;
pub mod embedder;
pub mod examples;
pub mod keywords;
pub mod router;
pub mod similarity;

pub use classifier::{Classification, Classifier, DEFAULT_THRESHOLD, ThresholdTable};
pub use decision::RouteDecision;
pub use embedder::HashingEmbedder;
pub use examples::{BestMatch, ExampleStore, ReferenceExample, parse_reference_examples};
pub use keywords::KeywordTable;
pub use router::{Router, RouterStats};
pub use similarity::cosine_similarity;

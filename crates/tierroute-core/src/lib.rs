// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the TierRoute dispatch engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the TierRoute workspace. Generation backends
//! and embedding providers implement traits defined here.

pub mod error;
pub mod stream;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TierRouteError;
pub use stream::{StreamClosed, TokenSink, spawn_token_stream};
pub use traits::{EmbeddingProvider, ModelBackend, TokenStream};
pub use types::{ChatMessage, GenerationConfig, OperatingMode, Tier, task_from_messages};

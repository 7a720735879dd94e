// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the collaborators the dispatcher wraps.
//!
//! Generation backends implement [`ModelBackend`] (async, via
//! `#[async_trait]` for dynamic dispatch). Embedding providers implement
//! [`EmbeddingProvider`], which is synchronous because routing decisions are
//! computed synchronously.

pub mod backend;
pub mod embedding;

pub use backend::{ModelBackend, TokenStream};
pub use embedding::EmbeddingProvider;

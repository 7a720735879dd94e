// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier dispatch for the TierRoute engine.
//!
//! [`Dispatcher`] wraps a [`Router`](tierroute_router::Router) and up to three
//! [`ModelBackend`](tierroute_core::ModelBackend)s: it resolves each decision
//! to a loaded backend (falling back along the static chain), delegates
//! generation, and keeps a bounded [`RoutingHistory`].

pub mod dispatcher;
pub mod history;

pub use dispatcher::{Dispatcher, Overrides, Selection};
pub use history::{
    DEFAULT_HISTORY_CAPACITY, HistoryEntry, RECENT_ENTRIES, RoutingHistory, RoutingStats,
    task_preview,
};

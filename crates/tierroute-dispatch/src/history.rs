// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded routing history and aggregate statistics.
//!
//! Eviction and append happen in one critical section, so the history never
//! exceeds its capacity even under concurrent writers. A poisoned lock is
//! recovered rather than propagated: history must never block generation.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tierroute_core::{OperatingMode, Tier};
use tierroute_router::RouteDecision;

/// Default number of retained entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Entries included in [`RoutingStats::recent`].
pub const RECENT_ENTRIES: usize = 10;

const PREVIEW_CHARS: usize = 100;

/// One dispatched call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Tier whose backend served the call.
    pub target: Tier,
    /// Tier the decision named before any fallback substitution.
    pub requested: Tier,
    pub confidence: f64,
    pub mode: OperatingMode,
    pub task_preview: String,
    pub reason: String,
}

impl HistoryEntry {
    pub fn new(task: &str, served: Tier, decision: &RouteDecision) -> Self {
        Self {
            timestamp: decision.timestamp,
            target: served,
            requested: decision.target,
            confidence: decision.confidence,
            mode: decision.mode,
            task_preview: task_preview(task),
            reason: decision.reason.clone(),
        }
    }
}

/// The first 100 characters of `task`, with `...` appended when truncated.
pub fn task_preview(task: &str) -> String {
    match task.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &task[..cut]),
        None => task.to_string(),
    }
}

/// Aggregates over the retained history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutingStats {
    pub total_requests: usize,
    pub by_target: BTreeMap<String, usize>,
    pub by_mode: BTreeMap<String, usize>,
    /// `None` while the history is empty.
    pub average_confidence: Option<f64>,
    /// The last [`RECENT_ENTRIES`] entries, oldest first.
    pub recent: Vec<HistoryEntry>,
}

/// FIFO-bounded log of dispatched calls.
#[derive(Debug)]
pub struct RoutingHistory {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl RoutingHistory {
    /// A history keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Evicts the oldest entries if full, then appends `entry`.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every retained entry, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn stats(&self) -> RoutingStats {
        let entries = self.lock();
        if entries.is_empty() {
            return RoutingStats::default();
        }

        let mut by_target = BTreeMap::new();
        let mut by_mode = BTreeMap::new();
        let mut confidence_sum = 0.0;
        for entry in entries.iter() {
            *by_target.entry(entry.target.to_string()).or_insert(0) += 1;
            *by_mode.entry(entry.mode.to_string()).or_insert(0) += 1;
            confidence_sum += entry.confidence;
        }

        let skip = entries.len().saturating_sub(RECENT_ENTRIES);
        RoutingStats {
            total_requests: entries.len(),
            by_target,
            by_mode,
            average_confidence: Some(confidence_sum / entries.len() as f64),
            recent: entries.iter().skip(skip).cloned().collect(),
        }
    }
}

impl Default for RoutingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

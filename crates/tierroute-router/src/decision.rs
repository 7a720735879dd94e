// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The outcome of a single routing evaluation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tierroute_core::{OperatingMode, Tier};

/// A routing decision: which tier, how confident, and why.
///
/// Created fresh per routing call. The only permitted edit after
/// construction is [`RouteDecision::note_fallback`], which appends a single
/// substitution marker to `reason` and leaves every other field untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDecision {
    /// The tier the router (or a force override) decided on.
    pub target: Tier,
    /// Similarity in semantic mode, a fixed heuristic value otherwise.
    pub confidence: f64,
    /// The decision path that produced this decision.
    pub mode: OperatingMode,
    /// Reference example text behind a semantic decision.
    pub matched_example: Option<String>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    fallback_noted: bool,
}

impl RouteDecision {
    pub fn new(
        target: Tier,
        confidence: f64,
        mode: OperatingMode,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            target,
            confidence,
            mode,
            matched_example: None,
            reason: reason.into(),
            timestamp: Utc::now(),
            fallback_noted: false,
        }
    }

    /// Attaches the reference example that produced a semantic decision.
    pub fn with_match(mut self, example: impl Into<String>) -> Self {
        self.matched_example = Some(example.into());
        self
    }

    /// A decision imposed by a caller override rather than the router.
    pub fn forced(tier: Tier) -> Self {
        Self::new(tier, 1.0, OperatingMode::Manual, format!("Forced {tier}"))
    }

    /// Records that `target` had no live backend and another tier served the
    /// call. Returns `false` (and changes nothing) if a substitution was
    /// already noted on this decision.
    pub fn note_fallback(&mut self) -> bool {
        if self.fallback_noted {
            return false;
        }
        self.reason
            .push_str(&format!(" (fallback: {} unavailable)", self.target));
        self.fallback_noted = true;
        true
    }

    /// Whether a fallback substitution has been recorded.
    pub fn is_fallback(&self) -> bool {
        self.fallback_noted
    }
}

// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword routing.
//!
//! Case-insensitive substring search over per-tier keyword lists, consulted
//! in [`Tier::KEYWORD_PRIORITY`] order. Never fails, never suspends: this is
//! the terminal fallback of the semantic path.

use std::collections::HashMap;

use tierroute_config::KeywordConfig;
use tierroute_core::{OperatingMode, Tier};

use crate::decision::RouteDecision;

/// Confidence attached to a keyword match.
pub const KEYWORD_MATCH_CONFIDENCE: f64 = 0.6;

/// Confidence attached to the default tier when nothing matched.
pub const NO_MATCH_CONFIDENCE: f64 = 0.5;

const LOCAL_KEYWORDS: &[&str] = &[
    "simple", "utility", "format", "parse", "convert", "basic", "script", "helper",
    "validator", "mask", "csv", "json",
];

const PRODUCTION_KEYWORDS: &[&str] = &[
    "production", "enterprise", "database", "api", "rest", "authentication", "jwt",
    "oauth", "microservice", "pci", "compliance", "transaction", "payment",
    "reconciliation",
];

const REASONING_KEYWORDS: &[&str] = &[
    "architecture", "design", "security", "fraud", "ml", "machine learning", "complex",
    "analysis", "review", "multi-tenant", "disaster recovery", "trade-off",
];

/// Per-tier keyword lists, stored lowercased.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    keywords: HashMap<Tier, Vec<String>>,
}

impl KeywordTable {
    /// The built-in keyword lists.
    pub fn builtin() -> Self {
        let defaults = |tier: Tier| -> &'static [&'static str] {
            match tier {
                Tier::Local => LOCAL_KEYWORDS,
                Tier::Production => PRODUCTION_KEYWORDS,
                Tier::Reasoning => REASONING_KEYWORDS,
            }
        };
        Self {
            keywords: Tier::all()
                .map(|tier| (tier, defaults(tier).iter().map(|k| k.to_string()).collect()))
                .collect(),
        }
    }

    /// Built-in lists with any configured tier lists substituted.
    pub fn from_config(config: &KeywordConfig) -> Self {
        let mut table = Self::builtin();
        for tier in Tier::all() {
            if let Some(list) = config.for_tier(tier) {
                table = table.with_keywords(tier, list.iter().cloned());
            }
        }
        table
    }

    /// Replaces the keyword list for `tier`.
    pub fn with_keywords<I, S>(mut self, tier: Tier, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.keywords.insert(tier, list);
        self
    }

    pub fn keywords(&self, tier: Tier) -> &[String] {
        self.keywords.get(&tier).map_or(&[], Vec::as_slice)
    }

    /// Routes `task` to the first tier (by priority) with a matching keyword,
    /// or to `default_tier` when no keyword matches.
    pub fn classify(&self, task: &str, default_tier: Tier) -> RouteDecision {
        let lower = task.to_lowercase();

        for tier in Tier::KEYWORD_PRIORITY {
            if let Some(keyword) = self.keywords(tier).iter().find(|k| lower.contains(k.as_str())) {
                return RouteDecision::new(
                    tier,
                    KEYWORD_MATCH_CONFIDENCE,
                    OperatingMode::Keyword,
                    format!("Matched keyword: {keyword}"),
                );
            }
        }

        RouteDecision::new(
            default_tier,
            NO_MATCH_CONFIDENCE,
            OperatingMode::Keyword,
            "No keyword match, using default",
        )
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

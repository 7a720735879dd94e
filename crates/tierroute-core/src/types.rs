// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, the dispatcher and backends.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// An execution tier a task can be routed to.
///
/// Tiers are independent options. Declaration order (local, production,
/// reasoning) is only used as the stable iteration order over reference
/// examples; priority between tiers comes from [`Tier::KEYWORD_PRIORITY`]
/// and [`Tier::FALLBACK_ORDER`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Local inference engine: utilities, scripts, formatting.
    #[strum(to_string = "local")]
    Local,
    /// Cloud production-grade model: APIs, databases, enterprise work.
    #[strum(to_string = "production", serialize = "azure")]
    #[serde(alias = "azure")]
    Production,
    /// Cloud high-reasoning model: architecture, security, complex analysis.
    #[strum(to_string = "reasoning", serialize = "claude")]
    #[serde(alias = "claude")]
    Reasoning,
}

impl Tier {
    /// Order in which keyword tables are consulted (first match wins).
    pub const KEYWORD_PRIORITY: [Tier; 3] = [Tier::Reasoning, Tier::Production, Tier::Local];

    /// Static substitution order applied when a decided tier has no backend.
    /// Local is last and must always be configured.
    pub const FALLBACK_ORDER: [Tier; 3] = [Tier::Reasoning, Tier::Production, Tier::Local];

    /// All tiers in declaration order.
    pub fn all() -> impl Iterator<Item = Tier> {
        Tier::iter()
    }

    /// The tiers to try, in order, when this tier is wanted: the tier itself
    /// followed by every tier after it in [`Tier::FALLBACK_ORDER`].
    pub fn fallback_chain(self) -> &'static [Tier] {
        let pos = Self::FALLBACK_ORDER
            .iter()
            .position(|t| *t == self)
            .unwrap_or(Self::FALLBACK_ORDER.len() - 1);
        &Self::FALLBACK_ORDER[pos..]
    }
}

/// Which decision path the router takes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Embedding similarity against reference examples, keyword fallback.
    #[default]
    Semantic,
    /// Deterministic keyword matching only.
    Keyword,
    /// Always the configured default tier.
    Manual,
}

/// A single chat message passed to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// The task text routed for a conversation: the content of the last `user`
/// message, or an empty string when there is none.
pub fn task_from_messages(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

/// Sampling parameters forwarded to whichever backend serves a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub do_sample: bool,
    pub repetition_penalty: f32,
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            do_sample: true,
            repetition_penalty: 1.1,
            stop_sequences: Vec::new(),
        }
    }
}

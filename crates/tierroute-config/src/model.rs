// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the TierRoute dispatch engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tierroute_core::{OperatingMode, Tier};

/// Top-level TierRoute configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierRouteConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Router decision settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Built-in embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Routing history settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Router configuration: operating mode, default tier, reference examples,
/// acceptance thresholds and keyword tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Decision path: `semantic` (default), `keyword` or `manual`.
    #[serde(default)]
    pub mode: OperatingMode,

    /// Tier used by manual mode and when no keyword matches.
    #[serde(default = "default_tier")]
    pub default_tier: Tier,

    /// Path to a JSON file mapping tier name to a list of example tasks.
    /// `None` uses the built-in reference examples.
    #[serde(default)]
    pub examples_path: Option<String>,

    /// Per-tier similarity thresholds for accepting a semantic match.
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Optional replacements for the built-in keyword tables.
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::default(),
            default_tier: default_tier(),
            examples_path: None,
            thresholds: ThresholdConfig::default(),
            keywords: KeywordConfig::default(),
        }
    }
}

fn default_tier() -> Tier {
    Tier::Local
}

/// Minimum cosine similarity for a semantic match on each tier (0.0-1.0).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    #[serde(default = "default_local_threshold")]
    pub local: f64,

    #[serde(default = "default_remote_threshold")]
    pub production: f64,

    #[serde(default = "default_remote_threshold")]
    pub reasoning: f64,
}

impl ThresholdConfig {
    /// The threshold configured for `tier`.
    pub fn for_tier(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Local => self.local,
            Tier::Production => self.production,
            Tier::Reasoning => self.reasoning,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            local: default_local_threshold(),
            production: default_remote_threshold(),
            reasoning: default_remote_threshold(),
        }
    }
}

fn default_local_threshold() -> f64 {
    0.75
}

fn default_remote_threshold() -> f64 {
    0.70
}

/// Keyword table overrides. A tier left unset keeps its built-in keywords.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordConfig {
    #[serde(default)]
    pub local: Option<Vec<String>>,

    #[serde(default)]
    pub production: Option<Vec<String>>,

    #[serde(default)]
    pub reasoning: Option<Vec<String>>,
}

impl KeywordConfig {
    /// The override configured for `tier`, if any.
    pub fn for_tier(&self, tier: Tier) -> Option<&[String]> {
        match tier {
            Tier::Local => self.local.as_deref(),
            Tier::Production => self.production.as_deref(),
            Tier::Reasoning => self.reasoning.as_deref(),
        }
    }
}

/// Built-in hashing embedding provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Vector width of the feature-hashing embedder.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
        }
    }
}

fn default_dimensions() -> usize {
    512
}

/// Routing history configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of retained routing entries (oldest evicted first).
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    1000
}

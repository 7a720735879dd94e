// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as threshold ranges, positive sizes and known log levels.

use tierroute_core::Tier;

use crate::diagnostic::ConfigError;
use crate::model::TierRouteConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TierRouteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for tier in Tier::all() {
        let value = config.router.thresholds.for_tier(tier);
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("router.thresholds.{tier} must be within 0.0-1.0, got {value}"),
            });
        }
    }

    for tier in Tier::all() {
        if let Some(keywords) = config.router.keywords.for_tier(tier) {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                errors.push(ConfigError::Validation {
                    message: format!("router.keywords.{tier} must not contain empty keywords"),
                });
            }
        }
    }

    if let Some(path) = &config.router.examples_path {
        if path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "router.examples_path must not be empty when set".to_string(),
            });
        }
    }

    if config.embedding.dimensions == 0 {
        errors.push(ConfigError::Validation {
            message: "embedding.dimensions must be greater than 0".to_string(),
        });
    }

    if config.history.capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "history.capacity must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

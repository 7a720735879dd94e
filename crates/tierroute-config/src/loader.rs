// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tierroute.toml` > `~/.config/tierroute/tierroute.toml`
//! > `/etc/tierroute/tierroute.toml` with environment variable overrides via
//! the `TIERROUTE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TierRouteConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tierroute/tierroute.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tierroute.toml";

/// The per-user configuration file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tierroute").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tierroute/tierroute.toml` (system-wide)
/// 3. `~/.config/tierroute/tierroute.toml` (user XDG config)
/// 4. `./tierroute.toml` (local directory)
/// 5. `TIERROUTE_*` environment variables
pub fn load_config() -> Result<TierRouteConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TierRouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TierRouteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TierRouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TierRouteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TierRouteConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `TIERROUTE_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TIERROUTE_ROUTER_DEFAULT_TIER` must become
/// `router.default_tier`, not `router.default.tier`. Keys reach the closure
/// upper-cased, so they are lowered before mapping.
fn env_provider() -> Env {
    Env::prefixed("TIERROUTE_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("log_", "log.", 1)
            .replacen("router_", "router.", 1)
            .replacen("router.thresholds_", "router.thresholds.", 1)
            .replacen("router.keywords_", "router.keywords.", 1)
            .replacen("embedding_", "embedding.", 1)
            .replacen("history_", "history.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use tierroute_core::{OperatingMode, Tier};

    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("tierroute.toml", "[router]\nmode = \"keyword\"\n")?;
            jail.set_env("TIERROUTE_ROUTER_DEFAULT_TIER", "production");
            jail.set_env("TIERROUTE_ROUTER_THRESHOLDS_LOCAL", "0.9");
            jail.set_env("TIERROUTE_HISTORY_CAPACITY", "50");

            let config = load_config_from_path(Path::new("tierroute.toml"))?;
            assert_eq!(config.router.mode, OperatingMode::Keyword);
            assert_eq!(config.router.default_tier, Tier::Production);
            assert!((config.router.thresholds.local - 0.9).abs() < f64::EPSILON);
            assert_eq!(config.history.capacity, 50);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_log_level_and_keywords() {
        Jail::expect_with(|jail| {
            jail.set_env("TIERROUTE_LOG_LEVEL", "debug");
            jail.set_env("TIERROUTE_ROUTER_KEYWORDS_LOCAL", "[\"regex\", \"lint\"]");
            jail.set_env("TIERROUTE_EMBEDDING_DIMENSIONS", "128");

            let config = load_config_from_path(Path::new("absent.toml"))?;
            assert_eq!(config.log.level, "debug");
            assert_eq!(
                config.router.keywords.local,
                Some(vec!["regex".to_string(), "lint".to_string()])
            );
            assert_eq!(config.router.keywords.production, None);
            assert_eq!(config.embedding.dimensions, 128);
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = load_config_from_path(Path::new("does-not-exist.toml"))?;
            assert_eq!(config.router.mode, OperatingMode::Semantic);
            assert_eq!(config.history.capacity, 1000);
            Ok(())
        });
    }
}

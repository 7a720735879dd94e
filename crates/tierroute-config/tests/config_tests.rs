// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the TierRoute configuration system.

use std::io::Write;

use tierroute_config::diagnostic::ConfigError;
use tierroute_config::model::TierRouteConfig;
use tierroute_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use tierroute_core::{OperatingMode, Tier};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[log]
level = "debug"

[router]
mode = "keyword"
default_tier = "production"
examples_path = "/srv/tierroute/examples.json"

[router.thresholds]
local = 0.8
production = 0.65
reasoning = 0.6

[router.keywords]
local = ["regex", "csv"]

[embedding]
dimensions = 256

[history]
capacity = 25
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.router.mode, OperatingMode::Keyword);
    assert_eq!(config.router.default_tier, Tier::Production);
    assert_eq!(
        config.router.examples_path.as_deref(),
        Some("/srv/tierroute/examples.json")
    );
    assert!((config.router.thresholds.local - 0.8).abs() < f64::EPSILON);
    assert!((config.router.thresholds.for_tier(Tier::Reasoning) - 0.6).abs() < f64::EPSILON);
    assert_eq!(
        config.router.keywords.for_tier(Tier::Local),
        Some(&["regex".to_string(), "csv".to_string()][..])
    );
    assert!(config.router.keywords.for_tier(Tier::Production).is_none());
    assert_eq!(config.embedding.dimensions, 256);
    assert_eq!(config.history.capacity, 25);
}

/// Legacy backend names are accepted as tier aliases.
#[test]
fn tier_aliases_are_accepted() {
    let config = load_config_from_str("[router]\ndefault_tier = \"azure\"\n").unwrap();
    assert_eq!(config.router.default_tier, Tier::Production);

    let config = load_config_from_str("[router]\ndefault_tier = \"claude\"\n").unwrap();
    assert_eq!(config.router.default_tier, Tier::Reasoning);
}

/// Empty TOML yields the documented defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.log.level, "info");
    assert_eq!(config.router.mode, OperatingMode::Semantic);
    assert_eq!(config.router.default_tier, Tier::Local);
    assert!(config.router.examples_path.is_none());
    assert!((config.router.thresholds.local - 0.75).abs() < f64::EPSILON);
    assert!((config.router.thresholds.production - 0.70).abs() < f64::EPSILON);
    assert!((config.router.thresholds.reasoning - 0.70).abs() < f64::EPSILON);
    assert_eq!(config.embedding.dimensions, 512);
    assert_eq!(config.history.capacity, 1000);
}

/// Dotted keys merged last override the TOML layer, as env vars do.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: TierRouteConfig = Figment::new()
        .merge(Serialized::defaults(TierRouteConfig::default()))
        .merge(Toml::string("[router.thresholds]\nlocal = 0.8\n"))
        .merge(("router.thresholds.local", 0.9))
        .extract()
        .expect("should merge override");

    assert!((config.router.thresholds.local - 0.9).abs() < f64::EPSILON);
}

#[test]
fn unknown_top_level_section_rejected() {
    let err = load_config_from_str("[routing]\nmode = \"keyword\"\n").expect_err("should reject");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("routing"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A typo in a nested table is reported with a suggestion and the valid keys.
#[test]
fn unknown_threshold_key_suggests_correction() {
    let toml = r#"
[router.thresholds]
producton = 0.5
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "producton"
                && suggestion.as_deref() == Some("production")
                && valid_keys.contains("reasoning")
        })
    });
    assert!(found, "expected UnknownKey for `producton`, got: {errors:?}");
}

/// An unknown tier name is reported as an unknown value.
#[test]
fn unknown_tier_value_is_diagnosed() {
    let errors = load_and_validate_str("[router]\ndefault_tier = \"reasonin\"\n")
        .expect_err("should reject unknown tier");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownValue { value, suggestion, .. } if {
            value == "reasonin" && suggestion.as_deref() == Some("reasoning")
        })
    });
    assert!(found, "expected UnknownValue for `reasonin`, got: {errors:?}");
}

#[test]
fn wrong_value_type_is_diagnosed() {
    let errors = load_and_validate_str("[history]\ncapacity = \"lots\"\n")
        .expect_err("should reject string capacity");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected InvalidType, got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse and reports every problem.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[router.thresholds]
local = 1.2

[history]
capacity = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let errors = load_and_validate_str("[router]\nmdoe = \"manual\"\n").unwrap_err();
    let diagnostic: &dyn Diagnostic = &errors[0];
    assert_eq!(
        diagnostic.code().map(|c| c.to_string()).as_deref(),
        Some("tierroute::config::unknown_key")
    );

    let mut out = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut out, diagnostic)
        .expect("render should succeed");
    assert!(out.contains("mdoe"));
    assert!(out.contains("mode"));
}

#[test]
fn load_and_validate_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[router]\nmode = \"manual\"\ndefault_tier = \"reasoning\"").unwrap();

    let config = load_and_validate_path(file.path()).expect("file should load");
    assert_eq!(config.router.mode, OperatingMode::Manual);
    assert_eq!(config.router.default_tier, Tier::Reasoning);
}

/// Defaults serialized to TOML load back to an equivalent configuration.
#[test]
fn defaults_survive_toml_serialization() {
    let text = toml::to_string(&TierRouteConfig::default()).expect("defaults serialize");
    let config = load_and_validate_str(&text).expect("serialized defaults are valid");
    assert_eq!(config.history.capacity, 1000);
    assert_eq!(config.router.mode, OperatingMode::Semantic);
}

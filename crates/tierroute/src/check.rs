// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tierroute check-config` command implementation.
//!
//! Configuration errors are rendered before any command runs, so reaching
//! this command means the configuration is valid; it prints the effective
//! settings as TOML.

use std::io::Write;

use tierroute_config::TierRouteConfig;
use tierroute_core::TierRouteError;

pub fn run_check_config(config: &TierRouteConfig, out: &mut dyn Write) -> Result<(), TierRouteError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| TierRouteError::Config(format!("cannot render configuration: {e}")))?;
    writeln!(out, "# configuration is valid\n{rendered}")
        .map_err(|e| TierRouteError::Internal(format!("failed to write output: {e}")))
}

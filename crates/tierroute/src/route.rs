// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tierroute route` and `tierroute stats` command implementations.

use std::io::Write;
use std::sync::Arc;

use tierroute_config::TierRouteConfig;
use tierroute_core::{OperatingMode, Tier, TierRouteError};
use tierroute_router::{HashingEmbedder, Router};
use tracing::debug;

/// Builds the router described by `config`, backed by the built-in
/// hashing embedder.
pub fn build_router(config: &TierRouteConfig) -> Router {
    let embedder = Arc::new(HashingEmbedder::new(config.embedding.dimensions));
    debug!(
        dimensions = config.embedding.dimensions,
        mode = %config.router.mode,
        "building router"
    );
    Router::from_config(&config.router, embedder)
}

fn io_error(e: std::io::Error) -> TierRouteError {
    TierRouteError::Internal(format!("failed to write output: {e}"))
}

fn json_error(e: serde_json::Error) -> TierRouteError {
    TierRouteError::Internal(format!("failed to encode output: {e}"))
}

/// Run the `tierroute route` command.
pub fn run_route(
    config: &TierRouteConfig,
    task: &str,
    mode: Option<OperatingMode>,
    default_tier: Option<Tier>,
    plain: bool,
    out: &mut dyn Write,
) -> Result<(), TierRouteError> {
    let mut router = build_router(config);
    if let Some(mode) = mode {
        router = router.with_mode(mode);
    }
    if let Some(tier) = default_tier {
        router = router.with_default_tier(tier);
    }

    let decision = router.route(task);
    if plain {
        writeln!(
            out,
            "{} ({:.3}, {}): {}",
            decision.target, decision.confidence, decision.mode, decision.reason
        )
        .map_err(io_error)?;
    } else {
        let json = serde_json::to_string_pretty(&decision).map_err(json_error)?;
        writeln!(out, "{json}").map_err(io_error)?;
    }
    Ok(())
}

/// Run the `tierroute stats` command.
pub fn run_stats(
    config: &TierRouteConfig,
    precompute: bool,
    out: &mut dyn Write,
) -> Result<(), TierRouteError> {
    let router = build_router(config);
    if precompute {
        router.precompute()?;
    }
    let json = serde_json::to_string_pretty(&router.stats()).map_err(json_error)?;
    writeln!(out, "{json}").map_err(io_error)
}

// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TierRoute - route coding tasks to the cheapest tier likely to succeed.
//!
//! This is the binary entry point: it loads configuration, installs the
//! tracing subscriber and runs one subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod route;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tierroute_config::{ConfigError, TierRouteConfig};
use tierroute_core::{OperatingMode, Tier};

/// TierRoute - route coding tasks to local, production or reasoning models.
#[derive(Parser, Debug)]
#[command(name = "tierroute", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the routing decision for a task.
    Route {
        /// Task description to route.
        task: String,
        /// Override the configured operating mode.
        #[arg(long)]
        mode: Option<OperatingMode>,
        /// Override the configured default tier.
        #[arg(long)]
        default_tier: Option<Tier>,
        /// Print a one-line summary instead of JSON.
        #[arg(long)]
        plain: bool,
    },
    /// Print router statistics for the configured reference examples.
    Stats {
        /// Compute example embeddings before reporting.
        #[arg(long)]
        precompute: bool,
    },
    /// Validate configuration and print the effective settings.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<TierRouteConfig, Vec<ConfigError>> {
    match path {
        Some(path) => tierroute_config::load_and_validate_path(path),
        None => tierroute_config::load_and_validate(),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            tierroute_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Some(Commands::Route {
            task,
            mode,
            default_tier,
            plain,
        }) => route::run_route(&config, &task, mode, default_tier, plain, &mut stdout),
        Some(Commands::Stats { precompute }) => {
            route::run_stats(&config, precompute, &mut stdout)
        }
        Some(Commands::CheckConfig) => check::run_check_config(&config, &mut stdout),
        None => {
            println!("tierroute: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("tierroute: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tierroute={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

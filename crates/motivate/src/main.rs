// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Motivate - periodically refreshed motivational images, online or offline.
//!
//! This is the binary entry point. It stands in for both display surfaces:
//! `fetch` is the interactive app, `widget` is the host-scheduled background
//! surface.

mod app;
mod cache;
mod categories;
mod feedback;
mod fetch;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use motivate_config::MotivateConfig;
use motivate_core::FeedbackKind;

/// Motivate - periodically refreshed motivational images.
#[derive(Parser, Debug)]
#[command(name = "motivate", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Acquire one image (remote first, offline cache as fallback).
    Fetch {
        /// Where to write the image bytes.
        #[arg(short, long, default_value = "motivation.img")]
        output: PathBuf,
    },
    /// List backend categories and mark the selected ones.
    Categories,
    /// Toggle one or more category ids in the persisted filter.
    Toggle {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Send like/dislike feedback for an image id.
    Feedback {
        image_id: i64,
        #[arg(value_parser = parse_feedback_kind)]
        kind: FeedbackKind,
    },
    /// Run the background surface timeline loop until interrupted.
    Widget {
        /// Write each resolved image to this path.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Produce a single timeline and exit.
        #[arg(long)]
        once: bool,
    },
    /// Inspect or fill the offline image cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Add local image files to the offline cache.
    Seed {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show cache size and recency.
    Stats,
    /// Remove every cached image.
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Validate the configuration and print a summary.
    Check,
}

fn parse_feedback_kind(raw: &str) -> Result<FeedbackKind, String> {
    raw.to_ascii_lowercase()
        .parse()
        .map_err(|_| format!("expected `like` or `dislike`, got `{raw}`"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => motivate_config::load_and_validate_path(path),
        None => motivate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            motivate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Fetch { output }) => fetch::run_fetch(&config, &output).await,
        Some(Commands::Categories) => categories::run_categories(&config).await,
        Some(Commands::Toggle { ids }) => categories::run_toggle(&config, &ids).await,
        Some(Commands::Feedback { image_id, kind }) => {
            feedback::run_feedback(&config, image_id, kind).await
        }
        Some(Commands::Widget { output, once }) => {
            fetch::run_widget(&config, output.as_deref(), once).await
        }
        Some(Commands::Cache { action }) => match action {
            CacheAction::Seed { files } => cache::run_seed(&config, &files).await,
            CacheAction::Stats => cache::run_stats(&config).await,
            CacheAction::Clear => cache::run_clear(&config).await,
        },
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => {
            print_config_summary(&config);
            Ok(())
        }
        None => {
            println!("motivate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config_summary(config: &MotivateConfig) {
    let backend = if config.backend.url.is_empty() {
        "<not set>"
    } else {
        config.backend.url.as_str()
    };
    let key = if config.backend.anon_key.is_some() {
        "set"
    } else {
        "<not set>"
    };
    println!("configuration OK");
    println!("  backend.url          {backend}");
    println!("  backend.anon_key     {key}");
    println!("  backend.bucket       {}", config.backend.bucket);
    println!("  storage.database     {}", config.storage.database_path);
    println!("  cache.capacity       {}", config.cache.capacity);
    println!("  preferences.debounce {}ms", config.preferences.debounce_ms);
    println!(
        "  timeline             every {}s, budget {}s",
        config.timeline.refresh_interval_secs, config.timeline.acquisition_budget_secs
    );
}

/// Initialise the tracing subscriber. `RUST_LOG` overrides `app.log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("motivate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

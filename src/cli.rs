//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use scmpoll::output::OutputMode;

/// scmpoll - Discover new revisions from pluggable SCM materials
#[derive(Parser, Debug)]
#[command(
    name = "scmpoll",
    version,
    about = "Discover new revisions from pluggable SCM materials",
    long_about = "Poll source control materials served by plugins.\n\n\
                  Each material names the plugin that implements it and the settings\n\
                  it is polled with. Revisions are reported as uniform modifications."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ~/.config/scmpoll/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the latest revision of a material
    Latest {
        /// Material name
        material: String,
    },

    /// Show every revision after a known one
    Since {
        /// Material name
        material: String,

        /// Last known revision id
        #[arg(short, long)]
        revision: String,

        /// Timestamp of the known revision (RFC 3339, default: epoch)
        #[arg(short, long)]
        timestamp: Option<String>,

        /// Plugin data recorded with the known revision (key=value, repeatable)
        #[arg(short, long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,
    },

    /// List registered plugins
    Plugins,

    /// Show version
    Version,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Latest { material }) => commands::latest(config, &material, output_mode),
        Some(Command::Since {
            material,
            revision,
            timestamp,
            data,
        }) => commands::since(
            config,
            &material,
            &revision,
            timestamp.as_deref(),
            data.into_iter().collect(),
            output_mode,
        ),
        Some(Command::Plugins) => commands::plugins(config, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("scmpoll v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("scmpoll v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'scmpoll --help' for usage");
            }
            Ok(())
        },
    }
}

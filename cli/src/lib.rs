//! `srenity` command-line front end.
//!
//! ## Exit Codes
//!
//! - 0: Analysis completed
//! - 1: Backend, transport or configuration error
//! - 130: Cancelled with Ctrl-C

pub mod analyze_cmd;
pub mod ask_cmd;
pub mod render_cmd;
pub mod report;

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use srenity_core::config::AppConfig;
use srenity_core::config::ConfigLoader;

pub use analyze_cmd::AnalyzeArgs;
pub use ask_cmd::AskArgs;
pub use render_cmd::RenderArgs;

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CANCELLED: i32 = 130;
}

/// Incident root-cause analysis from the terminal.
#[derive(Debug, Parser)]
#[command(name = "srenity", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Args)]
pub struct GlobalArgs {
    /// Config file (default: ./srenity.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log more (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream a full analysis and print the report
    Analyze(AnalyzeArgs),

    /// One-shot question against /api/analyze
    Ask(AskArgs),

    /// Print the report for a saved RCA result (no network)
    Render(RenderArgs),
}

impl Cli {
    pub async fn run(self) -> i32 {
        let result = match self.command {
            Command::Render(args) => render_cmd::run_render(args),
            Command::Analyze(args) => match load_config(&self.global) {
                Ok(config) => analyze_cmd::run_analyze(args, config).await,
                Err(e) => Err(e),
            },
            Command::Ask(args) => match load_config(&self.global) {
                Ok(config) => ask_cmd::run_ask(args, config).await,
                Err(e) => Err(e),
            },
        };

        result.unwrap_or_else(|e| {
            eprintln!("Error: {e:#}");
            exit_codes::FAILURE
        })
    }
}

/// Loads layered config and applies command-line overrides.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    let mut config = match &global.config {
        Some(path) => ConfigLoader::new().with_file(path).load()?,
        None => ConfigLoader::load_default()?,
    };
    if let Some(base_url) = &global.base_url {
        config.backend.base_url = base_url.clone();
        config.validate()?;
    }
    tracing::debug!(base_url = %config.backend.base_url, "configuration loaded");
    Ok(config)
}

/// Default log filter for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use srenity_core::normalize::canonical_sections;
use srenity_core::normalize::deep_dive_sections;
use srenity_protocol::RcaResult;

use crate::exit_codes;
use crate::report;

#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// JSON file holding an RCA result
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Skip the deep-dive sections
    #[arg(long)]
    pub no_deep_dive: bool,

    /// Print the normalized sections as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_render(args: RenderArgs) -> anyhow::Result<i32> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let rca: RcaResult = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an RCA result", args.file.display()))?;

    if args.json {
        let deep_dive = if args.no_deep_dive {
            Vec::new()
        } else {
            deep_dive_sections(&rca)
        };
        let out = serde_json::json!({
            "sections": canonical_sections(&rca),
            "deep_dive": deep_dive,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", report::format_rca(&rca, !args.no_deep_dive));
    }
    Ok(exit_codes::SUCCESS)
}

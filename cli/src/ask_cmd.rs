use clap::Parser;
use srenity_core::AnalysisTransport;
use srenity_core::HttpTransport;
use srenity_core::config::AppConfig;
use srenity_protocol::AnalyzeRequest;

use crate::exit_codes;

#[derive(Debug, Parser)]
pub struct AskArgs {
    #[arg(long, value_name = "ID")]
    pub alert_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub service_id: Option<String>,

    /// Output the raw response as JSON
    #[arg(long)]
    pub json: bool,

    pub query: String,
}

pub async fn run_ask(args: AskArgs, config: AppConfig) -> anyhow::Result<i32> {
    let transport = HttpTransport::new(&config.backend)?;
    let request = AnalyzeRequest::new(args.query)
        .with_alert_id(args.alert_id)
        .with_service_id(args.service_id);

    let response = transport.analyze(&request).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Status: {}", response.status);
        if let Some(text) = response.response.as_deref().or(response.message.as_deref()) {
            println!("{text}");
        }
    }
    Ok(exit_codes::SUCCESS)
}

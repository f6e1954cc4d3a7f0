use std::sync::Arc;

use clap::Parser;
use srenity_core::AnalysisError;
use srenity_core::HttpTransport;
use srenity_core::SessionOutcome;
use srenity_core::SessionState;
use srenity_core::StreamController;
use srenity_core::config::AppConfig;
use srenity_core::progress::timeline;
use srenity_protocol::AnalyzeRequest;

use crate::exit_codes;
use crate::report;

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Alert the analysis is about
    #[arg(long, value_name = "ID")]
    pub alert_id: Option<String>,

    /// Service the analysis is scoped to
    #[arg(long, value_name = "ID")]
    pub service_id: Option<String>,

    /// Print the final session state as JSON
    #[arg(long)]
    pub json: bool,

    /// Question for the analysis backend
    pub query: String,
}

impl AnalyzeArgs {
    fn request(&self) -> AnalyzeRequest {
        AnalyzeRequest::new(self.query.clone())
            .with_alert_id(self.alert_id.clone())
            .with_service_id(self.service_id.clone())
    }
}

/// Streams one session, echoing status lines until it ends or Ctrl-C.
pub async fn run_analyze(args: AnalyzeArgs, config: AppConfig) -> anyhow::Result<i32> {
    let transport = HttpTransport::new(&config.backend)?;
    let mut controller = StreamController::new(Arc::new(transport));
    let mut updates = controller.subscribe();
    let echo_status = config.display.show_status_log && !args.json;

    let outcome = controller.start(args.request()).wait();
    tokio::pin!(outcome);

    let mut printed = 0;
    let outcome = loop {
        tokio::select! {
            outcome = &mut outcome => break outcome,
            Ok(()) = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted; cancelling analysis");
                controller.cancel();
                break SessionOutcome::Cancelled;
            }
            Ok(()) = updates.changed() => {
                if echo_status {
                    printed = print_new_status(&updates.borrow_and_update(), printed);
                }
            }
        }
    };

    let state = controller.snapshot();
    if echo_status {
        print_new_status(&state, printed);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_summary(&state, config.display.deep_dive);
    }

    Ok(match outcome {
        SessionOutcome::Completed(reason) => {
            tracing::debug!(?reason, "analysis finished");
            exit_codes::SUCCESS
        }
        SessionOutcome::Failed(err) => {
            eprintln!("{}", failure_line(&err));
            exit_codes::FAILURE
        }
        SessionOutcome::Cancelled => {
            eprintln!("Analysis cancelled");
            exit_codes::CANCELLED
        }
    })
}

/// Tells connection trouble apart from a failure the backend reported.
fn failure_line(err: &AnalysisError) -> String {
    if err.is_transport() {
        format!("✗ Analysis failed (backend unreachable or misbehaving): {err}")
    } else {
        format!("✗ Analysis failed: {err}")
    }
}

fn print_new_status(state: &SessionState, already_printed: usize) -> usize {
    for status in state.status_messages.iter().skip(already_printed) {
        println!(
            "[{}] {}",
            status.received_at.format("%H:%M:%S"),
            status.message
        );
    }
    state.status_messages.len().max(already_printed)
}

fn print_summary(state: &SessionState, deep_dive: bool) {
    println!();
    print!("{}", report::format_timeline(&timeline(state)));

    if let Some(rca) = &state.rca {
        println!();
        print!("{}", report::format_rca(rca, deep_dive));
    }
    if !state.runbooks.is_empty() {
        println!("\n# Runbooks\n");
        print!("{}", report::format_runbooks(&state.runbooks));
    }
}

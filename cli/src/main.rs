use clap::Parser;
use srenity_cli::Cli;
use srenity_cli::log_filter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.global.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = cli.run().await;
    std::process::exit(code);
}

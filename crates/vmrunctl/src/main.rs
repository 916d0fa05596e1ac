use std::process::ExitCode;

use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    match Cli::from_env() {
        Ok(cli) => cli.run().await,
        Err(code) => Ok(code),
    }
}

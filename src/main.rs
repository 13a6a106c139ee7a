use anyhow::Result;
use clap::Parser;
use copyright_pages::cli::{run, Cli};

fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // stdout carries reports only
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");
    let result = run(cli);
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}

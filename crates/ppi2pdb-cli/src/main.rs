//! ppi2pdb - main entry point

use clap::Parser;
use ppi2pdb_cli::{commands, Cli};
use ppi2pdb_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("ppi2pdb")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The run should not depend on logging being available
    let _guard = init_logging(&log_config).ok().flatten();

    match commands::run::run(&cli).await {
        Ok(summary) => commands::run::report(&summary, &cli),
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}

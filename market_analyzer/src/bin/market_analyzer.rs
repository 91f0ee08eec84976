use std::process::ExitCode;

use clap::Parser;
use market_analyzer::{cli::Cli, logging::init_logging, pipeline};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // logging goes to the output dir, so config has to be resolved first
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.log_path()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    info!(
        "{} {} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    match pipeline::run(&config, cli.raw_input.as_deref()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("An error occurred during execution: {e:#}");
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

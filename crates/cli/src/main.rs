use clap::Parser;
use neo_cli::{init_tracing, load_config, run, CliArgs};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info", args.log_json);
            error!(target: "neo::cli", error = %format!("{err:#}"), "configuration failed");
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let level = args
        .verbose
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, args.log_json || config.logging.json);

    match run(&args, config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: "neo::cli", error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

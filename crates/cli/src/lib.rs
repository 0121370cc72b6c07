//! `neo-nef` command-line library: argument parsing, logging setup and the
//! `compile`, `inspect` and `verify` commands.

pub mod args;
pub mod commands;

pub use args::{CliArgs, Command, LogLevel};

use anyhow::Context;
use commands::compile::CompileOptions;
use neo_compiler::CompilerConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// command output.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},neo={level}")));
    let builder = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Loads the configuration `args` point at.
pub fn load_config(args: &CliArgs) -> anyhow::Result<CompilerConfig> {
    CompilerConfig::load_or_default(args.config.as_deref()).context("loading configuration")
}

/// Runs the selected subcommand.
pub fn run(args: &CliArgs, config: CompilerConfig) -> commands::CommandResult {
    match &args.command {
        Command::Compile {
            input,
            output,
            compiler,
            source,
        } => commands::compile::run(
            config,
            CompileOptions {
                input,
                output: output.as_deref(),
                compiler: compiler.as_deref(),
                source: source.as_deref(),
            },
        ),
        Command::Inspect { file, json } => commands::inspect::run(file, *json),
        Command::Verify { file, flags } => commands::verify::run(file, *flags),
    }
}

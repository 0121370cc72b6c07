use clap::{Parser, Subcommand, ValueEnum};
use neo_vm::CallFlags;
use std::path::PathBuf;

/// Command-line arguments for `neo-nef`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "neo-nef",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile, inspect and verify Neo N3 NEF modules"
)]
pub struct CliArgs {
    /// Compiler configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level; `RUST_LOG` takes precedence
    #[arg(long = "verbose", value_enum, global = true)]
    pub verbose: Option<LogLevel>,

    /// Emit logs as JSON lines
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compile a JSON contract source into a NEF file
    Compile {
        /// Contract source (JSON IR)
        input: PathBuf,

        /// Output path; defaults to the input with a `.nef` extension
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compiler name written to the NEF header
        #[arg(long = "compiler", value_name = "NAME")]
        compiler: Option<String>,

        /// Source URL written to the NEF header
        #[arg(long = "source", value_name = "URL")]
        source: Option<String>,
    },

    /// Print the header, checksum and token table of a NEF file
    Inspect {
        file: PathBuf,

        /// Print the RPC JSON form instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Resolve every method token against the native contracts
    Verify {
        file: PathBuf,

        /// Caller flags, e.g. `ALL`, `READ_ONLY`, `READ_STATES|ALLOW_CALL` or `0x05`
        #[arg(long = "flags", value_name = "FLAGS", default_value = "ALL", value_parser = parse_call_flags)]
        flags: CallFlags,
    },
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parses flag names joined by `|` or `,` (case-insensitive), or a number.
pub fn parse_call_flags(text: &str) -> Result<CallFlags, String> {
    let mut flags = CallFlags::NONE;
    for part in text.split(['|', ',']).map(str::trim) {
        if part.is_empty() {
            return Err(format!("empty flag in '{text}'"));
        }
        let parsed = match part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16).ok().and_then(CallFlags::from_byte),
            None if part.bytes().all(|b| b.is_ascii_digit()) => {
                part.parse::<u8>().ok().and_then(CallFlags::from_byte)
            }
            None => match part.to_ascii_uppercase().replace('-', "_").as_str() {
                "NONE" => Some(CallFlags::NONE),
                name => CallFlags::from_name(name),
            },
        };
        flags |= parsed.ok_or_else(|| format!("unknown call flag '{part}'"))?;
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parsing() {
        assert_eq!(parse_call_flags("ALL").unwrap(), CallFlags::ALL);
        assert_eq!(parse_call_flags("read_only").unwrap(), CallFlags::READ_ONLY);
        assert_eq!(
            parse_call_flags("READ_STATES|ALLOW_CALL").unwrap(),
            CallFlags::READ_ONLY
        );
        assert_eq!(parse_call_flags("0x0f").unwrap(), CallFlags::ALL);
        assert_eq!(parse_call_flags("1").unwrap(), CallFlags::READ_STATES);
        assert_eq!(parse_call_flags("NONE").unwrap(), CallFlags::NONE);
        assert!(parse_call_flags("16").is_err());
        assert!(parse_call_flags("WRITE").is_err());
        assert!(parse_call_flags("ALL|").is_err());
    }

    #[test]
    fn test_subcommand_parsing() {
        let args = CliArgs::try_parse_from(["neo-nef", "inspect", "a.nef", "--json"]).unwrap();
        assert_eq!(
            args.command,
            Command::Inspect {
                file: PathBuf::from("a.nef"),
                json: true
            }
        );
        assert!(!args.log_json);

        let args =
            CliArgs::try_parse_from(["neo-nef", "verify", "a.nef", "--verbose", "debug"]).unwrap();
        assert_eq!(args.verbose, Some(LogLevel::Debug));
        match args.command {
            Command::Verify { flags, .. } => assert_eq!(flags, CallFlags::ALL),
            other => panic!("unexpected {other:?}"),
        }

        let args = CliArgs::try_parse_from([
            "neo-nef", "compile", "src.json", "-o", "out.nef", "--compiler", "x",
        ])
        .unwrap();
        match args.command {
            Command::Compile {
                output, compiler, source, ..
            } => {
                assert_eq!(output, Some(PathBuf::from("out.nef")));
                assert_eq!(compiler.as_deref(), Some("x"));
                assert_eq!(source, None);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(CliArgs::try_parse_from(["neo-nef"]).is_err());
    }
}

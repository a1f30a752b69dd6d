#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `CUECARD_*` prefix;
//! explicit flags win over the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;

use cuecard_runtime::countdown::DEFAULT_TICK_RATE;
use cuecard_runtime::game::DEFAULT_READY_SECONDS;

/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-line usage, printed after argument errors.
pub const USAGE: &str = "Usage: cuecard [OPTIONS] CARDS_FILE";

/// Full `--help` output.
pub const HELP_TEXT: &str = "\
cuecard: timed flashcard prompts in the terminal

USAGE:
    cuecard [OPTIONS] CARDS_FILE

ARGS:
    CARDS_FILE           Card file, one `prompt ~ seconds` per line

OPTIONS:
    --tick-rate=N        Interrupt checks per second (default: 60)
    --ready-secs=N       Length of the \"Get ready...\" countdown (default: 4)
    --log-file=PATH      Write logs to PATH
    --help, -h           Show this help message
    --version, -V        Show version

CARD FILE:
    # lines starting with '#' are comments
    Explain a closure ~ 90
    Name three HTTP methods ~ 20

KEYS:
    Enter           Show the next card
    Ctrl+C          Stop the timer, or quit from the ready prompt

ENVIRONMENT VARIABLES:
    CUECARD_TICK_RATE      Override --tick-rate
    CUECARD_READY_SECS     Override --ready-secs
    CUECARD_LOG_FILE       Override --log-file
    CUECARD_LOG            Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Path of the card file.
    pub cards_file: PathBuf,
    /// Interrupt checks per second during a countdown.
    pub tick_rate: u32,
    /// Length of the warm-up countdown in seconds.
    pub ready_secs: u32,
    /// Log destination; logging is off when unset.
    pub log_file: Option<PathBuf>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play with these options.
    Run(Opts),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
}

/// Argument errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// No card file was given.
    MissingCardsFile,
    /// An option value did not parse or was out of range.
    InvalidValue {
        /// The option, e.g. `--tick-rate`.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A flag nobody knows.
    UnknownArgument(String),
    /// A second positional argument.
    UnexpectedArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCardsFile => f.write_str(
                "No card file specified. Run the program again specifying the cards file.",
            ),
            Self::InvalidValue { option, value } => write!(f, "Invalid {option} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            Self::UnexpectedArgument(arg) => write!(f, "Unexpected argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Settings gathered before the card file is known.
struct Partial {
    cards_file: Option<PathBuf>,
    tick_rate: u32,
    ready_secs: u32,
    log_file: Option<PathBuf>,
}

fn positive(value: &str) -> Option<u32> {
    value.trim().parse().ok().filter(|&n| n > 0)
}

fn non_negative(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, CliError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name) with `env` as the
    /// environment lookup.
    ///
    /// Invalid environment values are ignored; invalid flag values are
    /// errors.
    pub fn parse_from<I, S, F>(args: I, env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Partial {
            cards_file: None,
            tick_rate: DEFAULT_TICK_RATE,
            ready_secs: DEFAULT_READY_SECONDS,
            log_file: None,
        };

        // Apply environment variable defaults first
        if let Some(n) = env("CUECARD_TICK_RATE").as_deref().and_then(positive) {
            opts.tick_rate = n;
        }
        if let Some(n) = env("CUECARD_READY_SECS").as_deref().and_then(non_negative) {
            opts.ready_secs = n;
        }
        if let Some(path) = env("CUECARD_LOG_FILE").filter(|p| !p.is_empty()) {
            opts.log_file = Some(PathBuf::from(path));
        }

        // Parse command-line args (override env vars)
        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--tick-rate=") {
                        opts.tick_rate = positive(val).ok_or_else(|| CliError::InvalidValue {
                            option: "--tick-rate",
                            value: val.to_string(),
                        })?;
                    } else if let Some(val) = other.strip_prefix("--ready-secs=") {
                        opts.ready_secs =
                            non_negative(val).ok_or_else(|| CliError::InvalidValue {
                                option: "--ready-secs",
                                value: val.to_string(),
                            })?;
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        if val.is_empty() {
                            return Err(CliError::InvalidValue {
                                option: "--log-file",
                                value: String::new(),
                            });
                        }
                        opts.log_file = Some(PathBuf::from(val));
                    } else if other.starts_with('-') && other != "-" {
                        return Err(CliError::UnknownArgument(other.to_owned()));
                    } else if opts.cards_file.is_some() {
                        return Err(CliError::UnexpectedArgument(other.to_owned()));
                    } else {
                        opts.cards_file = Some(PathBuf::from(other));
                    }
                }
            }
        }

        let cards_file = opts.cards_file.ok_or(CliError::MissingCardsFile)?;
        Ok(Command::Run(Opts {
            cards_file,
            tick_rate: opts.tick_rate,
            ready_secs: opts.ready_secs,
            log_file: opts.log_file,
        }))
    }
}

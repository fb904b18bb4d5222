//! # Command-Line Interface
//!
//! Argument parsing and the top-level flow of one `sevenseg` invocation.
//!
//! ## Usage
//!
//! ```bash
//! # Show "-12" on the display at the default 9600 baud
//! sevenseg -- -12
//!
//! # Two tokens, 19200 baud, RTS/CTS, explicit device
//! sevenseg -b 19200 -c -s /dev/ttyUSB0 12 34
//!
//! # Print the bytes instead of sending them
//! sevenseg --dry-run 8A
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | sent (write timeouts are warnings only), or `-V` |
//! | 1 | usage error, bad baud rate, device open/configure failure |

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use tracing::warn;

use crate::config::{BaudRate, DEFAULT_DEVICE, FlowControl, SerialConfig, Verbosity};
use crate::display::{Dispatcher, SegmentTable};
use crate::error::SevenSegError;
use crate::transport::{ByteSink, DryRunSink};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// sevenseg - send characters to a 7-segment display controller
#[derive(Parser, Debug)]
#[command(name = "sevenseg")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Characters to display; every character of every token is sent
    #[arg(required = true, value_name = "TOKENS")]
    pub tokens: Vec<String>,

    /// Baud rate (2400, 9600 or 19200)
    #[arg(short = 'b', value_name = "RATE", default_value_t = 9600)]
    pub baud: u32,

    /// Serial device path
    #[arg(
        short = 's',
        value_name = "SERIALDEV",
        default_value = DEFAULT_DEVICE,
        allow_hyphen_values = true
    )]
    pub device: PathBuf,

    /// Use CTS/RTS hardware flow control
    #[arg(short = 'c')]
    pub cts_rts: bool,

    /// Increase debug output (repeatable)
    #[arg(short = 'd', action = ArgAction::Count)]
    pub debug: u8,

    /// Print each byte to stdout instead of opening the device
    #[arg(long)]
    pub dry_run: bool,

    /// Print version and exit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Print usage
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Cli {
    /// Line settings for this invocation. Fails on an unsupported baud rate.
    pub fn serial_config(&self) -> Result<SerialConfig, SevenSegError> {
        let baud = BaudRate::try_from(self.baud)?;
        let flow_control = if self.cts_rts {
            FlowControl::Hardware
        } else {
            FlowControl::None
        };

        Ok(SerialConfig::new(&self.device)
            .with_baud(baud)
            .with_flow_control(flow_control))
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::new(self.debug)
    }
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// `-V` anywhere on the command line
    Version,
    /// `-?`, or arguments that don't parse; `reason` is set for the latter
    Usage { reason: Option<String> },
    /// Send the tokens to the display
    Send(Cli),
}

/// Parse a full argument list (program name first).
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if requests_version(&args) {
        return Invocation::Version;
    }

    match Cli::try_parse_from(&args) {
        Ok(cli) if cli.version => Invocation::Version,
        Ok(cli) => Invocation::Send(cli),
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
            Invocation::Usage { reason: None }
        }
        Err(e) => Invocation::Usage {
            reason: e.to_string().lines().next().map(str::to_string),
        },
    }
}

/// Whether `-V`/`--version` appears before `--`, alone or in a short-flag
/// cluster such as `-dV`. Values of `-b` and `-s` are skipped.
fn requests_version(args: &[OsString]) -> bool {
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let Some(arg) = arg.to_str() else {
            continue;
        };

        if arg == "--" {
            return false;
        }
        if arg == "--version" {
            return true;
        }
        if arg.starts_with("--") {
            continue;
        }
        let Some(cluster) = arg.strip_prefix('-') else {
            continue;
        };

        for (i, flag) in cluster.char_indices() {
            match flag {
                'V' => return true,
                'b' | 's' => {
                    // Value is the next argument unless attached (`-b9600`)
                    if i + 1 == cluster.len() {
                        iter.next();
                    }
                    break;
                }
                _ => {}
            }
        }
    }

    false
}

pub fn version_line() -> String {
    format!("Version: {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Run one invocation.
///
/// Usage and version text go to `out`. `open` is only called for
/// [`Invocation::Send`] without `--dry-run`, after the baud rate has been
/// validated; the sink it returns is dropped (closing the device) before
/// this returns.
///
/// Returns the process exit code, or a fatal error.
pub fn execute<W, S, F>(invocation: Invocation, out: &mut W, open: F) -> Result<u8, SevenSegError>
where
    W: Write,
    S: ByteSink,
    F: FnOnce(&SerialConfig, Verbosity) -> Result<S, SevenSegError>,
{
    let cli = match invocation {
        Invocation::Version => {
            writeln!(out, "{}", version_line())?;
            return Ok(EXIT_OK);
        }
        Invocation::Usage { .. } => {
            write!(out, "{}", usage())?;
            return Ok(EXIT_FAILURE);
        }
        Invocation::Send(cli) => cli,
    };

    let config = cli.serial_config()?;
    let verbosity = cli.verbosity();
    let table = SegmentTable::new();
    let dispatcher = Dispatcher::new(&table, verbosity);

    let report = if cli.dry_run {
        dispatcher.dispatch(&mut DryRunSink::new(&mut *out), &cli.tokens)
    } else {
        let mut sink = open(&config, verbosity)?;
        dispatcher.dispatch(&mut sink, &cli.tokens)
    };

    if !report.is_complete() {
        warn!(
            "{} of {} characters were not sent",
            report.failed,
            report.sent + report.failed
        );
    }

    out.flush()?;
    Ok(EXIT_OK)
}

//! # sevenseg - 7-Segment Display Driver
//!
//! sevenseg sends characters to a 7-segment display controller attached to a
//! serial port. Each character is looked up in a fixed segment table and
//! written as a single byte. It provides:
//!
//! - **Transport**: raw-mode serial tty with bounded per-byte retry
//! - **Encoding**: ASCII → segment pattern table
//! - **Dispatch**: ordered, one-write-per-character sending
//!
//! ## Quick Start
//!
//! ```no_run
//! use sevenseg::{
//!     config::{BaudRate, SerialConfig, Verbosity},
//!     display::{Dispatcher, SegmentTable},
//!     transport::SerialPort,
//! };
//!
//! let config = SerialConfig::new("/dev/ttyUSB0").with_baud(BaudRate::B19200);
//! let mut port = SerialPort::open(&config, Verbosity::QUIET)?;
//!
//! let table = SegmentTable::new();
//! let report = Dispatcher::new(&table, Verbosity::QUIET).dispatch(&mut port, ["12", "34"]);
//! assert!(report.is_complete());
//!
//! port.close();
//! # Ok::<(), sevenseg::SevenSegError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | Serial and dry-run byte sinks, retry policy |
//! | [`display`] | Segment table and dispatcher |
//! | [`config`] | Line settings and verbosity |
//! | [`cli`] | Argument parsing and invocation flow |
//! | [`logging`] | tracing subscriber setup |
//! | [`error`] | Error types |

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod transport;

// Re-exports for convenience
pub use config::SerialConfig;
pub use error::SevenSegError;
pub use transport::SerialPort;

//! # Error Types
//!
//! This module defines error types used throughout the sevenseg library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sevenseg operations
#[derive(Debug, Error)]
pub enum SevenSegError {
    /// The serial device could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Setting terminal attributes failed after the device was opened
    #[error("Failed to configure serial port: {0}")]
    Configure(String),

    /// Unsupported baud rate
    #[error("Baud must be 2400, 9600 or 19200 - {0} supplied")]
    Baud(u32),

    /// Retry budget exhausted while writing a single byte
    #[error("Timed out writing 0x{value:02x} to serial port after {attempts} attempts")]
    WriteTimeout { value: u8, attempts: u32 },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SevenSegError {
    /// Whether the invocation must stop when this error occurs.
    ///
    /// A write timeout only loses one character; everything else leaves the
    /// process without a usable device.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SevenSegError::WriteTimeout { .. })
    }
}

//! # Display Transport Layer
//!
//! This module provides the backends that carry segment patterns to the
//! display controller, one byte at a time.
//!
//! ## Available Transports
//!
//! - [`serial`]: raw-mode serial tty (the real controller)
//! - [`dry_run`]: prints each byte as text instead of sending it
//!
//! ## Retry Semantics
//!
//! A byte write that fails (an error, or zero bytes written) is retried up to
//! [`RetryPolicy::max_attempts`] times in total, pausing
//! [`RetryPolicy::delay`] between attempts. There is no pause after the last
//! failed attempt. When the budget is spent the write returns
//! [`SevenSegError::WriteTimeout`].

pub mod dry_run;
pub mod serial;

use std::io::Write;
use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SevenSegError;

pub use dry_run::DryRunSink;
pub use serial::SerialPort;

/// Anything that can accept one segment pattern at a time.
pub trait ByteSink {
    /// Send exactly one byte.
    fn write_byte(&mut self, value: u8) -> Result<(), SevenSegError>;
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, value: u8) -> Result<(), SevenSegError> {
        (**self).write_byte(value)
    }
}

/// Bounded retry budget for single-byte writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl RetryPolicy {
    /// 10 attempts, one second apart.
    pub const DEFAULT: RetryPolicy = RetryPolicy {
        max_attempts: match NonZeroU32::new(10) {
            Some(n) => n,
            None => unreachable!(),
        },
        delay: Duration::from_micros(1_000_000),
    };

    pub const fn new(max_attempts: NonZeroU32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Write one byte to `writer`, retrying per `policy`.
///
/// `sleep` is called between failed attempts (`std::thread::sleep` in
/// production). Returns the number of attempts used on success.
pub fn write_with_retry<W, F>(
    writer: &mut W,
    value: u8,
    policy: &RetryPolicy,
    mut sleep: F,
) -> Result<u32, SevenSegError>
where
    W: Write + ?Sized,
    F: FnMut(Duration),
{
    let mut remaining = policy.max_attempts();

    loop {
        match writer.write(&[value]) {
            Ok(1) => return Ok(policy.max_attempts() - remaining + 1),
            Ok(written) => warn!("Serial wrote {} bytes for 0x{:02x}", written, value),
            Err(e) => warn!("Serial write of 0x{:02x} failed: {}", value, e),
        }

        remaining -= 1;
        if remaining == 0 {
            return Err(SevenSegError::WriteTimeout {
                value,
                attempts: policy.max_attempts(),
            });
        }

        debug!("Pausing {:?} before retry ({} left)", policy.delay, remaining);
        sleep(policy.delay);
    }
}

// ============================================================================
// TESTS
// ============================================================================

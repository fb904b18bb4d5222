//! # Character Dispatch
//!
//! Sends command-line tokens to the display, one serial write per character.
//!
//! Tokens go out in argument order, and the characters in each token go out
//! left to right. There is no buffering or batching. A byte whose write times
//! out is logged and skipped; the rest of the input is still sent.

use tracing::{debug, warn};

use crate::config::Verbosity;
use crate::display::SegmentTable;
use crate::error::SevenSegError;
use crate::transport::ByteSink;

/// Outcome of one [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Bytes the sink accepted
    pub sent: usize,
    /// Bytes dropped after a failed write
    pub failed: usize,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

pub struct Dispatcher<'a> {
    table: &'a SegmentTable,
    verbosity: Verbosity,
}

impl<'a> Dispatcher<'a> {
    pub fn new(table: &'a SegmentTable, verbosity: Verbosity) -> Self {
        Self { table, verbosity }
    }

    /// Look up and send every character of every token.
    pub fn dispatch<S, I, T>(&self, sink: &mut S, tokens: I) -> DispatchReport
    where
        S: ByteSink + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut report = DispatchReport::default();

        for token in tokens {
            for ch in token.as_ref().bytes() {
                let pattern = self.table.pattern(ch);
                if self.verbosity.shows_bytes() {
                    debug!("'{}' [{:02x}]", ch.escape_ascii(), pattern);
                }

                match sink.write_byte(pattern) {
                    Ok(()) => report.sent += 1,
                    Err(e) if !e.is_fatal() => {
                        warn!("{}", e);
                        report.failed += 1;
                    }
                    Err(e) => {
                        warn!("Dropping '{}': {}", ch.escape_ascii(), e);
                        report.failed += 1;
                    }
                }
            }
        }

        report
    }
}

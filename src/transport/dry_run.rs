//! # Dry-Run Transport
//!
//! Renders each byte as a text line instead of sending it to a device, for
//! checking what a command line would put on the wire without a controller
//! attached.
//!
//! ```text
//! Comm 0x3f(63)
//! Comm 0x06(6)
//! ```

use std::io::Write;

use crate::error::SevenSegError;
use crate::transport::ByteSink;

pub struct DryRunSink<W: Write> {
    out: W,
}

impl<W: Write> DryRunSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ByteSink for DryRunSink<W> {
    fn write_byte(&mut self, value: u8) -> Result<(), SevenSegError> {
        writeln!(self.out, "Comm 0x{:02x}({})", value, value)?;
        Ok(())
    }
}

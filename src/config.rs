//! # Serial Line Configuration
//!
//! This module defines the line parameters used to open the display
//! controller's serial device.
//!
//! ## Defaults
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | Device | [`DEFAULT_DEVICE`] |
//! | Baud | 9600 |
//! | Data bits | 8 |
//! | Parity | none |
//! | Stop bits | 1 |
//! | Flow control | none |
//!
//! ## Usage
//!
//! ```
//! use sevenseg::config::{BaudRate, FlowControl, SerialConfig};
//!
//! let config = SerialConfig::new("/dev/ttyUSB0")
//!     .with_baud(BaudRate::try_from(19200)?)
//!     .with_flow_control(FlowControl::Hardware);
//!
//! assert_eq!(config.baud().as_u32(), 19200);
//! # Ok::<(), sevenseg::SevenSegError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SevenSegError;

/// Default serial device for the display controller
#[cfg(target_os = "macos")]
pub const DEFAULT_DEVICE: &str = "/dev/cu.usbserial";

/// Default serial device for the display controller
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_DEVICE: &str = "/dev/ttyAM0";

/// Baud rates the display controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaudRate {
    B2400,
    #[default]
    B9600,
    B19200,
}

impl BaudRate {
    /// All supported rates, slowest first.
    pub const ALL: [BaudRate; 3] = [BaudRate::B2400, BaudRate::B9600, BaudRate::B19200];

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B2400 => 2400,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = SevenSegError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        BaudRate::ALL
            .into_iter()
            .find(|rate| rate.as_u32() == value)
            .ok_or(SevenSegError::Baud(value))
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Character size (`CS5`..`CS8`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowControl {
    #[default]
    None,
    /// RTS/CTS handshaking
    Hardware,
}

/// # Serial Configuration
///
/// Line parameters for one invocation. Values are fixed once built; the
/// `with_*` methods consume the config and return an updated copy, so nothing
/// can change after it has been handed to
/// [`SerialPort::open`](crate::transport::SerialPort::open).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    device: PathBuf,
    baud: BaudRate,
    data_bits: DataBits,
    parity: Parity,
    stop_bits: StopBits,
    flow_control: FlowControl,
}

impl SerialConfig {
    /// Config for `device` with the default line settings (9600 8N1, no flow control).
    pub fn new<P: AsRef<Path>>(device: P) -> Self {
        Self {
            device: device.as_ref().to_path_buf(),
            baud: BaudRate::default(),
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
        }
    }

    pub fn with_baud(mut self, baud: BaudRate) -> Self {
        self.baud = baud;
        self
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn baud(&self) -> BaudRate {
        self.baud
    }

    pub fn data_bits(&self) -> DataBits {
        self.data_bits
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    pub fn flow_control(&self) -> FlowControl {
        self.flow_control
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

/// Debug verbosity, one level per `-d` on the command line.
///
/// Passed explicitly to the components that log, instead of living in a
/// process-wide variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);

    pub fn new(level: u8) -> Self {
        Self(level)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Per-character and per-write detail (`-d`).
    pub fn shows_bytes(self) -> bool {
        self.0 >= 1
    }

    /// Port lifecycle detail (`-dd`).
    pub fn shows_port(self) -> bool {
        self.0 >= 2
    }
}

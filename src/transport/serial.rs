//! # Serial TTY Transport
//!
//! This module talks to the 7-segment display controller over a plain serial
//! line.
//!
//! ## TTY Configuration
//!
//! The device is opened read-write with `O_NOCTTY` (so it never becomes the
//! controlling terminal) and put into raw mode:
//!
//! - **Local flags**: cleared (no echo, no canonical line buffering, no signals)
//! - **Output flags**: cleared (no CR/LF translation)
//! - **Input flags**: `IGNPAR` only
//! - **Control flags**: `CLOCAL | CREAD`, character size, parity, stop bits,
//!   and `CRTSCTS` when hardware flow control is requested
//! - **VMIN / VTIME**: both 0, so reads never block (the read side is unused)
//!
//! Pending input is flushed before the baud rate is applied with
//! `cfsetspeed`, and the whole set is committed with `tcsetattr(TCSANOW)`.
//!
//! ## Lifetime
//!
//! A [`SerialPort`] owns its file descriptor. It is released by
//! [`SerialPort::close`] or when the port is dropped, which also covers a
//! configuration failure inside [`SerialPort::open`].

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread;

use tracing::{debug, trace};

use crate::config::{SerialConfig, Verbosity};
use crate::error::SevenSegError;
use crate::transport::{ByteSink, RetryPolicy, write_with_retry};

/// # Serial Display Port
///
/// An open, configured serial device.
///
/// ## Example
///
/// ```no_run
/// use sevenseg::config::{SerialConfig, Verbosity};
/// use sevenseg::transport::{ByteSink, SerialPort};
///
/// let config = SerialConfig::new("/dev/ttyUSB0");
/// let mut port = SerialPort::open(&config, Verbosity::QUIET)?;
///
/// // '8' with every segment lit
/// port.write_byte(0x7F)?;
///
/// port.close();
/// # Ok::<(), sevenseg::SevenSegError>(())
/// ```
#[derive(Debug)]
pub struct SerialPort {
    file: File,
    policy: RetryPolicy,
    verbosity: Verbosity,
}

impl SerialPort {
    /// Open and configure the device named in `config`.
    ///
    /// ## Errors
    ///
    /// - [`SevenSegError::Open`] if the device can't be opened (missing,
    ///   permission denied, ...)
    /// - [`SevenSegError::Configure`] if the terminal attributes can't be
    ///   read or applied; the device is closed again before returning
    pub fn open(config: &SerialConfig, verbosity: Verbosity) -> Result<Self, SevenSegError> {
        let path = config.device();
        let file = open_device(path)?;

        // `file` is dropped (closed) if this fails
        configure_tty(&file, config)?;

        if verbosity.shows_port() {
            trace!(
                "Serial port {} open at {} baud",
                path.display(),
                config.baud()
            );
        }

        Ok(Self {
            file,
            policy: RetryPolicy::DEFAULT,
            verbosity,
        })
    }

    /// Close the device.
    ///
    /// Consumes the port, so no write can follow.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        if self.verbosity.shows_port() {
            trace!("Closing serial port");
        }
    }
}

impl ByteSink for SerialPort {
    fn write_byte(&mut self, value: u8) -> Result<(), SevenSegError> {
        if self.verbosity.shows_bytes() {
            debug!("[{:02x}]>>", value);
        }
        write_with_retry(&mut self.file, value, &self.policy, thread::sleep).map(|_| ())
    }
}

fn open_device(path: &Path) -> Result<File, SevenSegError> {
    let mut options = OpenOptions::new();
    options.read(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOCTTY);
    }

    options.open(path).map_err(|source| SevenSegError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Control flags for `config`: receiver on, modem lines ignored, then
/// character size, parity, stop bits and flow control.
#[cfg(unix)]
fn control_flags(config: &SerialConfig) -> libc::tcflag_t {
    use crate::config::{DataBits, FlowControl, Parity, StopBits};

    let mut cflag = libc::CLOCAL | libc::CREAD;

    cflag |= match config.data_bits() {
        DataBits::Five => libc::CS5,
        DataBits::Six => libc::CS6,
        DataBits::Seven => libc::CS7,
        DataBits::Eight => libc::CS8,
    };

    cflag |= match config.parity() {
        Parity::None => 0,
        Parity::Even => libc::PARENB,
        Parity::Odd => libc::PARENB | libc::PARODD,
    };

    if config.stop_bits() == StopBits::Two {
        cflag |= libc::CSTOPB;
    }

    if config.flow_control() == FlowControl::Hardware {
        cflag |= libc::CRTSCTS;
    }

    cflag
}

#[cfg(unix)]
fn speed(config: &SerialConfig) -> libc::speed_t {
    use crate::config::BaudRate;

    match config.baud() {
        BaudRate::B2400 => libc::B2400,
        BaudRate::B9600 => libc::B9600,
        BaudRate::B19200 => libc::B19200,
    }
}

/// Put the tty behind `file` into raw mode with the line settings in `config`.
#[cfg(unix)]
fn configure_tty(file: &File, config: &SerialConfig) -> Result<(), SevenSegError> {
    use std::io;
    use std::mem::MaybeUninit;
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(SevenSegError::Configure(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios: libc::termios = unsafe { termios.assume_init() };

    termios.c_cflag = control_flags(config);
    termios.c_iflag = libc::IGNPAR;
    termios.c_oflag = 0;
    termios.c_lflag = 0;
    termios.c_cc[libc::VTIME] = 0;
    termios.c_cc[libc::VMIN] = 0;

    // Discard anything the controller sent before we got here
    if unsafe { libc::tcflush(fd, libc::TCIFLUSH) } != 0 {
        return Err(SevenSegError::Configure(format!(
            "tcflush failed: {}",
            io::Error::last_os_error()
        )));
    }

    if unsafe { libc::cfsetspeed(&mut termios, speed(config)) } != 0 {
        return Err(SevenSegError::Configure(format!(
            "cfsetspeed({}) failed: {}",
            config.baud(),
            io::Error::last_os_error()
        )));
    }

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(SevenSegError::Configure(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty(_file: &File, _config: &SerialConfig) -> Result<(), SevenSegError> {
    Err(SevenSegError::Configure(
        "serial configuration is only supported on Unix".to_string(),
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device_fails_with_open_error() {
        let config = SerialConfig::new("/dev/sevenseg-does-not-exist");
        let err = SerialPort::open(&config, Verbosity::QUIET).unwrap_err();

        match err {
            SevenSegError::Open { path, source } => {
                assert_eq!(path, Path::new("/dev/sevenseg-does-not-exist"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_open_regular_file_fails_with_configure_error() {
        // A plain file opens fine but is not a tty, so tcgetattr fails
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = SerialConfig::new(file.path());

        let err = SerialPort::open(&config, Verbosity::new(2)).unwrap_err();
        assert!(matches!(err, SevenSegError::Configure(_)));
        assert!(err.to_string().contains("tcgetattr"));
    }

    #[cfg(unix)]
    #[test]
    fn test_control_flags_default_is_8n1() {
        let cflag = control_flags(&SerialConfig::default());

        assert_eq!(cflag & libc::CSIZE, libc::CS8);
        assert_eq!(cflag & libc::PARENB, 0);
        assert_eq!(cflag & libc::CSTOPB, 0);
        assert_eq!(cflag & libc::CRTSCTS, 0);
        assert_ne!(cflag & libc::CLOCAL, 0);
        assert_ne!(cflag & libc::CREAD, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_control_flags_options() {
        use crate::config::{DataBits, FlowControl, Parity, StopBits};

        let config = SerialConfig::default()
            .with_data_bits(DataBits::Seven)
            .with_parity(Parity::Odd)
            .with_stop_bits(StopBits::Two)
            .with_flow_control(FlowControl::Hardware);
        let cflag = control_flags(&config);

        assert_eq!(cflag & libc::CSIZE, libc::CS7);
        assert_ne!(cflag & libc::PARENB, 0);
        assert_ne!(cflag & libc::PARODD, 0);
        assert_ne!(cflag & libc::CSTOPB, 0);
        assert_ne!(cflag & libc::CRTSCTS, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_speed_mapping() {
        use crate::config::BaudRate;

        let at = |baud| speed(&SerialConfig::default().with_baud(baud));
        assert_eq!(at(BaudRate::B2400), libc::B2400);
        assert_eq!(at(BaudRate::B9600), libc::B9600);
        assert_eq!(at(BaudRate::B19200), libc::B19200);
    }

    // ========== Pseudo-terminal Tests ==========

    #[cfg(unix)]
    mod pty {
        use super::*;
        use std::ffi::CStr;
        use std::io::Read;
        use std::mem::MaybeUninit;
        use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
        use std::path::PathBuf;

        use crate::config::{BaudRate, FlowControl};

        /// A pty pair: the master end plays the display controller, the
        /// slave end is the "serial device" under test.
        struct Pty {
            master: File,
            slave: File,
            slave_path: PathBuf,
        }

        fn open_pty() -> Pty {
            let mut master: libc::c_int = -1;
            let mut slave: libc::c_int = -1;
            let result = unsafe {
                libc::openpty(
                    &mut master,
                    &mut slave,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                )
            };
            assert_eq!(result, 0, "openpty: {}", std::io::Error::last_os_error());

            let mut name = [0 as libc::c_char; 256];
            let result = unsafe { libc::ttyname_r(slave, name.as_mut_ptr(), name.len()) };
            assert_eq!(result, 0, "ttyname_r failed");
            let slave_path = PathBuf::from(
                unsafe { CStr::from_ptr(name.as_ptr()) }
                    .to_str()
                    .unwrap(),
            );

            Pty {
                master: unsafe { File::from_raw_fd(master) },
                slave: unsafe { File::from_raw_fd(slave) },
                slave_path,
            }
        }

        fn fstat(fd: RawFd) -> Option<libc::stat> {
            let mut stat = MaybeUninit::uninit();
            if unsafe { libc::fstat(fd, stat.as_mut_ptr()) } != 0 {
                return None;
            }
            Some(unsafe { stat.assume_init() })
        }

        /// Number of this process's descriptors whose stat matches `pred`.
        ///
        /// Matches on the file identity rather than a raw descriptor count, so
        /// descriptors opened by tests running in parallel don't interfere.
        fn open_fds_matching(pred: impl Fn(&libc::stat) -> bool) -> usize {
            std::fs::read_dir("/dev/fd")
                .unwrap()
                .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse::<RawFd>().ok())
                .filter_map(fstat)
                .filter(|stat| pred(stat))
                .count()
        }

        fn fds_on_device(rdev: libc::dev_t) -> usize {
            open_fds_matching(|stat| stat.st_rdev == rdev)
        }

        fn tty_settings(file: &File) -> libc::termios {
            let mut termios = MaybeUninit::uninit();
            let result = unsafe { libc::tcgetattr(file.as_raw_fd(), termios.as_mut_ptr()) };
            assert_eq!(result, 0, "tcgetattr: {}", std::io::Error::last_os_error());
            unsafe { termios.assume_init() }
        }

        #[test]
        fn test_open_applies_raw_mode_and_line_settings() {
            let pty = open_pty();
            let config = SerialConfig::new(&pty.slave_path)
                .with_baud(BaudRate::B2400)
                .with_flow_control(FlowControl::Hardware);

            let port = SerialPort::open(&config, Verbosity::QUIET).unwrap();
            assert_eq!(port.policy, RetryPolicy::DEFAULT);

            // Attributes belong to the tty, so the test's own slave fd sees them
            let termios = tty_settings(&pty.slave);
            assert_eq!(termios.c_lflag, 0);
            assert_eq!(termios.c_oflag, 0);
            assert_eq!(termios.c_iflag, libc::IGNPAR);
            assert_eq!(termios.c_cc[libc::VMIN], 0);
            assert_eq!(termios.c_cc[libc::VTIME], 0);
            assert_eq!(termios.c_cflag & libc::CSIZE, libc::CS8);
            assert_ne!(termios.c_cflag & libc::CRTSCTS, 0);
            assert_eq!(unsafe { libc::cfgetospeed(&termios) }, libc::B2400);

            port.close();
        }

        #[test]
        fn test_written_bytes_reach_the_other_end() {
            let mut pty = open_pty();
            let config = SerialConfig::new(&pty.slave_path);

            let mut port = SerialPort::open(&config, Verbosity::new(2)).unwrap();
            port.write_byte(0x3F).unwrap();
            port.write_byte(0x06).unwrap();
            port.close();

            let mut received = [0u8; 2];
            pty.master.read_exact(&mut received).unwrap();
            assert_eq!(received, [0x3F, 0x06]);
        }

        #[test]
        fn test_close_and_drop_release_the_descriptor() {
            let pty = open_pty();
            let rdev = fstat(pty.slave.as_raw_fd()).unwrap().st_rdev;
            let config = SerialConfig::new(&pty.slave_path);
            let baseline = fds_on_device(rdev);

            let port = SerialPort::open(&config, Verbosity::QUIET).unwrap();
            assert_eq!(fds_on_device(rdev), baseline + 1);
            port.close();
            assert_eq!(fds_on_device(rdev), baseline);

            {
                let _port = SerialPort::open(&config, Verbosity::QUIET).unwrap();
                assert_eq!(fds_on_device(rdev), baseline + 1);
            }
            assert_eq!(fds_on_device(rdev), baseline);
        }

        #[test]
        fn test_configure_failure_releases_the_descriptor() {
            let file = tempfile::NamedTempFile::new().unwrap();
            let identity = fstat(file.as_file().as_raw_fd()).unwrap();
            let on_file =
                || open_fds_matching(|s| s.st_dev == identity.st_dev && s.st_ino == identity.st_ino);
            let baseline = on_file();

            let err = SerialPort::open(&SerialConfig::new(file.path()), Verbosity::QUIET)
                .unwrap_err();

            assert!(matches!(err, SevenSegError::Configure(_)));
            assert_eq!(on_file(), baseline);
        }
    }
}

//! # sevenseg CLI
//!
//! Send characters to a 7-segment display controller.
//!
//! ## Usage
//!
//! ```bash
//! sevenseg [-b 2400|9600|19200] [-s serialdev] [-c] [-d...] [-V] TOKENS...
//! ```

use std::io;
use std::process::ExitCode;

use sevenseg::{
    cli::{self, EXIT_FAILURE, Invocation},
    logging,
    transport::SerialPort,
};

fn main() -> ExitCode {
    let invocation = cli::parse_args(std::env::args_os());

    match &invocation {
        Invocation::Send(args) => logging::init(args.verbosity()),
        Invocation::Usage {
            reason: Some(reason),
        } => eprintln!("{}", reason),
        _ => {}
    }

    let mut stdout = io::stdout().lock();
    match cli::execute(invocation, &mut stdout, SerialPort::open) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

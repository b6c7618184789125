//! Echo helper driven by the integration tests
//!
//! Prints each argument on its own CRLF-terminated line. With no arguments
//! it copies stdin to stdout byte for byte, which also means it blocks on an
//! open stdin until EOF.

use std::env;
use std::io::{self, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.is_empty() {
        let stdin = io::stdin();
        io::copy(&mut stdin.lock(), &mut out)?;
    } else {
        for arg in &args {
            // Stdout performs no text-mode translation, so the platform
            // line terminator is spelled out.
            write!(out, "{}\r\n", arg)?;
        }
    }

    out.flush()
}

//! winproc: safe RAII wrappers around Windows process primitives
//!
//! Kernel handles, anonymous pipes, command-line escaping and process
//! creation with child standard-stream redirection, in move-only wrappers
//! that close what they own and nothing else.
//!
//! ```no_run
//! use winproc::{CommandLine, Pipe, Process, ProcessParameters, Stream, IO};
//!
//! # fn main() -> winproc::ProcessResult<()> {
//! let cmd_line = CommandLine::with_args("child.exe", ["--flag"]);
//!
//! let mut stdout_pipe = Pipe::new()?;
//! let mut io = IO::new();
//! io.std_out = Stream::pipe_write_end(&mut stdout_pipe)?;
//!
//! let process = Process::create(ProcessParameters::new(cmd_line).with_io(io))?;
//! // Drain before waiting, or a full pipe buffer deadlocks both sides.
//! let output = stdout_pipe.read_end().read()?;
//! process.wait()?;
//! # let _ = output;
//! # Ok(())
//! # }
//! ```

pub mod cmd_line;
pub mod core;
pub mod file;
pub mod pipe;
pub mod process;
pub mod windows;

// Re-export main types
pub use self::cmd_line::CommandLine;
pub use self::core::types::{ExitCode, ProcessError, ProcessId, ProcessResult};
pub use self::pipe::Pipe;
pub use self::process::{
    ConsoleMode, Process, ProcessAccess, ProcessParameters, ShellParameters, Stream, IO,
};
pub use self::windows::types::Handle;

//! Core module containing fundamental types for winproc

pub mod types;

// Re-export commonly used types for convenience
pub use types::{ExitCode, ProcessError, ProcessId, ProcessResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Platform verification at compile time
#[cfg(not(target_os = "windows"))]
compile_error!("winproc only supports the Windows platform");

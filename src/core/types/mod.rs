//! Core type definitions for winproc
//!
//! Contains the fundamental types shared throughout the crate, most notably
//! the error taxonomy every OS-call wrapper reports through.

mod error;

// Re-export all public types
pub use error::{ProcessError, ProcessResult};

// Common type aliases
pub type ProcessId = u32;
pub type ExitCode = u32;

//! Raw Windows API bindings
//!
//! Every unsafe FFI call lives behind a safe wrapper in one of these
//! modules, reporting failures through [`crate::core::types::ProcessError`].

pub mod kernel32;
pub mod shell32;

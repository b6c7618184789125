//! Utility helpers shared by the Windows API layer

pub mod errors;
pub mod strings;

pub use errors::format_message;
pub use strings::{from_wide, to_wide};

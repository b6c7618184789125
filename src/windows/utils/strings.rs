//! String conversion utilities for the Windows API

use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};

/// Convert a Rust string to a NUL-terminated Windows wide string (UTF-16)
pub fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Convert a Windows wide string (UTF-16) to a Rust string
///
/// Conversion stops at the first NUL if one is present.
pub fn from_wide(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    let os_string = OsString::from_wide(&wide[..len]);
    os_string.to_string_lossy().into_owned()
}

/// Convert a NUL-terminated wide string pointer to a Rust string
///
/// # Safety
/// The pointer must be valid and point to a NUL-terminated UTF-16 string.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }

    let mut len = 0;
    while *ptr.offset(len) != 0 {
        len += 1;
    }

    let slice = std::slice::from_raw_parts(ptr, len as usize);
    from_wide(slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wide() {
        let wide = to_wide("Hello");
        assert_eq!(wide, vec![72, 101, 108, 108, 111, 0]);

        let empty = to_wide("");
        assert_eq!(empty, vec![0]);
    }

    #[test]
    fn test_from_wide() {
        let wide = vec![72, 101, 108, 108, 111, 0];
        assert_eq!(from_wide(&wide), "Hello");

        let no_nul = vec![72, 101, 108, 108, 111];
        assert_eq!(from_wide(&no_nul), "Hello");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Unsafe pointer operations")]
    fn test_from_wide_ptr() {
        unsafe {
            assert_eq!(from_wide_ptr(std::ptr::null()), "");
        }

        let wide_str = vec![72u16, 101, 108, 108, 111, 0]; // "Hello\0"
        unsafe {
            assert_eq!(from_wide_ptr(wide_str.as_ptr()), "Hello");
        }
    }

    #[test]
    fn test_unicode_round_trip() {
        let unicode_str = "Hello 世界 🌍";
        let wide = to_wide(unicode_str);
        let back = from_wide(&wide);
        assert_eq!(back, unicode_str);
    }
}

//! Human-readable messages for Windows error codes

use std::ptr;
use winapi::shared::minwindef::{DWORD, HLOCAL};
use winapi::um::winbase::{
    FormatMessageW, LocalFree, FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM,
    FORMAT_MESSAGE_IGNORE_INSERTS,
};
use winapi::um::winnt::{LANG_NEUTRAL, LPWSTR, MAKELANGID, SUBLANG_DEFAULT};

use crate::windows::utils::strings::from_wide;

/// Look up the system message for a Windows error code
///
/// Pure function over the OS message table; trailing line terminators are
/// stripped from the localized text.
pub fn format_message(code: u32) -> String {
    let mut buffer: LPWSTR = ptr::null_mut();

    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_ALLOCATE_BUFFER
                | FORMAT_MESSAGE_FROM_SYSTEM
                | FORMAT_MESSAGE_IGNORE_INSERTS,
            ptr::null(),
            code,
            MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT) as DWORD,
            &mut buffer as *mut LPWSTR as LPWSTR,
            0,
            ptr::null_mut(),
        )
    };

    if len == 0 || buffer.is_null() {
        return format!("Unknown error code {}", code);
    }

    let message = {
        let slice = unsafe { std::slice::from_raw_parts(buffer, len as usize) };
        from_wide(slice)
    };
    unsafe {
        LocalFree(buffer as HLOCAL);
    }

    message
        .trim_end_matches(|c| c == '\r' || c == '\n')
        .to_string()
}

//! Shell32.dll bindings for command-line tokenization and shell-execute

use std::mem;
use std::os::raw::c_int;
use winapi::shared::minwindef::HLOCAL;
use winapi::um::shellapi::{CommandLineToArgvW, ShellExecuteExW, SHELLEXECUTEINFOW};
use winapi::um::winbase::LocalFree;
use winapi::um::winnt::HANDLE;

use crate::core::types::{ProcessError, ProcessResult};
use crate::windows::utils::strings;

/// Safe wrapper for CommandLineToArgvW
///
/// Tokenizes a command line with the OS quoting grammar. The returned vector
/// mirrors argv, argv[0] included.
pub fn command_line_to_argv(cmd_line: &str) -> ProcessResult<Vec<String>> {
    let wide = strings::to_wide(cmd_line);

    let mut argc: c_int = 0;
    let argv = unsafe { CommandLineToArgvW(wide.as_ptr(), &mut argc) };

    if argv.is_null() {
        return Err(ProcessError::system("CommandLineToArgvW"));
    }

    let mut tokens = Vec::with_capacity(argc as usize);
    for i in 0..argc {
        tokens.push(unsafe { strings::from_wide_ptr(*argv.offset(i as isize)) });
    }

    unsafe {
        LocalFree(argv as HLOCAL);
    }

    Ok(tokens)
}

/// Safe wrapper for ShellExecuteExW
///
/// Returns the spawned process handle; the mask must include
/// SEE_MASK_NOCLOSEPROCESS for the handle to be populated.
pub fn shell_execute(
    verb: &str,
    file: &str,
    parameters: &str,
    mask: u32,
    show: c_int,
) -> ProcessResult<HANDLE> {
    let verb = strings::to_wide(verb);
    let file = strings::to_wide(file);
    let parameters = (!parameters.is_empty()).then(|| strings::to_wide(parameters));

    let mut info: SHELLEXECUTEINFOW = unsafe { mem::zeroed() };
    info.cbSize = mem::size_of::<SHELLEXECUTEINFOW>() as u32;
    info.fMask = mask;
    info.lpVerb = verb.as_ptr();
    info.lpFile = file.as_ptr();
    if let Some(parameters) = &parameters {
        info.lpParameters = parameters.as_ptr();
    }
    info.nShow = show;

    let ret = unsafe { ShellExecuteExW(&mut info) };

    if ret == 0 {
        Err(ProcessError::system("ShellExecuteExW"))
    } else {
        Ok(info.hProcess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_tokenize_simple() {
        let tokens = command_line_to_argv(r#"test.exe "abc" d e"#).unwrap();
        assert_eq!(tokens, vec!["test.exe", "abc", "d", "e"]);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_tokenize_preserves_quoted_spaces() {
        let tokens = command_line_to_argv(r#"a.exe "one two" three"#).unwrap();
        assert_eq!(tokens, vec!["a.exe", "one two", "three"]);
    }
}

//! CreateProcessW and ShellExecuteExW plumbing

use std::mem;
use std::os::raw::c_int;
use tracing::debug;
use winapi::shared::minwindef::{DWORD, MAX_PATH};
use winapi::shared::winerror::ERROR_INSUFFICIENT_BUFFER;
use winapi::um::processthreadsapi::STARTUPINFOW;
use winapi::um::shellapi::{SEE_MASK_FLAG_NO_UI, SEE_MASK_NOCLOSEPROCESS, SEE_MASK_NO_CONSOLE};
use winapi::um::winbase::{
    CREATE_UNICODE_ENVIRONMENT, STARTF_USESTDHANDLES, STD_ERROR_HANDLE, STD_INPUT_HANDLE,
    STD_OUTPUT_HANDLE,
};
use winapi::um::winnt::HANDLE;
use winapi::um::winuser::{SW_HIDE, SW_SHOWDEFAULT};

use crate::core::types::{ProcessError, ProcessResult};
use crate::process::io::Stream;
use crate::process::params::{ConsoleMode, ProcessParameters, ShellParameters};
use crate::windows::bindings::{kernel32, shell32};
use crate::windows::types::Handle;
use crate::windows::utils::strings;

fn stream_handle(stream: &Stream, std_role: DWORD) -> HANDLE {
    match stream {
        Stream::Inherit => kernel32::std_handle(std_role),
        Stream::File(handle) | Stream::Pipe(handle) => handle.raw(),
    }
}

/// Spawn a child through CreateProcessW
///
/// Returns the owned process handle and the child's ID. The parent's copies
/// of any redirect handles are closed before returning, and the primary
/// thread handle is closed outright; this library exposes no thread control.
pub(super) fn create_process(params: &mut ProcessParameters) -> ProcessResult<(Handle, u32)> {
    let mut startup_info: STARTUPINFOW = unsafe { mem::zeroed() };
    startup_info.cb = mem::size_of::<STARTUPINFOW>() as DWORD;

    if let Some(io) = &params.io {
        startup_info.dwFlags |= STARTF_USESTDHANDLES;
        startup_info.hStdInput = stream_handle(&io.std_in, STD_INPUT_HANDLE);
        startup_info.hStdOutput = stream_handle(&io.std_out, STD_OUTPUT_HANDLE);
        startup_info.hStdError = stream_handle(&io.std_err, STD_ERROR_HANDLE);
    }

    let creation_flags = CREATE_UNICODE_ENVIRONMENT | params.console_mode.creation_flags();

    // The API wants a writable wide buffer, not a shared string
    let mut cmd_line = strings::to_wide(&params.cmd_line.to_string());

    let child_info = kernel32::create_process(&mut cmd_line, &mut startup_info, creation_flags)?;

    if let Some(io) = &mut params.io {
        io.close();
    }

    let process = Handle::new(child_info.hProcess);
    let _thread = Handle::new(child_info.hThread);

    debug!(
        pid = child_info.dwProcessId,
        cmd_line = %params.cmd_line,
        "spawned child process"
    );

    Ok((process, child_info.dwProcessId))
}

/// Launch through the shell-execute facility
///
/// Used for verbs the process loader does not know, "runas" elevation in
/// particular. Standard-handle redirection is not available on this path.
pub(super) fn shell_execute(params: &ShellParameters) -> ProcessResult<Handle> {
    let verb = params.verb.as_deref().unwrap_or("open");
    let parameters = params.cmd_line.args_to_string();

    let mut mask = SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_NO_UI;
    let mut show: c_int = SW_SHOWDEFAULT;

    match params.console_mode {
        ConsoleMode::None => show = SW_HIDE,
        ConsoleMode::Inherit => mask |= SEE_MASK_NO_CONSOLE,
        ConsoleMode::New => {}
    }

    let raw = shell32::shell_execute(verb, params.cmd_line.argv0(), &parameters, mask, show)?;

    debug!(verb, file = params.cmd_line.argv0(), "shell-executed child");

    Ok(Handle::new(raw))
}

struct PathBuffer {
    data: Vec<u16>,
}

impl PathBuffer {
    const MIN_SIZE: usize = MAX_PATH;

    fn new() -> Self {
        PathBuffer {
            data: vec![0; Self::MIN_SIZE],
        }
    }

    fn grow(&mut self) -> ProcessResult<()> {
        let new_size = self
            .data
            .len()
            .checked_mul(2)
            .filter(|&size| size <= DWORD::MAX as usize)
            .ok_or(ProcessError::BufferTooLarge {
                size: self.data.len(),
            })?;
        self.data.resize(new_size, 0);
        Ok(())
    }
}

/// Executable path of the calling process
pub(super) fn current_exe_path() -> ProcessResult<String> {
    let mut buffer = PathBuffer::new();
    loop {
        match kernel32::module_file_name(&mut buffer.data) {
            Ok(len) => return Ok(strings::from_wide(&buffer.data[..len])),
            Err(err) if err.os_code() == Some(ERROR_INSUFFICIENT_BUFFER) => buffer.grow()?,
            Err(err) => return Err(err),
        }
    }
}

/// Executable path of another process, via its handle
pub(super) fn exe_path(process: &Handle) -> ProcessResult<String> {
    let mut buffer = PathBuffer::new();
    loop {
        match kernel32::query_image_name(process.raw(), &mut buffer.data) {
            Ok(len) => return Ok(strings::from_wide(&buffer.data[..len])),
            Err(err) if err.os_code() == Some(ERROR_INSUFFICIENT_BUFFER) => buffer.grow()?,
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_buffer_grows_geometrically() {
        let mut buffer = PathBuffer::new();
        assert_eq!(buffer.data.len(), PathBuffer::MIN_SIZE);
        buffer.grow().unwrap();
        assert_eq!(buffer.data.len(), PathBuffer::MIN_SIZE * 2);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_current_exe_path_resolves() {
        let path = current_exe_path().unwrap();
        assert!(!path.is_empty());
    }
}

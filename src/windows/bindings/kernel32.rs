//! Kernel32.dll bindings for process, pipe and handle operations

use std::mem;
use std::ptr;
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID, TRUE};
use winapi::shared::winerror::{ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS};
use winapi::um::errhandlingapi::{GetLastError, SetLastError};
use winapi::um::fileapi::{CreateFileW, DeleteFileW, ReadFile, WriteFile};
use winapi::um::handleapi::{CloseHandle, SetHandleInformation, INVALID_HANDLE_VALUE};
use winapi::um::libloaderapi::GetModuleFileNameW;
use winapi::um::minwinbase::SECURITY_ATTRIBUTES;
use winapi::um::namedpipeapi::CreatePipe;
use winapi::um::processenv::{GetCommandLineW, GetStdHandle};
use winapi::um::processthreadsapi::{
    CreateProcessW, GetCurrentProcess, GetCurrentProcessId, GetExitCodeProcess, GetProcessId,
    OpenProcess, TerminateProcess, PROCESS_INFORMATION, STARTUPINFOW,
};
use winapi::um::synchapi::WaitForSingleObject;
use winapi::um::winbase::{QueryFullProcessImageNameW, HANDLE_FLAG_INHERIT};
use winapi::um::winnt::{FILE_ATTRIBUTE_NORMAL, HANDLE};

use crate::core::types::{ProcessError, ProcessResult};
use crate::windows::utils::strings;

fn inheritable_attributes() -> SECURITY_ATTRIBUTES {
    let mut attributes: SECURITY_ATTRIBUTES = unsafe { mem::zeroed() };
    attributes.nLength = mem::size_of::<SECURITY_ATTRIBUTES>() as DWORD;
    attributes.bInheritHandle = TRUE;
    attributes
}

/// Safe wrapper for GetStdHandle
///
/// Returns whatever the OS reports for the role, including the null or
/// invalid sentinels when the process has no such stream.
pub fn std_handle(role: DWORD) -> HANDLE {
    unsafe { GetStdHandle(role) }
}

/// Safe wrapper for GetCommandLineW
pub fn command_line() -> String {
    unsafe { strings::from_wide_ptr(GetCommandLineW()) }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid, open Windows handle owned by the caller.
pub unsafe fn close_handle(handle: HANDLE) -> ProcessResult<()> {
    if CloseHandle(handle) == FALSE {
        Err(ProcessError::system("CloseHandle"))
    } else {
        Ok(())
    }
}

/// Safe wrapper for SetHandleInformation toggling child-process visibility
pub fn set_handle_inheritance(handle: HANDLE, inherit: bool) -> ProcessResult<()> {
    let flags = if inherit { HANDLE_FLAG_INHERIT } else { 0 };
    let ret = unsafe { SetHandleInformation(handle, HANDLE_FLAG_INHERIT, flags) };
    if ret == FALSE {
        Err(ProcessError::system("SetHandleInformation"))
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadFile
///
/// Returns the number of bytes transferred; zero means end of stream.
pub fn read_file(handle: HANDLE, buffer: &mut [u8]) -> ProcessResult<usize> {
    if buffer.len() > DWORD::MAX as usize {
        return Err(ProcessError::BufferTooLarge { size: buffer.len() });
    }

    let mut nb_read: DWORD = 0;
    let ret = unsafe {
        ReadFile(
            handle,
            buffer.as_mut_ptr() as LPVOID,
            buffer.len() as DWORD,
            &mut nb_read,
            ptr::null_mut(),
        )
    };

    if ret == FALSE {
        Err(ProcessError::system("ReadFile"))
    } else {
        Ok(nb_read as usize)
    }
}

/// Safe wrapper for WriteFile
///
/// Returns the number of bytes transferred, which callers must compare
/// against the requested length themselves.
pub fn write_file(handle: HANDLE, data: &[u8]) -> ProcessResult<usize> {
    if data.len() > DWORD::MAX as usize {
        return Err(ProcessError::BufferTooLarge { size: data.len() });
    }

    let mut nb_written: DWORD = 0;
    let ret = unsafe {
        WriteFile(
            handle,
            data.as_ptr() as LPVOID,
            data.len() as DWORD,
            &mut nb_written,
            ptr::null_mut(),
        )
    };

    if ret == FALSE {
        Err(ProcessError::system("WriteFile"))
    } else {
        Ok(nb_written as usize)
    }
}

/// Safe wrapper for CreatePipe
///
/// Both returned ends are inheritable; the buffer size is a hint.
pub fn create_pipe(buffer_size: DWORD) -> ProcessResult<(HANDLE, HANDLE)> {
    let mut read_end: HANDLE = INVALID_HANDLE_VALUE;
    let mut write_end: HANDLE = INVALID_HANDLE_VALUE;
    let mut attributes = inheritable_attributes();

    let ret = unsafe { CreatePipe(&mut read_end, &mut write_end, &mut attributes, buffer_size) };

    if ret == FALSE {
        Err(ProcessError::system("CreatePipe"))
    } else {
        Ok((read_end, write_end))
    }
}

/// Safe wrapper for CreateProcessW
///
/// The command line must be a mutable NUL-terminated wide buffer; the API is
/// documented to modify it. Child handles are always inheritable.
pub fn create_process(
    cmd_line: &mut [u16],
    startup_info: &mut STARTUPINFOW,
    creation_flags: DWORD,
) -> ProcessResult<PROCESS_INFORMATION> {
    let mut child_info: PROCESS_INFORMATION = unsafe { mem::zeroed() };

    let ret = unsafe {
        CreateProcessW(
            ptr::null(),
            cmd_line.as_mut_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
            TRUE,
            creation_flags,
            ptr::null_mut(),
            ptr::null(),
            startup_info,
            &mut child_info,
        )
    };

    if ret == FALSE {
        Err(ProcessError::system("CreateProcessW"))
    } else {
        Ok(child_info)
    }
}

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: DWORD) -> ProcessResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if handle.is_null() {
        Err(ProcessError::system("OpenProcess"))
    } else {
        Ok(handle)
    }
}

/// Pseudo-handle for the calling process; never needs closing
pub fn current_process() -> HANDLE {
    unsafe { GetCurrentProcess() }
}

/// Safe wrapper for GetCurrentProcessId
pub fn current_process_id() -> u32 {
    unsafe { GetCurrentProcessId() }
}

/// Safe wrapper for GetProcessId
pub fn process_id(handle: HANDLE) -> ProcessResult<u32> {
    let id = unsafe { GetProcessId(handle) };
    if id == 0 {
        Err(ProcessError::system("GetProcessId"))
    } else {
        Ok(id)
    }
}

/// Safe wrapper for WaitForSingleObject
///
/// Returns the raw wait status; interpretation is call-site specific.
pub fn wait_for_single_object(handle: HANDLE, timeout_ms: DWORD) -> DWORD {
    unsafe { WaitForSingleObject(handle, timeout_ms) }
}

/// Safe wrapper for TerminateProcess
pub fn terminate_process(handle: HANDLE, exit_code: u32) -> ProcessResult<()> {
    let ret = unsafe { TerminateProcess(handle, exit_code) };
    if ret == FALSE {
        Err(ProcessError::system("TerminateProcess"))
    } else {
        Ok(())
    }
}

/// Safe wrapper for GetExitCodeProcess
///
/// Returns the raw code, including the still-active sentinel.
pub fn exit_code_process(handle: HANDLE) -> ProcessResult<DWORD> {
    let mut code: DWORD = 0;
    let ret = unsafe { GetExitCodeProcess(handle, &mut code) };
    if ret == FALSE {
        Err(ProcessError::system("GetExitCodeProcess"))
    } else {
        Ok(code)
    }
}

/// Safe wrapper for CreateFileW with inheritable security attributes
pub fn create_file(
    path: &str,
    desired_access: DWORD,
    share_mode: DWORD,
    creation_disposition: DWORD,
) -> ProcessResult<HANDLE> {
    let path = strings::to_wide(path);
    let mut attributes = inheritable_attributes();

    let handle = unsafe {
        CreateFileW(
            path.as_ptr(),
            desired_access,
            share_mode,
            &mut attributes,
            creation_disposition,
            FILE_ATTRIBUTE_NORMAL,
            ptr::null_mut(),
        )
    };

    if handle == INVALID_HANDLE_VALUE {
        Err(ProcessError::system("CreateFileW"))
    } else {
        Ok(handle)
    }
}

/// Safe wrapper for DeleteFileW
pub fn delete_file(path: &str) -> ProcessResult<()> {
    let path = strings::to_wide(path);
    let ret = unsafe { DeleteFileW(path.as_ptr()) };
    if ret == FALSE {
        Err(ProcessError::system("DeleteFileW"))
    } else {
        Ok(())
    }
}

/// Safe wrapper for GetModuleFileNameW querying the current executable
///
/// Fails with ERROR_INSUFFICIENT_BUFFER when the buffer cannot hold the
/// path, so callers can grow and retry.
pub fn module_file_name(buffer: &mut [u16]) -> ProcessResult<usize> {
    unsafe { SetLastError(ERROR_SUCCESS) };

    let len = unsafe {
        GetModuleFileNameW(ptr::null_mut(), buffer.as_mut_ptr(), buffer.len() as DWORD)
    };

    if len == 0 {
        return Err(ProcessError::system("GetModuleFileNameW"));
    }

    if len as usize == buffer.len() && unsafe { GetLastError() } == ERROR_INSUFFICIENT_BUFFER {
        return Err(ProcessError::with_code(
            "GetModuleFileNameW",
            ERROR_INSUFFICIENT_BUFFER,
        ));
    }

    Ok(len as usize)
}

/// Safe wrapper for QueryFullProcessImageNameW
///
/// Same growth contract as [`module_file_name`].
pub fn query_image_name(process: HANDLE, buffer: &mut [u16]) -> ProcessResult<usize> {
    let mut size = buffer.len() as DWORD;
    let ret = unsafe { QueryFullProcessImageNameW(process, 0, buffer.as_mut_ptr(), &mut size) };

    if ret == FALSE {
        Err(ProcessError::system("QueryFullProcessImageNameW"))
    } else {
        Ok(size as usize)
    }
}

//! Move-only HANDLE wrapper with RAII cleanup

use std::fmt;
use std::ptr;
use winapi::shared::winerror::ERROR_BROKEN_PIPE;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::winbase::{STD_ERROR_HANDLE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE};
use winapi::um::winnt::HANDLE;

use crate::core::types::{ProcessError, ProcessResult};
use crate::windows::bindings::kernel32;

fn is_std_handle(handle: HANDLE) -> bool {
    handle == kernel32::std_handle(STD_INPUT_HANDLE)
        || handle == kernel32::std_handle(STD_OUTPUT_HANDLE)
        || handle == kernel32::std_handle(STD_ERROR_HANDLE)
}

/// Exclusive owner of a raw Windows handle
///
/// Closes the handle when dropped, except for the current process's standard
/// stream handles, which belong to the console subsystem and are flagged at
/// construction so they survive the wrapper.
pub struct Handle {
    raw: HANDLE,
    std: bool,
}

impl Handle {
    /// Read granularity for [`Handle::read`]
    pub const MAX_CHUNK_SIZE: usize = 16 * 1024;

    /// Take ownership of a raw handle value
    pub fn new(raw: HANDLE) -> Self {
        Handle {
            raw,
            std: is_std_handle(raw),
        }
    }

    /// An empty wrapper owning nothing
    pub fn null() -> Self {
        Handle {
            raw: ptr::null_mut(),
            std: false,
        }
    }

    /// The current process's standard input handle
    pub fn std_in() -> Self {
        Handle::new(kernel32::std_handle(STD_INPUT_HANDLE))
    }

    /// The current process's standard output handle
    pub fn std_out() -> Self {
        Handle::new(kernel32::std_handle(STD_OUTPUT_HANDLE))
    }

    /// The current process's standard error handle
    pub fn std_err() -> Self {
        Handle::new(kernel32::std_handle(STD_ERROR_HANDLE))
    }

    /// Whether the wrapped value refers to an open kernel object
    pub fn is_valid(&self) -> bool {
        !self.raw.is_null() && self.raw != INVALID_HANDLE_VALUE
    }

    /// Whether this is one of the three standard stream handles
    pub fn is_std(&self) -> bool {
        self.std
    }

    /// Get the raw handle
    ///
    /// The value is only meaningful while this wrapper is alive.
    pub fn raw(&self) -> HANDLE {
        self.raw
    }

    /// Take ownership of the raw value, preventing automatic cleanup
    pub fn into_raw(mut self) -> HANDLE {
        let raw = self.raw;
        self.raw = ptr::null_mut();
        raw
    }

    /// Close the handle
    ///
    /// Idempotent; a no-op for invalid wrappers and for standard stream
    /// handles, which the OS owns.
    pub fn close(&mut self) {
        if self.is_valid() && !self.std {
            // Ignore errors on cleanup
            let _ = unsafe { kernel32::close_handle(self.raw) };
        }
        self.raw = ptr::null_mut();
    }

    /// Read one chunk of up to [`Handle::MAX_CHUNK_SIZE`] bytes
    ///
    /// The buffer is replaced with the bytes read. Returns whether more data
    /// may be available: a zero-length transfer or a broken pipe both signal
    /// end of stream.
    pub fn read_chunk(&self, buffer: &mut Vec<u8>) -> ProcessResult<bool> {
        buffer.resize(Self::MAX_CHUNK_SIZE, 0);

        match kernel32::read_file(self.raw, buffer) {
            Ok(nb_read) => {
                buffer.truncate(nb_read);
                Ok(nb_read != 0)
            }
            Err(err) if err.os_code() == Some(ERROR_BROKEN_PIPE) => {
                // The peer closed its end of an anonymous pipe
                buffer.clear();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Read until end of stream, growing the result as needed
    pub fn read(&self) -> ProcessResult<Vec<u8>> {
        let mut data = Vec::new();
        let mut chunk = Vec::new();

        loop {
            let more = self.read_chunk(&mut chunk)?;
            data.extend_from_slice(&chunk);
            if !more {
                break;
            }
        }

        Ok(data)
    }

    /// Write the whole buffer
    ///
    /// A transfer shorter than requested is reported as
    /// [`ProcessError::IncompleteWrite`], distinct from an OS-level failure.
    pub fn write(&self, data: &[u8]) -> ProcessResult<()> {
        let nb_written = kernel32::write_file(self.raw, data)?;

        if nb_written != data.len() {
            return Err(ProcessError::IncompleteWrite {
                expected: data.len(),
                actual: nb_written,
            });
        }

        Ok(())
    }

    /// Toggle whether child processes receive a copy of this handle
    pub fn inherit(&self, yes: bool) -> ProcessResult<()> {
        kernel32::set_handle_inheritance(self.raw, yes)
    }

    /// Hide this handle from child processes
    ///
    /// Must be called on the end of a pipe that stays with the parent, or
    /// the child's extra copy keeps the pipe open past the writer's exit and
    /// readers never observe end of stream.
    pub fn dont_inherit(&self) -> ProcessResult<()> {
        self.inherit(false)
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.close();
    }
}

// Send + Sync are safe because HANDLEs are process-local kernel references
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("raw", &self.raw)
            .field("valid", &self.is_valid())
            .field("std", &self.std)
            .finish()
    }
}

//! Anonymous pipe creation

use winapi::shared::minwindef::DWORD;

use crate::core::types::ProcessResult;
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;

/// A connected pair of handles created by one OS call
///
/// Both ends are born inheritable so either can be handed to a child. The
/// end that stays with the parent must be hidden with
/// [`Handle::dont_inherit`] before the child is spawned.
#[derive(Debug)]
pub struct Pipe {
    read_end: Handle,
    write_end: Handle,
}

impl Pipe {
    /// Kernel buffer size hint
    pub const BUFFER_SIZE: usize = 16 * 1024;

    /// Create a connected pipe
    pub fn new() -> ProcessResult<Self> {
        let (read_end, write_end) = kernel32::create_pipe(Self::BUFFER_SIZE as DWORD)?;
        Ok(Pipe {
            read_end: Handle::new(read_end),
            write_end: Handle::new(write_end),
        })
    }

    /// The end data is read from
    pub fn read_end(&self) -> &Handle {
        &self.read_end
    }

    /// The end data is written to
    pub fn write_end(&self) -> &Handle {
        &self.write_end
    }

    /// Move the read end out, leaving an empty wrapper behind
    pub fn take_read_end(&mut self) -> Handle {
        std::mem::replace(&mut self.read_end, Handle::null())
    }

    /// Move the write end out, leaving an empty wrapper behind
    pub fn take_write_end(&mut self) -> Handle {
        std::mem::replace(&mut self.write_end, Handle::null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_pipe_ends_valid() {
        let pipe = Pipe::new().unwrap();
        assert!(pipe.read_end().is_valid());
        assert!(pipe.write_end().is_valid());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_take_leaves_null_end() {
        let mut pipe = Pipe::new().unwrap();
        let write_end = pipe.take_write_end();
        assert!(write_end.is_valid());
        assert!(!pipe.write_end().is_valid());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_inheritance_toggle() {
        let pipe = Pipe::new().unwrap();
        pipe.read_end().dont_inherit().unwrap();
        pipe.read_end().inherit(true).unwrap();
    }
}

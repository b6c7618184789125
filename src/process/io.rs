//! Child standard-stream redirection

use crate::core::types::ProcessResult;
use crate::file;
use crate::pipe::Pipe;
use crate::windows::types::Handle;

/// Redirect target for one of a child's standard streams
#[derive(Debug, Default)]
pub enum Stream {
    /// No redirection; the child sees this process's own handle
    #[default]
    Inherit,
    /// Redirect to an opened file
    File(Handle),
    /// Redirect to one end of a pipe
    Pipe(Handle),
}

impl Stream {
    /// Open a file as a stdin redirect source
    pub fn file_for_reading(path: &str) -> ProcessResult<Self> {
        Ok(Stream::File(file::open_for_read(path)?))
    }

    /// Open a file as a stdout/stderr redirect target
    pub fn file_for_writing(path: &str) -> ProcessResult<Self> {
        Ok(Stream::File(file::open_for_write(path)?))
    }

    /// Bind the pipe's read end, for a child's stdin
    ///
    /// The write end stays with the caller and is marked non-inheritable so
    /// the child never sees it.
    pub fn pipe_read_end(pipe: &mut Pipe) -> ProcessResult<Self> {
        pipe.write_end().dont_inherit()?;
        Ok(Stream::Pipe(pipe.take_read_end()))
    }

    /// Bind the pipe's write end, for a child's stdout or stderr
    ///
    /// The read end stays with the caller and is marked non-inheritable;
    /// otherwise the child's extra copy would keep the pipe open past its
    /// own exit and the caller's reads would never see end of stream.
    pub fn pipe_write_end(pipe: &mut Pipe) -> ProcessResult<Self> {
        pipe.read_end().dont_inherit()?;
        Ok(Stream::Pipe(pipe.take_write_end()))
    }

    /// Close the owned handle, if any
    pub fn close(&mut self) {
        match self {
            Stream::Inherit => {}
            Stream::File(handle) | Stream::Pipe(handle) => handle.close(),
        }
    }
}

/// Redirect settings for all three standard streams
///
/// Consumed exactly once by process creation, which calls [`IO::close`]
/// right after the spawn so the parent's copies of handles that existed only
/// for child setup do not linger.
#[derive(Debug, Default)]
pub struct IO {
    pub std_in: Stream,
    pub std_out: Stream,
    pub std_err: Stream,
}

impl IO {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the parent's copies of all owned redirect handles
    pub fn close(&mut self) {
        self.std_in.close();
        self.std_out.close();
        self.std_err.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_streams_inherit() {
        let io = IO::new();
        assert!(matches!(io.std_in, Stream::Inherit));
        assert!(matches!(io.std_out, Stream::Inherit));
        assert!(matches!(io.std_err, Stream::Inherit));
    }

    #[test]
    fn test_close_on_inherit_is_noop() {
        let mut io = IO::new();
        io.close();
        assert!(matches!(io.std_out, Stream::Inherit));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_pipe_binding_takes_one_end() {
        let mut pipe = Pipe::new().unwrap();
        let stream = Stream::pipe_write_end(&mut pipe).unwrap();

        match &stream {
            Stream::Pipe(handle) => assert!(handle.is_valid()),
            _ => panic!("Expected a pipe-backed stream"),
        }
        // The write end moved out; the read end stays with the pipe
        assert!(!pipe.write_end().is_valid());
        assert!(pipe.read_end().is_valid());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_close_releases_pipe_end() {
        let mut pipe = Pipe::new().unwrap();
        let mut io = IO::new();
        io.std_out = Stream::pipe_write_end(&mut pipe).unwrap();

        io.close();
        match &io.std_out {
            Stream::Pipe(handle) => assert!(!handle.is_valid()),
            _ => panic!("Expected a pipe-backed stream"),
        }
    }
}

//! Minimal file operations backing stream redirection
//!
//! Opened handles are inheritable and share read access, exactly what the
//! child-I/O layer needs. Paths are accepted as UTF-8.

use winapi::um::fileapi::{OPEN_ALWAYS, OPEN_EXISTING};
use winapi::um::winnt::{FILE_SHARE_READ, GENERIC_READ, GENERIC_WRITE};

use crate::core::types::ProcessResult;
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;

/// Open an existing file for reading
pub fn open_for_read(path: &str) -> ProcessResult<Handle> {
    kernel32::create_file(path, GENERIC_READ, FILE_SHARE_READ, OPEN_EXISTING).map(Handle::new)
}

/// Open a file for writing, creating it if missing
pub fn open_for_write(path: &str) -> ProcessResult<Handle> {
    kernel32::create_file(path, GENERIC_WRITE, FILE_SHARE_READ, OPEN_ALWAYS).map(Handle::new)
}

/// Delete a file
pub fn remove(path: &str) -> ProcessResult<()> {
    kernel32::delete_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_missing_file_fails() {
        let result = open_for_read(r"Z:\winproc\does\not\exist.txt");
        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_write_read_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");
        let path = path.to_str().unwrap();

        {
            let file = open_for_write(path).unwrap();
            file.write(b"contents").unwrap();
        }

        let data = open_for_read(path).unwrap().read().unwrap();
        assert_eq!(data, b"contents");

        remove(path).unwrap();
        assert!(open_for_read(path).is_err());
    }
}

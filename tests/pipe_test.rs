//! Pipe and handle read/write semantics

use winproc::{Handle, Pipe, ProcessError};

#[test]
fn write_then_close_yields_all_data_and_eof() {
    let mut pipe = Pipe::new().unwrap();
    pipe.write_end().write(b"hello").unwrap();
    pipe.take_write_end().close();

    let data = pipe.read_end().read().unwrap();
    assert_eq!(data, b"hello");
}

#[test]
fn read_chunk_signals_end_of_stream() {
    let mut pipe = Pipe::new().unwrap();
    pipe.write_end().write(b"ping").unwrap();

    let mut chunk = Vec::new();
    let more = pipe.read_end().read_chunk(&mut chunk).unwrap();
    assert!(more);
    assert_eq!(chunk, b"ping");

    // A broken pipe is the designed end-of-data signal, not an error.
    pipe.take_write_end().close();
    let more = pipe.read_end().read_chunk(&mut chunk).unwrap();
    assert!(!more);
    assert!(chunk.is_empty());
}

#[test]
fn multiple_writes_accumulate() {
    let mut pipe = Pipe::new().unwrap();
    pipe.write_end().write(b"one ").unwrap();
    pipe.write_end().write(b"two").unwrap();
    pipe.take_write_end().close();

    let data = pipe.read_end().read().unwrap();
    assert_eq!(data, b"one two");
}

#[test]
fn empty_write_is_exact() {
    let pipe = Pipe::new().unwrap();
    pipe.write_end().write(b"").unwrap();
}

#[test]
fn write_to_closed_wrapper_fails() {
    let mut handle = Handle::null();
    handle.close();
    let result = handle.write(b"data");
    assert!(matches!(result, Err(ProcessError::SystemCall { .. })));
}

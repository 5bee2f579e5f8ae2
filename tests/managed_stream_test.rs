//! Tests for ManagedStream

mod common;

use common::test_util::{ARBITRARY_TEXT, FailingSink, ReadableStream};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use sysrules::encoding::TextEncoding;
use sysrules::{Handle, ManagedStream, Sink};

fn managed_stream(destination: &ReadableStream) -> ManagedStream {
    ManagedStream::new(destination.handle(), TextEncoding::utf8())
}

#[test]
fn forwards_to_the_original_destination_by_default() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();

    assert_eq!(destination.text(), ARBITRARY_TEXT);
    assert_eq!(stream.log(), "");
    assert_eq!(stream.failure_log(), "");
}

#[test]
fn muted_stream_writes_nothing_to_the_original_destination() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.mute();
    stream.write_bytes(b"first ").unwrap();
    stream.write_byte(b'x').unwrap();
    stream.write_range(b"__second", 2, 6).unwrap();

    assert!(stream.is_muted());
    assert_eq!(destination.text(), "");
}

#[test]
fn logs_receive_every_write_while_muted() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.mute();
    stream.enable_log();
    stream.enable_failure_log();
    write!(stream, "{}", ARBITRARY_TEXT).unwrap();

    assert_eq!(destination.text(), "");
    assert_eq!(stream.log(), ARBITRARY_TEXT);
    assert_eq!(stream.failure_log(), ARBITRARY_TEXT);
}

#[test]
fn logs_are_independent_of_each_other() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.enable_log();
    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();

    assert_eq!(stream.log(), ARBITRARY_TEXT);
    assert_eq!(stream.failure_log(), "");
}

#[test]
fn clear_log_discards_earlier_text() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.enable_log();
    stream.write_bytes(b"text that is cleared").unwrap();
    stream.clear_log();
    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();

    assert_eq!(stream.log(), ARBITRARY_TEXT);
}

#[test]
fn clear_log_leaves_the_failure_log_alone() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.enable_log();
    stream.enable_failure_log();
    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();
    stream.clear_log();

    assert_eq!(stream.log(), "");
    assert_eq!(stream.failure_log(), ARBITRARY_TEXT);
}

#[test]
fn enabling_the_log_twice_is_the_same_as_once() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.enable_log();
    stream.enable_log();
    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();

    assert_eq!(stream.log(), ARBITRARY_TEXT);
}

#[test]
fn log_is_a_snapshot() {
    let destination = ReadableStream::new();
    let mut stream = managed_stream(&destination);

    stream.enable_log();
    stream.write_bytes(b"first").unwrap();
    let snapshot = stream.log();
    stream.write_bytes(b" second").unwrap();

    assert_eq!(snapshot, "first");
    assert_eq!(stream.log(), "first second");
}

#[test]
fn failing_original_destination_propagates_and_skips_the_logs() {
    let original: Handle<dyn Sink> = Rc::new(RefCell::new(FailingSink));
    let mut stream = ManagedStream::new(original, TextEncoding::utf8());
    stream.enable_log();

    let result = stream.write_bytes(ARBITRARY_TEXT.as_bytes());

    assert!(result.is_err());
    assert_eq!(stream.log(), "");
}

#[test]
fn muting_skips_a_failing_original_destination() {
    let original: Handle<dyn Sink> = Rc::new(RefCell::new(FailingSink));
    let mut stream = ManagedStream::new(original, TextEncoding::utf8());
    stream.mute();
    stream.enable_log();

    stream.write_bytes(ARBITRARY_TEXT.as_bytes()).unwrap();

    assert_eq!(stream.log(), ARBITRARY_TEXT);
}

#[test]
fn flush_reaches_the_original_destination_while_muted() {
    let original: Handle<dyn Sink> = Rc::new(RefCell::new(FailingSink));
    let mut stream = ManagedStream::new(original, TextEncoding::utf8());
    stream.mute();

    let err = Sink::flush(&mut stream).unwrap_err();

    assert_eq!(err.to_string(), "flush failed");
}

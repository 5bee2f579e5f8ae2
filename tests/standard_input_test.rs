//! Tests for TextFromStandardInput

mod common;

use common::test_util::{BodyError, unix_like_properties};
use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;
use sysrules::encoding::TextEncoding;
use sysrules::input::TextQueue;
use sysrules::{Handle, InputSlot, TestRule, TextFromStandardInput};

fn input_slot() -> InputSlot {
    let original: Handle<dyn Read> = Rc::new(RefCell::new(io::Cursor::new(b"original".to_vec())));
    InputSlot::new("test input", original)
}

#[test]
fn provides_text() {
    let slot = input_slot();
    let rule = TextFromStandardInput::new(&slot, &unix_like_properties()).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_text(&["arbitrary text"]);
        assert_eq!(slot.read_line(TextEncoding::utf8())?.as_deref(), Some("arbitrary text"));
        Ok(())
    })
    .unwrap();
}

#[test]
fn provides_multiple_texts() {
    let slot = input_slot();
    let rule = TextFromStandardInput::new(&slot, &unix_like_properties()).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_text(&["first text\n", "second text\n"]);
        assert_eq!(slot.read_line(TextEncoding::utf8())?.as_deref(), Some("first text"));
        assert_eq!(slot.read_line(TextEncoding::utf8())?.as_deref(), Some("second text"));
        assert_eq!(slot.read_line(TextEncoding::utf8())?, None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn does_not_block_for_no_provided_text() {
    let slot = input_slot();
    let rule = TextFromStandardInput::new(&slot, &unix_like_properties()).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_text(&[]);
        assert_eq!(slot.read_byte()?, None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn input_is_empty_before_text_is_provided() {
    let slot = input_slot();
    let rule = TextFromStandardInput::new(&slot, &unix_like_properties()).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        assert_eq!(slot.read_line(TextEncoding::utf8())?, None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn provides_lines_with_the_platform_line_separator() {
    let slot = input_slot();
    let properties = unix_like_properties();
    properties.set("line.separator", "\r\n");
    let rule = TextFromStandardInput::new(&slot, &properties).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_lines(&["first line", "second line"]);
        let mut raw = String::new();
        while let Some(byte) = slot.read_byte()? {
            raw.push(char::from(byte));
        }
        assert_eq!(raw, "first line\r\nsecond line\r\n");
        Ok(())
    })
    .unwrap();
}

#[test]
fn restores_the_original_input() {
    let slot = input_slot();
    let original = slot.current();
    let rule = TextFromStandardInput::new(&slot, &unix_like_properties()).unwrap();

    rule.apply(|| -> Result<(), BodyError> { Ok(()) }).unwrap();

    assert!(slot.is_current(&original));
    assert_eq!(slot.read_line(TextEncoding::utf8()).unwrap().as_deref(), Some("original"));
}

#[test]
fn each_read_returns_at_most_one_text() {
    let mut queue = TextQueue::new();
    queue.push(b"first".to_vec());
    queue.push(b"second".to_vec());
    let mut buf = [0u8; 64];

    let first = queue.read(&mut buf).unwrap();
    assert_eq!(&buf[..first], b"first");
    let second = queue.read(&mut buf).unwrap();
    assert_eq!(&buf[..second], b"second");
    assert_eq!(queue.read(&mut buf).unwrap(), 0);
    assert!(queue.is_empty());
}

#[test]
fn small_reads_continue_within_a_text() {
    let mut queue = TextQueue::new();
    queue.push(b"abcde".to_vec());
    let mut buf = [0u8; 2];

    let mut collected = Vec::new();
    loop {
        let count = queue.read(&mut buf).unwrap();
        if count == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..count]);
    }

    assert_eq!(collected, b"abcde");
}

#[test]
fn provides_text_in_the_platform_encoding() {
    let slot = input_slot();
    let properties = unix_like_properties();
    properties.set("file.encoding", "UTF-16LE");
    let rule = TextFromStandardInput::new(&slot, &properties).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_text(&["hi"]);
        let mut raw = Vec::new();
        while let Some(byte) = slot.read_byte()? {
            raw.push(byte);
        }
        assert_eq!(raw, vec![104, 0, 105, 0]);
        Ok(())
    })
    .unwrap();
}

#[test]
fn reads_lines_in_the_provided_encoding() {
    let slot = input_slot();
    let properties = unix_like_properties();
    properties.set("file.encoding", "UTF-16LE");
    properties.set("line.separator", "\r\n");
    let rule = TextFromStandardInput::new(&slot, &properties).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_lines(&["caf\u{e9}", "\u{0a0a}"]);
        let encoding = rule.encoding();
        assert_eq!(slot.read_line(encoding)?.as_deref(), Some("caf\u{e9}"));
        assert_eq!(slot.read_line(encoding)?.as_deref(), Some("\u{0a0a}"));
        assert_eq!(slot.read_line(encoding)?, None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn reads_lines_in_a_single_byte_encoding() {
    let slot = input_slot();
    let properties = unix_like_properties();
    properties.set("file.encoding", "ISO-8859-1");
    let rule = TextFromStandardInput::new(&slot, &properties).unwrap();

    rule.apply(|| -> Result<(), BodyError> {
        rule.provide_text(&["caf\u{e9}\n"]);
        assert_eq!(slot.read_line(rule.encoding())?.as_deref(), Some("caf\u{e9}"));
        Ok(())
    })
    .unwrap();
}

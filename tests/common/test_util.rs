//! Test utilities for sysrules tests

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use sysrules::{Handle, LogCapture, Sink, StreamSlot, SystemProperties};

pub const ARBITRARY_TEXT: &str = "arbitrary text";

/// A stream slot whose destination can be read back as text
pub struct ReadableStream {
    pub slot: StreamSlot,
    pub destination: Rc<RefCell<LogCapture>>,
}

impl ReadableStream {
    pub fn new() -> Self {
        let destination = Rc::new(RefCell::new(LogCapture::default()));
        let handle: Handle<dyn Sink> = destination.clone();
        Self {
            slot: StreamSlot::new("readable stream", handle),
            destination,
        }
    }

    /// Everything the real destination received
    pub fn text(&self) -> String {
        self.destination.borrow().decode_text()
    }

    pub fn handle(&self) -> Handle<dyn Sink> {
        self.destination.clone()
    }
}

impl Default for ReadableStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Properties for a UTF-8 platform using `\n` as line separator
pub fn unix_like_properties() -> SystemProperties {
    let properties = SystemProperties::empty();
    properties.set("line.separator", "\n");
    properties.set("file.encoding", "UTF-8");
    properties.set("os.name", "linux");
    properties
}

/// A sink that fails every operation
pub struct FailingSink;

impl Sink for FailingSink {
    fn write_bytes(&mut self, _buf: &[u8]) -> io::Result<()> {
        Err(io::Error::other("write failed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("flush failed"))
    }
}

/// The error every failing test body returns
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error(transparent)]
    Scope(#[from] sysrules::ScopeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

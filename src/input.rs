//! Providing text on standard input.

use crate::console;
use crate::encoding::{EncodingError, TextEncoding};
use crate::properties::SystemProperties;
use crate::rule::TestRule;
use crate::scope::{InterceptionScope, ScopeError};
use crate::slot::{Handle, InputSlot};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;

/// A source yielding queued chunks of bytes.
///
/// A single `read` never returns bytes from more than one chunk, so each provided text arrives as
/// its own read. An empty queue is at end of stream.
#[derive(Debug, Default)]
pub struct TextQueue {
    chunks: VecDeque<Vec<u8>>,
    position: usize,
}

impl TextQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push_back(chunk);
        }
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl Read for TextQueue {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.chunks.front() else {
            return Ok(0);
        };
        let remaining = &chunk[self.position..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        if self.position == chunk.len() {
            self.chunks.pop_front();
            self.position = 0;
        }
        Ok(count)
    }
}

/// Replaces standard input with provided text while a body runs.
///
/// Until text is provided, reads hit end of stream immediately instead of blocking.
pub struct TextFromStandardInput {
    slot: InputSlot,
    properties: SystemProperties,
    encoding: TextEncoding,
    queue: Rc<RefCell<TextQueue>>,
}

impl TextFromStandardInput {
    /// # Errors
    ///
    /// Fails if the `file.encoding` property does not name a supported encoding.
    pub fn new(slot: &InputSlot, properties: &SystemProperties) -> Result<Self, EncodingError> {
        Ok(Self {
            slot: slot.clone(),
            properties: properties.clone(),
            encoding: TextEncoding::from_properties(properties)?,
            queue: Rc::new(RefCell::new(TextQueue::new())),
        })
    }

    /// A rule for this thread's standard input that starts out empty.
    pub fn empty_standard_input() -> Result<Self, EncodingError> {
        Self::new(&console::input(), &console::properties())
    }

    /// The encoding provided text is written in.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Replaces any pending text with `texts`, each delivered as a separate chunk.
    pub fn provide_text(&self, texts: &[&str]) {
        let mut queue = self.queue.borrow_mut();
        queue.clear();
        for text in texts {
            queue.push(self.encoding.encode(text));
        }
    }

    /// Replaces any pending text with `lines`, each terminated by the platform line separator.
    pub fn provide_lines(&self, lines: &[&str]) {
        let separator = self.properties.line_separator();
        let lines: Vec<String> = lines
            .iter()
            .map(|line| format!("{line}{separator}"))
            .collect();
        let texts: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.provide_text(&texts);
    }
}

impl TestRule for TextFromStandardInput {
    fn apply<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<ScopeError>,
    {
        let replacement: Handle<dyn Read> = self.queue.clone();
        InterceptionScope::new(&self.slot).run(replacement, body)
    }
}

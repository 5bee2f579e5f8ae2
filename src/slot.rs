//! Replaceable global handles.
//!
//! A [`Slot`] is the indirection point code writes to (or reads from) instead of touching a stream
//! directly. It remembers the handle it was created with, so the true original destination stays
//! reachable while something else is installed.

use crate::encoding::TextEncoding;
use crate::scope::ScopeError;
use crate::sink::Sink;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Read};
use std::rc::Rc;

/// A shared, mutably borrowable handle.
pub type Handle<T> = Rc<RefCell<T>>;

/// Slot for an output stream.
pub type StreamSlot = Slot<dyn Sink>;

/// Slot for an input source.
pub type InputSlot = Slot<dyn Read>;

struct SlotState<T: ?Sized> {
    name: String,
    current: RefCell<Handle<T>>,
    original: Handle<T>,
    intercepted: Cell<bool>,
}

/// Holder of the current handle for one global stream. Clones share the same state.
pub struct Slot<T: ?Sized> {
    state: Rc<SlotState<T>>,
}

impl<T: ?Sized> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.state.name)
            .field("intercepted", &self.state.intercepted.get())
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> Slot<T> {
    pub fn new(name: impl Into<String>, original: Handle<T>) -> Self {
        Self {
            state: Rc::new(SlotState {
                name: name.into(),
                current: RefCell::new(Rc::clone(&original)),
                original,
                intercepted: Cell::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn current(&self) -> Handle<T> {
        Rc::clone(&*self.state.current.borrow())
    }

    /// Installs `handle` and returns the one it replaced.
    pub fn install(&self, handle: Handle<T>) -> Handle<T> {
        self.state.current.replace(handle)
    }

    /// The handle the slot was created with.
    pub fn original(&self) -> Handle<T> {
        Rc::clone(&self.state.original)
    }

    pub fn is_current(&self, handle: &Handle<T>) -> bool {
        Rc::ptr_eq(&*self.state.current.borrow(), handle)
    }

    pub fn is_intercepted(&self) -> bool {
        self.state.intercepted.get()
    }

    pub(crate) fn begin_interception(&self) -> Result<(), ScopeError> {
        if self.state.intercepted.replace(true) {
            return Err(ScopeError::AlreadyIntercepted {
                stream: self.state.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn end_interception(&self) {
        self.state.intercepted.set(false);
    }
}

impl Slot<dyn Sink> {
    /// Writes to whatever handle is current.
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        self.current().write_bytes(bytes)
    }

    pub fn print(&self, text: &str) -> io::Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Writes `text` followed by `\n`, whatever the platform line separator is.
    pub fn println(&self, text: &str) -> io::Result<()> {
        self.println_with_separator(text, "\n")
    }

    /// Writes `text` followed by `line_separator`, usually the `line.separator` property.
    pub fn println_with_separator(&self, text: &str, line_separator: &str) -> io::Result<()> {
        let mut line = String::with_capacity(text.len() + line_separator.len());
        line.push_str(text);
        line.push_str(line_separator);
        self.write_bytes(line.as_bytes())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.current().flush()
    }
}

impl io::Write for Slot<dyn Sink> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Slot::<dyn Sink>::flush(self)
    }
}

impl Slot<dyn Read> {
    /// Reads from whatever source is current.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let source = self.current();
        let mut source = source
            .try_borrow_mut()
            .map_err(|_| io::Error::new(io::ErrorKind::WouldBlock, "source is already being read"))?;
        source.read(buf)
    }

    /// Reads one byte; `None` marks the end of the stream.
    pub fn read_byte(&self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads up to and excluding the next `\n` (a preceding `\r` is dropped too), decoding with
    /// `encoding`.
    ///
    /// Reads byte by byte, so nothing past the line is consumed. Returns `None` at end of stream.
    pub fn read_line(&self, encoding: TextEncoding) -> io::Result<Option<String>> {
        let newline = encoding.encode("\n");
        let mut line = Vec::new();
        loop {
            match self.read_byte()? {
                Some(byte) => {
                    line.push(byte);
                    // Newlines only match on code unit boundaries.
                    if line.len() % newline.len() == 0 && line.ends_with(&newline) {
                        line.truncate(line.len() - newline.len());
                        break;
                    }
                }
                None if line.is_empty() => return Ok(None),
                None => break,
            }
        }
        let mut text = encoding.decode(&line);
        if text.ends_with('\r') {
            text.pop();
        }
        Ok(Some(text))
    }
}

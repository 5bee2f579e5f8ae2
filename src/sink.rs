//! Byte sinks: the trait every stream variant implements, plus the muteable and tee combinators.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// A destination for bytes.
///
/// Every variant (a real destination wrapped in [`WriteSink`], [`MutableSink`], [`Tee`],
/// [`crate::capture::LogCapture`] and [`crate::managed::ManagedStream`]) implements this trait, so any
/// of them can stand in for a global stream handle.
pub trait Sink {
    /// Writes the whole buffer.
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Writes a single byte.
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_bytes(&[byte])
    }

    /// Writes `len` bytes of `buf` starting at `offset`.
    fn write_range(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        let range = checked_range(buf, offset, len)?;
        self.write_bytes(range)
    }

    fn flush(&mut self) -> io::Result<()>;

    /// Releases the sink. The default only flushes.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

fn checked_range(buf: &[u8], offset: usize, len: usize) -> io::Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "range {offset}+{len} is out of bounds for a buffer of {} bytes",
                    buf.len()
                ),
            )
        })
}

/// Shared handles are sinks too, which is how a slot's current handle gets written to.
impl<S: Sink + ?Sized> Sink for Rc<RefCell<S>> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        borrow_handle(self)?.write_bytes(buf)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        borrow_handle(self)?.write_byte(byte)
    }

    fn write_range(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        borrow_handle(self)?.write_range(buf, offset, len)
    }

    fn flush(&mut self) -> io::Result<()> {
        borrow_handle(self)?.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        borrow_handle(self)?.close()
    }
}

fn borrow_handle<S: ?Sized>(handle: &RefCell<S>) -> io::Result<std::cell::RefMut<'_, S>> {
    handle
        .try_borrow_mut()
        .map_err(|_| io::Error::new(io::ErrorKind::WouldBlock, "sink is already being written to"))
}

/// Adapts any [`io::Write`] (the real stdout, a file, a `Vec<u8>`) to a [`Sink`].
#[derive(Debug, Default)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for WriteSink<W> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A pass-through sink that can be switched off.
///
/// While muted, writes are discarded (not queued) and still report success. Flush and close are
/// always forwarded so the downstream resource is released regardless of the mute state.
#[derive(Debug)]
pub struct MutableSink<S> {
    inner: S,
    muted: bool,
}

impl<S: Sink> MutableSink<S> {
    /// Creates a sink that forwards writes.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            muted: false,
        }
    }

    /// Creates a sink that starts out muted.
    pub fn muted(inner: S) -> Self {
        Self { inner, muted: true }
    }

    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for MutableSink<S> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.muted {
            return Ok(());
        }
        self.inner.write_bytes(buf)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        if self.muted {
            return Ok(());
        }
        self.inner.write_byte(byte)
    }

    fn write_range(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        if self.muted {
            return Ok(());
        }
        self.inner.write_range(buf, offset, len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

/// Forwards every write to a primary sink, then to a branch sink.
///
/// A failing primary write stops the branch write and the error propagates at once. Close is
/// attempted on both sides; when both fail the primary's error is the one returned.
#[derive(Debug)]
pub struct Tee<A, B> {
    primary: A,
    branch: B,
}

impl<A: Sink, B: Sink> Tee<A, B> {
    pub fn new(primary: A, branch: B) -> Self {
        Self { primary, branch }
    }

    pub fn primary(&self) -> &A {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut A {
        &mut self.primary
    }

    pub fn branch(&self) -> &B {
        &self.branch
    }

    pub fn branch_mut(&mut self) -> &mut B {
        &mut self.branch
    }

    pub fn into_parts(self) -> (A, B) {
        (self.primary, self.branch)
    }
}

impl<A: Sink, B: Sink> Sink for Tee<A, B> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.primary.write_bytes(buf)?;
        self.branch.write_bytes(buf)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.primary.write_byte(byte)?;
        self.branch.write_byte(byte)
    }

    fn write_range(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        self.primary.write_range(buf, offset, len)?;
        self.branch.write_range(buf, offset, len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.branch.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        let primary = self.primary.close();
        let branch = self.branch.close();
        primary.and(branch)
    }
}

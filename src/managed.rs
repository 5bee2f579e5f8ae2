//! The stream installed in place of a global stream while a rule is active.

use crate::capture::LogCapture;
use crate::encoding::TextEncoding;
use crate::sink::{MutableSink, Sink, Tee};
use crate::slot::Handle;
use std::io;

type LogBranches = Tee<MutableSink<LogCapture>, MutableSink<LogCapture>>;

/// Tees every write to the original destination, the failure log and the general log, in that order.
///
/// The original destination forwards by default; both logs start muted. A fault in one branch
/// propagates to the writer, and branches already written are not rolled back.
pub struct ManagedStream {
    tee: Tee<MutableSink<Handle<dyn Sink>>, LogBranches>,
}

impl ManagedStream {
    pub fn new(original: Handle<dyn Sink>, encoding: TextEncoding) -> Self {
        let failure_log = MutableSink::muted(LogCapture::new(encoding));
        let log = MutableSink::muted(LogCapture::new(encoding));
        Self {
            tee: Tee::new(MutableSink::new(original), Tee::new(failure_log, log)),
        }
    }

    /// Stops forwarding to the original destination. There is deliberately no way back
    /// other than leaving the scope.
    pub fn mute(&mut self) {
        self.tee.primary_mut().mute();
    }

    pub fn is_muted(&self) -> bool {
        self.tee.primary().is_muted()
    }

    pub fn enable_log(&mut self) {
        self.tee.branch_mut().branch_mut().unmute();
    }

    pub fn clear_log(&mut self) {
        self.tee.branch_mut().branch_mut().get_mut().reset();
    }

    pub fn enable_failure_log(&mut self) {
        self.tee.branch_mut().primary_mut().unmute();
    }

    /// Decoded text of the general log at call time.
    pub fn log(&self) -> String {
        self.tee.branch().branch().get_ref().decode_text()
    }

    /// Decoded text of the failure log at call time.
    pub fn failure_log(&self) -> String {
        self.tee.branch().primary().get_ref().decode_text()
    }

    /// The failure log exactly as it was written.
    pub fn failure_log_bytes(&self) -> &[u8] {
        self.tee.branch().primary().get_ref().bytes()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.tee.branch().primary().get_ref().encoding()
    }
}

impl Sink for ManagedStream {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.tee.write_bytes(buf)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.tee.write_byte(byte)
    }

    fn write_range(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        self.tee.write_range(buf, offset, len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.tee.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.tee.close()
    }
}

impl io::Write for ManagedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(self)
    }
}

//! In-memory log capture.

use crate::encoding::{EncodingError, TextEncoding};
use crate::properties::SystemProperties;
use crate::sink::Sink;
use std::io;

/// A growable byte buffer exposed as a [`Sink`].
///
/// The buffer only shrinks on [`LogCapture::reset`]. Text is decoded with the encoding fixed at
/// construction.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Vec<u8>,
    encoding: TextEncoding,
}

impl LogCapture {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            buffer: Vec::new(),
            encoding,
        }
    }

    /// Creates a capture decoding with the encoding named by the properties.
    ///
    /// # Errors
    ///
    /// Fails immediately if the encoding cannot be resolved.
    pub fn from_properties(properties: &SystemProperties) -> Result<Self, EncodingError> {
        Ok(Self::new(TextEncoding::from_properties(properties)?))
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Discards everything captured so far.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn decode_text(&self) -> String {
        self.encoding.decode(&self.buffer)
    }
}

impl Sink for LogCapture {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.append(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

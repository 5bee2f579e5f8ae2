//! Resolution of the fixed text encoding used to decode captured bytes.
//!
//! Captured bytes are byte-identical to what the real destination would have received, so they are
//! decoded with the encoding that destination uses. That encoding is read once from the
//! `file.encoding` property. On Windows, numeric code page labels (`cp1252`, `cp65001`, ...) that
//! `encoding_rs` does not know by name are resolved through the `codepage` table.

use crate::properties::{FILE_ENCODING, OS_NAME, SystemProperties};
use encoding_rs::Encoding;
use tracing::{trace, warn};

/// Error type for encoding resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The label does not name an encoding.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

/// An encoding chosen once and used for every decode afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
}

impl TextEncoding {
    /// UTF-8, the platform default everywhere except a Windows console.
    pub fn utf8() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Resolves the encoding from the `file.encoding` and `os.name` properties.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::UnsupportedEncoding`] if the label is not recognized.
    pub fn from_properties(properties: &SystemProperties) -> Result<Self, EncodingError> {
        let label = properties
            .get(FILE_ENCODING)
            .unwrap_or_else(|| "UTF-8".to_string());
        let os_name = properties.get(OS_NAME).unwrap_or_default();
        Self::for_label(&label, &os_name)
    }

    /// Resolves an encoding label as seen on the given operating system.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::UnsupportedEncoding`] if the label is not recognized.
    pub fn for_label(label: &str, os_name: &str) -> Result<Self, EncodingError> {
        let trimmed = label.trim();
        let encoding = Encoding::for_label(trimmed.as_bytes())
            .or_else(|| code_page_encoding(trimmed, os_name))
            .filter(|encoding| *encoding != encoding_rs::REPLACEMENT)
            .ok_or_else(|| EncodingError::UnsupportedEncoding(label.to_string()))?;
        trace!("Resolved encoding label \"{}\" to {}", label, encoding.name());
        Ok(Self { encoding })
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes bytes, replacing malformed sequences instead of failing.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _had_errors) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }

    /// Encodes text in this encoding.
    ///
    /// `encoding_rs` only encodes to ASCII-compatible encodings, so UTF-16 is produced here.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.encoding == encoding_rs::UTF_16LE {
            text.encode_utf16().flat_map(u16::to_le_bytes).collect()
        } else if self.encoding == encoding_rs::UTF_16BE {
            text.encode_utf16().flat_map(u16::to_be_bytes).collect()
        } else {
            let (bytes, _, _had_errors) = self.encoding.encode(text);
            bytes.into_owned()
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

/// Resolves `cpNNN` labels as Windows code page numbers.
fn code_page_encoding(label: &str, os_name: &str) -> Option<&'static Encoding> {
    if !is_windows_family(os_name) {
        return None;
    }
    let prefix = label.get(..2)?;
    if !prefix.eq_ignore_ascii_case("cp") {
        return None;
    }
    let code_page = label[2..].parse::<u16>().ok()?;
    codepage::to_encoding(code_page)
}

/// The `file.encoding` value for a Windows ANSI code page.
///
/// Code pages without an `encoding_rs` counterpart fall back to UTF-8.
pub fn file_encoding_for_code_page(code_page: u32) -> String {
    match u16::try_from(code_page).ok().and_then(codepage::to_encoding) {
        Some(encoding) if encoding != encoding_rs::REPLACEMENT => encoding.name().to_string(),
        _ => {
            warn!("Code page {} has no known encoding, using UTF-8", code_page);
            "UTF-8".to_string()
        }
    }
}

pub fn is_windows_family(os_name: &str) -> bool {
    os_name.to_ascii_lowercase().starts_with("windows")
}

//! Upload body to plain text

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Uploaded document is empty")]
    Empty,

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(&'static str),
}

/// Turns uploaded bytes into text for the segmenter
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Accepts UTF-8 text, replacing invalid sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

const BINARY_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\xD0\xCF\x11\xE0", "application/msword"),
];

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ExtractError::Empty);
        }

        if let Some(&(_, format)) = BINARY_SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
        {
            return Err(ExtractError::UnsupportedFormat(format));
        }

        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

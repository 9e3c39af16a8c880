use crate::language::Language;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Language pair {from}->{to} not supported by {provider}")]
    UnsupportedPair {
        provider: &'static str,
        from: Language,
        to: Language,
    },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Provider reported an error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslateError::Malformed(err.to_string())
        } else {
            TranslateError::Request(err.to_string())
        }
    }
}

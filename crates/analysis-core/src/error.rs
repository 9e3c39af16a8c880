//! Error types for analysis providers and the dispatcher

use std::time::Duration;
use thiserror::Error;

/// How a provider failure should be handled by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 5xx, connection failures and timeouts: retry with exponential backoff
    Transient,
    /// 401: retry a few times with a short fixed delay
    Auth,
    /// 200 with an unusable body: fall over immediately
    Malformed,
    /// Anything else: fall over immediately
    Other,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Provider reported an error: {0}")]
    Remote(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(&'static str),
}

impl ProviderError {
    /// Build from a non-success HTTP status and its body
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        ProviderError::Status {
            status,
            body: body.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Status { status, .. } => match *status {
                401 => ErrorKind::Auth,
                501 => ErrorKind::Other,
                500..=599 => ErrorKind::Transient,
                _ => ErrorKind::Other,
            },
            ProviderError::Timeout(_) | ProviderError::Connect(_) => ErrorKind::Transient,
            ProviderError::Malformed(_) => ErrorKind::Malformed,
            ProviderError::Request(_) | ProviderError::Remote(_) | ProviderError::NotConfigured(_) => {
                ErrorKind::Other
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(Duration::ZERO)
        } else if err.is_connect() {
            ProviderError::Connect(err.to_string())
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::from_status(status.as_u16(), err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

/// Unexpected failure of a single clause analysis, isolated by the dispatcher
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis task panicked: {0}")]
    Panicked(String),

    #[error("Analysis task was cancelled")]
    Cancelled,

    #[error("Analysis failed: {0}")]
    Failed(String),
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            return AnalysisError::Cancelled;
        }

        match err.try_into_panic() {
            Ok(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                AnalysisError::Panicked(message)
            }
            Err(_) => AnalysisError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ProviderError::from_status(502, "").kind(), ErrorKind::Transient);
        assert_eq!(ProviderError::from_status(503, "").kind(), ErrorKind::Transient);
        assert_eq!(ProviderError::from_status(504, "").kind(), ErrorKind::Transient);
        assert_eq!(ProviderError::from_status(401, "").kind(), ErrorKind::Auth);
        assert_eq!(ProviderError::from_status(404, "").kind(), ErrorKind::Other);
        assert_eq!(ProviderError::from_status(422, "").kind(), ErrorKind::Other);
    }

    #[test]
    fn test_timeout_is_transient() {
        assert_eq!(
            ProviderError::Timeout(Duration::from_secs(15)).kind(),
            ErrorKind::Transient
        );
    }

    #[test]
    fn test_malformed_and_unconfigured() {
        assert_eq!(
            ProviderError::Malformed("no json".into()).kind(),
            ErrorKind::Malformed
        );
        assert_eq!(
            ProviderError::NotConfigured("token").kind(),
            ErrorKind::Other
        );
    }

    #[tokio::test]
    async fn test_join_error_from_panic() {
        let handle = tokio::spawn(async { panic!("boom") });
        let err = AnalysisError::from(handle.await.unwrap_err());
        assert!(matches!(err, AnalysisError::Panicked(ref m) if m == "boom"));
    }
}

//! Port for publishing URL update notifications to an indexing service.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced while submitting a single URL.
///
/// `Service` covers responses the indexing backend explicitly rejected
/// (quota, permissions, ownership checks). `Transport` covers everything
/// that prevented a response from arriving at all.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    /// The indexing service answered with an error payload.
    #[error("indexing service rejected the URL: {message}")]
    Service {
        /// HTTP-style status code reported inside the error payload, if any.
        code: Option<u16>,
        /// Human-readable reason from the service.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("submission transport failed: {0}")]
    Transport(String),
}

impl SubmissionError {
    /// Short label used in per-URL result lines and logs.
    pub fn brief(&self) -> String {
        match self {
            Self::Service { code: Some(c), message } => format!("{c}: {message}"),
            Self::Service { code: None, message } => message.clone(),
            Self::Transport(reason) => format!("transport: {reason}"),
        }
    }
}

/// Interface for the external URL submission call.
///
/// One notifier is bound to one credential; quota bookkeeping lives in
/// [`crate::domain::entities::Channel`], not here.
///
/// # Implementations
///
/// - [`crate::infrastructure::google::IndexingApiClient`] - Google Indexing API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlNotifier: Send + Sync {
    /// Notifies the indexing service that `url` was updated and should be
    /// recrawled.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Service`] when the service acknowledges the
    /// request but reports a failure, and [`SubmissionError::Transport`] when
    /// the HTTP exchange itself fails.
    async fn publish(&self, url: &str) -> Result<(), SubmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_includes_service_code() {
        let err = SubmissionError::Service {
            code: Some(429),
            message: "Quota exceeded".to_string(),
        };
        assert_eq!(err.brief(), "429: Quota exceeded");
    }

    #[test]
    fn test_brief_without_code_is_message_only() {
        let err = SubmissionError::Service {
            code: None,
            message: "Permission denied".to_string(),
        };
        assert_eq!(err.brief(), "Permission denied");
    }

    #[test]
    fn test_brief_transport_is_prefixed() {
        let err = SubmissionError::Transport("connection reset".to_string());
        assert_eq!(err.brief(), "transport: connection reset");
    }

    #[test]
    fn test_display_includes_service_message() {
        let err = SubmissionError::Service {
            code: None,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "indexing service rejected the URL: boom");
    }
}

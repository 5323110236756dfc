//! Errors surfaced by relations queries.

use thiserror::Error;

/// A query that could not produce an answer.
///
/// Every variant carries the URL (or endpoint) involved so callers can
/// report it without extra bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The request never produced an HTTP response
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error("Request to {url} failed: HTTP {code} {status_text}")]
    Status {
        url: String,
        code: u16,
        status_text: String,
    },

    /// The configured attempt bound was reached with only empty answers
    #[error("No answer from {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: usize },

    /// The endpoint could not be turned into a request URL
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

impl QueryError {
    /// URL or endpoint the error refers to
    pub fn url(&self) -> &str {
        match self {
            QueryError::Transport { url, .. }
            | QueryError::Status { url, .. }
            | QueryError::RetriesExhausted { url, .. } => url,
            QueryError::InvalidEndpoint { endpoint, .. } => endpoint,
        }
    }

    /// Whether the failure came from the transport (connection or status)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            QueryError::Transport { .. } | QueryError::Status { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = QueryError::Status {
            url: "https://face.gob.es/api/v2/relaciones?cif=A58818501".to_string(),
            code: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://face.gob.es/api/v2/relaciones?cif=A58818501 failed: HTTP 503 Service Unavailable"
        );
        assert!(err.is_transport());
    }

    #[test]
    fn test_url_accessor() {
        let err = QueryError::InvalidEndpoint {
            endpoint: "nope".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert_eq!(err.url(), "nope");
        assert!(!err.is_transport());

        let err = QueryError::RetriesExhausted {
            url: "https://x.test/?oc=L01281230".to_string(),
            attempts: 4,
        };
        assert_eq!(err.url(), "https://x.test/?oc=L01281230");
        assert_eq!(
            err.to_string(),
            "No answer from https://x.test/?oc=L01281230 after 4 attempts"
        );
    }
}

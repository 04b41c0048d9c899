//! Error taxonomy for the gateway client
//!
//! Every failure carries enough context (kind, status code, provider message)
//! for the caller to decide whether to retry, surface, or log it.

use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MomoError>;

/// Cloneable so a failed token refresh can be handed to every caller that
/// was waiting on it.
#[derive(Error, Debug, Clone)]
pub enum MomoError {
    /// DNS, connect, timeout or body-read failure against either endpoint
    #[error("network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// Token endpoint answered with a non-200 status; `body` is opaque text
    #[error("token endpoint responded with status {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("authentication failed: {0}")]
    Authentication(#[source] Box<MomoError>),

    /// Payment endpoint answered with a non-200 status and a decodable body
    #[error("payment rejected with status {status}: {message}")]
    PaymentRejected { status: u16, message: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("failed to encode payment request: {0}")]
    Encode(#[source] Arc<serde_json::Error>),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for MomoError {
    fn from(err: reqwest::Error) -> Self {
        MomoError::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for MomoError {
    fn from(err: serde_json::Error) -> Self {
        MomoError::Encode(Arc::new(err))
    }
}

impl MomoError {
    /// HTTP status reported by the provider, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            MomoError::TokenEndpoint { status, .. } | MomoError::PaymentRejected { status, .. } => {
                Some(*status)
            }
            MomoError::Authentication(inner) => inner.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_authentication_exposes_cause() {
        let err = MomoError::Authentication(Box::new(MomoError::TokenEndpoint {
            status: 401,
            body: "invalid_client".to_string(),
        }));

        assert_eq!(err.status(), Some(401));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("invalid_client"));
        assert!(err.to_string().starts_with("authentication failed"));
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(MomoError::Validation("units".into()).status(), None);
        assert_eq!(MomoError::MalformedResponse("eof".into()).status(), None);
    }
}

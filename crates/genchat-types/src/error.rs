use std::time::Duration;
use thiserror::Error;

/// Typed failure classification for calls to the generation service.
///
/// Classification happens at the point of failure so the gateway never has
/// to pattern-match on error text to pick an HTTP status.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation API key not configured")]
    MissingApiKey,

    /// The service rejected the request itself (4xx other than auth).
    #[error("generation service rejected the request (status {status}): {message}")]
    InvalidRequest { status: u16, message: String },

    /// The service rejected our credentials.
    #[error("generation service rejected credentials (status {status}): {message}")]
    Auth { status: u16, message: String },

    /// The deadline elapsed before the service answered.
    #[error("generation request timed out after {0:?}")]
    Timeout(Duration),

    /// The service failed on its side (429 or 5xx).
    #[error("generation service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error reaching generation service: {0}")]
    Network(String),

    /// A 2xx response whose body did not parse as a chat.
    #[error("malformed response from generation service: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Classify a non-success HTTP status returned by the service.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => GenerationError::Auth { status, message },
            429 => GenerationError::Api { status, message },
            400..=499 => GenerationError::InvalidRequest { status, message },
            _ => GenerationError::Api { status, message },
        }
    }

    /// Whether the retry loop should attempt the call again.
    pub fn is_retriable(&self) -> bool {
        match self {
            GenerationError::Timeout(_)
            | GenerationError::Network(_)
            | GenerationError::Api { .. } => true,
            GenerationError::MissingApiKey
            | GenerationError::InvalidRequest { .. }
            | GenerationError::Auth { .. }
            | GenerationError::InvalidResponse(_) => false,
        }
    }

    /// HTTP status the gateway reports for this failure.
    pub fn http_status(&self) -> u16 {
        match self {
            GenerationError::Auth { status, .. } => *status,
            GenerationError::Timeout(_) => 504,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            GenerationError::from_status(401, "bad key".into()),
            GenerationError::Auth { status: 401, .. }
        ));
        assert!(matches!(
            GenerationError::from_status(403, "forbidden".into()),
            GenerationError::Auth { status: 403, .. }
        ));
        assert!(matches!(
            GenerationError::from_status(429, "slow down".into()),
            GenerationError::Api { status: 429, .. }
        ));
        assert!(matches!(
            GenerationError::from_status(422, "bad body".into()),
            GenerationError::InvalidRequest { .. }
        ));
        assert!(matches!(
            GenerationError::from_status(503, "down".into()),
            GenerationError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn retry_policy_by_kind() {
        assert!(GenerationError::Network("reset".into()).is_retriable());
        assert!(GenerationError::Timeout(Duration::from_secs(1)).is_retriable());
        assert!(GenerationError::from_status(500, "boom".into()).is_retriable());
        assert!(!GenerationError::from_status(401, "no".into()).is_retriable());
        assert!(!GenerationError::from_status(400, "no".into()).is_retriable());
        assert!(!GenerationError::MissingApiKey.is_retriable());
        assert!(!GenerationError::InvalidResponse("not json".into()).is_retriable());
    }

    #[test]
    fn gateway_status_mapping() {
        assert_eq!(GenerationError::Auth { status: 401, message: String::new() }.http_status(), 401);
        assert_eq!(GenerationError::Auth { status: 403, message: String::new() }.http_status(), 403);
        assert_eq!(GenerationError::Timeout(Duration::from_secs(600)).http_status(), 504);
        assert_eq!(GenerationError::MissingApiKey.http_status(), 500);
        assert_eq!(GenerationError::Network("reset".into()).http_status(), 500);
    }
}

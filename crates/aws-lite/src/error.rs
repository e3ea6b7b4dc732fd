//! Error type shared by the client and both service builders.
//!
//! Construction and option-validation failures are returned straight to the
//! caller. Everything that happens after a request is issued (transport
//! failures, service rejections, unreadable payloads) arrives through the
//! request's result instead.

use std::fmt;

/// Top-level error type for all client operations.
#[derive(Debug)]
pub enum AwsError {
    /// Missing or malformed client configuration.
    Config(String),
    /// A required request option was not supplied.
    Usage(String),
    /// The HTTP layer failed before a response was read. Carried verbatim.
    Transport(reqwest::Error),
    /// The service rejected the request.
    Api {
        /// Service tag, e.g. `EC2` or `Route53`.
        service: &'static str,
        /// HTTP status of the rejection.
        status: u16,
        /// `RequestID` reported by the service, if any.
        request_id: Option<String>,
        /// Aggregated, service-formatted message.
        message: String,
    },
    /// A successful response whose payload is itself error-shaped.
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) | Self::Usage(msg) => f.write_str(msg),
            Self::Transport(err) => write!(f, "{}", err),
            Self::Api { message, .. } => f.write_str(message),
            Self::InvalidResponse { service, message } => write!(f, "[{}] {}", service, message),
        }
    }
}

impl std::error::Error for AwsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl AwsError {
    /// Build a configuration error.
    pub fn config(message: &str) -> Self {
        Self::Config(message.to_string())
    }

    /// Build a usage error.
    pub fn usage(message: &str) -> Self {
        Self::Usage(message.to_string())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// HTTP status for API rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Service request ID, when the rejection carried one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AwsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

/// Convenience result type for client operations.
pub type AwsResult<T> = Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_message_only() {
        let err = AwsError::Api {
            service: "EC2",
            status: 400,
            request_id: Some("req-1".into()),
            message: "[EC2] A B".into(),
        };
        assert_eq!(err.to_string(), "[EC2] A B");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.request_id(), Some("req-1"));
        assert!(err.is_api());
    }

    #[test]
    fn config_and_usage_display() {
        let err = AwsError::config("Amazon AWS credentials are not provided");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "Amazon AWS credentials are not provided");

        let err = AwsError::usage("No callback defined");
        assert!(err.is_usage());
        assert!(!err.is_api());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn invalid_response_is_tagged() {
        let err = AwsError::InvalidResponse {
            service: "Route53",
            message: "unexpected end of document".into(),
        };
        assert_eq!(err.to_string(), "[Route53] unexpected end of document");
        assert!(std::error::Error::source(&err).is_none());
    }
}

//! Error types for Marathon operations.
//!
//! Failures are surfaced as they happened: transport errors keep the native
//! [`reqwest::Error`] as their source and non-2xx responses carry the status and
//! the raw response body. Nothing is remapped by status class.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for Marathon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect, DNS, timeout, ...)
    #[error("HTTP transport failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Marathon returned {status}: {body}")]
    Status {
        /// Response status code
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// The request body could not be encoded as JSON; nothing was sent
    #[error("Failed to encode request body for `{path}`: {message}")]
    Encode {
        /// Request path the body was meant for
        path: String,
        /// Encoder message
        message: String,
    },

    /// A 2xx response body could not be decoded as JSON
    #[error("Failed to decode Marathon response for `{path}`: {message}")]
    Decode {
        /// Request path the body belongs to
        path: String,
        /// Decoder message
        message: String,
    },

    /// Invalid endpoint or URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Query mapping that cannot be expressed as key/value pairs
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for Marathon operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Encode { .. } => "ENCODE_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Status code of a non-2xx response, if that is what failed.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Raw body of a non-2xx response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Parse the body of a non-2xx response as JSON.
    ///
    /// Marathon usually answers errors with `{"message": ...}`; returns `None`
    /// when there is no body or it is not JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body()
            .and_then(|body| serde_json::from_str(body).ok())
    }

    /// Returns true for a 404 response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns true for a 409 response (e.g. a deployment is already in progress).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// Returns true when the transport gave up waiting.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode, body: &str) -> Error {
        Error::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "").error_code(),
            "HTTP_STATUS"
        );
        assert_eq!(
            Error::Decode {
                path: "v2/apps".to_string(),
                message: "eof".to_string()
            }
            .error_code(),
            "DECODE_ERROR"
        );
        assert_eq!(
            Error::Encode {
                path: "v2/apps".to_string(),
                message: "key must be a string".to_string()
            }
            .error_code(),
            "ENCODE_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::InvalidQuery("test".to_string()).error_code(),
            "INVALID_QUERY"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = status_error(StatusCode::CONFLICT, r#"{"message":"App is locked"}"#);
        assert_eq!(
            err.to_string(),
            r#"Marathon returned 409 Conflict: {"message":"App is locked"}"#
        );
    }

    #[test]
    fn test_status_accessors() {
        let err = status_error(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some("missing"));
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
        assert!(!err.is_timeout());

        let err = Error::ConfigError("bad".to_string());
        assert!(err.status().is_none());
        assert!(err.body().is_none());
    }

    #[test]
    fn test_body_json() {
        let err = status_error(StatusCode::CONFLICT, r#"{"message":"locked"}"#);
        assert_eq!(
            err.body_json(),
            Some(serde_json::json!({"message": "locked"}))
        );
        assert!(status_error(StatusCode::BAD_GATEWAY, "<html>").body_json().is_none());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let marathon_err: Error = err.into();
        assert!(matches!(marathon_err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_from_reqwest_error_keeps_source() {
        let err = reqwest::get("http://127.0.0.1:1/").await.unwrap_err();
        let marathon_err: Error = err.into();
        assert!(matches!(marathon_err, Error::Transport(_)));
        assert_eq!(marathon_err.error_code(), "TRANSPORT_ERROR");
        assert!(std::error::Error::source(&marathon_err).is_some());
    }
}

/// Error types shared across the application
///
/// Errors that travel inside iced messages must be `Clone`, so the
/// variants carry rendered strings instead of the source error values.

use thiserror::Error;

/// Message shown under the drop zone when a batch contains a non-image file
pub const NON_IMAGE_MESSAGE: &str = "Please provide only image files to upload!";

/// Failures while loading settings from the environment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
}

/// Failures talking to the gallery API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection, timeout)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// The response body did not have the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A URL could not be built from the configured base
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The local file to upload could not be read
    #[error("could not read {name}: {reason}")]
    Io { name: String, reason: String },
}

impl ApiError {
    /// Text shown to the user in a failure notification.
    ///
    /// For server errors this is the `detail` field of the response body.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Server { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Failures while turning selected or dropped files into queue entries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("{}", NON_IMAGE_MESSAGE)]
    NonImage { name: String },

    #[error("Could not read {name}: {reason}")]
    Unreadable { name: String, reason: String },
}

/// Failures while generating a preview or gallery thumbnail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    #[error("could not read file: {0}")]
    Read(String),

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("preview task failed: {0}")]
    Join(String),
}

impl From<image::ImageError> for PreviewError {
    fn from(err: image::ImageError) -> Self {
        PreviewError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_is_shown_verbatim() {
        let err = ApiError::Server {
            status: 409,
            detail: "face.jpg has already in the database.".to_string(),
        };
        assert_eq!(err.detail(), "face.jpg has already in the database.");
        assert_eq!(err.to_string(), "face.jpg has already in the database.");
    }

    #[test]
    fn test_transport_detail_includes_context() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.detail(), "request failed: connection refused");
    }

    #[test]
    fn test_non_image_message() {
        let err = IntakeError::NonImage { name: "notes.txt".to_string() };
        assert_eq!(err.to_string(), NON_IMAGE_MESSAGE);
    }
}

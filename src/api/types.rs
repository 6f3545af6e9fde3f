/// Wire types for the gallery API

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Body of `GET images`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageList {
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub number_of_images: Option<u64>,
}

/// The list may arrive flat or nested under `data`
#[derive(Deserialize)]
#[serde(untagged)]
enum ImageListBody {
    Nested { data: ImageList },
    Flat(ImageList),
}

impl ImageList {
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let parsed: ImageListBody = serde_json::from_slice(body)?;
        Ok(match parsed {
            ImageListBody::Nested { data } => data,
            ImageListBody::Flat(list) => list,
        })
    }
}

/// Body of a successful `POST images/`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadReceipt {
    /// Parse the receipt, tolerating empty or non-JSON bodies
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Bytes sent so far for an in-flight upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Completed fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.sent as f64 / self.total as f64).min(1.0) as f32
        }
    }
}

/// Build the error for a non-2xx response from its status and raw body
pub fn server_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .unwrap_or_default()
        .detail;

    ApiError::Server {
        status: status.as_u16(),
        detail: detail_text(detail, status),
    }
}

/// Coerce a `detail` value to display text.
///
/// Strings are used verbatim, other JSON values are rendered compactly,
/// and a missing detail falls back to the status line.
fn detail_text(detail: Option<Value>, status: StatusCode) -> String {
    match detail {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => status
            .canonical_reason()
            .map(|reason| format!("{} {}", status.as_u16(), reason))
            .unwrap_or_else(|| status.as_u16().to_string()),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_list() {
        let body = br#"{"number_of_images": 2, "image_urls": ["http://h/a.jpg", "http://h/b.jpg"]}"#;
        let list = ImageList::from_json(body).unwrap();
        assert_eq!(list.image_urls, vec!["http://h/a.jpg", "http://h/b.jpg"]);
        assert_eq!(list.number_of_images, Some(2));
    }

    #[test]
    fn test_nested_image_list() {
        let body = br#"{"data": {"image_urls": ["x.png"]}}"#;
        let list = ImageList::from_json(body).unwrap();
        assert_eq!(list.image_urls, vec!["x.png"]);
        assert_eq!(list.number_of_images, None);
    }

    #[test]
    fn test_missing_urls_is_decode_error() {
        let body = br#"{"number_of_image": 3}"#;
        assert!(matches!(ImageList::from_json(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_string_detail_is_verbatim() {
        let err = server_error(
            StatusCode::BAD_REQUEST,
            br#"{"detail": "Image file needs to be sent!"}"#,
        );
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                detail: "Image file needs to be sent!".to_string()
            }
        );
    }

    #[test]
    fn test_structured_detail_is_compact_json() {
        let err = server_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail": [{"loc": ["body", "img_file"], "msg": "field required"}]}"#,
        );
        assert_eq!(
            err.detail(),
            r#"[{"loc":["body","img_file"],"msg":"field required"}]"#
        );

        let err = server_error(StatusCode::CONFLICT, br#"{"detail": 42}"#);
        assert_eq!(err.detail(), "42");
    }

    #[test]
    fn test_missing_detail_falls_back_to_status() {
        let err = server_error(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.detail(), "500 Internal Server Error");

        let err = server_error(StatusCode::NOT_FOUND, br#"{"detail": null}"#);
        assert_eq!(err.detail(), "404 Not Found");
    }

    #[test]
    fn test_receipt_tolerates_empty_body() {
        assert_eq!(UploadReceipt::from_body(b""), UploadReceipt::default());
        assert_eq!(
            UploadReceipt::from_body(br#"{"message": "saved"}"#).message.as_deref(),
            Some("saved")
        );
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(UploadProgress { sent: 0, total: 0 }.fraction(), 1.0);
        assert_eq!(UploadProgress { sent: 50, total: 200 }.fraction(), 0.25);
    }
}

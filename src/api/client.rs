use bytes::Bytes;
use futures_util::{stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, Url};

use super::types::{server_error, ImageList, UploadProgress, UploadReceipt};
use crate::config::Settings;
use crate::error::ApiError;
use crate::state::data::MediaFile;

/// Multipart field the API reads the uploaded image from
pub const UPLOAD_FIELD: &str = "img_file";

/// Size of the body chunks handed to the transport during an upload
const UPLOAD_CHUNK: usize = 64 * 1024;

/// Thin HTTP client for the gallery API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the configured base URL
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_http(builder.build()?, settings.api_url.clone()))
    }

    pub fn with_http(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET images`
    pub async fn list_images(&self) -> Result<ImageList, ApiError> {
        let url = self.endpoint("images")?;
        tracing::debug!(%url, "Fetching image list");

        let response = self.http.get(url).send().await?;
        let body = Self::read_success(response).await?;
        let list = ImageList::from_json(&body)?;

        tracing::info!(count = list.image_urls.len(), reported = ?list.number_of_images, "Image list fetched");
        Ok(list)
    }

    /// `POST images/` with the file in the `img_file` multipart field.
    ///
    /// The body is streamed in chunks and `on_progress` is called as each
    /// chunk is handed to the transport.
    pub async fn upload_image<F>(&self, file: &MediaFile, mut on_progress: F) -> Result<UploadReceipt, ApiError>
    where
        F: FnMut(UploadProgress) + Send + Sync + 'static,
    {
        let url = self.endpoint("images/")?;

        let bytes = file.read_bytes().await.map_err(|e| ApiError::Io {
            name: file.name.clone(),
            reason: e.to_string(),
        })?;
        let bytes = Bytes::from(bytes);
        let len = bytes.len();
        let total = len as u64;

        // Chunks are views into the one buffer
        let mut sent = 0u64;
        let body = stream::iter((0..len).step_by(UPLOAD_CHUNK)).map(move |start| {
            let chunk = bytes.slice(start..(start + UPLOAD_CHUNK).min(len));
            sent += chunk.len() as u64;
            on_progress(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!(file = %file.name, bytes = total, "Uploading image");
        let response = self.http.post(url).multipart(form).send().await?;
        let body = Self::read_success(response).await?;
        let receipt = UploadReceipt::from_body(&body);

        tracing::info!(file = %file.name, message = ?receipt.message, "Upload accepted");
        Ok(receipt)
    }

    /// Download the bytes behind a gallery URL (absolute, or relative to the base)
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(url)?;
        let response = self.http.get(url).send().await?;
        Self::read_success(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::InvalidUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Return the body of a 2xx response, or the server error otherwise
    async fn read_success(response: Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let err = server_error(status, &body);
        tracing::warn!(%url, status = status.as_u16(), detail = %err, "API request failed");
        Err(err)
    }
}

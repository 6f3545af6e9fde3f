/// Long-running transfers as streams of events the UI can subscribe to

use futures_util::{stream, StreamExt};
use iced::futures::{SinkExt, Stream};

use super::client::ApiClient;
use super::types::{UploadProgress, UploadReceipt};
use crate::error::ApiError;
use crate::media::preview::{thumbnail_from_bytes, Thumbnail, GALLERY_THUMB_SIZE};
use crate::state::data::MediaFile;

/// Progress reports are dropped rather than queued past this many
const PROGRESS_BUFFER: usize = 16;

/// Gallery thumbnails downloaded and decoded at the same time
const THUMBNAIL_DOWNLOADS: usize = 4;

#[derive(Debug, Clone)]
pub enum TransferEvent {
    Progress(UploadProgress),
    Finished(Result<UploadReceipt, ApiError>),
}

/// Upload `file`, yielding progress events and exactly one `Finished`
pub fn upload(client: ApiClient, file: MediaFile) -> impl Stream<Item = TransferEvent> {
    iced::stream::channel(PROGRESS_BUFFER, move |mut output| async move {
        let mut progress = output.clone();
        let result = client
            .upload_image(&file, move |p| {
                // Dropped when the buffer is full
                let _ = progress.try_send(TransferEvent::Progress(p));
            })
            .await;

        if let Err(err) = &result {
            tracing::warn!(file = %file.name, error = %err, "Upload failed");
        }

        let _ = output.send(TransferEvent::Finished(result)).await;
    })
}

/// Download and shrink gallery images, at most `THUMBNAIL_DOWNLOADS` at once.
///
/// Yields each URL with its result in completion order.
pub fn thumbnails(client: ApiClient, urls: Vec<String>) -> impl Stream<Item = (String, Result<Thumbnail, String>)> {
    stream::iter(urls)
        .map(move |url| {
            let client = client.clone();
            async move {
                let result = load_thumbnail(&client, &url).await;
                (url, result)
            }
        })
        .buffer_unordered(THUMBNAIL_DOWNLOADS)
}

async fn load_thumbnail(client: &ApiClient, url: &str) -> Result<Thumbnail, String> {
    let bytes = client.fetch_bytes(url).await.map_err(|e| e.to_string())?;
    thumbnail_from_bytes(bytes, GALLERY_THUMB_SIZE)
        .await
        .map_err(|e| e.to_string())
}

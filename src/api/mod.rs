/// Gallery API access
///
/// - `client.rs` - HTTP client for listing, uploading and downloading images
/// - `types.rs` - wire types and error-body handling
/// - `transfer.rs` - upload as a stream of progress events for the UI

pub mod client;
pub mod transfer;
pub mod types;

pub use client::ApiClient;
pub use types::{ImageList, UploadProgress, UploadReceipt};

/// State management module
///
/// This module handles all application state, including:
/// - Selected files and their metadata (data.rs)
/// - The pending upload queue (queue.rs)
/// - Simulated loading flags and previews per queued file (workflow.rs)
/// - The query cache for server data (cache.rs)
/// - The upload mutation state machine (mutation.rs)
/// - Toast notifications (notifications.rs)
/// - Gallery search and thumbnails (gallery.rs)

pub mod cache;
pub mod data;
pub mod gallery;
pub mod mutation;
pub mod notifications;
pub mod queue;
pub mod workflow;

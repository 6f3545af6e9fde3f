/// Upload mutation state machine
///
/// idle → pending → (success | error) → settled
///
/// The mutation does no I/O. It tracks status and, when the request
/// settles, returns the effects the application must apply: notifications
/// to show and cache keys to invalidate.

use chrono::{DateTime, Utc};

use super::cache::QueryKey;
use super::notifications::NotificationKind;
use crate::api::{UploadProgress, UploadReceipt};
use crate::error::ApiError;
use crate::format::format_timestamp;

pub const SUCCESS_TITLE: &str = "Upload media file successfully";
pub const FAILURE_TITLE: &str = "Upload media file failed";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending {
        file_name: String,
        progress: Option<UploadProgress>,
    },
    Success,
    Error(String),
}

/// Follow-up work produced when a mutation settles
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEffect {
    Notify {
        kind: NotificationKind,
        title: String,
        description: String,
    },
    Invalidate(QueryKey),
}

#[derive(Debug, Default)]
pub struct UploadMutation {
    status: MutationStatus,
}

impl UploadMutation {
    pub fn new() -> Self {
        Self::default()
    }

    /// idle → pending
    pub fn start(&mut self, file_name: impl Into<String>) {
        self.status = MutationStatus::Pending {
            file_name: file_name.into(),
            progress: None,
        };
    }

    /// Record transfer progress while pending
    pub fn progress(&mut self, update: UploadProgress) {
        if let MutationStatus::Pending { progress, .. } = &mut self.status {
            *progress = Some(update);
        }
    }

    /// pending → success | error → settled.
    ///
    /// Both branches invalidate the image list, and the settled step
    /// invalidates it again; the cache coalesces these.
    pub fn settle(&mut self, result: Result<UploadReceipt, ApiError>, now: DateTime<Utc>) -> Vec<MutationEffect> {
        let mut effects = Vec::with_capacity(4);

        match result {
            Ok(_) => {
                self.status = MutationStatus::Success;
                effects.push(MutationEffect::Notify {
                    kind: NotificationKind::Success,
                    title: SUCCESS_TITLE.to_string(),
                    description: format_timestamp(now),
                });
                effects.push(MutationEffect::Invalidate(QueryKey::IMAGES));
            }
            Err(err) => {
                let detail = err.detail();
                self.status = MutationStatus::Error(detail.clone());
                effects.push(MutationEffect::Notify {
                    kind: NotificationKind::Failure,
                    title: FAILURE_TITLE.to_string(),
                    description: detail,
                });
                effects.push(MutationEffect::Invalidate(QueryKey::IMAGES));
            }
        }

        // settled
        effects.push(MutationEffect::Invalidate(QueryKey::IMAGES));
        effects
    }


    pub fn is_pending(&self) -> bool {
        matches!(self.status, MutationStatus::Pending { .. })
    }

    /// Detail of the last upload when it failed
    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            MutationStatus::Error(detail) => Some(detail),
            _ => None,
        }
    }

    /// Transfer progress of the pending upload, if any was reported
    pub fn pending_progress(&self) -> Option<UploadProgress> {
        match &self.status {
            MutationStatus::Pending { progress, .. } => *progress,
            _ => None,
        }
    }
}

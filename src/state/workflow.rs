/// Upload workflow: queue, simulated loading flags and previews
///
/// Every file that enters the queue gets a ticket. The preview reader and
/// the loading timer started for it report back with that ticket, so
/// results for files that were removed (or replaced by a same-named file)
/// are ignored.

use iced::widget::image::Handle;
use std::collections::HashMap;
use std::time::Duration;

use super::data::MediaFile;
use super::queue::UploadQueue;
use crate::error::IntakeError;
use crate::media::timing::simulated_duration;

/// Preview of a queued file
#[derive(Debug, Clone)]
pub enum Preview {
    Ready(Handle),
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
struct LoadingEntry {
    ticket: u64,
    active: bool,
}

/// Background work to start for a file that just entered the queue
#[derive(Debug, Clone)]
pub struct Started {
    pub file: MediaFile,
    pub ticket: u64,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct UploadWorkflow {
    queue: UploadQueue,
    loading: HashMap<String, LoadingEntry>,
    previews: HashMap<String, Preview>,
    next_ticket: u64,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self {
            queue: UploadQueue::new(),
            loading: HashMap::new(),
            previews: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Validate and enqueue a batch, returning the work to start for new files
    pub fn accept(&mut self, batch: Vec<MediaFile>) -> Result<Vec<Started>, IntakeError> {
        self.queue.intake(batch)?;
        Ok(self.start_new())
    }

    /// Show an intake failure without touching the queue
    pub fn reject(&mut self, err: &IntakeError) {
        self.queue.reject(err);
    }

    /// Start every queued file absent from the loading map.
    ///
    /// Same-named files arriving together are all started; the last one
    /// owns the name, so its preview wins.
    fn start_new(&mut self) -> Vec<Started> {
        let fresh: Vec<MediaFile> = self
            .queue
            .files()
            .iter()
            .filter(|file| !self.loading.contains_key(&file.name))
            .cloned()
            .collect();

        fresh
            .into_iter()
            .map(|file| {
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.loading
                    .insert(file.name.clone(), LoadingEntry { ticket, active: true });

                Started {
                    duration: simulated_duration(file.size),
                    file,
                    ticket,
                }
            })
            .collect()
    }

    /// The simulated timer fired. Returns false for stale tickets.
    pub fn loading_elapsed(&mut self, name: &str, ticket: u64) -> bool {
        match self.loading.get_mut(name) {
            Some(entry) if entry.ticket == ticket => {
                entry.active = false;
                true
            }
            _ => false,
        }
    }

    /// A preview finished. Returns false for stale tickets.
    pub fn preview_ready(&mut self, name: &str, ticket: u64, preview: Preview) -> bool {
        match self.loading.get(name) {
            Some(entry) if entry.ticket == ticket => {
                self.previews.insert(name.to_string(), preview);
                true
            }
            _ => false,
        }
    }

    /// Remove the first queued file with this name.
    ///
    /// Returns the ticket whose background work should be cancelled, which
    /// only happens once no other queued file shares the name.
    pub fn remove(&mut self, name: &str) -> Option<u64> {
        self.queue.remove(name)?;
        if self.queue.contains(name) {
            return None;
        }

        self.previews.remove(name);
        self.loading.remove(name).map(|entry| entry.ticket)
    }

    /// Drop every queued file and its state
    pub fn clear(&mut self) {
        self.queue.clear();
        self.previews.clear();
        self.loading.clear();
    }

    /// Take the first queued file for upload and clear everything else
    pub fn submit(&mut self) -> Option<MediaFile> {
        let first = self.queue.take_first()?;
        self.previews.clear();
        self.loading.clear();
        Some(first)
    }

    pub fn files(&self) -> &[MediaFile] {
        self.queue.files()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.queue.error()
    }

    /// True while the simulated upload for this name is running
    pub fn is_loading(&self, name: &str) -> bool {
        self.loading.get(name).is_some_and(|entry| entry.active)
    }

    pub fn preview(&self, name: &str) -> Option<&Preview> {
        self.previews.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NON_IMAGE_MESSAGE;

    fn image(name: &str, size: usize) -> MediaFile {
        MediaFile::from_bytes(name, "image/jpeg", vec![0; size])
    }

    fn failed() -> Preview {
        Preview::Failed("decode".to_string())
    }

    #[test]
    fn test_accept_starts_each_new_file() {
        let mut flow = UploadWorkflow::new();
        let started = flow.accept(vec![image("a.jpg", 10), image("b.jpg", 3_000_000)]).unwrap();

        assert_eq!(started.len(), 2);
        assert_eq!(started[0].duration, Duration::from_millis(1000));
        assert_eq!(started[1].duration, Duration::from_millis(4000));
        assert!(flow.is_loading("a.jpg"));
        assert!(flow.is_loading("b.jpg"));

        let more = flow.accept(vec![image("c.jpg", 10)]).unwrap();
        assert_eq!(more.len(), 1);
        assert_eq!(more[0].file.name, "c.jpg");
    }

    #[test]
    fn test_rejected_batch_starts_nothing() {
        let mut flow = UploadWorkflow::new();
        let result = flow.accept(vec![image("a.jpg", 10), MediaFile::from_bytes("x.pdf", "application/pdf", vec![])]);
        assert!(result.is_err());
        assert!(flow.is_empty());
        assert_eq!(flow.error(), Some(NON_IMAGE_MESSAGE));
        assert!(!flow.is_loading("a.jpg"));
    }

    #[test]
    fn test_timer_and_preview_complete_independently() {
        let mut flow = UploadWorkflow::new();
        let started = flow.accept(vec![image("a.jpg", 10)]).unwrap();
        let ticket = started[0].ticket;

        assert!(flow.preview_ready("a.jpg", ticket, failed()));
        assert!(flow.is_loading("a.jpg"));
        assert!(matches!(flow.preview("a.jpg"), Some(Preview::Failed(_))));

        assert!(flow.loading_elapsed("a.jpg", ticket));
        assert!(!flow.is_loading("a.jpg"));
    }

    #[test]
    fn test_removed_file_ignores_late_results() {
        let mut flow = UploadWorkflow::new();
        let started = flow.accept(vec![image("a.jpg", 10), image("b.jpg", 10)]).unwrap();
        let ticket_a = started[0].ticket;

        assert_eq!(flow.remove("a.jpg"), Some(ticket_a));
        assert_eq!(flow.files().len(), 1);
        assert!(!flow.loading_elapsed("a.jpg", ticket_a));
        assert!(!flow.preview_ready("a.jpg", ticket_a, failed()));
        assert!(flow.preview("a.jpg").is_none());

        let again = flow.accept(vec![image("a.jpg", 10)]).unwrap();
        assert_eq!(again.len(), 1);
        assert_ne!(again[0].ticket, ticket_a);
    }

    #[test]
    fn test_same_name_in_one_batch_last_wins() {
        let mut flow = UploadWorkflow::new();
        let started = flow.accept(vec![image("dup.jpg", 10), image("dup.jpg", 20)]).unwrap();
        assert_eq!(started.len(), 2);

        let (first, last) = (started[0].ticket, started[1].ticket);
        assert!(!flow.preview_ready("dup.jpg", first, failed()));
        assert!(flow.preview_ready("dup.jpg", last, failed()));

        assert_eq!(flow.remove("dup.jpg"), None);
        assert!(flow.is_loading("dup.jpg"));
        assert_eq!(flow.remove("dup.jpg"), Some(last));
    }

    #[test]
    fn test_submit_sends_first_and_clears() {
        let mut flow = UploadWorkflow::new();
        flow.accept(vec![image("1.jpg", 10), image("2.jpg", 10), image("3.jpg", 10)]).unwrap();

        let sent = flow.submit().unwrap();
        assert_eq!(sent.name, "1.jpg");
        assert!(flow.is_empty());
        assert!(!flow.is_loading("2.jpg"));
        assert!(flow.submit().is_none());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut flow = UploadWorkflow::new();
        let started = flow.accept(vec![image("1.jpg", 10)]).unwrap();
        flow.clear();

        assert!(flow.is_empty());
        assert!(!flow.loading_elapsed("1.jpg", started[0].ticket));
    }
}

/// The ordered list of files waiting to be uploaded

use super::data::MediaFile;
use crate::error::IntakeError;

/// Pending-file queue plus the inline error shown under the drop zone.
///
/// Insertion order is display order. Only image files are ever appended.
#[derive(Debug, Default)]
pub struct UploadQueue {
    files: Vec<MediaFile>,
    error: Option<String>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of files.
    ///
    /// A single non-image file rejects the whole batch: nothing is appended
    /// and the error message is set. On success the error is cleared and the
    /// number of appended files is returned.
    pub fn intake(&mut self, batch: Vec<MediaFile>) -> Result<usize, IntakeError> {
        if let Some(bad) = batch.iter().find(|file| !file.is_image()) {
            let err = IntakeError::NonImage { name: bad.name.clone() };
            self.reject(&err);
            return Err(err);
        }

        let count = batch.len();
        self.files.extend(batch);
        self.error = None;
        Ok(count)
    }

    /// Record an intake failure that happened before validation
    pub fn reject(&mut self, err: &IntakeError) {
        self.error = Some(err.to_string());
    }

    /// Remove the first file with the given name
    pub fn remove(&mut self, name: &str) -> Option<MediaFile> {
        let index = self.files.iter().position(|file| file.name == name)?;
        Some(self.files.remove(index))
    }

    /// Drop every queued file
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Take the first file for submission, clearing the queue and the error.
    ///
    /// Only one file is ever sent even when several are queued.
    pub fn take_first(&mut self) -> Option<MediaFile> {
        self.error = None;
        let mut drained = self.files.drain(..);
        drained.next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.name == name)
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }


    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NON_IMAGE_MESSAGE;

    fn image(name: &str) -> MediaFile {
        MediaFile::from_bytes(name, "image/png", vec![0; 10])
    }

    fn text(name: &str) -> MediaFile {
        MediaFile::from_bytes(name, "text/plain", vec![0; 10])
    }

    fn names(queue: &UploadQueue) -> Vec<&str> {
        queue.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_image_batch_is_appended() {
        let mut queue = UploadQueue::new();
        queue.intake(vec![image("a.png")]).unwrap();

        let added = queue.intake(vec![image("b.png"), image("c.png")]).unwrap();
        assert_eq!(added, 2);
        assert_eq!(names(&queue), vec!["a.png", "b.png", "c.png"]);
        assert_eq!(queue.error(), None);
    }

    #[test]
    fn test_mixed_batch_is_rejected_whole() {
        let mut queue = UploadQueue::new();
        queue.intake(vec![image("a.png")]).unwrap();

        let result = queue.intake(vec![image("b.png"), text("notes.txt"), image("c.png")]);
        assert!(matches!(result, Err(IntakeError::NonImage { ref name }) if name == "notes.txt"));
        assert_eq!(names(&queue), vec!["a.png"]);
        assert_eq!(queue.error(), Some(NON_IMAGE_MESSAGE));
    }

    #[test]
    fn test_valid_batch_clears_previous_error() {
        let mut queue = UploadQueue::new();
        let _ = queue.intake(vec![text("notes.txt")]);
        assert!(queue.error().is_some());

        queue.intake(vec![image("a.png")]).unwrap();
        assert_eq!(queue.error(), None);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let mut queue = UploadQueue::new();
        queue
            .intake(vec![image("a.png"), image("dup.png"), image("b.png"), image("dup.png")])
            .unwrap();

        let removed = queue.remove("dup.png").unwrap();
        assert_eq!(removed.name, "dup.png");
        assert_eq!(names(&queue), vec!["a.png", "b.png", "dup.png"]);

        assert!(queue.remove("missing.png").is_none());
        assert_eq!(queue.files().len(), 3);
    }

    #[test]
    fn test_take_first_sends_one_and_clears_all() {
        let mut queue = UploadQueue::new();
        queue
            .intake(vec![image("1.png"), image("2.png"), image("3.png"), image("4.png"), image("5.png")])
            .unwrap();

        let first = queue.take_first().unwrap();
        assert_eq!(first.name, "1.png");
        assert!(queue.is_empty());
        assert_eq!(queue.error(), None);

        assert!(queue.take_first().is_none());
    }
}

/// Gallery view state: search filter and per-URL thumbnails

use iced::widget::image::Handle;
use std::collections::HashMap;

/// Download state of one gallery thumbnail
#[derive(Debug, Clone)]
pub enum Thumb {
    Loading,
    Ready(Handle),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Gallery {
    pub search: String,
    thumbs: HashMap<String, Thumb>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the URLs of a freshly fetched list.
    ///
    /// Returns the URLs whose thumbnails must be downloaded and forgets
    /// thumbnails for URLs that left the list.
    pub fn sync(&mut self, urls: &[String]) -> Vec<String> {
        self.thumbs.retain(|url, _| urls.contains(url));

        let mut missing = Vec::new();
        for url in urls {
            if !self.thumbs.contains_key(url) {
                self.thumbs.insert(url.clone(), Thumb::Loading);
                missing.push(url.clone());
            }
        }
        missing
    }

    /// Store a downloaded thumbnail; ignored if the URL is no longer tracked
    pub fn thumb_loaded(&mut self, url: &str, result: Result<Handle, String>) {
        if let Some(slot) = self.thumbs.get_mut(url) {
            *slot = match result {
                Ok(handle) => Thumb::Ready(handle),
                Err(err) => {
                    tracing::warn!(%url, error = %err, "Gallery thumbnail failed");
                    Thumb::Failed(err)
                }
            };
        }
    }

    pub fn thumb(&self, url: &str) -> Option<&Thumb> {
        self.thumbs.get(url)
    }
}

/// Case-insensitive substring filter over image URLs, preserving order
pub fn filter_urls<'a>(urls: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    urls.iter()
        .map(String::as_str)
        .filter(|url| needle.is_empty() || url.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_empty_query_keeps_all() {
        let list = urls(&["http://h/b.jpg", "http://h/a.jpg"]);
        assert_eq!(filter_urls(&list, ""), vec!["http://h/b.jpg", "http://h/a.jpg"]);
        assert_eq!(filter_urls(&list, "   ").len(), 2);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let list = urls(&["http://h/Alice_1.jpg", "http://h/bob.jpg", "http://h/alice_2.png"]);
        assert_eq!(
            filter_urls(&list, "ALICE"),
            vec!["http://h/Alice_1.jpg", "http://h/alice_2.png"]
        );
        assert!(filter_urls(&list, "carol").is_empty());
    }

    #[test]
    fn test_sync_tracks_new_and_drops_removed() {
        let mut gallery = Gallery::new();
        assert_eq!(gallery.sync(&urls(&["a", "b"])), urls(&["a", "b"]));

        gallery.thumb_loaded("a", Err("404".to_string()));
        assert!(matches!(gallery.thumb("a"), Some(Thumb::Failed(_))));

        assert_eq!(gallery.sync(&urls(&["a", "c"])), urls(&["c"]));
        assert!(gallery.thumb("b").is_none());
        assert!(matches!(gallery.thumb("c"), Some(Thumb::Loading)));

        gallery.thumb_loaded("b", Err("late".to_string()));
        assert!(gallery.thumb("b").is_none());
    }
}

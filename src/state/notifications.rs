/// Transient toast notifications

use std::time::{Duration, Instant};

/// At most this many toasts are visible; older ones are dropped first
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub created_at: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    lifetime: Duration,
    next_id: u64,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            lifetime,
            next_id: 0,
        }
    }

    /// Show a notification and return its id
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.items.push(Notification {
            id,
            kind,
            title: title.into(),
            description: description.into(),
            created_at: now,
        });

        if self.items.len() > MAX_VISIBLE {
            let overflow = self.items.len() - MAX_VISIBLE;
            self.items.drain(..overflow);
        }

        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Drop notifications older than the lifetime, returning how many expired
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let lifetime = self.lifetime;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < lifetime);
        before - self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let start = Instant::now();
        let mut toasts = Notifications::new(Duration::from_secs(5));
        toasts.push(NotificationKind::Success, "a", "", start);
        toasts.push(NotificationKind::Failure, "b", "", start + Duration::from_secs(3));

        assert_eq!(toasts.expire(start + Duration::from_secs(4)), 0);
        assert_eq!(toasts.expire(start + Duration::from_secs(5)), 1);
        assert_eq!(toasts.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(toasts.expire(start + Duration::from_secs(8)), 1);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let now = Instant::now();
        let mut toasts = Notifications::new(Duration::from_secs(5));
        let first = toasts.push(NotificationKind::Success, "a", "", now);
        let second = toasts.push(NotificationKind::Success, "b", "", now);
        assert_ne!(first, second);

        toasts.dismiss(first);
        assert_eq!(toasts.iter().map(|n| n.id).collect::<Vec<_>>(), vec![second]);
        toasts.dismiss(first);
        assert_eq!(toasts.iter().count(), 1);
    }

    #[test]
    fn test_oldest_dropped_past_limit() {
        let now = Instant::now();
        let mut toasts = Notifications::new(Duration::from_secs(5));
        for title in ["1", "2", "3", "4"] {
            toasts.push(NotificationKind::Success, title, "", now);
        }
        assert_eq!(
            toasts.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(),
            vec!["2", "3", "4"]
        );
    }
}

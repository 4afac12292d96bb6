use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{NotificationKind, Notifier};

/// Upper bound on queued toasts; the oldest are dropped first
pub const MAX_NOTIFICATIONS: usize = 5;

/// A toast waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-memory toast queue
///
/// Rendering is left to the caller, which polls [`NotificationCenter::active`].
#[derive(Debug, Default)]
pub struct NotificationCenter {
    queue: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast created at `now`
    pub fn push_at(
        &self,
        kind: NotificationKind,
        message: &str,
        now: DateTime<Utc>,
    ) -> Option<Uuid> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.to_string(),
            expires_at: now + Duration::milliseconds(kind.lifetime_ms()),
        };
        let id = notification.id;

        let Ok(mut queue) = self.queue.lock() else {
            return None;
        };
        queue.retain(|n| !n.is_expired_at(now));
        queue.push(notification);
        let overflow = queue.len().saturating_sub(MAX_NOTIFICATIONS);
        queue.drain(..overflow);
        Some(id)
    }

    /// Toasts still visible at `now`, oldest first; expired ones are pruned
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        match self.queue.lock() {
            Ok(mut queue) => {
                queue.retain(|n| !n.is_expired_at(now));
                queue.clone()
            },
            Err(_) => Vec::new(),
        }
    }

    /// Remove a toast before it expires
    pub fn dismiss(&self, id: Uuid) -> bool {
        let Ok(mut queue) = self.queue.lock() else {
            return false;
        };
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    pub fn clear(&self) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.push_at(kind, message, Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_per_kind() {
        let center = NotificationCenter::new();
        let now = Utc::now();
        center.push_at(NotificationKind::Success, "Saved", now);
        center.push_at(NotificationKind::Error, "Failed", now);

        let later = now + Duration::milliseconds(NotificationKind::Success.lifetime_ms());
        let active = center.active(later);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Failed");
    }

    #[test]
    fn test_dismiss_and_blank_messages() {
        let center = NotificationCenter::new();
        let now = Utc::now();
        assert!(center.push_at(NotificationKind::Info, "   ", now).is_none());

        let id = center.push_at(NotificationKind::Info, "Hello", now).unwrap();
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.active(now).is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let center = NotificationCenter::new();
        let now = Utc::now();
        for i in 0..(MAX_NOTIFICATIONS + 2) {
            center.push_at(NotificationKind::Warning, &format!("n{i}"), now);
        }
        let active = center.active(now);
        assert_eq!(active.len(), MAX_NOTIFICATIONS);
        assert_eq!(active[0].message, "n2");
    }
}

//! User-facing notifications and modal focus handling
//!
//! Nothing here returns errors. A notification that cannot be queued is
//! dropped, and a focus target that vanished is skipped.

mod center;
mod focus;

use serde::Serialize;

pub use center::{MAX_NOTIFICATIONS, Notification, NotificationCenter};
pub use focus::{FocusHost, FocusTrap, KeyOutcome, TrapKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    /// How long a toast of this kind stays visible
    #[must_use]
    pub const fn lifetime_ms(self) -> i64 {
        match self {
            Self::Success | Self::Info => 3000,
            Self::Warning => 5000,
            Self::Error => 7000,
        }
    }
}

/// Sink for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Forwards notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => tracing::error!("{}", message),
            NotificationKind::Warning => tracing::warn!("{}", message),
            NotificationKind::Success | NotificationKind::Info => tracing::info!("{}", message),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

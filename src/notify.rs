//! In-process notification center.
//!
//! Operations on the diagram collection report their outcomes here instead
//! of printing directly, so the command layer decides when and how feedback
//! reaches the terminal. Every notification carries a kind and expires on
//! its own after a kind-specific display window.
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

/// Severity of a notification, which also determines how long it stays
/// visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// How long a notification of this kind remains active. Errors linger
    /// longest so they are not missed.
    pub fn display_duration(&self) -> Duration {
        match self {
            NotificationKind::Success => Duration::from_secs(5),
            NotificationKind::Error => Duration::from_secs(7),
            NotificationKind::Warning => Duration::from_secs(6),
            NotificationKind::Info => Duration::from_secs(5),
        }
    }
}

/// A single notification entry.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Queue-unique id, increasing in creation order
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    created_at: Instant,
    expires_at: Instant,
}

impl Notification {
    /// Whether the display window has elapsed as of `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time this notification has been alive as of `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

struct QueueInner {
    next_id: u64,
    entries: Vec<Notification>,
}

/// Shared handle to the notification queue. Cheap to clone; all clones see
/// the same queue.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Mutex<QueueInner>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        NotificationCenter {
            inner: Arc::new(Mutex::new(QueueInner {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Appends a notification with its kind's default duration and returns
    /// its id.
    pub fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> u64 {
        let duration = kind.display_duration();
        self.push_at(kind, title.into(), message.into(), duration, Instant::now())
    }

    /// Appends a notification that stays active for `duration` instead of
    /// the kind's default.
    pub fn notify_with_duration(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Duration,
    ) -> u64 {
        self.push_at(kind, title.into(), message.into(), duration, Instant::now())
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, title, message)
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, title, message)
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Warning, title, message)
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Info, title, message)
    }

    fn push_at(
        &self,
        kind: NotificationKind,
        title: String,
        message: String,
        duration: Duration,
        now: Instant,
    ) -> u64 {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Notification queue lock poisoned, dropping entry: {}", e);
                return 0;
            }
        };

        let id = inner.next_id;
        inner.next_id += 1;

        trace!("Notification {} queued: {:?} {}", id, kind, title);
        inner.entries.push(Notification {
            id,
            kind,
            title,
            message,
            created_at: now,
            expires_at: now + duration,
        });
        id
    }

    /// Removes a notification before its window elapses. Returns whether an
    /// entry with that id was present.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Notification queue lock poisoned: {}", e);
                return false;
            }
        };
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        before != inner.entries.len()
    }

    /// Snapshot of the notifications still inside their display window.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    fn active_at(&self, now: Instant) -> Vec<Notification> {
        let inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Notification queue lock poisoned: {}", e);
                return Vec::new();
            }
        };
        inner
            .entries
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .cloned()
            .collect()
    }

    /// Empties the queue, returning the entries that were still active.
    /// Expired entries are discarded along the way.
    pub fn drain(&self) -> Vec<Notification> {
        self.drain_at(Instant::now())
    }

    fn drain_at(&self, now: Instant) -> Vec<Notification> {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Notification queue lock poisoned: {}", e);
                return Vec::new();
            }
        };
        let entries = std::mem::take(&mut inner.entries);
        let (active, expired): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| !entry.is_expired_at(now));
        if !expired.is_empty() {
            debug!("Dropped {} expired notifications on drain", expired.len());
        }
        active
    }

    /// Drops expired entries, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Notification queue lock poisoned: {}", e);
                return 0;
            }
        };
        let before = inner.entries.len();
        inner.entries.retain(|entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();
        if removed > 0 {
            trace!("Swept {} expired notifications", removed);
        }
        removed
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

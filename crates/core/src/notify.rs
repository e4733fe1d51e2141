//! Transient UI notifications.
//!
//! A [`NotificationQueue`] is created once per UI session and torn down with it.
//! Each notification with a non-zero duration gets a scheduled removal task; manual
//! removal aborts that task. Identifiers are never reused within a queue.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::lock::mutex_lock;

const SOURCE: &str = "notify";

/// Default lifetime used by the severity helpers.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Zero means the notification stays until removed.
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct Entries {
    active: Vec<Notification>,
    timers: HashMap<NotificationId, AbortHandle>,
    next_id: NotificationId,
}

#[derive(Debug)]
struct Shared {
    entries: Mutex<Entries>,
    visible: watch::Sender<Vec<Notification>>,
}

impl Shared {
    fn remove(&self, id: NotificationId) -> bool {
        let mut entries = mutex_lock(&self.entries, SOURCE, "remove");
        if let Some(timer) = entries.timers.remove(&id) {
            timer.abort();
        }
        let before = entries.active.len();
        entries.active.retain(|n| n.id != id);
        let removed = entries.active.len() != before;
        if removed {
            self.visible.send_replace(entries.active.clone());
        }
        removed
    }
}

/// Ordered set of active notifications for one UI session.
#[derive(Debug)]
pub struct NotificationQueue {
    shared: Arc<Shared>,
    default_duration: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl NotificationQueue {
    /// Create an empty queue. `default_duration` applies to the severity helpers.
    pub fn new(default_duration: Duration) -> Self {
        let (visible, _) = watch::channel(Vec::new());
        Self { shared: Arc::new(Shared { entries: Mutex::new(Entries::default()), visible }), default_duration }
    }

    /// Add a notification and return its id.
    ///
    /// A non-zero `duration` schedules automatic removal on the current Tokio
    /// runtime. Outside a runtime the notification stays until removed.
    pub fn show(&self, message: impl Into<String>, severity: Severity, duration: Duration) -> NotificationId {
        let mut entries = mutex_lock(&self.shared.entries, SOURCE, "show");
        let id = entries.next_id;
        entries.next_id += 1;

        entries.active.push(Notification { id, message: message.into(), severity, duration });

        if !duration.is_zero() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let shared = Arc::downgrade(&self.shared);
                    let task = handle.spawn(expire(shared, id, duration));
                    entries.timers.insert(id, task.abort_handle());
                }
                Err(_) => warn!(id, "No Tokio runtime; notification will not expire automatically"),
            }
        }

        debug!(id, severity = %severity, duration_ms = duration.as_millis() as u64, "Notification shown");
        self.shared.visible.send_replace(entries.active.clone());
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success, self.default_duration)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error, self.default_duration)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Warning, self.default_duration)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info, self.default_duration)
    }

    pub fn success_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(message, Severity::Success, duration)
    }

    pub fn error_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(message, Severity::Error, duration)
    }

    pub fn warning_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(message, Severity::Warning, duration)
    }

    pub fn info_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(message, Severity::Info, duration)
    }

    /// Remove a notification now. Unknown or already-removed ids are ignored.
    ///
    /// Returns whether a notification was removed.
    pub fn remove(&self, id: NotificationId) -> bool {
        self.shared.remove(id)
    }

    /// Active notifications in creation order.
    pub fn active(&self) -> Vec<Notification> {
        mutex_lock(&self.shared.entries, SOURCE, "active").active.clone()
    }

    /// Watch the active set; a new value is published after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.shared.visible.subscribe()
    }

    /// End the session: cancel pending timers and drop every notification.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        let mut entries = mutex_lock(&self.shared.entries, SOURCE, "dispose");
        for (_, timer) in entries.timers.drain() {
            timer.abort();
        }
        entries.active.clear();
        self.shared.visible.send_replace(Vec::new());
    }
}

async fn expire(shared: Weak<Shared>, id: NotificationId, after: Duration) {
    tokio::time::sleep(after).await;
    if let Some(shared) = shared.upgrade() {
        // Drop our own handle first so `remove` does not abort this task.
        mutex_lock(&shared.entries, SOURCE, "expire").timers.remove(&id);
        if shared.remove(id) {
            debug!(id, "Notification expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(queue: &NotificationQueue) -> Vec<NotificationId> {
        queue.active().iter().map(|n| n.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_removal_after_duration() {
        let queue = NotificationQueue::default();
        let id = queue.show("x", Severity::Info, Duration::from_millis(100));
        assert_eq!(ids(&queue), vec![id]);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(queue.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_still_active_before_duration() {
        let queue = NotificationQueue::default();
        let id = queue.show("x", Severity::Info, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ids(&queue), vec![id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_never_expires() {
        let queue = NotificationQueue::default();
        let id = queue.show("sticky", Severity::Warning, Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(ids(&queue), vec![id]);
        assert!(queue.remove(id));
        assert!(queue.active().is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let queue = NotificationQueue::default();
        let id = queue.info("x");
        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        assert!(!queue.remove(999));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_removal_cancels_timer() {
        let queue = NotificationQueue::default();
        let first = queue.show("a", Severity::Info, Duration::from_millis(100));
        assert!(queue.remove(first));
        assert!(mutex_lock(&queue.shared.entries, SOURCE, "test").timers.is_empty());

        let second = queue.show("b", Severity::Info, Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(ids(&queue), vec![second]);
    }

    #[tokio::test]
    async fn test_ids_strictly_increase_and_order_preserved() {
        let queue = NotificationQueue::default();
        let a = queue.success("a");
        let b = queue.error("b");
        queue.remove(a);
        let c = queue.warning("c");

        assert!(a < b && b < c);
        let active = queue.active();
        assert_eq!(active.iter().map(|n| n.message.as_str()).collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(active[0].severity, Severity::Error);
        assert_eq!(active[1].duration, DEFAULT_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_helpers_with_explicit_duration() {
        let queue = NotificationQueue::default();
        let sticky = queue.error_for("failed to save", Duration::ZERO);
        let brief = queue.success_for("saved", Duration::from_millis(50));
        let warned = queue.warning_for("slow", Duration::from_secs(10));
        let noted = queue.info_for("noted", Duration::from_millis(50));

        let active = queue.active();
        assert_eq!(active[0].severity, Severity::Error);
        assert_eq!(active[1].duration, Duration::from_millis(50));
        assert_eq!(active[2].severity, Severity::Warning);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ids(&queue), vec![sticky, warned]);
        assert!(!queue.remove(brief));
        assert!(!queue.remove(noted));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let queue = NotificationQueue::default();
        let mut visible = queue.subscribe();

        let id = queue.info("hello");
        visible.changed().await.unwrap();
        assert_eq!(visible.borrow_and_update().len(), 1);

        queue.remove(id);
        visible.changed().await.unwrap();
        assert!(visible.borrow_and_update().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_timers() {
        let queue = NotificationQueue::default();
        let visible = queue.subscribe();
        queue.show("a", Severity::Info, Duration::from_millis(100));

        queue.dispose();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(visible.borrow().is_empty());
    }

    #[test]
    fn test_show_outside_runtime_keeps_notification() {
        let queue = NotificationQueue::default();
        let id = queue.show("x", Severity::Info, Duration::from_millis(10));
        assert_eq!(ids(&queue), vec![id]);
    }
}

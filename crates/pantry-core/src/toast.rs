use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);
pub const DEFAULT_TOAST_CAPACITY: usize = 5;

const BROADCAST_BUFFER: usize = 32;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ToastId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Transient, auto-dismissing user messages. Expiry is evaluated lazily
/// against the tokio clock whenever the queue is read.
pub struct ToastChannel {
    queue: Mutex<ToastQueue>,
    events: broadcast::Sender<Toast>,
    duration: Duration,
    capacity: usize,
}

#[derive(Default)]
struct ToastQueue {
    next_id: u64,
    toasts: VecDeque<Toast>,
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION, DEFAULT_TOAST_CAPACITY)
    }
}

impl ToastChannel {
    pub fn new(duration: Duration, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_BUFFER);
        Self {
            queue: Mutex::new(ToastQueue::default()),
            events,
            duration,
            capacity: capacity.max(1),
        }
    }

    pub fn show_toast(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let now = Instant::now();
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };

        let id = ToastId(queue.next_id);
        queue.next_id = queue.next_id.saturating_add(1);

        let toast = Toast {
            id,
            message: message.into(),
            kind,
            shown_at: now,
            expires_at: now + self.duration,
        };

        queue.toasts.retain(|existing| !existing.is_expired_at(now));
        while queue.toasts.len() >= self.capacity {
            queue.toasts.pop_front();
        }
        queue.toasts.push_back(toast.clone());
        drop(queue);

        // No subscribers is not an error for a toast.
        let _ = self.events.send(toast);
        id
    }

    /// Non-expired toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.toasts.retain(|toast| !toast.is_expired_at(now));
        queue.toasts.iter().cloned().collect()
    }

    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = queue.toasts.len();
        queue.toasts.retain(|toast| toast.id != id);
        queue.toasts.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.events.subscribe()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

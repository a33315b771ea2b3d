use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::resources::NotificationCenter;

/// Background refresh of the unread badge.
///
/// At most one polling task exists per poller. Polls run inline on the
/// task, so a slow request delays the next tick instead of overlapping it.
pub struct UnreadCountPoller {
    center: Arc<NotificationCenter>,
    interval: Duration,
    wake: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl UnreadCountPoller {
    pub fn new(center: Arc<NotificationCenter>, interval: Duration) -> Self {
        Self {
            center,
            interval: interval.max(Duration::from_millis(1)),
            wake: Arc::new(Notify::new()),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Polls immediately, then once per interval. Restarting replaces the
    /// previous task.
    pub fn start(&mut self) {
        self.stop();

        let center = self.center.clone();
        let wake = self.wake.clone();
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = wake.notified() => {}
                }
                if let Err(error) = center.refresh_unread_count().await {
                    tracing::debug!(
                        kind = ?error.kind,
                        message = %error.message,
                        "unread count poll failed"
                    );
                }
            }
        }));
    }

    /// Wakes a running poller ahead of its next tick.
    pub fn poll_now(&self) {
        if self.is_running() {
            self.wake.notify_one();
        }
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for UnreadCountPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

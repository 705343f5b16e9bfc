//! freedesktop notification backend via notify-rust.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use tokio::sync::oneshot;

use super::{Notifier, NotifyError, Opener, StreamNotification};

const ACTION_ID: &str = "open";

/// Upper bound on threads parked waiting for a click or close.
pub const MAX_PENDING_ACTIONS: usize = 32;

/// One of the [`MAX_PENDING_ACTIONS`] waiter slots; released on drop.
struct ActionSlot(Arc<AtomicUsize>);

impl ActionSlot {
    fn acquire(pending: &Arc<AtomicUsize>) -> Option<Self> {
        pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < MAX_PENDING_ACTIONS).then_some(n + 1)
            })
            .ok()
            .map(|_| Self(Arc::clone(pending)))
    }
}

impl Drop for ActionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Shows notifications on the desktop and handles their "Open" action.
///
/// Waiting for the action blocks a thread until the server reports a click or
/// a close. Servers that keep notifications resident never report either, so
/// at most [`MAX_PENDING_ACTIONS`] threads wait at once; past that, a
/// notification is shown without a click handler.
pub struct DesktopNotifier {
    app_name: String,
    timeout_ms: u32,
    opener: Arc<Opener>,
    pending_actions: Arc<AtomicUsize>,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, timeout_ms: u32, opener: Opener) -> Self {
        Self {
            app_name: app_name.into(),
            timeout_ms,
            opener: Arc::new(opener),
            pending_actions: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn build(&self, notification: &StreamNotification) -> Notification {
        let mut n = Notification::new();
        n.appname(&self.app_name)
            .summary(&notification.title)
            .body(&notification.body)
            .timeout(Timeout::Milliseconds(self.timeout_ms));
        if let Some(action) = &notification.action {
            n.action(ACTION_ID, &action.label);
        }
        n
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn show(&self, notification: &StreamNotification) -> Result<(), NotifyError> {
        let n = self.build(notification);
        let url = notification.action.as_ref().map(|a| a.url.clone());
        let slot = url
            .as_ref()
            .and_then(|_| ActionSlot::acquire(&self.pending_actions));
        if url.is_some() && slot.is_none() {
            tracing::debug!(
                limit = MAX_PENDING_ACTIONS,
                "Too many notifications awaiting a click; showing without Open handler"
            );
        }
        let opener = Arc::clone(&self.opener);
        let (shown_tx, shown_rx) = oneshot::channel();

        // `show()` is a blocking D-Bus call; the action wait after it may block
        // much longer, holding the slot until it returns.
        thread::Builder::new()
            .name("notification-action".into())
            .spawn(move || {
                let handle = match n.show() {
                    Ok(handle) => {
                        let _ = shown_tx.send(Ok(()));
                        handle
                    }
                    Err(e) => {
                        let _ = shown_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                if let Some(_slot) = slot {
                    wait_for_open(handle, url, &opener);
                }
            })
            .map_err(|e| NotifyError::Show(e.to_string()))?;

        match shown_rx.await {
            Ok(result) => result.map_err(NotifyError::Show),
            Err(_) => Err(NotifyError::Show("notification thread exited".into())),
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn wait_for_open(handle: notify_rust::NotificationHandle, url: Option<url::Url>, opener: &Opener) {
    let Some(url) = url else {
        return;
    };
    handle.wait_for_action(|action| {
        if action != ACTION_ID {
            return;
        }
        match opener.open(&url) {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!(%status, program = opener.program(), "Opener exited with failure"),
            Err(e) => tracing::warn!(program = opener.program(), "Failed to run opener: {e}"),
        }
    });
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn wait_for_open(_handle: notify_rust::NotificationHandle, _url: Option<url::Url>, _opener: &Opener) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{NotificationAction, channel_page_url};

    #[test]
    fn build_attaches_action_only_when_present() {
        let notifier = DesktopNotifier::new("stream-notifier", 15_000, Opener::new("true"));
        let with_action = StreamNotification {
            title: "t".into(),
            body: "b".into(),
            action: Some(NotificationAction {
                label: "Open".into(),
                url: channel_page_url("someone").unwrap(),
            }),
        };
        let without_action = StreamNotification {
            action: None,
            ..with_action.clone()
        };

        assert_eq!(notifier.build(&with_action).actions, vec!["open", "Open"]);
        assert!(notifier.build(&without_action).actions.is_empty());
    }

    #[test]
    fn action_waiters_are_bounded() {
        let pending = Arc::new(AtomicUsize::new(0));
        let mut slots: Vec<ActionSlot> = (0..MAX_PENDING_ACTIONS)
            .map(|_| ActionSlot::acquire(&pending).unwrap())
            .collect();

        assert!(ActionSlot::acquire(&pending).is_none());
        assert_eq!(pending.load(Ordering::SeqCst), MAX_PENDING_ACTIONS);

        slots.pop();
        assert!(ActionSlot::acquire(&pending).is_some());

        drop(slots);
        assert_eq!(pending.load(Ordering::SeqCst), 0);
    }
}

//! In-process broadcast channel standing in for page-global custom events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hearth_core::NotificationKind;
use hearth_logging::hearth_debug;

pub const SHOW_INSTALL_PROMPT: &str = "show-install-prompt";
pub const HIDE_INSTALL_PROMPT: &str = "hide-install-prompt";
pub const APP_INSTALLED: &str = "app-installed";
pub const SHOW_NOTIFICATION: &str = "show-notification";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    ShowInstallPrompt,
    HideInstallPrompt,
    AppInstalled,
    ShowNotification(NotificationPayload),
}

impl Signal {
    pub fn topic(&self) -> &'static str {
        match self {
            Signal::ShowInstallPrompt => SHOW_INSTALL_PROMPT,
            Signal::HideInstallPrompt => HIDE_INSTALL_PROMPT,
            Signal::AppInstalled => APP_INSTALLED,
            Signal::ShowNotification(_) => SHOW_NOTIFICATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Signal) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    topics: HashMap<String, Vec<(SubscriptionId, Listener)>>,
}

/// Topic-keyed publish/subscribe bus.
///
/// Delivery is synchronous and fire-and-forget: a publish reaches whatever
/// listeners are registered at that instant, and is lost (not queued) if
/// there are none.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        topic: &str,
        listener: impl Fn(&Signal) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.lock().expect("bus lock");
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner
            .topics
            .entry(topic.to_string())
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Removes a subscription; returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().expect("bus lock");
        let mut removed = false;
        for listeners in inner.topics.values_mut() {
            let before = listeners.len();
            listeners.retain(|(sub_id, _)| *sub_id != id);
            removed |= listeners.len() != before;
        }
        removed
    }

    pub fn publish(&self, signal: &Signal) {
        // Snapshot under the lock, call outside it, so listeners may publish
        // in turn.
        let listeners: Vec<Listener> = {
            let inner = self.inner.lock().expect("bus lock");
            inner
                .topics
                .get(signal.topic())
                .map(|subs| subs.iter().map(|(_, l)| l.clone()).collect())
                .unwrap_or_default()
        };
        if listeners.is_empty() {
            hearth_debug!("no listener for {:?}; signal dropped", signal.topic());
            return;
        }
        for listener in listeners {
            listener(signal);
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        let inner = self.inner.lock().expect("bus lock");
        inner.topics.get(topic).map_or(0, Vec::len)
    }
}

/// Fire-and-forget helper for notification producers anywhere in the shell.
pub fn publish_notification(
    bus: &EventBus,
    message: impl Into<String>,
    kind: NotificationKind,
    duration_ms: Option<u64>,
) {
    bus.publish(&Signal::ShowNotification(NotificationPayload {
        message: message.into(),
        kind,
        duration_ms,
    }));
}

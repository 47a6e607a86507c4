//! Consumer surfaces: subscribe on mount, unsubscribe on drop.

use std::sync::{mpsc, Arc};

use hearth_core::Msg;

use super::bus::{
    EventBus, Signal, SubscriptionId, HIDE_INSTALL_PROMPT, SHOW_INSTALL_PROMPT, SHOW_NOTIFICATION,
};
use super::prompt::PromptSlot;
use super::Clock;

/// The install banner's listening half.
///
/// Forwards the show/hide broadcasts into the state machine for as long as
/// it is mounted; dropping it tears the subscriptions down again.
pub struct BannerSurface {
    bus: Arc<EventBus>,
    msg_tx: mpsc::Sender<Msg>,
    subscriptions: Vec<SubscriptionId>,
}

impl BannerSurface {
    pub fn mount(
        bus: Arc<EventBus>,
        slot: Arc<PromptSlot>,
        msg_tx: mpsc::Sender<Msg>,
        now_ms: Clock,
    ) -> Self {
        let show_tx = msg_tx.clone();
        let show = bus.subscribe(SHOW_INSTALL_PROMPT, move |_| {
            // The capability itself stays in the slot; only its identity
            // travels through the state machine.
            if let Some(signal) = slot.current_signal() {
                let _ = show_tx.send(Msg::InstallSignalCaptured {
                    signal,
                    now_ms: now_ms(),
                });
            }
        });

        let hide_tx = msg_tx.clone();
        let hide = bus.subscribe(HIDE_INSTALL_PROMPT, move |_| {
            let _ = hide_tx.send(Msg::BannerHideRequested);
        });

        let _ = msg_tx.send(Msg::PromptSurfaceMounted);
        Self {
            bus,
            msg_tx,
            subscriptions: vec![show, hide],
        }
    }
}

impl Drop for BannerSurface {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
        let _ = self.msg_tx.send(Msg::PromptSurfaceUnmounted);
    }
}

/// The toast renderer's listening half.
pub struct ToastSurface {
    bus: Arc<EventBus>,
    msg_tx: mpsc::Sender<Msg>,
    subscription: Option<SubscriptionId>,
}

impl ToastSurface {
    pub fn mount(bus: Arc<EventBus>, msg_tx: mpsc::Sender<Msg>, now_ms: Clock) -> Self {
        let post_tx = msg_tx.clone();
        let subscription = bus.subscribe(SHOW_NOTIFICATION, move |signal| {
            if let Signal::ShowNotification(payload) = signal {
                let _ = post_tx.send(Msg::NotificationPosted {
                    message: payload.message.clone(),
                    kind: payload.kind,
                    duration_ms: payload.duration_ms,
                    now_ms: now_ms(),
                });
            }
        });

        let _ = msg_tx.send(Msg::ToastSurfaceMounted);
        Self {
            bus,
            msg_tx,
            subscription: Some(subscription),
        }
    }
}

impl Drop for ToastSurface {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
        let _ = self.msg_tx.send(Msg::ToastSurfaceUnmounted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::NotificationKind;
    use std::sync::Arc;

    use crate::platform::bus::NotificationPayload;

    fn fixed_clock(at: u64) -> Clock {
        Arc::new(move || at)
    }

    struct NullProspect;

    impl crate::platform::prompt::InstallProspect for NullProspect {
        fn suppress_native_banner(&self) {}

        fn prompt(self: Box<Self>) -> crate::platform::prompt::PromptOutcome {
            crate::platform::prompt::PromptOutcome::Dismissed
        }
    }

    #[test]
    fn toast_surface_forwards_broadcasts_while_mounted() {
        let bus = Arc::new(EventBus::new());
        let (msg_tx, msg_rx) = mpsc::channel();

        let surface = ToastSurface::mount(bus.clone(), msg_tx, fixed_clock(9));
        assert_eq!(msg_rx.try_recv(), Ok(Msg::ToastSurfaceMounted));

        bus.publish(&Signal::ShowNotification(NotificationPayload {
            message: "listing saved".to_string(),
            kind: NotificationKind::Success,
            duration_ms: Some(2_000),
        }));
        assert_eq!(
            msg_rx.try_recv(),
            Ok(Msg::NotificationPosted {
                message: "listing saved".to_string(),
                kind: NotificationKind::Success,
                duration_ms: Some(2_000),
                now_ms: 9,
            })
        );

        drop(surface);
        assert_eq!(msg_rx.try_recv(), Ok(Msg::ToastSurfaceUnmounted));
        assert_eq!(bus.subscriber_count(SHOW_NOTIFICATION), 0);

        // Broadcasts after unmount are lost.
        bus.publish(&Signal::ShowNotification(NotificationPayload {
            message: "dropped".to_string(),
            kind: NotificationKind::Info,
            duration_ms: None,
        }));
        assert!(msg_rx.try_recv().is_err());
    }

    #[test]
    fn banner_surface_forwards_show_only_when_a_capability_is_held() {
        let bus = Arc::new(EventBus::new());
        let slot = Arc::new(PromptSlot::new());
        let (msg_tx, msg_rx) = mpsc::channel();

        let surface = BannerSurface::mount(bus.clone(), slot.clone(), msg_tx, fixed_clock(5));
        assert_eq!(msg_rx.try_recv(), Ok(Msg::PromptSurfaceMounted));

        // No capability: the broadcast alone does not reach the core.
        bus.publish(&Signal::ShowInstallPrompt);
        assert!(msg_rx.try_recv().is_err());

        // With a capability stashed, its identity rides along.
        let signal = slot.capture(Box::new(NullProspect));
        bus.publish(&Signal::ShowInstallPrompt);
        assert_eq!(
            msg_rx.try_recv(),
            Ok(Msg::InstallSignalCaptured { signal, now_ms: 5 })
        );

        bus.publish(&Signal::HideInstallPrompt);
        assert_eq!(msg_rx.try_recv(), Ok(Msg::BannerHideRequested));

        drop(surface);
        assert_eq!(msg_rx.try_recv(), Ok(Msg::PromptSurfaceUnmounted));
        assert_eq!(bus.subscriber_count(SHOW_INSTALL_PROMPT), 0);
        assert_eq!(bus.subscriber_count(HIDE_INSTALL_PROMPT), 0);
    }
}

//! Glue between the platform's install events, the capability slot, and the
//! broadcast bus.

use std::sync::{mpsc, Arc};

use hearth_core::Msg;
use hearth_logging::{hearth_info, hearth_warn};
use hearth_worker::{FetchSettings, WorkerRegistration, WORKER_SCRIPT_PATH};

use super::bus::{EventBus, Signal};
use super::prompt::{InstallProspect, PromptSlot};

/// Entry points the hosting environment calls when the browser-side install
/// events fire.
pub struct InstallGateway {
    bus: Arc<EventBus>,
    slot: Arc<PromptSlot>,
    msg_tx: mpsc::Sender<Msg>,
}

impl InstallGateway {
    pub fn new(bus: Arc<EventBus>, slot: Arc<PromptSlot>, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self { bus, slot, msg_tx }
    }

    /// The install-eligibility event: the native mini-banner is suppressed
    /// synchronously, the capability stashed, and the in-app prompt
    /// broadcast.
    pub fn capture_deferred_install(&self, token: Box<dyn InstallProspect>) {
        let signal = self.slot.capture(token);
        hearth_info!("deferred install capability captured as {:?}", signal);
        self.bus.publish(&Signal::ShowInstallPrompt);
    }

    /// The installed-app event: the held capability is void, and every
    /// interested surface hears about it.
    pub fn notify_app_installed(&self) {
        hearth_info!("app was installed");
        self.slot.clear();
        self.bus.publish(&Signal::AppInstalled);
        self.bus.publish(&Signal::HideInstallPrompt);
    }

    /// Asks the state machine to run the native install dialog; the outcome
    /// comes back as a message.
    pub fn request_install(&self) {
        let _ = self.msg_tx.send(Msg::InstallRequested);
    }
}

/// Registers the background worker at its fixed path. Failure leaves the app
/// running as a plain page.
pub fn register_background_worker(settings: FetchSettings) -> Option<WorkerRegistration> {
    match hearth_worker::register(WORKER_SCRIPT_PATH, settings) {
        Ok(registration) => {
            hearth_info!(
                "background worker registered at {} with scope {}",
                registration.script_path,
                registration.scope
            );
            Some(registration)
        }
        Err(err) => {
            hearth_warn!("background worker registration failed: {}", err);
            None
        }
    }
}

use hearth_logging::hearth_info;

use crate::{CacheRegistry, OFFLINE_CACHE_NAME};

/// The reachable worker phases. There is no waiting phase: installation
/// transitions straight into activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Installing,
    Activating,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerLifecycle {
    phase: WorkerPhase,
    controls_clients: bool,
}

impl Default for WorkerLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerLifecycle {
    pub fn new() -> Self {
        Self {
            phase: WorkerPhase::Installing,
            controls_clients: false,
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// True once the worker has claimed every open page.
    pub fn controls_clients(&self) -> bool {
        self.controls_clients
    }

    /// Install event: skip the waiting period entirely.
    pub fn on_install(&mut self) {
        if self.phase == WorkerPhase::Installing {
            self.phase = WorkerPhase::Activating;
            hearth_info!("worker installed, activating immediately");
        }
    }

    /// Activate event: open (but never populate) the offline cache and claim
    /// control of all open pages.
    pub fn on_activate(&mut self, caches: &mut CacheRegistry) {
        if self.phase != WorkerPhase::Activating {
            return;
        }
        let store = caches.open(OFFLINE_CACHE_NAME);
        hearth_info!(
            "worker active, opened cache {:?} ({} entries)",
            store.name(),
            store.len()
        );
        self.controls_clients = true;
        self.phase = WorkerPhase::Active;
    }
}

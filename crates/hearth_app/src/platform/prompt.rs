//! The single-slot holder for the browser's deferred install capability.

use std::sync::Mutex;

use hearth_core::InstallSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Accepted,
    Dismissed,
}

/// A one-time-usable install capability supplied by the platform.
pub trait InstallProspect: Send {
    /// Suppresses the platform's own install mini-banner. Called
    /// synchronously, before the capability is stashed.
    fn suppress_native_banner(&self);

    /// Runs the native install dialog and blocks until the user decides.
    /// Consumes the capability; there is no way to ask twice.
    fn prompt(self: Box<Self>) -> PromptOutcome;
}

struct SlotInner {
    next_id: u64,
    current: Option<(InstallSignal, Box<dyn InstallProspect>)>,
}

/// Process-wide slot holding at most one deferred install capability.
///
/// Each capture overwrites the previous occupant; taking empties the slot
/// before the user's choice is ever awaited.
pub struct PromptSlot {
    inner: Mutex<SlotInner>,
}

impl Default for PromptSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                next_id: 0,
                current: None,
            }),
        }
    }

    /// Stashes a freshly supplied capability, last write wins, and returns
    /// the identity handed to the state machine.
    pub fn capture(&self, token: Box<dyn InstallProspect>) -> InstallSignal {
        token.suppress_native_banner();
        let mut inner = self.inner.lock().expect("slot lock");
        inner.next_id += 1;
        let signal = InstallSignal(inner.next_id);
        inner.current = Some((signal, token));
        signal
    }

    /// Takes the capability for consumption if `signal` still identifies the
    /// occupant. A superseded identity gets nothing and leaves the newer
    /// occupant in place.
    pub fn take(&self, signal: InstallSignal) -> Option<Box<dyn InstallProspect>> {
        let mut inner = self.inner.lock().expect("slot lock");
        match inner.current.take() {
            Some((held, token)) if held == signal => Some(token),
            Some(other) => {
                // A newer capture superseded the one being consumed.
                inner.current = Some(other);
                None
            }
            None => None,
        }
    }

    pub fn current_signal(&self) -> Option<InstallSignal> {
        let inner = self.inner.lock().expect("slot lock");
        inner.current.as_ref().map(|(signal, _)| *signal)
    }

    pub fn is_armed(&self) -> bool {
        self.current_signal().is_some()
    }

    /// Drops whatever is held; used when the app-installed event fires and
    /// by tests needing a known-empty slot.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("slot lock");
        inner.current = None;
    }
}

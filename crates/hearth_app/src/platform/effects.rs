use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use hearth_core::{Effect, Msg, NotificationId};
use hearth_logging::hearth_warn;

use super::prompt::{PromptOutcome, PromptSlot};
use super::storage::{self, LocalStore};
use super::Clock;

/// Executes the state machine's effects against the platform: timers,
/// the native install dialog, and persistence.
///
/// Every timer carries a cancellation flag so surface teardown can revoke
/// it before it fires.
pub struct EffectRunner {
    msg_tx: mpsc::Sender<Msg>,
    slot: Arc<PromptSlot>,
    store: LocalStore,
    now_ms: Clock,
    banner_timer: Mutex<Option<Arc<AtomicBool>>>,
    toast_timers: Arc<Mutex<HashMap<NotificationId, Arc<AtomicBool>>>>,
}

impl EffectRunner {
    pub fn new(
        msg_tx: mpsc::Sender<Msg>,
        slot: Arc<PromptSlot>,
        store: LocalStore,
        now_ms: Clock,
    ) -> Self {
        Self {
            msg_tx,
            slot,
            store,
            now_ms,
            banner_timer: Mutex::new(None),
            toast_timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunInstallPrompt { signal } => self.run_install_prompt(signal),
                Effect::StartBannerTimer { delay_ms } => self.start_banner_timer(delay_ms),
                Effect::CancelBannerTimer => self.cancel_banner_timer(),
                Effect::PersistDismissal { at_ms } => {
                    storage::save_dismissal(&self.store, at_ms);
                }
                Effect::ScheduleToastExpiry { id, delay_ms } => {
                    self.schedule_toast_expiry(id, delay_ms)
                }
                Effect::CancelToastTimers => self.cancel_toast_timers(),
            }
        }
    }

    fn run_install_prompt(&self, signal: hearth_core::InstallSignal) {
        match self.slot.take(signal) {
            Some(token) => {
                let msg_tx = self.msg_tx.clone();
                thread::spawn(move || {
                    let accepted = token.prompt() == PromptOutcome::Accepted;
                    let _ = msg_tx.send(Msg::InstallChoiceResolved { accepted });
                });
            }
            None => {
                // The capability vanished between the state machine's check
                // and consumption; degrade to a declined outcome.
                hearth_warn!("install capability missing; reporting prompt as declined");
                let _ = self.msg_tx.send(Msg::InstallChoiceResolved { accepted: false });
            }
        }
    }

    fn start_banner_timer(&self, delay_ms: u64) {
        let flag = Arc::new(AtomicBool::new(false));
        {
            let mut guard = self.banner_timer.lock().expect("banner timer lock");
            if let Some(old) = guard.replace(flag.clone()) {
                old.store(true, Ordering::SeqCst);
            }
        }
        let msg_tx = self.msg_tx.clone();
        let now_ms = self.now_ms.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            if !flag.load(Ordering::SeqCst) {
                let _ = msg_tx.send(Msg::BannerDelayElapsed { now_ms: now_ms() });
            }
        });
    }

    fn cancel_banner_timer(&self) {
        let mut guard = self.banner_timer.lock().expect("banner timer lock");
        if let Some(flag) = guard.take() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    fn schedule_toast_expiry(&self, id: NotificationId, delay_ms: u64) {
        let flag = Arc::new(AtomicBool::new(false));
        {
            let mut timers = self.toast_timers.lock().expect("toast timer lock");
            if let Some(old) = timers.insert(id, flag.clone()) {
                old.store(true, Ordering::SeqCst);
            }
        }
        let msg_tx = self.msg_tx.clone();
        let timers = self.toast_timers.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            timers.lock().expect("toast timer lock").remove(&id);
            if !flag.load(Ordering::SeqCst) {
                let _ = msg_tx.send(Msg::NotificationExpired { id });
            }
        });
    }

    fn cancel_toast_timers(&self) {
        let mut timers = self.toast_timers.lock().expect("toast timer lock");
        for flag in timers.values() {
            flag.store(true, Ordering::SeqCst);
        }
        timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::InstallSignal;
    use std::time::Instant;

    struct AcceptingProspect;

    impl super::super::prompt::InstallProspect for AcceptingProspect {
        fn suppress_native_banner(&self) {}

        fn prompt(self: Box<Self>) -> PromptOutcome {
            PromptOutcome::Accepted
        }
    }

    fn runner() -> (EffectRunner, mpsc::Receiver<Msg>, Arc<PromptSlot>, tempfile::TempDir) {
        let (msg_tx, msg_rx) = mpsc::channel();
        let slot = Arc::new(PromptSlot::new());
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(dir.path());
        let clock: Clock = Arc::new(|| 42);
        let runner = EffectRunner::new(msg_tx, slot.clone(), store, clock);
        (runner, msg_rx, slot, dir)
    }

    fn recv_within(rx: &mpsc::Receiver<Msg>, ms: u64) -> Option<Msg> {
        rx.recv_timeout(Duration::from_millis(ms)).ok()
    }

    #[test]
    fn banner_timer_fires_with_the_injected_clock() {
        let (runner, rx, _slot, _dir) = runner();
        runner.run(vec![Effect::StartBannerTimer { delay_ms: 20 }]);

        assert_eq!(
            recv_within(&rx, 2_000),
            Some(Msg::BannerDelayElapsed { now_ms: 42 })
        );
    }

    #[test]
    fn cancelled_banner_timer_never_fires() {
        let (runner, rx, _slot, _dir) = runner();
        runner.run(vec![Effect::StartBannerTimer { delay_ms: 30 }]);
        runner.run(vec![Effect::CancelBannerTimer]);

        assert_eq!(recv_within(&rx, 200), None);
    }

    #[test]
    fn toast_expiry_fires_and_is_cancellable() {
        let (runner, rx, _slot, _dir) = runner();
        let id = NotificationId(1);
        runner.run(vec![Effect::ScheduleToastExpiry { id, delay_ms: 20 }]);
        assert_eq!(recv_within(&rx, 2_000), Some(Msg::NotificationExpired { id }));

        let other = NotificationId(2);
        runner.run(vec![Effect::ScheduleToastExpiry {
            id: other,
            delay_ms: 30,
        }]);
        runner.run(vec![Effect::CancelToastTimers]);
        assert_eq!(recv_within(&rx, 200), None);
    }

    #[test]
    fn install_prompt_consumes_the_slot_and_reports_the_outcome() {
        let (runner, rx, slot, _dir) = runner();
        let signal = slot.capture(Box::new(AcceptingProspect));

        runner.run(vec![Effect::RunInstallPrompt { signal }]);
        assert_eq!(
            recv_within(&rx, 2_000),
            Some(Msg::InstallChoiceResolved { accepted: true })
        );
        assert!(!slot.is_armed());
    }

    #[test]
    fn missing_capability_degrades_to_a_declined_outcome() {
        let (runner, rx, _slot, _dir) = runner();

        let started = Instant::now();
        runner.run(vec![Effect::RunInstallPrompt {
            signal: InstallSignal(99),
        }]);
        assert_eq!(
            recv_within(&rx, 2_000),
            Some(Msg::InstallChoiceResolved { accepted: false })
        );
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn persist_dismissal_writes_through_the_store() {
        let (runner, _rx, _slot, dir) = runner();
        runner.run(vec![Effect::PersistDismissal { at_ms: 777 }]);

        let store = LocalStore::new(dir.path());
        assert_eq!(storage::load_dismissal(&store), Some(777));
    }
}

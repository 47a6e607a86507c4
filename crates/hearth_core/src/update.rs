use crate::{Effect, Msg, ShellState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ShellState, msg: Msg) -> (ShellState, Vec<Effect>) {
    let effects = match msg {
        Msg::InstallSignalCaptured { signal, now_ms } => {
            // Last write wins; an earlier, unconsumed capability is simply
            // superseded.
            state.set_signal(signal);
            state.mark_dirty();
            offer_banner(&mut state, now_ms);
            Vec::new()
        }
        Msg::AppInstalled => {
            state.mark_installed();
            state.clear_signal();
            if state.banner_visible() {
                state.set_banner_visible(false);
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::InstallRequested => {
            // The slot is cleared before the platform awaits the user's
            // choice, so a capability can never be replayed.
            match state.take_signal() {
                Some(signal) => {
                    state.mark_dirty();
                    vec![Effect::RunInstallPrompt { signal }]
                }
                None => Vec::new(),
            }
        }
        Msg::InstallChoiceResolved { accepted } => {
            if accepted && state.banner_visible() {
                state.set_banner_visible(false);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BannerDelayElapsed { now_ms } => {
            if state.can_prompt_install() {
                offer_banner(&mut state, now_ms);
            }
            Vec::new()
        }
        Msg::BannerDismissed { now_ms } => {
            state.set_banner_visible(false);
            state.record_dismissal(now_ms);
            state.mark_dirty();
            vec![Effect::PersistDismissal { at_ms: now_ms }]
        }
        Msg::BannerHideRequested => {
            if state.banner_visible() {
                state.set_banner_visible(false);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DismissalRestored { at_ms } => {
            state.record_dismissal(at_ms);
            Vec::new()
        }
        Msg::PromptSurfaceMounted => {
            state.set_prompt_mounted(true);
            // Desktop relies on the browser's own install UI; neither the
            // banner nor its timer exists there.
            if state.device().is_mobile() {
                vec![Effect::StartBannerTimer {
                    delay_ms: state.config().banner_delay_ms,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::PromptSurfaceUnmounted => {
            state.set_prompt_mounted(false);
            if state.banner_visible() {
                state.set_banner_visible(false);
                state.mark_dirty();
            }
            vec![Effect::CancelBannerTimer]
        }
        Msg::ToastSurfaceMounted => {
            state.set_toast_mounted(true);
            Vec::new()
        }
        Msg::ToastSurfaceUnmounted => {
            state.set_toast_mounted(false);
            if state.clear_notifications() {
                state.mark_dirty();
            }
            vec![Effect::CancelToastTimers]
        }
        Msg::NotificationPosted {
            message,
            kind,
            duration_ms,
            now_ms,
        } => {
            // No consumer mounted: the broadcast is lost, not queued.
            if !state.toast_mounted() {
                return (state, Vec::new());
            }
            let (id, delay_ms) = state.push_notification(message, kind, duration_ms, now_ms);
            state.mark_dirty();
            vec![Effect::ScheduleToastExpiry { id, delay_ms }]
        }
        Msg::NotificationExpired { id } | Msg::NotificationDismissed { id } => {
            // An expiry firing after a manual dismissal finds nothing to
            // remove and changes nothing.
            if state.remove_notification(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Shows the banner if the current policy allows it: mobile form factor,
/// surface listening, app not installed, no dismissal inside the window.
fn offer_banner(state: &mut ShellState, now_ms: u64) {
    if !state.device().is_mobile() || !state.prompt_mounted() {
        return;
    }
    if state.is_installed() || state.dismissal_suppresses(now_ms) {
        return;
    }
    if !state.banner_visible() {
        state.set_banner_visible(true);
        state.mark_dirty();
    }
}

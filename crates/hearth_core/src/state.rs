use crate::device::{classify_device, DeviceClass};
use crate::view_model::{BannerView, ShellViewModel, ToastView};

/// Identity of a browser-supplied deferred install capability.
///
/// The platform layer holds the actual capability object; the state machine
/// only tracks which one currently occupies the single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallSignal(pub u64);

/// Identifier of an active toast notification.
///
/// Minted from wall-clock milliseconds with a sequence tie-break, so two
/// notifications posted within the same millisecond still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Message,
    Success,
    Error,
    Info,
}

/// How the page is currently being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Browser,
    /// Running as an installed app rather than inside a browser tab.
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
}

/// Environment facts and product-tuned timing knobs.
///
/// The delay and window values are deliberately configurable rather than
/// hard-coded; the defaults match the shipped product behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub user_agent: String,
    pub display_mode: DisplayMode,
    /// Delay before the banner is offered even without a capture, on mobile.
    pub banner_delay_ms: u64,
    /// How long a dismissal suppresses the banner.
    pub dismissal_window_ms: u64,
    /// Toast lifetime when the publisher does not specify one.
    pub default_toast_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            display_mode: DisplayMode::Browser,
            banner_delay_ms: 30_000,
            dismissal_window_ms: 7 * 24 * 3_600_000,
            default_toast_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct IdClock {
    last_ms: u64,
    seq: u32,
}

impl IdClock {
    // 20 bits of sequence; the millisecond part never moves backwards, so
    // ids stay distinct even across wall-clock steps.
    fn mint(&mut self, now_ms: u64) -> NotificationId {
        if now_ms <= self.last_ms {
            self.seq += 1;
        } else {
            self.last_ms = now_ms;
            self.seq = 0;
        }
        NotificationId((self.last_ms << 20) | u64::from(self.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    config: ShellConfig,
    device: DeviceClass,
    installed: bool,
    install_signal: Option<InstallSignal>,
    banner_visible: bool,
    prompt_mounted: bool,
    dismissed_at_ms: Option<u64>,
    toast_mounted: bool,
    notifications: Vec<ActiveNotification>,
    id_clock: IdClock,
    dirty: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl ShellState {
    pub fn new(config: ShellConfig) -> Self {
        let device = classify_device(&config.user_agent);
        let installed = config.display_mode == DisplayMode::Standalone;
        Self {
            config,
            device,
            installed,
            install_signal: None,
            banner_visible: false,
            prompt_mounted: false,
            dismissed_at_ms: None,
            toast_mounted: false,
            notifications: Vec::new(),
            id_clock: IdClock::default(),
            dirty: false,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// True while the page runs as an installed app.
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// True if a deferred install capability is held, or the platform offers
    /// a manual install flow (which is always available).
    pub fn can_prompt_install(&self) -> bool {
        self.install_signal.is_some() || self.device.has_manual_install_flow()
    }

    pub fn install_signal(&self) -> Option<InstallSignal> {
        self.install_signal
    }

    pub fn dismissed_at_ms(&self) -> Option<u64> {
        self.dismissed_at_ms
    }

    pub fn view(&self) -> ShellViewModel {
        let banner = self.banner_visible.then(|| BannerView {
            manual_instructions: self.device.has_manual_install_flow(),
        });
        ShellViewModel {
            banner,
            notifications: self
                .notifications
                .iter()
                .map(|n| ToastView {
                    id: n.id,
                    message: n.message.clone(),
                    kind: n.kind,
                    duration_ms: n.duration_ms,
                })
                .collect(),
            can_install: self.can_prompt_install(),
            installed: self.installed,
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag; used to coalesce rendering.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_signal(&mut self, signal: InstallSignal) {
        self.install_signal = Some(signal);
    }

    pub(crate) fn take_signal(&mut self) -> Option<InstallSignal> {
        self.install_signal.take()
    }

    pub(crate) fn clear_signal(&mut self) {
        self.install_signal = None;
    }

    pub(crate) fn mark_installed(&mut self) {
        self.installed = true;
    }

    pub(crate) fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub(crate) fn set_banner_visible(&mut self, visible: bool) {
        self.banner_visible = visible;
    }

    pub(crate) fn prompt_mounted(&self) -> bool {
        self.prompt_mounted
    }

    pub(crate) fn set_prompt_mounted(&mut self, mounted: bool) {
        self.prompt_mounted = mounted;
    }

    pub(crate) fn toast_mounted(&self) -> bool {
        self.toast_mounted
    }

    pub(crate) fn set_toast_mounted(&mut self, mounted: bool) {
        self.toast_mounted = mounted;
    }

    pub(crate) fn record_dismissal(&mut self, at_ms: u64) {
        self.dismissed_at_ms = Some(at_ms);
    }

    /// Whether a prior dismissal still suppresses the banner at `now_ms`.
    pub(crate) fn dismissal_suppresses(&self, now_ms: u64) -> bool {
        match self.dismissed_at_ms {
            Some(at_ms) => now_ms.saturating_sub(at_ms) < self.config.dismissal_window_ms,
            None => false,
        }
    }

    pub(crate) fn push_notification(
        &mut self,
        message: String,
        kind: NotificationKind,
        duration_ms: Option<u64>,
        now_ms: u64,
    ) -> (NotificationId, u64) {
        let id = self.id_clock.mint(now_ms);
        let duration_ms = duration_ms.unwrap_or(self.config.default_toast_ms);
        self.notifications.push(ActiveNotification {
            id,
            message,
            kind,
            duration_ms,
        });
        (id, duration_ms)
    }

    /// Removes a notification; returns false if the id was already gone.
    pub(crate) fn remove_notification(&mut self, id: NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    pub(crate) fn clear_notifications(&mut self) -> bool {
        let had_any = !self.notifications.is_empty();
        self.notifications.clear();
        had_any
    }
}

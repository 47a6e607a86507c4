#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The browser signalled install eligibility; the native mini-banner has
    /// already been suppressed and the capability stashed by the platform.
    InstallSignalCaptured {
        signal: crate::InstallSignal,
        now_ms: u64,
    },
    /// The platform's installed-app event fired.
    AppInstalled,
    /// A caller asked to run the native install dialog.
    InstallRequested,
    /// Outcome of the native install dialog.
    InstallChoiceResolved { accepted: bool },
    /// The delayed banner timer fired.
    BannerDelayElapsed { now_ms: u64 },
    /// User closed the banner without installing.
    BannerDismissed { now_ms: u64 },
    /// A broadcast asked for the banner to be hidden.
    BannerHideRequested,
    /// A persisted dismissal timestamp was loaded at startup.
    DismissalRestored { at_ms: u64 },
    /// The banner surface started or stopped listening.
    PromptSurfaceMounted,
    PromptSurfaceUnmounted,
    /// The toast surface started or stopped listening.
    ToastSurfaceMounted,
    ToastSurfaceUnmounted,
    /// A notification broadcast arrived.
    NotificationPosted {
        message: String,
        kind: crate::NotificationKind,
        duration_ms: Option<u64>,
        now_ms: u64,
    },
    /// A notification's scheduled lifetime elapsed.
    NotificationExpired { id: crate::NotificationId },
    /// User closed a notification by hand.
    NotificationDismissed { id: crate::NotificationId },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Consume the held capability and run the native install dialog.
    RunInstallPrompt { signal: crate::InstallSignal },
    StartBannerTimer { delay_ms: u64 },
    CancelBannerTimer,
    /// Write the dismissal timestamp to client-local storage.
    PersistDismissal { at_ms: u64 },
    ScheduleToastExpiry {
        id: crate::NotificationId,
        delay_ms: u64,
    },
    CancelToastTimers,
}

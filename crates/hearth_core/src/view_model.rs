use crate::{NotificationId, NotificationKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellViewModel {
    pub banner: Option<BannerView>,
    /// Active toasts in insertion order.
    pub notifications: Vec<ToastView>,
    pub can_install: bool,
    pub installed: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerView {
    /// Render the manual "add to home screen" steps instead of an install
    /// button.
    pub manual_instructions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
}

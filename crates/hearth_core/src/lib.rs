//! Hearth core: pure state machine for the install banner and toast surface.
mod device;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use device::{classify_device, DeviceClass};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    ActiveNotification, DisplayMode, InstallSignal, NotificationId, NotificationKind, ShellConfig,
    ShellState,
};
pub use update::update;
pub use view_model::{BannerView, ShellViewModel, ToastView};

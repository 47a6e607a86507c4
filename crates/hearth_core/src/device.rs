/// Form-factor classification derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile {
        /// The platform never emits an install signal; installation goes
        /// through a manual "add to home screen" flow instead.
        manual_install: bool,
    },
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, DeviceClass::Mobile { .. })
    }

    pub fn has_manual_install_flow(self) -> bool {
        matches!(
            self,
            DeviceClass::Mobile {
                manual_install: true
            }
        )
    }
}

const MOBILE_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

// Matched case-sensitively, unlike the mobile token list.
const MANUAL_INSTALL_TOKENS: &[&str] = &["iPad", "iPhone", "iPod"];

/// Classifies a user-agent string against the fixed mobile token list.
pub fn classify_device(user_agent: &str) -> DeviceClass {
    let lowered = user_agent.to_ascii_lowercase();
    let mobile = MOBILE_TOKENS.iter().any(|token| lowered.contains(token));
    if !mobile {
        return DeviceClass::Desktop;
    }
    let manual_install = MANUAL_INSTALL_TOKENS
        .iter()
        .any(|token| user_agent.contains(token));
    DeviceClass::Mobile { manual_install }
}

use embassy_time::Duration;

use crate::tap_hold::TapHoldMode;

/// Options for configurable action behavior
#[derive(Clone, Copy, Debug, Default)]
pub struct BehaviorConfig {
    pub tap_hold: TapHoldConfig,
    pub one_shot: OneShotConfig,
}

/// Configurations for tap hold behavior.
///
/// `tapping_term` is the fallback tap window; the per-key-class policy in
/// [`crate::tap_hold`] scales it per key. `release_term` is the tight window
/// used once a resolved hold enters its release phase.
#[derive(Clone, Copy, Debug)]
pub struct TapHoldConfig {
    pub tapping_term: Duration,
    pub release_term: Duration,
    pub mode: TapHoldMode,
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            tapping_term: Duration::from_millis(200),
            release_term: Duration::from_millis(8),
            mode: TapHoldMode::HoldOnOtherPress,
        }
    }
}

/// Config for one shot behavior
#[derive(Clone, Copy, Debug)]
pub struct OneShotConfig {
    pub timeout: Duration,
}

impl Default for OneShotConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}

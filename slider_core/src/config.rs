//! Runtime configuration types for the slider engine.
//!
//! These are the structs consumed by `SliderController`, `Calibrator` and the
//! runner. They are separate from the TOML-deserialized config in
//! `slider_config`; see `conversions` for the bridge.

/// Pixel distance range spanned by the virtual slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingCfg {
    /// Distance mapped to 0 %.
    pub min_dist: f32,
    /// Distance mapped to 100 %.
    pub max_dist: f32,
}

impl Default for MappingCfg {
    fn default() -> Self {
        Self {
            min_dist: 30.0,
            max_dist: 180.0,
        }
    }
}

/// Actuation policy of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Emit only when `now - last_action >= cooldown`.
    RateLimitedTrigger,
    /// Emit every tick while out of sync; only the post-action delay throttles.
    #[default]
    ProportionalChase,
}

/// Fixed distance thresholds for the pure trigger form of `RateLimitedTrigger`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerThresholds {
    /// `distance < down_below` presses volume-down.
    pub down_below: f32,
    /// `distance > up_above` presses volume-up.
    pub up_above: f32,
}

/// Control configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCfg {
    /// Percentage points per pulse and quantization grid. Valid range 1..=100.
    pub step_size: u32,
    pub policy: Policy,
    /// Minimum spacing between two pulses under `RateLimitedTrigger` (ms).
    pub cooldown_ms: u64,
    /// Pause after every pulse (ms). The only backpressure on the host.
    pub post_action_delay_ms: u64,
    /// When set, `RateLimitedTrigger` compares raw distance to these thresholds.
    pub trigger: Option<TriggerThresholds>,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            step_size: 2,
            policy: Policy::ProportionalChase,
            cooldown_ms: 150,
            post_action_delay_ms: 20,
            trigger: None,
        }
    }
}

/// Which extreme the calibrator drives the host to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationTarget {
    /// No pulses; believed volume is seeded from `CalibrationCfg::initial_volume`.
    None,
    ForceMin,
    #[default]
    ForceMax,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationCfg {
    pub target: CalibrationTarget,
    /// Extra pulses beyond `ceil(100 / step_size)`.
    pub margin: u32,
    /// Pause between consecutive calibration pulses (ms).
    pub pulse_pause_ms: u64,
    /// Assumed starting volume for `CalibrationTarget::None` (0..=100).
    pub initial_volume: u8,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            target: CalibrationTarget::ForceMax,
            margin: 5,
            pulse_pause_ms: 10,
            initial_volume: 0,
        }
    }
}

/// Tick loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerCfg {
    /// Ticks per second.
    pub frame_rate_hz: u32,
    /// Stop after this many ticks (None = until stopped or exhausted).
    pub max_ticks: Option<u64>,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            frame_rate_hz: 30,
            max_ticks: None,
        }
    }
}

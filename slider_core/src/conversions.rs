//! `From` implementations bridging `slider_config` types to `slider_core` types.
//!
//! `slider_config::Config::validate` is expected to have run first; values
//! outside the runtime types' ranges are saturated here and rejected again by
//! the builder.

use crate::config::{
    CalibrationCfg, CalibrationTarget, ControlCfg, MappingCfg, Policy, RunnerCfg,
    TriggerThresholds,
};
use crate::util::secs_to_ms;

// ── MappingCfg ───────────────────────────────────────────────────────────────

impl From<&slider_config::MappingCfg> for MappingCfg {
    fn from(c: &slider_config::MappingCfg) -> Self {
        Self {
            min_dist: c.min_dist,
            max_dist: c.max_dist,
        }
    }
}

// ── ControlCfg ───────────────────────────────────────────────────────────────

impl From<slider_config::Policy> for Policy {
    fn from(p: slider_config::Policy) -> Self {
        match p {
            slider_config::Policy::RateLimitedTrigger => Policy::RateLimitedTrigger,
            slider_config::Policy::ProportionalChase => Policy::ProportionalChase,
        }
    }
}

impl From<&slider_config::TriggerCfg> for TriggerThresholds {
    fn from(t: &slider_config::TriggerCfg) -> Self {
        Self {
            down_below: t.down_below,
            up_above: t.up_above,
        }
    }
}

impl From<&slider_config::ControlCfg> for ControlCfg {
    fn from(c: &slider_config::ControlCfg) -> Self {
        Self {
            // Out-of-range sizes become 0 and fail step validation.
            step_size: u32::try_from(c.step_size).unwrap_or(0),
            policy: c.policy.into(),
            cooldown_ms: secs_to_ms(c.cooldown_s),
            post_action_delay_ms: c.post_action_delay_ms,
            trigger: c.trigger.as_ref().map(TriggerThresholds::from),
        }
    }
}

// ── CalibrationCfg ───────────────────────────────────────────────────────────

impl From<slider_config::CalibrationTarget> for CalibrationTarget {
    fn from(t: slider_config::CalibrationTarget) -> Self {
        match t {
            slider_config::CalibrationTarget::None => CalibrationTarget::None,
            slider_config::CalibrationTarget::ForceMin => CalibrationTarget::ForceMin,
            slider_config::CalibrationTarget::ForceMax => CalibrationTarget::ForceMax,
        }
    }
}

impl From<&slider_config::CalibrationCfg> for CalibrationCfg {
    fn from(c: &slider_config::CalibrationCfg) -> Self {
        Self {
            target: c.target.into(),
            margin: c.margin,
            pulse_pause_ms: c.pulse_pause_ms,
            initial_volume: u8::try_from(c.initial_volume.clamp(0, 100)).unwrap_or(0),
        }
    }
}

// ── RunnerCfg ────────────────────────────────────────────────────────────────

impl From<&slider_config::RunnerCfg> for RunnerCfg {
    fn from(c: &slider_config::RunnerCfg) -> Self {
        Self {
            frame_rate_hz: c.frame_rate_hz,
            max_ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_cooldown_is_rounded_to_ms() {
        let c = slider_config::ControlCfg {
            cooldown_s: 0.1504,
            policy: slider_config::Policy::RateLimitedTrigger,
            ..Default::default()
        };
        let core = ControlCfg::from(&c);
        assert_eq!(core.cooldown_ms, 150);
        assert_eq!(core.policy, Policy::RateLimitedTrigger);
    }

    #[test]
    fn negative_step_size_saturates_to_zero() {
        let c = slider_config::ControlCfg {
            step_size: -3,
            ..Default::default()
        };
        assert_eq!(ControlCfg::from(&c).step_size, 0);
    }

    #[test]
    fn calibration_initial_volume_is_clamped() {
        let c = slider_config::CalibrationCfg {
            target: slider_config::CalibrationTarget::None,
            initial_volume: 250,
            ..Default::default()
        };
        let core = CalibrationCfg::from(&c);
        assert_eq!(core.initial_volume, 100);
        assert_eq!(core.target, CalibrationTarget::None);
    }

    #[test]
    fn trigger_is_carried_over() {
        let c = slider_config::ControlCfg {
            policy: slider_config::Policy::RateLimitedTrigger,
            trigger: Some(slider_config::TriggerCfg {
                down_below: 40.0,
                up_above: 150.0,
            }),
            ..Default::default()
        };
        let t = ControlCfg::from(&c).trigger.unwrap();
        assert_eq!(t.down_below, 40.0);
        assert_eq!(t.up_above, 150.0);
    }
}

//! The virtual slider state machine (`SliderController`).
//!
//! Holds the believed host volume and decides, once per tick, whether a
//! single volume pulse should be sent. Believed volume only changes as a
//! consequence of an emitted command, under the assumption that every pulse
//! moves the host by exactly one step. Nothing here can observe the host, so a
//! dropped pulse desyncs silently until the next calibration.

use crate::config::{ControlCfg, MappingCfg, Policy, TriggerThresholds};
use crate::error::SliderError;
use crate::mapping::DistanceMapper;
use crate::quantize::{ceiling, quantize_with, validate_step};
use crate::status::ActuationCommand;

/// Mutable controller state. Created by the calibrator, owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderState {
    pub(crate) believed_volume: u8,
    pub(crate) last_action_ms: Option<u64>,
    pub(crate) last_command: ActuationCommand,
}

impl SliderState {
    /// State asserted with full confidence (after calibration). No prior action.
    pub fn asserted(believed_volume: u8) -> Self {
        Self {
            believed_volume: believed_volume.min(100),
            last_action_ms: None,
            last_command: ActuationCommand::None,
        }
    }

    #[inline]
    pub fn believed_volume(&self) -> u8 {
        self.believed_volume
    }

    /// Timestamp (ms since the slider epoch) of the last emitted command.
    #[inline]
    pub fn last_action_ms(&self) -> Option<u64> {
        self.last_action_ms
    }

    #[inline]
    pub fn last_command(&self) -> ActuationCommand {
        self.last_command
    }
}

#[derive(Debug, Clone)]
pub struct SliderController {
    state: SliderState,
    mapper: DistanceMapper,
    control: ControlCfg,
    step: u8,
    top: u8,
}

impl SliderController {
    /// Validate configuration and take ownership of `state`.
    ///
    /// The believed volume is snapped onto the step grid so the
    /// multiple-of-step invariant holds from the first tick.
    pub fn new(
        state: SliderState,
        mapping: MappingCfg,
        control: ControlCfg,
    ) -> Result<Self, SliderError> {
        let step = validate_step(control.step_size)?;
        let mapper = DistanceMapper::new(mapping.min_dist, mapping.max_dist)?;
        if let Some(t) = control.trigger {
            validate_trigger(t)?;
        }
        let mut state = state;
        state.believed_volume = quantize_with(f32::from(state.believed_volume), step);
        Ok(Self {
            state,
            mapper,
            control,
            step,
            top: ceiling(step),
        })
    }

    #[inline]
    pub fn believed_volume(&self) -> u8 {
        self.state.believed_volume
    }

    #[inline]
    pub fn last_command(&self) -> ActuationCommand {
        self.state.last_command
    }

    #[inline]
    pub fn state(&self) -> &SliderState {
        &self.state
    }

    #[inline]
    pub fn step_size(&self) -> u8 {
        self.step
    }

    /// Highest reachable believed volume.
    #[inline]
    pub fn ceiling(&self) -> u8 {
        self.top
    }

    #[inline]
    pub fn mapper(&self) -> &DistanceMapper {
        &self.mapper
    }

    #[inline]
    pub fn control(&self) -> &ControlCfg {
        &self.control
    }

    /// Quantized target volume for a raw distance.
    #[inline]
    pub fn target_for(&self, distance: f32) -> u8 {
        quantize_with(self.mapper.map(distance), self.step)
    }

    /// Replace the state wholesale, e.g. after re-running calibration.
    pub fn reset(&mut self, state: SliderState) {
        let mut state = state;
        state.believed_volume = quantize_with(f32::from(state.believed_volume), self.step);
        self.state = state;
    }

    /// Advance one tick towards `target` (percent). The target is snapped to
    /// the nearest reachable grid value first. `None` freezes: the target
    /// becomes the believed volume and nothing is emitted.
    pub fn step(&mut self, target: Option<u8>, now_ms: u64) -> ActuationCommand {
        let believed = self.state.believed_volume;
        let target = target.map_or(believed, |t| quantize_with(f32::from(t), self.step));
        let diff = i16::from(target) - i16::from(believed);
        let wanted = if diff.unsigned_abs() < u16::from(self.step) {
            ActuationCommand::None
        } else if diff > 0 {
            ActuationCommand::Increase
        } else {
            ActuationCommand::Decrease
        };
        let cmd = self.gate(wanted, now_ms);
        self.apply(cmd, now_ms)
    }

    /// Advance one tick from a raw distance (or its absence).
    ///
    /// With `RateLimitedTrigger` and fixed thresholds the raw distance is
    /// compared against them directly, independent of the believed volume.
    /// Otherwise the distance is mapped and quantized into a target.
    pub fn step_distance(&mut self, distance: Option<f32>, now_ms: u64) -> ActuationCommand {
        match (self.control.policy, self.control.trigger) {
            (Policy::RateLimitedTrigger, Some(t)) => {
                let wanted = match distance {
                    Some(d) if d < t.down_below => ActuationCommand::Decrease,
                    Some(d) if d > t.up_above => ActuationCommand::Increase,
                    _ => ActuationCommand::None,
                };
                let cmd = self.gate(wanted, now_ms);
                self.apply(cmd, now_ms)
            }
            _ => {
                let target = distance.map(|d| self.target_for(d));
                self.step(target, now_ms)
            }
        }
    }

    /// Cooldown gate of `RateLimitedTrigger`. The first action is never gated.
    fn gate(&self, wanted: ActuationCommand, now_ms: u64) -> ActuationCommand {
        if wanted.is_none() {
            return wanted;
        }
        match self.control.policy {
            Policy::ProportionalChase => wanted,
            Policy::RateLimitedTrigger => match self.state.last_action_ms {
                Some(last) if now_ms.saturating_sub(last) < self.control.cooldown_ms => {
                    tracing::trace!(now_ms, last, "cooldown active");
                    ActuationCommand::None
                }
                _ => wanted,
            },
        }
    }

    fn apply(&mut self, cmd: ActuationCommand, now_ms: u64) -> ActuationCommand {
        if let Some(dir) = cmd.direction() {
            let next = i16::from(self.state.believed_volume) + dir.sign() * i16::from(self.step);
            let clamped = next.clamp(0, i16::from(self.top));
            self.state.believed_volume = u8::try_from(clamped).unwrap_or(0);
            self.state.last_action_ms = Some(now_ms);
        }
        self.state.last_command = cmd;
        cmd
    }
}

fn validate_trigger(t: TriggerThresholds) -> Result<(), SliderError> {
    if !t.down_below.is_finite() || !t.up_above.is_finite() {
        return Err(SliderError::InvalidConfig(
            "trigger thresholds must be finite".into(),
        ));
    }
    if t.down_below >= t.up_above {
        return Err(SliderError::InvalidConfig(format!(
            "trigger down_below ({}) must be < up_above ({})",
            t.down_below, t.up_above
        )));
    }
    Ok(())
}

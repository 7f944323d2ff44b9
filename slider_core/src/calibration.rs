//! Startup calibration: saturate the host at a known extreme.
//!
//! The host exposes no readback, so the only way to know its volume is to
//! press one key often enough that any starting point ends up at the limit.
//! `ceil(100 / step) + margin` pulses guarantee that even if the host step is
//! a little smaller than ours. Dropped pulses cannot be detected.

use std::time::Duration;

use eyre::WrapErr;
use slider_traits::{Actuator, Clock, Direction};

use crate::config::{CalibrationCfg, CalibrationTarget};
use crate::controller::SliderState;
use crate::error::{Result, SliderError};
use crate::hw_error::map_actuator_error;
use crate::quantize::{ceiling, quantize_with, validate_step};

#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    cfg: CalibrationCfg,
    step: u8,
}

impl Calibrator {
    pub fn new(cfg: CalibrationCfg, step_size: u32) -> std::result::Result<Self, SliderError> {
        let step = validate_step(step_size)?;
        if cfg.initial_volume > 100 {
            return Err(SliderError::InvalidConfig(format!(
                "initial_volume must be in 0..=100, got {}",
                cfg.initial_volume
            )));
        }
        Ok(Self { cfg, step })
    }

    /// Direction of the saturating pulses, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self.cfg.target {
            CalibrationTarget::None => None,
            CalibrationTarget::ForceMin => Some(Direction::Down),
            CalibrationTarget::ForceMax => Some(Direction::Up),
        }
    }

    /// Number of pulses `run` will emit.
    pub fn pulse_count(&self) -> u32 {
        match self.direction() {
            None => 0,
            Some(_) => 100u32
                .div_ceil(u32::from(self.step))
                .saturating_add(self.cfg.margin),
        }
    }

    /// Volume asserted once `run` completes.
    pub fn asserted_volume(&self) -> u8 {
        match self.cfg.target {
            CalibrationTarget::None => quantize_with(f32::from(self.cfg.initial_volume), self.step),
            CalibrationTarget::ForceMin => 0,
            CalibrationTarget::ForceMax => ceiling(self.step),
        }
    }

    /// Emit the saturating pulses, pausing `pulse_pause_ms` between them, and
    /// return the freshly asserted state.
    pub fn run<A: Actuator + ?Sized>(
        &self,
        actuator: &mut A,
        clock: &dyn Clock,
    ) -> Result<SliderState> {
        let volume = self.asserted_volume();
        let Some(direction) = self.direction() else {
            tracing::info!(volume, "calibration skipped; assuming initial volume");
            return Ok(SliderState::asserted(volume));
        };

        let n = self.pulse_count();
        let pause = Duration::from_millis(self.cfg.pulse_pause_ms);
        tracing::info!(pulses = n, ?direction, "calibration start");
        for i in 0..n {
            actuator
                .pulse(direction)
                .map_err(|e| eyre::Report::new(map_actuator_error(&*e)))
                .wrap_err_with(|| format!("calibration pulse {} of {n}", i + 1))?;
            if i + 1 < n {
                clock.sleep(pause);
            }
        }
        tracing::info!(volume, "calibration complete");
        Ok(SliderState::asserted(volume))
    }
}

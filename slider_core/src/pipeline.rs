//! The per-frame pipeline (`SliderCore`).
//!
//! One tick: grab a frame, map the finger distance, advance the controller,
//! send at most one pulse, publish a snapshot. Strictly sequential; the only
//! writer of controller state is `tick` (and `calibrate`).

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use slider_traits::{Actuator, Clock, SignalSource, TrackedPoints};

use crate::calibration::Calibrator;
use crate::controller::SliderController;
use crate::error::{Result, SliderError};
use crate::feedback::{Renderer, Snapshot};
use crate::hw_error::{map_actuator_error, map_source_error};
use crate::status::{ActuationCommand, TickStatus};

pub struct SliderCore<S: SignalSource, A: Actuator> {
    pub(crate) source: S,
    pub(crate) actuator: A,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) controller: SliderController,
    pub(crate) calibrator: Calibrator,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) post_action_delay: Duration,
    pub(crate) ticks: u64,
    pub(crate) last_points: Option<TrackedPoints>,
    pub(crate) last_mapped_pct: Option<f32>,
}

impl<S: SignalSource, A: Actuator> core::fmt::Debug for SliderCore<S, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SliderCore")
            .field("believed_volume", &self.controller.believed_volume())
            .field("last_command", &self.controller.last_command())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<S: SignalSource, A: Actuator> SliderCore<S, A> {
    pub fn believed_volume(&self) -> u8 {
        self.controller.believed_volume()
    }

    pub fn last_command(&self) -> ActuationCommand {
        self.controller.last_command()
    }

    /// Tracked points of the last tick, if a hand was seen.
    pub fn tracked_points(&self) -> Option<TrackedPoints> {
        self.last_points
    }

    pub fn controller(&self) -> &SliderController {
        &self.controller
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        Arc::clone(&self.clock)
    }

    /// Milliseconds since this slider was built.
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            believed_volume: self.controller.believed_volume(),
            last_command: self.controller.last_command(),
            points: self.last_points,
            mapped_percent: self.last_mapped_pct,
        }
    }

    /// Drive the host to the configured extreme and re-assert believed state.
    /// Safe to call again at any time to clear accumulated drift.
    /// Returns the number of pulses sent.
    pub fn calibrate(&mut self) -> Result<u32> {
        let state = self.calibrator.run(&mut self.actuator, &*self.clock)?;
        self.controller.reset(state);
        Ok(self.calibrator.pulse_count())
    }

    /// One iteration of the control loop.
    pub fn tick(&mut self) -> Result<TickStatus> {
        let now_ms = self.clock.ms_since(self.epoch);

        let frame = match self.source.grab() {
            Ok(frame) => frame,
            Err(e) => {
                return match map_source_error(&*e) {
                    SliderError::EndOfStream => {
                        tracing::info!(ticks = self.ticks, "signal source exhausted");
                        Ok(TickStatus::SourceExhausted)
                    }
                    other => {
                        tracing::error!(error = %other, ticks = self.ticks, "frame acquisition failed");
                        Err(eyre::Report::new(other)).wrap_err("grabbing frame")
                    }
                };
            }
        };

        // Non-finite coordinates are treated like a missing hand.
        let points = frame.filter(TrackedPoints::is_finite);
        let distance = points.as_ref().map(TrackedPoints::distance);
        self.last_mapped_pct = distance.map(|d| self.controller.mapper().map(d));

        let cmd = self.controller.step_distance(distance, now_ms);
        if let Some(direction) = cmd.direction() {
            self.actuator
                .pulse(direction)
                .map_err(|e| eyre::Report::new(map_actuator_error(&*e)))
                .wrap_err("sending volume pulse")?;
            tracing::debug!(
                ?direction,
                believed = self.controller.believed_volume(),
                now_ms,
                "pulse"
            );
            self.clock.sleep(self.post_action_delay);
        }

        self.last_points = points;
        self.ticks = self.ticks.saturating_add(1);

        let snapshot = self.snapshot();
        if let Err(e) = self.renderer.render(&snapshot) {
            tracing::debug!(error = %e, "renderer failed; ignoring");
        }
        Ok(TickStatus::Ticked(cmd))
    }
}

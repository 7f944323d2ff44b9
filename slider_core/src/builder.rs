//! Type-state builder for `Slider` and generic `build_slider` constructor.
//!
//! The builder enforces at compile time that a signal source and an actuator
//! are provided before `build()` is available. `try_build()` is always
//! available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use slider_traits::clock::{Clock, MonotonicClock};
use slider_traits::{Actuator, SignalSource, TrackedPoints};

use crate::calibration::Calibrator;
use crate::config::{CalibrationCfg, ControlCfg, MappingCfg};
use crate::controller::{SliderController, SliderState};
use crate::error::{BuildError, Result};
use crate::feedback::{NullRenderer, Renderer, Snapshot};
use crate::pipeline::SliderCore;
use crate::status::{ActuationCommand, TickStatus};

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Slider with boxed source and actuator.
pub struct Slider {
    pub(crate) inner: SliderCore<Box<dyn SignalSource>, Box<dyn Actuator>>,
}

impl core::fmt::Debug for Slider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Slider {
    /// Start building a Slider.
    pub fn builder() -> SliderBuilder<Missing, Missing> {
        SliderBuilder::default()
    }

    /// Believed host volume, in percent.
    pub fn believed_volume(&self) -> u8 {
        self.inner.believed_volume()
    }

    /// Command decided on the last tick.
    pub fn last_command(&self) -> ActuationCommand {
        self.inner.last_command()
    }

    /// Tracked points of the last tick, if a hand was seen.
    pub fn tracked_points(&self) -> Option<TrackedPoints> {
        self.inner.tracked_points()
    }

    pub fn controller(&self) -> &SliderController {
        self.inner.controller()
    }

    pub fn ticks(&self) -> u64 {
        self.inner.ticks()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot()
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        self.inner.clock()
    }

    /// Milliseconds since this slider was built.
    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms()
    }

    /// Run the calibration pulses; returns how many were sent.
    pub fn calibrate(&mut self) -> Result<u32> {
        self.inner.calibrate()
    }

    /// One iteration of the control loop.
    pub fn tick(&mut self) -> Result<TickStatus> {
        self.inner.tick()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Slider`. All fields are validated on `build()`.
pub struct SliderBuilder<S, A> {
    source: Option<Box<dyn SignalSource>>,
    actuator: Option<Box<dyn Actuator>>,
    renderer: Option<Box<dyn Renderer>>,
    mapping: Option<MappingCfg>,
    control: Option<ControlCfg>,
    calibration: Option<CalibrationCfg>,
    initial_state: Option<SliderState>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
    _a: PhantomData<A>,
}

impl Default for SliderBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            source: None,
            actuator: None,
            renderer: None,
            mapping: None,
            control: None,
            calibration: None,
            initial_state: None,
            clock: None,
            _s: PhantomData,
            _a: PhantomData,
        }
    }
}

impl<S, A> SliderBuilder<S, A> {
    fn retype<S2, A2>(self) -> SliderBuilder<S2, A2> {
        SliderBuilder {
            source: self.source,
            actuator: self.actuator,
            renderer: self.renderer,
            mapping: self.mapping,
            control: self.control,
            calibration: self.calibration,
            initial_state: self.initial_state,
            clock: self.clock,
            _s: PhantomData,
            _a: PhantomData,
        }
    }

    pub fn with_source(mut self, source: impl SignalSource + 'static) -> SliderBuilder<Set, A> {
        self.source = Some(Box::new(source));
        self.retype()
    }

    pub fn with_actuator(mut self, actuator: impl Actuator + 'static) -> SliderBuilder<S, Set> {
        self.actuator = Some(Box::new(actuator));
        self.retype()
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_mapping(mut self, mapping: MappingCfg) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_control(mut self, control: ControlCfg) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_calibration(mut self, calibration: CalibrationCfg) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Start from a known state instead of the calibrator's asserted volume.
    /// Mostly useful in tests and when calibration is skipped.
    pub fn with_initial_volume(mut self, volume: u8) -> Self {
        self.initial_state = Some(SliderState::asserted(volume));
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build with runtime checks for missing parts.
    pub fn try_build(self) -> Result<Slider> {
        let source = self
            .source
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSource))?;
        let actuator = self
            .actuator
            .ok_or_else(|| eyre::Report::new(BuildError::MissingActuator))?;
        let inner = validate_and_build(
            source,
            actuator,
            self.renderer,
            self.mapping.unwrap_or_default(),
            self.control.unwrap_or_default(),
            self.calibration.unwrap_or_default(),
            self.initial_state,
            self.clock,
        )?;
        Ok(Slider { inner })
    }
}

impl SliderBuilder<Set, Set> {
    /// Build once source and actuator are set.
    pub fn build(self) -> Result<Slider> {
        self.try_build()
    }
}

/// Validate configuration and construct a `SliderCore`.
///
/// Single source of truth for validation, used by both
/// `SliderBuilder::try_build()` and `build_slider()`.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<S: SignalSource, A: Actuator>(
    source: S,
    actuator: A,
    renderer: Option<Box<dyn Renderer>>,
    mapping: MappingCfg,
    control: ControlCfg,
    calibration: CalibrationCfg,
    initial_state: Option<SliderState>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SliderCore<S, A>> {
    if control.post_action_delay_ms > 10_000 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "post_action_delay_ms must be <= 10000",
        )));
    }

    let calibrator =
        Calibrator::new(calibration, control.step_size).map_err(eyre::Report::new)?;
    let state = initial_state.unwrap_or_else(|| SliderState::asserted(calibrator.asserted_volume()));
    let controller = SliderController::new(state, mapping, control).map_err(eyre::Report::new)?;

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();

    tracing::debug!(
        step = controller.step_size(),
        policy = ?control.policy,
        believed = controller.believed_volume(),
        "slider built"
    );

    Ok(SliderCore {
        source,
        actuator,
        renderer: renderer.unwrap_or_else(|| Box::new(NullRenderer)),
        controller,
        calibrator,
        clock,
        epoch,
        post_action_delay: Duration::from_millis(control.post_action_delay_ms),
        ticks: 0,
        last_points: None,
        last_mapped_pct: None,
    })
}

/// Build a statically dispatched `SliderCore`.
#[allow(clippy::too_many_arguments)]
pub fn build_slider<S: SignalSource, A: Actuator>(
    source: S,
    actuator: A,
    mapping: MappingCfg,
    control: ControlCfg,
    calibration: CalibrationCfg,
    renderer: Option<Box<dyn Renderer>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SliderCore<S, A>> {
    validate_and_build(
        source,
        actuator,
        renderer,
        mapping,
        control,
        calibration,
        None,
        clock,
    )
}

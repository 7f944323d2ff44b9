//! Actuators and signal sources for the slider.
//!
//! Nothing here touches a camera or an OS input layer directly: the
//! simulated host models how a real host reacts to volume keys, the command
//! actuator delegates each pulse to an external program, and the sources
//! replay recorded or synthetic tracker output.

pub mod command;
pub mod error;

pub use command::CommandActuator;

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use error::HwError;
use slider_traits::{Actuator, BoxError, Direction, Point, SignalSource, TrackedPoints};

/// Read-only view on a [`SimulatedHost`] that stays valid after the host
/// has been moved into the control loop.
#[derive(Debug, Clone)]
pub struct HostProbe {
    volume: Rc<Cell<u8>>,
    pulses: Rc<Cell<u64>>,
    dropped: Rc<Cell<u64>>,
}

impl HostProbe {
    /// The host's real volume (what the controller can only believe in).
    pub fn volume(&self) -> u8 {
        self.volume.get()
    }

    /// Pulses received, including dropped ones.
    pub fn pulses(&self) -> u64 {
        self.pulses.get()
    }

    /// Pulses the host ignored.
    pub fn dropped(&self) -> u64 {
        self.dropped.get()
    }
}

/// Host whose volume moves by `host_step` per honoured pulse, saturating at 0 and 100.
///
/// `drop_every = n` ignores every n-th pulse, the way a real host loses key
/// events when the window loses focus.
#[derive(Debug)]
pub struct SimulatedHost {
    host_step: u8,
    drop_every: u32,
    probe: HostProbe,
}

impl SimulatedHost {
    pub fn new(initial_volume: u8, host_step: u8) -> Self {
        Self {
            host_step: host_step.max(1),
            drop_every: 0,
            probe: HostProbe {
                volume: Rc::new(Cell::new(initial_volume.min(100))),
                pulses: Rc::new(Cell::new(0)),
                dropped: Rc::new(Cell::new(0)),
            },
        }
    }

    pub fn with_drop_every(mut self, n: u32) -> Self {
        self.drop_every = n;
        self
    }

    pub fn probe(&self) -> HostProbe {
        self.probe.clone()
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new(50, 2)
    }
}

impl Actuator for SimulatedHost {
    fn pulse(&mut self, direction: Direction) -> Result<(), BoxError> {
        let n = self.probe.pulses.get().saturating_add(1);
        self.probe.pulses.set(n);
        if self.drop_every > 0 && n % u64::from(self.drop_every) == 0 {
            self.probe.dropped.set(self.probe.dropped.get().saturating_add(1));
            tracing::debug!(?direction, pulse = n, "simulated host dropped pulse");
            return Ok(());
        }
        let v = self.probe.volume.get();
        let next = match direction {
            Direction::Up => v.saturating_add(self.host_step).min(100),
            Direction::Down => v.saturating_sub(self.host_step),
        };
        self.probe.volume.set(next);
        tracing::trace!(?direction, volume = next, "simulated host pulse");
        Ok(())
    }
}

/// Replays a fixed sequence of frames, then reports end of stream.
#[derive(Debug, Default)]
pub struct TraceSource {
    frames: VecDeque<Option<TrackedPoints>>,
}

impl TraceSource {
    pub fn new(frames: impl IntoIterator<Item = Option<TrackedPoints>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames not yet grabbed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SignalSource for TraceSource {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(frame),
            None => Err(Box::new(HwError::EndOfStream)),
        }
    }
}

/// Synthetic pinch gesture: the two points open from `min_dist` to `max_dist`
/// and close again, one full cycle every `period_frames` frames.
#[derive(Debug, Clone)]
pub struct SweepSource {
    min_dist: f32,
    max_dist: f32,
    period_frames: u32,
    frames_left: Option<u64>,
    frame: u64,
    anchor: Point,
}

impl SweepSource {
    pub fn new(min_dist: f32, max_dist: f32, period_frames: u32) -> Self {
        Self {
            min_dist,
            max_dist,
            period_frames: period_frames.max(2),
            frames_left: None,
            frame: 0,
            anchor: Point::new(320.0, 240.0),
        }
    }

    /// Stop with end of stream after `n` frames.
    pub fn with_frame_limit(mut self, n: u64) -> Self {
        self.frames_left = Some(n);
        self
    }

    fn distance_at(&self, frame: u64) -> f32 {
        let period = u64::from(self.period_frames);
        let half = period as f32 / 2.0;
        let phase = (frame % period) as f32;
        // triangle wave 0 -> 1 -> 0
        let t = if phase <= half {
            phase / half
        } else {
            (period as f32 - phase) / half
        };
        self.min_dist + (self.max_dist - self.min_dist) * t
    }
}

impl SignalSource for SweepSource {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError> {
        if let Some(left) = self.frames_left.as_mut() {
            if *left == 0 {
                return Err(Box::new(HwError::EndOfStream));
            }
            *left -= 1;
        }
        let d = self.distance_at(self.frame);
        self.frame = self.frame.wrapping_add(1);
        let a = self.anchor;
        let b = Point::new(a.x + d, a.y);
        Ok(Some(TrackedPoints::new(a, b)))
    }
}

/// Wraps a source and fails the grab at frame `fail_at` (0-based), the way a
/// camera disappears mid-run.
#[derive(Debug)]
pub struct FaultySource<S> {
    inner: S,
    fail_at: u64,
    frame: u64,
}

impl<S> FaultySource<S> {
    pub fn new(inner: S, fail_at: u64) -> Self {
        Self {
            inner,
            fail_at,
            frame: 0,
        }
    }
}

impl<S: SignalSource> SignalSource for FaultySource<S> {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError> {
        let n = self.frame;
        self.frame = self.frame.saturating_add(1);
        if n >= self.fail_at {
            return Err(Box::new(HwError::Grab(format!("camera lost at frame {n}"))));
        }
        self.inner.grab()
    }
}

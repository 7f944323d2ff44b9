//! Boundary types shared by the slider crates.
//!
//! The core never talks to a camera, a landmark model or an OS input layer
//! directly; it sees tracked points through [`SignalSource`] and emits pulses
//! through [`Actuator`]. Errors cross these boundaries boxed so that any
//! backend can plug in; `slider_core` maps them to its typed error enum.

pub mod clock;
pub mod geometry;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use geometry::{Point, TrackedPoints};

/// Boxed error used at every trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Direction of a single volume pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// +1 for `Up`, -1 for `Down`.
    #[inline]
    pub fn sign(self) -> i16 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Something that can press the host's volume-up / volume-down key.
///
/// A call blocks until the simulated press+release has completed. `Ok(())`
/// only means the pulse was issued; whether the host honoured it is not
/// observable.
pub trait Actuator {
    fn pulse(&mut self, direction: Direction) -> Result<(), BoxError>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn pulse(&mut self, direction: Direction) -> Result<(), BoxError> {
        (**self).pulse(direction)
    }
}

/// Per-frame supplier of the two tracked points.
///
/// `Ok(None)` means the frame was acquired but no hand was found.
pub trait SignalSource {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError>;
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError> {
        (**self).grab()
    }
}

//! Test and helper mocks for slider_core

use std::cell::RefCell;
use std::rc::Rc;

use slider_traits::{Actuator, BoxError, Direction, SignalSource, TrackedPoints};

/// Records every pulse it receives. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    log: Rc<RefCell<Vec<Direction>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the pulses sent so far.
    pub fn pulses(&self) -> Vec<Direction> {
        self.log.borrow().clone()
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.log.borrow().iter().filter(|d| **d == direction).count()
    }
}

impl Actuator for RecordingActuator {
    fn pulse(&mut self, direction: Direction) -> Result<(), BoxError> {
        self.log.borrow_mut().push(direction);
        Ok(())
    }
}

/// An actuator whose every pulse fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingActuator;

impl Actuator for FailingActuator {
    fn pulse(&mut self, _direction: Direction) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("injection backend unavailable")))
    }
}

/// A source that never sees a hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHandSource;

impl SignalSource for NoHandSource {
    fn grab(&mut self) -> Result<Option<TrackedPoints>, BoxError> {
        Ok(None)
    }
}

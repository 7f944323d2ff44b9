//! Read-only state published to a renderer once per tick.

use slider_traits::{BoxError, Point, TrackedPoints};

use crate::status::ActuationCommand;

/// Everything a renderer may show for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Ticks completed so far (this one included).
    pub tick: u64,
    pub believed_volume: u8,
    pub last_command: ActuationCommand,
    /// Tracked points of this tick; `None` when no hand was seen.
    pub points: Option<TrackedPoints>,
    /// Unquantized percentage the current distance maps to.
    pub mapped_percent: Option<f32>,
}

impl Snapshot {
    /// Where to draw the hand marker: halfway between the two fingertips.
    pub fn marker(&self) -> Option<Point> {
        self.points.as_ref().map(TrackedPoints::midpoint)
    }
}

/// Consumer of per-tick snapshots. Failures are logged and otherwise ignored.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), BoxError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), BoxError> {
        (**self).render(snapshot)
    }
}

/// Renderer that drops every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &Snapshot) -> Result<(), BoxError> {
        Ok(())
    }
}

//! Per-tick decisions and outcomes.

use slider_traits::Direction;

/// What the controller decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActuationCommand {
    Increase,
    Decrease,
    #[default]
    None,
}

impl ActuationCommand {
    /// The pulse to send, if any.
    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            ActuationCommand::Increase => Some(Direction::Up),
            ActuationCommand::Decrease => Some(Direction::Down),
            ActuationCommand::None => None,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        matches!(self, ActuationCommand::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActuationCommand::Increase => "increase",
            ActuationCommand::Decrease => "decrease",
            ActuationCommand::None => "none",
        }
    }
}

/// Outcome of one `Slider::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// The tick ran; carries the command that was (or was not) actuated.
    Ticked(ActuationCommand),
    /// A finite source has no more frames.
    SourceExhausted,
}

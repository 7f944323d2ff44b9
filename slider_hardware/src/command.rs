//! Actuator that delegates each pulse to an external program
//! (e.g. `pactl`, `amixer` or `xdotool key XF86AudioRaiseVolume`).

use std::process::{Command, Stdio};

use slider_traits::{Actuator, BoxError, Direction};

use crate::error::{HwError, Result};

#[derive(Debug, Clone)]
pub struct CommandActuator {
    up: Vec<String>,
    down: Vec<String>,
}

impl CommandActuator {
    /// Both argv vectors must be non-empty; element 0 is the program.
    pub fn new(up: Vec<String>, down: Vec<String>) -> Result<Self> {
        if up.is_empty() || down.is_empty() {
            return Err(HwError::Command("empty volume command".into()));
        }
        Ok(Self { up, down })
    }

    fn argv(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    fn run(&self, direction: Direction) -> Result<()> {
        let argv = self.argv(direction);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HwError::Command("empty volume command".into()))?;
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            return Err(HwError::Command(format!("`{program}` exited with {status}")));
        }
        Ok(())
    }
}

impl Actuator for CommandActuator {
    fn pulse(&mut self, direction: Direction) -> std::result::Result<(), BoxError> {
        match self.run(direction) {
            Ok(()) => {
                tracing::debug!(?direction, "volume command ok");
                Ok(())
            }
            Err(e) => {
                tracing::error!(?direction, error = %e, "volume command failed");
                Err(Box::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_commands() {
        assert!(CommandActuator::new(Vec::new(), vec!["true".into()]).is_err());
        assert!(CommandActuator::new(vec!["true".into()], Vec::new()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn runs_the_command_for_each_direction() {
        let mut act = CommandActuator::new(vec!["true".into()], vec!["false".into()]).unwrap();
        assert!(act.pulse(Direction::Up).is_ok());
        let err = act.pulse(Direction::Down).expect_err("false exits 1");
        assert!(err.to_string().contains("volume command failed"));
    }

    #[test]
    fn missing_program_is_io_error() {
        let mut act = CommandActuator::new(
            vec!["definitely-not-a-volume-tool-xyz".into()],
            vec!["definitely-not-a-volume-tool-xyz".into()],
        )
        .unwrap();
        let err = act.pulse(Direction::Up).expect_err("spawn fails");
        assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::Io(_))));
    }
}

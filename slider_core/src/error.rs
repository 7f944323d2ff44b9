use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SliderError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("frame acquisition failed: {0}")]
    FrameAcquisition(String),
    #[error("actuator fault: {0}")]
    ActuatorFault(String),
    #[error("signal source exhausted")]
    EndOfStream,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing signal source")]
    MissingSource,
    #[error("missing actuator")]
    MissingActuator,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

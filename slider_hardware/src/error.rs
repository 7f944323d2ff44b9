use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("signal source exhausted")]
    EndOfStream,
    #[error("frame grab failed: {0}")]
    Grab(String),
    #[error("volume command failed: {0}")]
    Command(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;

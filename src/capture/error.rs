use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Could not read capture log directory {0}")]
    UnreadableDirectory(PathBuf),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WavError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Could not find WAV file: {0}")]
    FileNotFound(String),

    #[error("Not a RIFF/WAVE file: {0}")]
    NotAWaveFile(PathBuf),

    #[error("WAV file has no fmt or data chunk: {0}")]
    MissingChunk(PathBuf),

    #[error("WAV files do not share the same sample format: {0}")]
    MismatchedFormat(PathBuf),
}

pub type WavResult<T> = Result<T, WavError>;

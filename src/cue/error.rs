use crate::capture::error::CaptureError;
use crate::disc::error::DiscError;
use crate::wav::error::WavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error(transparent)]
    DiscError(#[from] DiscError),

    #[error(transparent)]
    CaptureError(#[from] CaptureError),

    #[error(transparent)]
    WavError(#[from] WavError),

    #[error("No CUE data to parse")]
    EmptyInput,

    #[error("Unknown/invalid command on line {line_number}: {line}")]
    UnrecognizedCommand { line_number: usize, line: String },

    #[error("Size of DATA track {track} can not be determined, no capture log lists it")]
    MissingDataLength { track: u32 },

    #[error("Could not find the file referenced in the CUE sheet: {0}")]
    UnresolvedFile(String),

    #[error("No tracks were parsed")]
    NoTracksParsed,
}

impl CueError {
    pub fn unrecognized(line_number: usize, line: &str) -> Self {
        CueError::UnrecognizedCommand {
            line_number,
            line: line.to_string(),
        }
    }
}

pub type CueResult<T> = Result<T, CueError>;

use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Cue2TocError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Output file already exists, use --force to overwrite: {0}")]
    OutputFileAlreadyExists(PathBuf),
}

pub type Cue2TocResult<T> = result::Result<T, Cue2TocError>;

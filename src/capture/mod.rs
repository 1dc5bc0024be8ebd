use crate::capture::decode::TextDecoder;
use crate::capture::error::{CaptureError, CaptureResult};
use log::debug;
use std::path::{Path, PathBuf};

pub mod decode;
pub mod error;

pub const CAPTURE_LOG_EXTENSION: &str = "log";

/// Decoded text of one capture log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureLog {
    pub name: String,
    pub text: String,
}

/// Supplies capture logs in lexicographic file name order.
pub trait CaptureLogSource {
    fn logs(&self) -> CaptureResult<Vec<CaptureLog>>;
}

/// Reads every `*.log` file directly inside a directory.
#[derive(Debug, Clone)]
pub struct DirLogSource<D> {
    dir: PathBuf,
    decoder: D,
}

impl<D: TextDecoder> DirLogSource<D> {
    pub fn new(dir: impl AsRef<Path>, decoder: D) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            decoder,
        }
    }

    fn log_paths(&self) -> CaptureResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|_| CaptureError::UnreadableDirectory(self.dir.clone()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            if path.is_file() && extension == CAPTURE_LOG_EXTENSION {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(paths)
    }
}

impl<D: TextDecoder> CaptureLogSource for DirLogSource<D> {
    fn logs(&self) -> CaptureResult<Vec<CaptureLog>> {
        let mut logs = Vec::new();

        for path in self.log_paths()? {
            debug!("Reading capture log: {path:?}");

            let bytes = std::fs::read(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            logs.push(CaptureLog {
                name,
                text: self.decoder.decode(&bytes),
            });
        }

        Ok(logs)
    }
}

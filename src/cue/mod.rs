use crate::capture::CaptureLogSource;
use crate::capture::DirLogSource;
use crate::capture::decode::DetectingDecoder;
use crate::cue::error::{CueError, CueResult};
use crate::cue::machine::Session;
use crate::wav::lookup::{FileLookup, FileResolver, WavFileCache};
use log::debug;
use std::path::Path;

pub use crate::cue::parsed::ParseData;
pub use crate::cue::wav_list::WavParser;

mod command;
mod data_track;
pub mod error;
mod machine;
mod parsed;
mod wav_list;

/// Parses CUE sheet text into a [`ParseData`].
pub struct CueParser<R, S> {
    resolver: R,
    logs: S,
}

impl CueParser<FileLookup<WavFileCache>, DirLogSource<DetectingDecoder>> {
    /// Resolves files and reads capture logs below `dir`. With `find_wav`
    /// every referenced file must exist.
    pub fn new(dir: impl AsRef<Path>, find_wav: bool) -> Self {
        let dir = dir.as_ref();
        Self::with_sources(
            FileLookup::new(WavFileCache::new(dir), find_wav),
            DirLogSource::new(dir, DetectingDecoder),
        )
    }
}

impl<R: FileResolver, S: CaptureLogSource> CueParser<R, S> {
    pub fn with_sources(resolver: R, logs: S) -> Self {
        Self { resolver, logs }
    }

    pub fn parse<I, L>(&mut self, lines: I) -> CueResult<ParseData>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let cue: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .collect();

        if cue.is_empty() {
            return Err(CueError::EmptyInput);
        }

        debug!("Parsing {} CUE lines", cue.len());

        let session = Session::new(&mut self.resolver, &self.logs);
        machine::run(session, &cue)
    }
}

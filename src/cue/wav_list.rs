use crate::cue::error::{CueError, CueResult};
use crate::cue::parsed::ParseData;
use crate::disc::msf::Msf;
use crate::disc::{AudioFile, Disc, Index, Track};
use crate::wav::error::WavError;
use crate::wav::lookup::FileResolver;

/// Builds a disc from a list of WAV files, one audio track per file.
pub struct WavParser<R> {
    resolver: R,
}

impl<R: FileResolver> WavParser<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn parse<I, S>(&mut self, names: I) -> CueResult<ParseData>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tracks = Vec::new();
        let mut files: Vec<AudioFile> = Vec::new();

        for (i, name) in names.into_iter().enumerate() {
            let name = name.as_ref();
            let path = self.resolver.resolve(name).map_err(|err| match err {
                WavError::FileNotFound(name) => CueError::UnresolvedFile(name),
                err => CueError::WavError(err),
            })?;
            let file = AudioFile {
                name: name.to_string(),
                path,
            };

            let mut track = Track::new(i as u32 + 1, false);
            track.indexes.push(Index::audio(1, file.clone(), Msf::ZERO));
            tracks.push(track);

            if !files.iter().any(|f| f.name == file.name) {
                files.push(file);
            }
        }

        ParseData::new(Disc::default(), tracks, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::IndexKind;
    use crate::wav::error::WavResult;
    use std::path::PathBuf;

    struct AsWritten;

    impl FileResolver for AsWritten {
        fn resolve(&mut self, name: &str) -> WavResult<PathBuf> {
            Ok(PathBuf::from(name))
        }
    }

    struct NothingFound;

    impl FileResolver for NothingFound {
        fn resolve(&mut self, name: &str) -> WavResult<PathBuf> {
            Err(WavError::FileNotFound(name.to_string()))
        }
    }

    #[test]
    fn one_track_per_file() {
        let parsed = WavParser::new(AsWritten)
            .parse(["01.wav", "02.wav", "03.wav"])
            .unwrap();

        assert_eq!(parsed.tracks().len(), 3);
        for (i, track) in parsed.tracks().iter().enumerate() {
            assert_eq!(track.number, i as u32 + 1);
            assert_eq!(track.indexes.len(), 1);
            assert_eq!(
                track.indexes[0].kind,
                IndexKind::Audio {
                    time: Msf::ZERO,
                    length: None
                }
            );
        }
        assert_eq!(parsed.files().len(), 3);
        assert_eq!(*parsed.disc(), Disc::default());
    }

    #[test]
    fn empty_list_has_no_tracks() {
        let names: [&str; 0] = [];
        assert!(matches!(
            WavParser::new(AsWritten).parse(names),
            Err(CueError::NoTracksParsed)
        ));
    }

    #[test]
    fn missing_file_is_unresolved() {
        assert!(matches!(
            WavParser::new(NothingFound).parse(["gone.wav"]),
            Err(CueError::UnresolvedFile(name)) if name == "gone.wav"
        ));
    }
}

use crate::cue::error::{CueError, CueResult};
use crate::disc::{AudioFile, Disc, Track, expand_tabs};
use crate::wav::offset::OffsetCorrector;
use log::{debug, warn};

/// A fully parsed disc, ready to be written as a TOC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseData {
    disc: Disc,
    tracks: Vec<Track>,
    files: Vec<AudioFile>,
}

impl ParseData {
    pub fn new(disc: Disc, tracks: Vec<Track>, files: Vec<AudioFile>) -> CueResult<Self> {
        if tracks.is_empty() {
            return Err(CueError::NoTracksParsed);
        }

        Ok(Self {
            disc,
            tracks,
            files,
        })
    }

    pub fn disc(&self) -> &Disc {
        &self.disc
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Unique files in the order they were first referenced.
    pub fn files(&self) -> &[AudioFile] {
        &self.files
    }

    /// TOC text, one entry per line with tabs expanded and trailing space removed.
    pub fn to_toc(&self) -> Vec<String> {
        let mut text = self.disc.to_string();
        for track in &self.tracks {
            text.push_str(&track.to_string());
        }

        text.lines()
            .map(|line| expand_tabs(line, 4).trim_end().to_string())
            .collect()
    }

    /// Shifts the audio of every file by `samples` and points the indexes at
    /// the corrected files.
    pub async fn with_wav_offset(
        mut self,
        corrector: &impl OffsetCorrector,
        samples: i64,
        use_temp: bool,
    ) -> CueResult<Self> {
        let file_map = corrector.correct(&self.files, samples, use_temp).await?;

        let indexes = self.tracks.iter_mut().flat_map(|t| t.indexes.iter_mut());
        // data indexes have no file
        for file in indexes.filter_map(|index| index.file.as_mut()) {
            match file_map.get(&file.name) {
                Some(path) => {
                    debug!("Updating index file '{}' to {path:?}", file.name);
                    file.path = path.clone();
                }
                None => warn!("No corrected file for '{}'", file.name),
            }
        }

        for file in &mut self.files {
            if let Some(path) = file_map.get(&file.name) {
                file.path = path.clone();
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::msf::Msf;
    use crate::disc::{Index, IndexKind};
    use crate::wav::error::WavResult;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct RenamingCorrector {
        seen: RefCell<Vec<(Vec<String>, i64, bool)>>,
    }

    impl OffsetCorrector for RenamingCorrector {
        async fn correct(
            &self,
            files: &[AudioFile],
            samples: i64,
            use_temp: bool,
        ) -> WavResult<HashMap<String, PathBuf>> {
            self.seen.borrow_mut().push((
                files.iter().map(|f| f.name.clone()).collect(),
                samples,
                use_temp,
            ));
            Ok(files
                .iter()
                .map(|f| (f.name.clone(), PathBuf::from(format!("/tmp/fixed-{}", f.name))))
                .collect())
        }
    }

    fn wav(name: &str) -> AudioFile {
        AudioFile {
            name: name.to_string(),
            path: PathBuf::from(format!("/music/{name}")),
        }
    }

    fn sample() -> ParseData {
        let mut audio = Track::new(1, false);
        audio.title = Some("Intro".to_string());
        audio.indexes.push(Index::audio(1, wav("a.wav"), Msf::ZERO));

        let mut data = Track::new(2, true);
        data.indexes.push(Index::data(1, "10:00:00".parse().unwrap()));

        let disc = Disc {
            title: Some("Album".to_string()),
            is_multisession: true,
            ..Disc::default()
        };

        ParseData::new(disc, vec![audio, data], vec![wav("a.wav")]).unwrap()
    }

    #[test]
    fn empty_track_list_is_rejected() {
        assert!(matches!(
            ParseData::new(Disc::default(), vec![], vec![]),
            Err(CueError::NoTracksParsed)
        ));
    }

    #[test]
    fn toc_lines_are_expanded_and_trimmed() {
        assert_eq!(
            sample().to_toc(),
            vec![
                "CD_ROM_XA",
                "CD_TEXT {",
                "    LANGUAGE_MAP { 0 : EN }",
                "    LANGUAGE 0 {",
                "        TITLE \"Album\"",
                "    }",
                "}",
                "",
                "// Track 1",
                "TRACK AUDIO",
                "CD_TEXT {",
                "    LANGUAGE 0 {",
                "        TITLE \"Intro\"",
                "    }",
                "}",
                "AUDIOFILE \"/music/a.wav\" 00:00:00",
                "",
                "// Track 2",
                "TRACK MODE1",
                "DATAFILE \"data_02.bin\" 10:00:00",
            ]
        );
    }

    #[tokio::test]
    async fn offset_rewrites_file_references_and_skips_data() {
        let corrector = RenamingCorrector {
            seen: RefCell::new(Vec::new()),
        };

        let parsed = sample().with_wav_offset(&corrector, -30, true).await.unwrap();

        assert_eq!(
            corrector.seen.borrow().as_slice(),
            &[(vec!["a.wav".to_string()], -30, true)]
        );
        assert_eq!(
            parsed.tracks()[0].indexes[0].file.as_ref().unwrap().path,
            PathBuf::from("/tmp/fixed-a.wav")
        );
        assert_eq!(parsed.tracks()[1].indexes[0].file, None);
        assert_eq!(
            parsed.tracks()[1].indexes[0].kind,
            IndexKind::Data {
                length: "10:00:00".parse().unwrap()
            }
        );
        assert_eq!(parsed.files()[0].path, PathBuf::from("/tmp/fixed-a.wav"));
    }
}

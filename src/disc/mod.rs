use crate::disc::msf::Msf;
use std::fmt::{Display, Formatter, Write};
use std::path::PathBuf;

pub mod error;
pub mod msf;

/// REM sub-keywords kept on the disc record, everything else is dropped.
pub const DISC_REMARKS: [&str; 4] = ["GENRE", "DATE", "DISCID", "COMMENT"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disc {
    pub catalog: Option<String>,
    pub performer: Option<String>,
    pub title: Option<String>,
    pub remarks: Vec<(String, String)>,
    pub is_multisession: bool,
}

impl Disc {
    /// Stores a REM field, returns false if the keyword is not one we keep.
    pub fn set_remark(&mut self, keyword: &str, value: &str) -> bool {
        let keyword = keyword.to_ascii_uppercase();
        if !DISC_REMARKS.contains(&keyword.as_str()) {
            return false;
        }

        let value = value.trim().trim_matches('"').to_string();
        match self.remarks.iter_mut().find(|(k, _)| *k == keyword) {
            Some((_, existing)) => *existing = value,
            None => self.remarks.push((keyword, value)),
        }

        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackFlags {
    /// DCP, digital copy permitted
    pub copy: bool,
    /// 4CH
    pub four_channel: bool,
    /// PRE
    pub pre_emphasis: bool,
}

impl TrackFlags {
    /// Sets the flags named in a FLAGS command, unknown names (like SCMS) are skipped.
    pub fn apply(&mut self, flags: &str) {
        for flag in flags.split_whitespace() {
            match flag {
                "DCP" => self.copy = true,
                "4CH" => self.four_channel = true,
                "PRE" => self.pre_emphasis = true,
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub number: u32,
    pub is_data: bool,
    pub flags: TrackFlags,
    pub isrc: Option<String>,
    pub performer: Option<String>,
    pub title: Option<String>,
    pub pregap: Option<Msf>,
    pub indexes: Vec<Index>,
}

impl Track {
    pub fn new(number: u32, is_data: bool) -> Self {
        Self {
            number,
            is_data,
            flags: TrackFlags::default(),
            isrc: None,
            performer: None,
            title: None,
            pregap: None,
            indexes: Vec::new(),
        }
    }

    /// Where the first index numbered 1 or higher sits inside `file`, `None`
    /// when the track does not start in that file.
    pub fn start_in(&self, file: &AudioFile) -> Option<Msf> {
        let first = self.indexes.iter().position(|index| index.number >= 1)?;
        let start = &self.indexes[first];
        if !start.is_in(file) {
            return None;
        }

        match start.kind {
            IndexKind::Audio { time, .. } => Some(time),
            IndexKind::Start { length } => self.indexes[..first]
                .iter()
                .rev()
                .find(|index| index.is_pregap() && index.is_in(file))
                .and_then(|pregap| pregap.kind.time())
                .and_then(|time| time.checked_add(length)),
            _ => None,
        }
    }
}

/// A file referenced by the CUE sheet, as written and as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFile {
    pub name: String,
    pub path: PathBuf,
}

/// How an index is written in the TOC. Each variant carries only what its
/// TOC statement needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// `AUDIOFILE` starting at `time`, running to `length` or the end of the file.
    Audio { time: Msf, length: Option<Msf> },
    /// Standalone pregap audio, followed by `START`.
    Preaudio { time: Msf },
    /// Track start after a pregap held in the same file.
    Start { length: Msf },
    /// Additional index inside a track, relative to the track start. The
    /// offset is unknown when the track starts in another file.
    Index { offset: Option<Msf> },
    /// Data track with a length recovered from a capture log.
    Data { length: Msf },
}

impl IndexKind {
    pub fn time(&self) -> Option<Msf> {
        match self {
            IndexKind::Audio { time, .. } | IndexKind::Preaudio { time } => Some(*time),
            _ => None,
        }
    }

    pub fn length(&self) -> Option<Msf> {
        match self {
            IndexKind::Audio { length, .. } => *length,
            IndexKind::Start { length } | IndexKind::Data { length } => Some(*length),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub number: u32,
    /// `None` for data indexes
    pub file: Option<AudioFile>,
    pub kind: IndexKind,
}

impl Index {
    pub fn audio(number: u32, file: AudioFile, time: Msf) -> Self {
        Self {
            number,
            file: Some(file),
            kind: IndexKind::Audio { time, length: None },
        }
    }

    pub fn data(number: u32, length: Msf) -> Self {
        Self {
            number,
            file: None,
            kind: IndexKind::Data { length },
        }
    }

    pub fn is_pregap(&self) -> bool {
        self.number == 0
    }

    pub fn is_in(&self, file: &AudioFile) -> bool {
        self.file.as_ref().is_some_and(|own| own.name == file.name)
    }

    /// True when both indexes point at the same audio file.
    pub fn shares_file(&self, other: &Index) -> bool {
        other.file.as_ref().is_some_and(|file| self.is_in(file))
    }

    fn write_toc(&self, f: &mut Formatter<'_>, track_number: u32) -> std::fmt::Result {
        let file = self
            .file
            .as_ref()
            .map(|file| quote(&file.path.to_string_lossy()))
            .unwrap_or_default();

        match self.kind {
            IndexKind::Audio { time, length } => {
                write!(f, "AUDIOFILE {file} {time}")?;
                if let Some(length) = length {
                    write!(f, " {length}")?;
                }
                writeln!(f)
            }
            IndexKind::Preaudio { time } => {
                writeln!(f, "AUDIOFILE {file} {time}")?;
                writeln!(f, "START")
            }
            IndexKind::Start { length } => writeln!(f, "START {length}"),
            IndexKind::Index {
                offset: Some(offset),
            } => writeln!(f, "INDEX {offset}"),
            IndexKind::Index { offset: None } => Ok(()),
            IndexKind::Data { length } => {
                writeln!(f, "DATAFILE \"data_{track_number:02}.bin\" {length}")
            }
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_cd_text(
    f: &mut Formatter<'_>,
    title: Option<&str>,
    performer: Option<&str>,
    language_map: bool,
) -> std::fmt::Result {
    if title.is_none() && performer.is_none() {
        return Ok(());
    }

    writeln!(f, "CD_TEXT {{")?;
    if language_map {
        writeln!(f, "\tLANGUAGE_MAP {{ 0 : EN }}")?;
    }
    writeln!(f, "\tLANGUAGE 0 {{")?;
    if let Some(title) = title {
        writeln!(f, "\t\tTITLE {}", quote(title))?;
    }
    if let Some(performer) = performer {
        writeln!(f, "\t\tPERFORMER {}", quote(performer))?;
    }
    writeln!(f, "\t}}")?;
    writeln!(f, "}}")
}

impl Display for Disc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(catalog) = &self.catalog {
            writeln!(f, "CATALOG {}", quote(catalog))?;
        }

        writeln!(f, "{}", if self.is_multisession { "CD_ROM_XA" } else { "CD_DA" })?;

        for (keyword, value) in &self.remarks {
            writeln!(f, "// {keyword}: {value}")?;
        }

        write_cd_text(f, self.title.as_deref(), self.performer.as_deref(), true)
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "// Track {}", self.number)?;
        writeln!(f, "TRACK {}", if self.is_data { "MODE1" } else { "AUDIO" })?;

        if !self.is_data {
            if self.flags.copy {
                writeln!(f, "COPY")?;
            }
            if self.flags.pre_emphasis {
                writeln!(f, "PRE_EMPHASIS")?;
            }
            if self.flags.four_channel {
                writeln!(f, "FOUR_CHANNEL_AUDIO")?;
            }
        }

        if let Some(isrc) = &self.isrc {
            writeln!(f, "ISRC {}", quote(isrc))?;
        }

        write_cd_text(f, self.title.as_deref(), self.performer.as_deref(), false)?;

        if let Some(pregap) = self.pregap {
            writeln!(f, "PREGAP {pregap}")?;
        }

        for index in &self.indexes {
            index.write_toc(f, self.number)?;
        }

        Ok(())
    }
}

/// Expands tabs to the next multiple of `width` columns.
pub fn expand_tabs(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;

    for c in line.chars() {
        if c == '\t' {
            let pad = width - column % width;
            let _ = write!(out, "{:pad$}", "");
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav(name: &str) -> AudioFile {
        AudioFile {
            name: name.to_string(),
            path: PathBuf::from(name),
        }
    }

    fn msf(s: &str) -> Msf {
        s.parse().unwrap()
    }

    #[test]
    fn disc_renders_catalog_mode_and_cd_text() {
        let disc = Disc {
            catalog: Some("0123456789012".to_string()),
            performer: Some("Band".to_string()),
            title: Some("Album \"Live\"".to_string()),
            remarks: vec![("GENRE".to_string(), "Rock".to_string())],
            is_multisession: false,
        };

        let text = disc.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CATALOG \"0123456789012\"",
                "CD_DA",
                "// GENRE: Rock",
                "CD_TEXT {",
                "\tLANGUAGE_MAP { 0 : EN }",
                "\tLANGUAGE 0 {",
                "\t\tTITLE \"Album \\\"Live\\\"\"",
                "\t\tPERFORMER \"Band\"",
                "\t}",
                "}",
            ]
        );
    }

    #[test]
    fn multisession_disc_is_cd_rom_xa() {
        let disc = Disc {
            is_multisession: true,
            ..Disc::default()
        };
        assert_eq!(disc.to_string(), "CD_ROM_XA\n");
    }

    #[test]
    fn set_remark_keeps_known_keywords_only() {
        let mut disc = Disc::default();
        assert!(disc.set_remark("DATE", "1999"));
        assert!(disc.set_remark("genre", "\"Jazz\""));
        assert!(!disc.set_remark("REPLAYGAIN_ALBUM_GAIN", "-7.2 dB"));
        assert!(disc.set_remark("DATE", "2001"));
        assert_eq!(
            disc.remarks,
            vec![
                ("DATE".to_string(), "2001".to_string()),
                ("GENRE".to_string(), "Jazz".to_string()),
            ]
        );
    }

    #[test]
    fn track_renders_each_index_kind() {
        let mut track = Track::new(2, false);
        track.flags.apply("DCP PRE SCMS");
        track.isrc = Some("USABC9900001".to_string());
        track.indexes = vec![
            Index {
                kind: IndexKind::Preaudio {
                    time: msf("00:10:00"),
                },
                ..Index::audio(0, wav("gap.wav"), msf("00:10:00"))
            },
            Index {
                kind: IndexKind::Audio {
                    time: Msf::ZERO,
                    length: Some(msf("03:00:00")),
                },
                ..Index::audio(1, wav("song.wav"), Msf::ZERO)
            },
            Index {
                kind: IndexKind::Index {
                    offset: Some(msf("01:00:00")),
                },
                ..Index::audio(2, wav("song.wav"), msf("01:00:00"))
            },
        ];

        let text = track.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "// Track 2",
                "TRACK AUDIO",
                "COPY",
                "PRE_EMPHASIS",
                "ISRC \"USABC9900001\"",
                "AUDIOFILE \"gap.wav\" 00:10:00",
                "START",
                "AUDIOFILE \"song.wav\" 00:00:00 03:00:00",
                "INDEX 01:00:00",
            ]
        );
    }

    #[test]
    fn data_track_renders_datafile_with_length() {
        let mut track = Track::new(11, true);
        track.indexes.push(Index::data(1, msf("10:20:30")));
        assert!(
            track
                .to_string()
                .contains("TRACK MODE1\nDATAFILE \"data_11.bin\" 10:20:30\n")
        );
    }

    #[test]
    fn start_renders_pregap_length() {
        let mut track = Track::new(1, false);
        track.pregap = Some(msf("00:02:00"));
        track.indexes.push(Index::audio(0, wav("a.wav"), Msf::ZERO));
        track.indexes.push(Index {
            kind: IndexKind::Start {
                length: msf("00:02:00"),
            },
            ..Index::audio(1, wav("a.wav"), msf("00:02:00"))
        });
        assert!(track.to_string().ends_with(
            "PREGAP 00:02:00\nAUDIOFILE \"a.wav\" 00:00:00\nSTART 00:02:00\n"
        ));
    }

    #[test]
    fn kind_accessors_never_carry_both_time_and_length() {
        let kinds = [
            IndexKind::Preaudio { time: Msf::ZERO },
            IndexKind::Start { length: Msf::ZERO },
            IndexKind::Index {
                offset: Some(Msf::ZERO),
            },
            IndexKind::Data { length: Msf::ZERO },
        ];
        for kind in kinds {
            assert!(kind.time().is_none() || kind.length().is_none());
        }
    }

    #[test]
    fn start_in_resolves_through_pregap() {
        let mut track = Track::new(3, false);
        track.indexes.push(Index::audio(0, wav("a.wav"), msf("05:00:00")));
        track.indexes.push(Index {
            kind: IndexKind::Start {
                length: msf("00:02:00"),
            },
            ..Index::audio(1, wav("a.wav"), msf("05:02:00"))
        });

        assert_eq!(track.start_in(&wav("a.wav")), Some(msf("05:02:00")));
        assert_eq!(track.start_in(&wav("b.wav")), None);
    }

    #[test]
    fn start_in_ignores_later_indexes_in_other_files() {
        let mut track = Track::new(1, false);
        track.indexes.push(Index::audio(1, wav("a.wav"), msf("00:30:00")));
        track.indexes.push(Index::audio(2, wav("b.wav"), msf("00:10:00")));

        assert_eq!(track.start_in(&wav("a.wav")), Some(msf("00:30:00")));
        assert_eq!(track.start_in(&wav("b.wav")), None);
    }

    #[test]
    fn index_without_offset_is_not_written() {
        let mut track = Track::new(1, false);
        track.indexes.push(Index::audio(1, wav("a.wav"), Msf::ZERO));
        track.indexes.push(Index {
            kind: IndexKind::Index { offset: None },
            ..Index::audio(2, wav("a.wav"), msf("00:20:00"))
        });

        assert!(!track.to_string().contains("INDEX"));
    }

    #[test]
    fn expand_tabs_aligns_to_columns() {
        assert_eq!(expand_tabs("\t\tTITLE", 4), "        TITLE");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("abcd\te", 4), "abcd    e");
    }
}

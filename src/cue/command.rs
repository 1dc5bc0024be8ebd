use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CATALOG: Regex = Regex::new(r"^CATALOG\s+(\d{13})$").unwrap();
    static ref FLAGS: Regex = Regex::new(r"^FLAGS\s+(.*)$").unwrap();
    static ref FILE: Regex = Regex::new(r#"^FILE\s+"(.*)"\s+WAVE$"#).unwrap();
    static ref INDEX: Regex = Regex::new(r"^INDEX\s+(\d+)\s+(\d{2}:\d{2}:\d{2})$").unwrap();
    static ref ISRC: Regex = Regex::new(r"^ISRC\s+(.*)$").unwrap();
    static ref PERFORMER: Regex = Regex::new(r#"^PERFORMER\s+"(.*)"$"#).unwrap();
    static ref PREGAP: Regex = Regex::new(r"^PREGAP\s+(.*)$").unwrap();
    static ref TITLE: Regex = Regex::new(r#"^TITLE\s+"(.*)"$"#).unwrap();
    static ref TRACK: Regex = Regex::new(r"^TRACK\s+(\d+)\s+(AUDIO|MODE.*)$").unwrap();
    static ref REM: Regex = Regex::new(r"^REM\b\s*(\w*)\s*(.*)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Catalog,
    Flags,
    File,
    Index,
    Isrc,
    Performer,
    Pregap,
    Title,
    Track,
    Rem,
}

/// One recognised CUE command with its captured fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Catalog(&'a str),
    Flags(&'a str),
    File(&'a str),
    Index { number: &'a str, time: &'a str },
    Isrc(&'a str),
    Performer(&'a str),
    Pregap(&'a str),
    Title(&'a str),
    Track { number: &'a str, mode: &'a str },
    Rem { keyword: &'a str, value: &'a str },
}

fn group<'a>(caps: &Captures<'a>, i: usize) -> &'a str {
    caps.get(i).map(|m| m.as_str()).unwrap_or("")
}

impl<'a> Command<'a> {
    /// Classifies a trimmed line, `None` if it matches no known command.
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(caps) = CATALOG.captures(line) {
            return Some(Command::Catalog(group(&caps, 1)));
        }
        if let Some(caps) = FLAGS.captures(line) {
            return Some(Command::Flags(group(&caps, 1)));
        }
        if let Some(caps) = FILE.captures(line) {
            return Some(Command::File(group(&caps, 1)));
        }
        if let Some(caps) = INDEX.captures(line) {
            return Some(Command::Index {
                number: group(&caps, 1),
                time: group(&caps, 2),
            });
        }
        if let Some(caps) = ISRC.captures(line) {
            return Some(Command::Isrc(group(&caps, 1)));
        }
        if let Some(caps) = PERFORMER.captures(line) {
            return Some(Command::Performer(group(&caps, 1)));
        }
        if let Some(caps) = PREGAP.captures(line) {
            return Some(Command::Pregap(group(&caps, 1)));
        }
        if let Some(caps) = TITLE.captures(line) {
            return Some(Command::Title(group(&caps, 1)));
        }
        if let Some(caps) = TRACK.captures(line) {
            return Some(Command::Track {
                number: group(&caps, 1),
                mode: group(&caps, 2),
            });
        }
        if let Some(caps) = REM.captures(line) {
            return Some(Command::Rem {
                keyword: group(&caps, 1),
                value: group(&caps, 2),
            });
        }

        None
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Catalog(_) => CommandKind::Catalog,
            Command::Flags(_) => CommandKind::Flags,
            Command::File(_) => CommandKind::File,
            Command::Index { .. } => CommandKind::Index,
            Command::Isrc(_) => CommandKind::Isrc,
            Command::Performer(_) => CommandKind::Performer,
            Command::Pregap(_) => CommandKind::Pregap,
            Command::Title(_) => CommandKind::Title,
            Command::Track { .. } => CommandKind::Track,
            Command::Rem { .. } => CommandKind::Rem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_every_command_shape() {
        let cases = [
            ("CATALOG 0724384260927", Command::Catalog("0724384260927")),
            ("FLAGS DCP PRE", Command::Flags("DCP PRE")),
            (
                "FILE \"01 - Intro.wav\" WAVE",
                Command::File("01 - Intro.wav"),
            ),
            (
                "INDEX 01 03:30:00",
                Command::Index {
                    number: "01",
                    time: "03:30:00",
                },
            ),
            ("ISRC GBAYE0000351", Command::Isrc("GBAYE0000351")),
            ("PERFORMER \"The Band\"", Command::Performer("The Band")),
            ("PREGAP 00:02:00", Command::Pregap("00:02:00")),
            ("TITLE \"Side A\"", Command::Title("Side A")),
            (
                "TRACK 01 AUDIO",
                Command::Track {
                    number: "01",
                    mode: "AUDIO",
                },
            ),
            (
                "TRACK 12 MODE1/2352",
                Command::Track {
                    number: "12",
                    mode: "MODE1/2352",
                },
            ),
            (
                "REM GENRE \"Progressive Rock\"",
                Command::Rem {
                    keyword: "GENRE",
                    value: "\"Progressive Rock\"",
                },
            ),
        ];

        for (line, expected) in cases {
            assert_eq!(Command::parse(line), Some(expected), "line: {line}");
        }
    }

    #[test]
    fn bare_rem_has_empty_fields() {
        assert_eq!(
            Command::parse("REM"),
            Some(Command::Rem {
                keyword: "",
                value: ""
            })
        );
    }

    #[test]
    fn rejects_unknown_or_malformed_lines() {
        for line in [
            "POSTGAP 00:02:00",
            "CATALOG 123",
            "FILE \"image.bin\" BINARY",
            "INDEX 01 3:30:00",
            "TRACK 01 CDG",
            "TITLE unquoted",
            "REMARK something",
            "",
        ] {
            assert_eq!(Command::parse(line), None, "line: {line}");
        }
    }

    #[test]
    fn kind_follows_variant() {
        assert_eq!(
            Command::parse("FILE \"a.wav\" WAVE").unwrap().kind(),
            CommandKind::File
        );
        assert_eq!(
            Command::parse("REM DATE 1999").unwrap().kind(),
            CommandKind::Rem
        );
    }
}

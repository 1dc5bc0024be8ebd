use crate::capture::CaptureLogSource;
use crate::cue::command::{Command, CommandKind};
use crate::cue::data_track::find_data_track_length;
use crate::cue::error::{CueError, CueResult};
use crate::cue::parsed::ParseData;
use crate::disc::msf::Msf;
use crate::disc::{AudioFile, Disc, Index, IndexKind, Track};
use crate::wav::error::WavError;
use crate::wav::lookup::FileResolver;
use log::{debug, warn};

/// Parsing context, decides which commands are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disc,
    File,
    Track,
}

type Handler = fn(&mut Session<'_>, &Line<'_>, Command<'_>) -> CueResult<Option<State>>;

impl State {
    fn handler(self, kind: CommandKind) -> Option<Handler> {
        use CommandKind as Kind;

        match (self, kind) {
            (State::Disc, Kind::Catalog | Kind::Performer | Kind::Title) => Some(cmd_field_disc),
            (State::Disc, Kind::Rem) => Some(cmd_rem),
            (State::Disc | State::File | State::Track, Kind::File) => Some(cmd_file),
            (State::File | State::Track, Kind::Index) => Some(cmd_index),
            (State::File | State::Track, Kind::Track) => Some(cmd_track),
            (State::Track, Kind::Flags) => Some(cmd_flags),
            (State::Track, Kind::Isrc | Kind::Performer | Kind::Pregap | Kind::Title) => {
                Some(cmd_field_track)
            }
            (State::Track, Kind::Rem) => Some(cmd_noop),
            (State::Disc, Kind::Flags | Kind::Index | Kind::Isrc | Kind::Pregap | Kind::Track)
            | (
                State::File,
                Kind::Catalog
                | Kind::Flags
                | Kind::Isrc
                | Kind::Performer
                | Kind::Pregap
                | Kind::Rem
                | Kind::Title,
            )
            | (State::Track, Kind::Catalog) => None,
        }
    }
}

/// A trimmed input line and its 1-based number.
pub struct Line<'l> {
    pub number: usize,
    pub text: &'l str,
}

impl Line<'_> {
    fn unrecognized(&self) -> CueError {
        CueError::unrecognized(self.number, self.text)
    }
}

/// Everything built so far. Tracks and their indexes are addressed by
/// position so handlers can revisit earlier records.
pub struct Session<'a> {
    disc: Disc,
    tracks: Vec<Track>,
    file: Option<AudioFile>,
    files: Vec<AudioFile>,
    resolver: &'a mut dyn FileResolver,
    logs: &'a dyn CaptureLogSource,
}

impl<'a> Session<'a> {
    pub fn new(resolver: &'a mut dyn FileResolver, logs: &'a dyn CaptureLogSource) -> Self {
        Self {
            disc: Disc::default(),
            tracks: Vec::new(),
            file: None,
            files: Vec::new(),
            resolver,
            logs,
        }
    }

    pub fn finish(self) -> CueResult<ParseData> {
        ParseData::new(self.disc, self.tracks, self.files)
    }
}

/// Feeds trimmed lines through the state machine, blank lines are skipped.
pub fn run(mut session: Session<'_>, lines: &[String]) -> CueResult<ParseData> {
    let mut state = State::Disc;

    for (i, text) in lines.iter().enumerate() {
        if text.is_empty() {
            continue;
        }

        let line = Line {
            number: i + 1,
            text,
        };

        let command = Command::parse(text).ok_or_else(|| line.unrecognized())?;
        let handler = state
            .handler(command.kind())
            .ok_or_else(|| line.unrecognized())?;

        if let Some(next) = handler(&mut session, &line, command)? {
            if next != state {
                debug!("Line {}: {state:?} -> {next:?}", line.number);
            }
            state = next;
        }
    }

    session.finish()
}

fn cmd_noop(_: &mut Session<'_>, line: &Line<'_>, _: Command<'_>) -> CueResult<Option<State>> {
    debug!("Ignoring line {}: {}", line.number, line.text);
    Ok(None)
}

fn cmd_rem(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let Command::Rem { keyword, value } = command else {
        return Err(line.unrecognized());
    };

    if !session.disc.set_remark(keyword, value) {
        debug!("Ignoring REM {keyword}");
    }

    Ok(None)
}

fn cmd_field_disc(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let disc = &mut session.disc;

    match command {
        Command::Catalog(value) => disc.catalog = Some(value.to_string()),
        Command::Performer(value) => disc.performer = Some(value.to_string()),
        Command::Title(value) => disc.title = Some(value.to_string()),
        _ => return Err(line.unrecognized()),
    }

    Ok(None)
}

fn cmd_field_track(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let track = session
        .tracks
        .last_mut()
        .ok_or_else(|| line.unrecognized())?;

    match command {
        Command::Isrc(value) => track.isrc = Some(value.to_string()),
        Command::Performer(value) => track.performer = Some(value.to_string()),
        Command::Title(value) => track.title = Some(value.to_string()),
        Command::Pregap(value) => track.pregap = Some(value.parse()?),
        _ => return Err(line.unrecognized()),
    }

    Ok(None)
}

fn cmd_flags(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let Command::Flags(flags) = command else {
        return Err(line.unrecognized());
    };

    let track = session
        .tracks
        .last_mut()
        .ok_or_else(|| line.unrecognized())?;
    track.flags.apply(flags);

    Ok(None)
}

fn cmd_file(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let Command::File(name) = command else {
        return Err(line.unrecognized());
    };

    let path = session.resolver.resolve(name).map_err(|err| match err {
        WavError::FileNotFound(name) => CueError::UnresolvedFile(name),
        err => CueError::WavError(err),
    })?;

    let file = AudioFile {
        name: name.to_string(),
        path,
    };

    if !session.files.iter().any(|f| f.name == file.name) {
        session.files.push(file.clone());
    }
    session.file = Some(file);

    Ok(Some(State::File))
}

fn cmd_track(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let Command::Track { number, mode } = command else {
        return Err(line.unrecognized());
    };

    let is_data = mode != "AUDIO";
    session.tracks.push(Track::new(number.parse()?, is_data));

    if is_data {
        debug!("Track {number} is a {mode} data track, the disc is multisession");
        session.disc.is_multisession = true;
    }

    Ok(Some(State::Track))
}

fn cmd_index(
    session: &mut Session<'_>,
    line: &Line<'_>,
    command: Command<'_>,
) -> CueResult<Option<State>> {
    let Command::Index { number, time } = command else {
        return Err(line.unrecognized());
    };

    let track_pos = session
        .tracks
        .len()
        .checked_sub(1)
        .ok_or_else(|| line.unrecognized())?;
    let track = &session.tracks[track_pos];
    let number = number.parse()?;
    let time: Msf = time.parse()?;
    let file = session.file.as_ref().ok_or_else(|| line.unrecognized())?;

    let index = if track.is_data {
        // CUE sheets do not carry the length of a data track
        let length = find_data_track_length(session.logs, track.number)?;
        Index::data(number, length)
    } else {
        Index::audio(number, file.clone(), time)
    };

    session.tracks[track_pos].indexes.push(index);
    classify_last_index(&mut session.tracks, track_pos, file, time)?;

    Ok(None)
}

/// Reclassifies the newest index of `tracks[track_pos]`, declared at `time`
/// inside `file`, and the records before it that it affects.
fn classify_last_index(
    tracks: &mut [Track],
    track_pos: usize,
    file: &AudioFile,
    time: Msf,
) -> CueResult<()> {
    let (previous_tracks, rest) = tracks.split_at_mut(track_pos);
    let track = &mut rest[0];

    let track_number = track.number;
    let track_start = track.start_in(file);
    let current_pos = track.indexes.len() - 1;
    let (earlier, current) = track.indexes.split_at_mut(current_pos);
    let current = &mut current[0];

    if let Some(prev) = earlier.last_mut() {
        // A pregap in another file is written on its own, followed by START
        if prev.is_pregap() && !prev.shares_file(current) {
            if let IndexKind::Audio { time, .. } = prev.kind {
                debug!(
                    "Index {} of track {track_number} is standalone pregap audio",
                    prev.number
                );
                prev.kind = IndexKind::Preaudio { time };
            }
        }

        if prev.shares_file(current) {
            current.kind = match prev.kind.time() {
                Some(pregap_start) if prev.is_pregap() => IndexKind::Start {
                    length: time.since(pregap_start)?,
                },
                _ => IndexKind::Index {
                    offset: index_offset(track_start, time, track_number, current.number),
                },
            };
        }
    }

    // The previous track's audio in this file must stop where this track begins
    if current_pos == 0 {
        if let Some(prev_track) = previous_tracks.last_mut() {
            for index in prev_track.indexes.iter_mut().filter(|index| index.is_in(file)) {
                if let IndexKind::Audio {
                    time: start,
                    length,
                } = &mut index.kind
                {
                    *length = Some(time.since(*start)?);
                }
            }
        }
    }

    Ok(())
}

/// INDEX positions count from the track start, which is only known when the
/// track starts in the same file.
fn index_offset(track_start: Option<Msf>, time: Msf, track: u32, index: u32) -> Option<Msf> {
    let offset = track_start.and_then(|start| time.since(start).ok());
    if offset.is_none() {
        warn!("Index {index} of track {track} has no offset from the track start, skipping it");
    }
    offset
}

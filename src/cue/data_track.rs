use crate::capture::CaptureLogSource;
use crate::cue::error::{CueError, CueResult};
use crate::disc::msf::Msf;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

lazy_static! {
    // "    11  | 41:05.30 | 10:20.15 |    184905    |    231419   "
    static ref TRACK_ROW: Regex =
        Regex::new(r"^\s+(\d+)\s+\|[^|]+\|\s*([^|]+?)\s*\|[^|]+\|[^|]+$").unwrap();
}

/// Looks up the length of a data track in the track tables of capture logs.
///
/// Logs are searched in file name order and the first row for `track` wins.
/// Lengths are written `m:ss.ff` in the logs and returned as an [`Msf`].
pub fn find_data_track_length(source: &dyn CaptureLogSource, track: u32) -> CueResult<Msf> {
    for log in source.logs()? {
        debug!("Searching {} for the length of track {track}", log.name);

        let length = log.text.lines().find_map(|line| {
            let caps = TRACK_ROW.captures(line)?;
            let number: u32 = caps.get(1)?.as_str().parse().ok()?;
            if number != track {
                return None;
            }
            caps.get(2).map(|m| m.as_str().replace('.', ":"))
        });

        if let Some(length) = length {
            let length: Msf = length.parse()?;
            info!("Data track {track} is {length} long according to {}", log.name);
            return Ok(length);
        }
    }

    Err(CueError::MissingDataLength { track })
}

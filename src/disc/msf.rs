use crate::disc::error::{DiscError, DiscResult};
use std::fmt::Display;
use std::str::FromStr;

pub const FRAMES_PER_SECOND: u32 = 75;
pub const SECONDS_PER_MINUTE: u32 = 60;

/// A minutes:seconds:frames position or length, stored as a frame count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Msf {
    frames: u32,
}

impl Msf {
    pub const ZERO: Msf = Msf { frames: 0 };

    pub fn from_frames(frames: u32) -> Self {
        Self { frames }
    }

    /// `None` if the position does not fit in a frame count.
    pub fn new(minutes: u32, seconds: u32, frames: u32) -> Option<Self> {
        let frames = minutes
            .checked_mul(SECONDS_PER_MINUTE)?
            .checked_add(seconds)?
            .checked_mul(FRAMES_PER_SECOND)?
            .checked_add(frames)?;
        Some(Self { frames })
    }

    pub fn minutes(&self) -> u32 {
        self.frames / FRAMES_PER_SECOND / SECONDS_PER_MINUTE
    }

    pub fn seconds(&self) -> u32 {
        (self.frames / FRAMES_PER_SECOND) % SECONDS_PER_MINUTE
    }

    pub fn frame(&self) -> u32 {
        self.frames % FRAMES_PER_SECOND
    }

    pub fn checked_add(&self, length: Msf) -> Option<Msf> {
        self.frames.checked_add(length.frames).map(Msf::from_frames)
    }

    /// Length from `start` up to `self`.
    pub fn since(&self, start: Msf) -> DiscResult<Msf> {
        self.frames
            .checked_sub(start.frames)
            .map(Msf::from_frames)
            .ok_or(DiscError::NegativeLength {
                from: start,
                to: *self,
            })
    }
}

impl Display for Msf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes(),
            self.seconds(),
            self.frame()
        )
    }
}

impl FromStr for Msf {
    type Err = DiscError;

    fn from_str(s: &str) -> DiscResult<Self> {
        let invalid = || DiscError::InvalidMsfFormat(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let minutes: u32 = parts[0].parse().map_err(|_| invalid())?;
        let seconds: u32 = parts[1].parse().map_err(|_| invalid())?;
        let frames: u32 = parts[2].parse().map_err(|_| invalid())?;

        if seconds >= SECONDS_PER_MINUTE || frames >= FRAMES_PER_SECOND {
            return Err(invalid());
        }

        Msf::new(minutes, seconds, frames).ok_or_else(invalid)
    }
}

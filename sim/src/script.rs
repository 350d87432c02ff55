//! Scripted and random input.
//!
//! A script is a comma-separated list of `frames:buttons` entries. Frames
//! are a single tick or an inclusive range, buttons are joined with `+`:
//!
//! ```text
//! 0-29:RIGHT, 30:A+UP, 45-60:left
//! ```
//!
//! Overlapping entries combine. Ticks not covered by any entry press
//! nothing.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tilebrawl_hal::Buttons;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptError {
    /// An entry without the `:` between frames and buttons.
    MissingColon(String),
    BadFrame(String),
    /// A range whose end comes before its start.
    BackwardsRange { start: u64, end: u64 },
    UnknownButton(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::MissingColon(entry) => {
                write!(f, "expected `frames:buttons`, got `{entry}`")
            }
            ScriptError::BadFrame(frame) => write!(f, "`{frame}` is not a frame number"),
            ScriptError::BackwardsRange { start, end } => {
                write!(f, "frame range {start}-{end} ends before it starts")
            }
            ScriptError::UnknownButton(name) => write!(f, "unknown button `{name}`"),
        }
    }
}

impl std::error::Error for ScriptError {}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    frames: RangeInclusive<u64>,
    buttons: Buttons,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputScript {
    entries: Vec<Entry>,
}

impl InputScript {
    /// Buttons held on tick `frame`.
    pub fn buttons_at(&self, frame: u64) -> Buttons {
        self.entries
            .iter()
            .filter(|entry| entry.frames.contains(&frame))
            .fold(Buttons::empty(), |held, entry| held | entry.buttons)
    }

    /// Last tick the script presses anything on.
    pub fn last_frame(&self) -> Option<u64> {
        self.entries.iter().map(|entry| *entry.frames.end()).max()
    }
}

fn parse_frame(text: &str) -> Result<u64, ScriptError> {
    text.trim()
        .parse()
        .map_err(|_| ScriptError::BadFrame(text.trim().to_owned()))
}

fn parse_entry(entry: &str) -> Result<Entry, ScriptError> {
    let (frames, names) = entry
        .split_once(':')
        .ok_or_else(|| ScriptError::MissingColon(entry.to_owned()))?;

    let frames = match frames.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (parse_frame(start)?, parse_frame(end)?);
            if end < start {
                return Err(ScriptError::BackwardsRange { start, end });
            }
            start..=end
        }
        None => {
            let frame = parse_frame(frames)?;
            frame..=frame
        }
    };

    let mut buttons = Buttons::empty();
    for name in names.split('+').map(str::trim).filter(|name| !name.is_empty()) {
        buttons |= Buttons::parse_name(name)
            .ok_or_else(|| ScriptError::UnknownButton(name.to_owned()))?;
    }

    Ok(Entry { frames, buttons })
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(script: &str) -> Result<Self, Self::Err> {
        let entries = script
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}

/// Where the simulated keypad gets its buttons from.
#[derive(Clone, Debug)]
pub enum InputSource {
    Idle,
    Script(InputScript),
    /// A fresh random set of buttons every tick.
    Mash(StdRng),
}

impl InputSource {
    pub fn mash(seed: u64) -> Self {
        InputSource::Mash(StdRng::seed_from_u64(seed))
    }

    pub fn sample(&mut self, frame: u64) -> Buttons {
        match self {
            InputSource::Idle => Buttons::empty(),
            InputSource::Script(script) => script.buttons_at(frame),
            InputSource::Mash(rng) => Buttons::from_bits_truncate(rng.r#gen::<u16>()),
        }
    }
}

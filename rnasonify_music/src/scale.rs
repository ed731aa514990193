// Scales and pitch-class arithmetic for the performer.
//
// A `Scale` is an interval pattern from the root; a `ScaleInstance` is that
// pattern transposed to a key. Pitch classes stay in degree order starting
// at the root, so degree 0 is always the tonic even when transposition wraps
// some degrees below it (the performer lifts those an octave).
//
// Used by performer.rs for the melodic walk, chord intervals and the
// out-of-scale pool that `,` positions draw from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SonifyError;

const PITCH_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Name of a pitch class (0 = C). Values of 12 and up wrap.
pub fn pitch_name(pc: u8) -> &'static str {
    PITCH_NAMES[usize::from(pc % 12)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Chromatic,
    Major,
    /// Natural minor.
    Minor,
    MinorPentatonic,
    MajorPentatonic,
    WholeTone,
    /// Kostka & Payne's spelling.
    Hirajoshi,
}

impl Scale {
    pub const ALL: [Scale; 7] = [
        Scale::Chromatic,
        Scale::Major,
        Scale::Minor,
        Scale::MinorPentatonic,
        Scale::MajorPentatonic,
        Scale::WholeTone,
        Scale::Hirajoshi,
    ];

    /// Semitone intervals from the root, ascending.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::WholeTone => &[0, 2, 4, 6, 8, 10],
            Scale::Hirajoshi => &[0, 2, 3, 7, 8],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Chromatic => "Chromatic",
            Scale::Major => "Major",
            Scale::Minor => "Minor",
            Scale::MinorPentatonic => "Minor Pentatonic",
            Scale::MajorPentatonic => "Major Pentatonic",
            Scale::WholeTone => "Whole Tone",
            Scale::Hirajoshi => "Hirajoshi",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Scale {
    type Err = SonifyError;

    /// Case-insensitive; spaces, dashes and underscores are ignored, so
    /// "minor pentatonic", "Minor-Pentatonic" and "MinorPentatonic" agree.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Scale::ALL
            .into_iter()
            .find(|scale| normalize(scale.name()) == wanted)
            .ok_or_else(|| SonifyError::UnknownScale(s.to_string()))
    }
}

/// A scale transposed to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleInstance {
    /// Pitch classes in degree order, root first.
    pitch_classes: Vec<u8>,
}

impl ScaleInstance {
    pub fn new(scale: Scale, key: u8) -> Self {
        Self::transposed(scale.intervals(), key)
    }

    /// A scale from arbitrary intervals. Intervals wrap mod 12.
    pub fn custom(intervals: &[u8], key: u8) -> Result<Self, SonifyError> {
        if intervals.is_empty() {
            return Err(SonifyError::EmptyScale);
        }
        Ok(Self::transposed(intervals, key))
    }

    fn transposed(intervals: &[u8], key: u8) -> Self {
        let key = key % 12;
        let pitch_classes = intervals.iter().map(|&i| (i % 12 + key) % 12).collect();
        ScaleInstance { pitch_classes }
    }

    pub fn root(&self) -> u8 {
        self.pitch_classes[0]
    }

    pub fn pitch_classes(&self) -> &[u8] {
        &self.pitch_classes
    }

    pub fn len(&self) -> usize {
        self.pitch_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitch_classes.is_empty()
    }

    pub fn degree(&self, degree: usize) -> u8 {
        self.pitch_classes[degree % self.len()]
    }

    pub fn contains(&self, pc: u8) -> bool {
        self.pitch_classes.contains(&(pc % 12))
    }

    /// Pitch classes outside the scale, ascending.
    pub fn out_of_scale(&self) -> Vec<u8> {
        (0..12).filter(|&pc| !self.contains(pc)).collect()
    }

    /// MIDI key `step` scale degrees away from `pc` in `octave`.
    ///
    /// Steps of a whole scale length or more move whole octaves. Crossing
    /// the wrap point of the degree list carries into the octave. The
    /// result is clamped to [0, 127].
    pub fn step(&self, pc: u8, octave: u8, step: i32) -> u8 {
        let len = self.len() as i32;
        let mut octave = i32::from(octave);
        let mut step = step;
        if step.abs() >= len {
            octave += step / len;
            step = step.rem_euclid(len);
        }

        let from = self
            .pitch_classes
            .iter()
            .position(|&p| p == pc)
            .unwrap_or(0) as i32;
        let target = self.pitch_classes[(from + step).rem_euclid(len) as usize];

        if pc > target && step > 0 {
            octave += 1;
        }
        if pc < target && step < 0 {
            octave -= 1;
        }
        (i32::from(target) + octave * 12).clamp(0, 127) as u8
    }
}

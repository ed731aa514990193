// Sonification and application configuration.
//
// `SonifyConfig` holds every musical constant the performer and MIDI writer
// use. `AppConfig` is the on-disk JSON shape the `rnasonify` binary loads:
// `{ "structure": {...}, "sonify": {...} }`, where either section or any
// field may be omitted and falls back to its default.

use std::path::Path;

use rnasonify_structure::GeneratorConfig;
use serde::{Deserialize, Serialize};

use crate::error::SonifyError;
use crate::scale::{Scale, ScaleInstance};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifyConfig {
    pub scale: Scale,
    /// Overrides `scale` with arbitrary semitone intervals from the root.
    pub custom_intervals: Option<Vec<u8>>,
    /// Transposition in semitones (0 = C).
    pub key: u8,
    pub octave_low: u8,
    pub octave_high: u8,
    /// Length of one structure position.
    pub note_ticks: u32,
    pub ticks_per_quarter: u16,
    pub tempo_bpm: u16,
    pub velocity: u8,
    /// Controller number that carries each position's distance.
    pub distance_controller: u8,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        SonifyConfig {
            scale: Scale::Minor,
            custom_intervals: None,
            key: 0,
            octave_low: 2,
            octave_high: 8,
            note_ticks: 120,
            ticks_per_quarter: 480,
            tempo_bpm: 120,
            velocity: 64,
            distance_controller: 20,
        }
    }
}

impl SonifyConfig {
    pub fn scale_instance(&self) -> Result<ScaleInstance, SonifyError> {
        match &self.custom_intervals {
            Some(intervals) => ScaleInstance::custom(intervals, self.key),
            None => Ok(ScaleInstance::new(self.scale, self.key)),
        }
    }

    /// Octave range with the upper bound raised to at least the lower one.
    pub fn octave_range(&self) -> (u8, u8) {
        (self.octave_low, self.octave_high.max(self.octave_low))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub structure: GeneratorConfig,
    pub sonify: SonifyConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, SonifyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SonifyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

// Symbol-to-music mapping.
//
// Walks a structure string left to right, one fixed-length slot per
// position, and turns each symbol into melody events plus, for pseudoknot
// markers, events on a separate knot voice. The melody is a walk over scale
// degrees: opening symbols step up, closing symbols step down, loops and
// flanks rest, interior loops repeat with a small chord, and extra unpaired
// nucleotides jump to an out-of-scale pitch. Every slot also carries the
// position's distance on a controller and a channel-aftertouch value that
// marks the closing helix.
//
// The result is a `Performance`: two time-aligned event lists in absolute
// ticks. midi.rs turns it into a Standard MIDI File.
//
// See also: scale.rs for degree arithmetic, config.rs for the constants.

use rnasonify_prng::RnaRng;
use rnasonify_structure::Symbol;
use rnasonify_structure::symbol::parse_symbols;
use tracing::debug;

use crate::config::SonifyConfig;
use crate::error::SonifyError;
use crate::scale::{ScaleInstance, pitch_name};

/// How a symbol moves the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Up,
    Down,
    Stable,
    Pause,
    Disharmony,
    Pseudoknot,
}

impl Strategy {
    pub fn for_symbol(symbol: Symbol) -> Self {
        match symbol {
            Symbol::HelixOpen | Symbol::StemOpen => Strategy::Up,
            Symbol::HelixClose | Symbol::StemClose => Strategy::Down,
            Symbol::Hairpin | Symbol::Unstructured => Strategy::Pause,
            Symbol::Interior => Strategy::Stable,
            Symbol::Unpaired => Strategy::Disharmony,
            Symbol::KnotOpen | Symbol::KnotClose => Strategy::Pseudoknot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8 },
    Controller { controller: u8, value: u8 },
    Aftertouch { pressure: u8 },
}

/// An event at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub tick: u32,
    pub event: NoteEvent,
}

/// Both voices of a sonified structure, ticks non-decreasing per voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performance {
    pub melody: Vec<TimedEvent>,
    pub knots: Vec<TimedEvent>,
    pub total_ticks: u32,
    pub ticks_per_quarter: u16,
    pub tempo_bpm: u16,
    /// Note name and octave of every melody slot, `-` for rests.
    pub notation: Vec<String>,
}

/// Sonify a structure string and its distance annotation.
///
/// Slot 0 holds the scale root at the lowest octave; structure position
/// `i` occupies slot `i + 1`.
pub fn sonify(
    structure: &str,
    distances: &[u8],
    config: &SonifyConfig,
    rng: &mut RnaRng,
) -> Result<Performance, SonifyError> {
    let scale = config.scale_instance()?;
    let symbols = parse_symbols(structure)?;
    if symbols.len() != distances.len() {
        return Err(SonifyError::LengthMismatch {
            structure: symbols.len(),
            distances: distances.len(),
        });
    }

    let mut performer = Performer::new(scale, config);
    performer.open();
    for (i, &distance) in distances.iter().enumerate() {
        performer.position(&symbols, i, distance, rng);
    }
    let performance = performer.finish(symbols.len());
    debug!(
        positions = symbols.len(),
        melody_events = performance.melody.len(),
        knot_events = performance.knots.len(),
        "sonified structure"
    );
    Ok(performance)
}

struct Performer<'a> {
    scale: ScaleInstance,
    config: &'a SonifyConfig,
    low: u8,
    high: u8,
    degree: usize,
    octave: u8,
    knot_key: u8,
    held_knots: Vec<u8>,
    melody: Vec<TimedEvent>,
    knots: Vec<TimedEvent>,
    notation: Vec<String>,
}

impl<'a> Performer<'a> {
    fn new(scale: ScaleInstance, config: &'a SonifyConfig) -> Self {
        let (low, high) = config.octave_range();
        // A fifth below the root two octaves above the melody's floor.
        let fifth_below = i32::from(scale.root()) + (i32::from(low) + 2) * 12 - 7;
        let knot_key = fifth_below.clamp(0, 127);
        Performer {
            scale,
            config,
            low,
            high,
            degree: 0,
            octave: low,
            knot_key: knot_key as u8,
            held_knots: Vec::new(),
            melody: Vec::new(),
            knots: Vec::new(),
            notation: Vec::new(),
        }
    }

    fn slot_tick(&self, slot: usize) -> u32 {
        (slot as u32).saturating_mul(self.config.note_ticks)
    }

    fn push_melody(&mut self, tick: u32, event: NoteEvent) {
        self.melody.push(TimedEvent { tick, event });
    }

    fn push_knot(&mut self, tick: u32, event: NoteEvent) {
        self.knots.push(TimedEvent { tick, event });
    }

    fn open(&mut self) {
        self.push_melody(0, NoteEvent::Aftertouch { pressure: 0 });
        let root = self.scale.root();
        self.play(0, root, self.low, &[]);
    }

    fn position(&mut self, symbols: &[Symbol], i: usize, distance: u8, rng: &mut RnaRng) {
        let tick = self.slot_tick(i + 1);
        let symbol = symbols[i];

        self.push_melody(
            tick,
            NoteEvent::Controller {
                controller: self.config.distance_controller.min(127),
                value: distance.min(127),
            },
        );
        let pressure = match symbol {
            Symbol::HelixOpen => 0,
            Symbol::HelixClose => 127,
            _ => 63,
        };
        self.push_melody(tick, NoteEvent::Aftertouch { pressure });

        let len = self.scale.len() as i32;
        let stacks = vec![2 * len, 3 * len, 4 * len];
        let intervals = match symbol {
            Symbol::Interior => vec![2, -2, 4],
            Symbol::HelixOpen if symbols.get(i + 1) != Some(&Symbol::HelixOpen) => stacks,
            Symbol::HelixClose if i == 0 || symbols[i - 1] != Symbol::HelixClose => stacks,
            _ => Vec::new(),
        };

        let (pc, octave, sounding) = match Strategy::for_symbol(symbol) {
            Strategy::Up => {
                self.step_up();
                (self.scale.degree(self.degree), self.octave, true)
            }
            Strategy::Down => {
                self.step_down();
                (self.scale.degree(self.degree), self.octave, true)
            }
            Strategy::Stable => (self.scale.degree(self.degree), self.octave, true),
            Strategy::Pause => (self.scale.degree(self.degree), self.octave, false),
            Strategy::Disharmony => {
                let pc = self.disharmony(rng);
                (pc, self.octave.saturating_add(2).min(self.high), true)
            }
            Strategy::Pseudoknot => {
                self.knot(symbols, i, tick);
                (self.scale.degree(self.degree), self.octave, false)
            }
        };

        if sounding {
            // Degrees that wrapped below the root belong to the next octave.
            let octave = if pc < self.scale.root() {
                octave.saturating_add(1)
            } else {
                octave
            };
            self.play(tick, pc, octave, &intervals);
        } else {
            self.notation.push("-".to_string());
        }
    }

    fn step_up(&mut self) {
        if self.degree + 1 >= self.scale.len() {
            self.degree = 0;
            if self.high > self.low {
                self.octave = if self.octave < self.high {
                    self.octave + 1
                } else {
                    self.low
                };
            }
        } else {
            self.degree += 1;
        }
    }

    fn step_down(&mut self) {
        if self.degree == 0 {
            self.degree = self.scale.len() - 1;
            if self.high > self.low {
                self.octave = if self.octave > self.low {
                    self.octave - 1
                } else {
                    self.high
                };
            }
        } else {
            self.degree -= 1;
        }
    }

    /// A random pitch class outside the scale, or inside it when the scale
    /// covers all twelve.
    fn disharmony(&self, rng: &mut RnaRng) -> u8 {
        let outside = self.scale.out_of_scale();
        let pool: &[u8] = if outside.is_empty() {
            self.scale.pitch_classes()
        } else {
            &outside
        };
        rng.choose(pool)
            .copied()
            .unwrap_or_else(|| self.scale.root())
    }

    /// `[` climbs a fifth; the first `]` of a run repeats the last knot note
    /// and later ones descend a fifth. Notes are held until the `]` run ends.
    fn knot(&mut self, symbols: &[Symbol], i: usize, tick: u32) {
        let key = match symbols[i] {
            Symbol::KnotOpen => self.knot_key.saturating_add(7).min(127),
            _ if i > 0 && symbols[i - 1] == Symbol::KnotClose => self.knot_key.saturating_sub(7),
            _ => self.knot_key,
        };
        self.knot_key = key;
        self.push_knot(
            tick,
            NoteEvent::NoteOn {
                key,
                velocity: self.config.velocity.min(127),
            },
        );
        self.held_knots.push(key);

        let run_ends = symbols[i] == Symbol::KnotClose
            && symbols.get(i + 1) != Some(&Symbol::KnotClose);
        if run_ends {
            self.release_knots(tick.saturating_add(self.config.note_ticks));
        }
    }

    fn release_knots(&mut self, tick: u32) {
        for key in std::mem::take(&mut self.held_knots) {
            self.push_knot(tick, NoteEvent::NoteOff { key });
        }
    }

    fn play(&mut self, tick: u32, pc: u8, octave: u8, intervals: &[i32]) {
        let main = (u32::from(pc) + u32::from(octave) * 12).min(127) as u8;
        let mut keys = vec![main];
        keys.extend(intervals.iter().map(|&s| self.scale.step(pc, octave, s)));

        let velocity = self.config.velocity.min(127);
        for &key in &keys {
            self.push_melody(tick, NoteEvent::NoteOn { key, velocity });
        }
        let off = tick.saturating_add(self.config.note_ticks);
        for &key in &keys {
            self.push_melody(off, NoteEvent::NoteOff { key });
        }
        self.notation.push(format!("{}{}", pitch_name(pc), octave));
    }

    fn finish(mut self, positions: usize) -> Performance {
        let total_ticks = self.slot_tick(positions + 1);
        self.release_knots(total_ticks);
        Performance {
            melody: self.melody,
            knots: self.knots,
            total_ticks,
            ticks_per_quarter: self.config.ticks_per_quarter,
            tempo_bpm: self.config.tempo_bpm,
            notation: self.notation,
        }
    }
}

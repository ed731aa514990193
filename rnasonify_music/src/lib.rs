// RNA structure sonification.
//
// Turns a dot-bracket structure and its distance annotation (both produced
// by `rnasonify_structure`) into music: a melody that walks a scale up
// through opening pairs and back down through closing ones, a second voice
// for pseudoknots, and per-position controller data, written out as a
// Standard MIDI File.
//
// Architecture:
// - scale.rs: Scale definitions, transposition, degree stepping
// - config.rs: `SonifyConfig` and the binary's combined JSON `AppConfig`
// - performer.rs: Symbol strategies and the walk that builds a `Performance`
// - midi.rs: `Performance` to SMF via `midly`
// - error.rs: `SonifyError`
// - main.rs: The `rnasonify` CLI
//
// The performer draws from the caller's `RnaRng` only for out-of-scale
// notes, so the same seed reproduces structure and music together.

pub mod config;
pub mod error;
pub mod midi;
pub mod performer;
pub mod scale;

pub use config::{AppConfig, SonifyConfig};
pub use error::SonifyError;
pub use midi::write_midi;
pub use performer::{Performance, sonify};
pub use scale::{Scale, ScaleInstance};

// Error type for sonification and the `rnasonify` binary.
//
// Wraps the structure crate's errors so the whole pipeline (generate,
// annotate, sonify, write) propagates through one `Result` with `?`.

use rnasonify_structure::StructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SonifyError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("MIDI encoding failed: {0}")]
    Midi(String),

    #[error("unknown scale {0:?}")]
    UnknownScale(String),

    #[error("scale has no pitch classes")]
    EmptyScale,

    #[error("structure has {structure} positions but {distances} distances")]
    LengthMismatch { structure: usize, distances: usize },
}

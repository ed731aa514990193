// Error taxonomy for structure generation and distance annotation.
//
// Every variant aborts the single structure being built; there is no partial
// result. Callers that hit a random-draw-dependent failure may simply retry
// with the next state of their RNG.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Only one, two or three hairpin branches are supported.
    #[error("loop count must be 1, 2 or 3, got {0}")]
    InvalidLoopCount(usize),

    /// The request cannot hold the flanking, helix and branch geometry.
    #[error("{nucleotides} nucleotides is too short for {loops} loop(s); need at least {minimum}")]
    TooShort {
        nucleotides: usize,
        loops: usize,
        minimum: usize,
    },

    /// Pseudoknot insertion needs two hairpin loops long enough for the marker run.
    #[error("pseudoknot needs two hairpin loops longer than {needed}, found {loops_found}")]
    PseudoknotPrecondition { loops_found: usize, needed: usize },

    /// A character outside the dot-bracket alphabet.
    #[error("invalid structure symbol {ch:?} at position {position}")]
    InvalidSymbol { ch: char, position: usize },
}

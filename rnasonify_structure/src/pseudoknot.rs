// Pseudoknot insertion.
//
// A pseudoknot is drawn as two equal-length marker runs: `[` inside the
// first hairpin loop and `]` inside the next one. Each run starts at a
// random loop position chosen so that it ends before the loop does (the
// last `run_len` loop positions are never a start), which keeps the markers
// inside the loop and off the closing stem.
//
// Both loops are located before either run is written, so the `[` run
// splitting the first loop cannot confuse the search for the second.

use rnasonify_prng::RnaRng;
use tracing::info;

use crate::error::StructureError;
use crate::structure::{Segment, Structure};
use crate::symbol::Symbol;

/// The two marker runs written by `insert_pseudoknot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoknotPlacement {
    pub open: Segment,
    pub close: Segment,
}

/// Overwrite `run_len` positions of the first two hairpin loops with `[`
/// and `]` respectively.
///
/// Fails without touching the structure unless both loops are longer than
/// `run_len`.
pub fn insert_pseudoknot(
    structure: &mut Structure,
    run_len: usize,
    rng: &mut RnaRng,
) -> Result<PseudoknotPlacement, StructureError> {
    let loops = structure.hairpin_runs();
    let usable = loops.iter().take(2).filter(|r| r.len() > run_len).count();
    if run_len == 0 || usable < 2 {
        return Err(StructureError::PseudoknotPrecondition {
            loops_found: usable,
            needed: run_len,
        });
    }

    let open = marker_window(loops[0], run_len, rng);
    let close = marker_window(loops[1], run_len, rng);
    structure.paint(open, Symbol::KnotOpen);
    structure.paint(close, Symbol::KnotClose);

    info!(
        run_len,
        open = open.start,
        close = close.start,
        "added pseudoknot"
    );
    Ok(PseudoknotPlacement { open, close })
}

fn marker_window(hairpin: Segment, run_len: usize, rng: &mut RnaRng) -> Segment {
    let start = rng.range_usize(hairpin.start, hairpin.end - run_len);
    Segment::new(start, start + run_len)
}

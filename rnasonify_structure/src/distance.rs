// Branch-relative distance annotation.
//
// For every position, how far it is from the pairing center of the branch
// it belongs to, rescaled into the MIDI data range [0, 127].
//
// The pass walks left to right. A "center" is the next branch opening (`<`)
// or the first closing-helix position (`)`) at or after the current scan
// point. Positions measure `|i - center|` against it, except hairpin and
// pseudoknot positions, which repeat the previous distance: a loop is
// neutral with respect to its branch. When a loop run ends, the next center
// is looked up from the position after it, so the closing side of a branch
// measures towards the following branch (or towards the closing helix).
// Pseudoknot markers written into a loop are part of its run.
// Once the center is a `)`, every remaining position, loops included, is
// measured directly against it.
//
// Positions before the first center is found carry the previous distance
// (initially zero). After that a center is only ever replaced, never
// dropped: when a loop run ends with no `<` or `)` ahead, the old center
// stays and the remaining positions are measured against it. The raw
// distances are then scaled so the largest maps to exactly 127, rounding
// half up. An all-zero input stays all zero.

use crate::error::StructureError;
use crate::structure::Structure;
use crate::symbol::{Symbol, parse_symbols};

/// Upper bound of a rescaled distance (the MIDI data byte range).
pub const MAX_DISTANCE: u8 = 127;

/// Annotate a dot-bracket string with rescaled branch distances.
///
/// Pure function of its input; the output has one value per character.
pub fn compute_distances(structure: &str) -> Result<Vec<u8>, StructureError> {
    let symbols = parse_symbols(structure)?;
    Ok(distances_of(&symbols))
}

/// Rescaled branch distances of an already parsed symbol sequence.
pub fn distances_of(symbols: &[Symbol]) -> Vec<u8> {
    rescale(&raw_distances(symbols))
}

impl Structure {
    /// Rescaled branch distances, one per position.
    pub fn distances(&self) -> Vec<u8> {
        distances_of(self.symbols())
    }
}

/// Unscaled branch distances.
pub fn raw_distances(symbols: &[Symbol]) -> Vec<usize> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut center: Option<usize> = None;
    let mut at_end = false;
    let mut seek = true;
    let mut prev = 0;

    for (i, &symbol) in symbols.iter().enumerate() {
        if seek && !at_end {
            if let Some(c) = next_center(symbols, i) {
                center = Some(c);
                at_end = symbols[c] == Symbol::HelixClose;
            }
            seek = false;
        }

        let distance = match center {
            None => prev,
            Some(c) if at_end => i.abs_diff(c),
            Some(_) if symbol.is_distance_neutral() => {
                if !symbols.get(i + 1).is_some_and(|s| s.is_distance_neutral()) {
                    seek = true;
                }
                prev
            }
            Some(c) => i.abs_diff(c),
        };
        out.push(distance);
        prev = distance;
    }
    out
}

fn next_center(symbols: &[Symbol], from: usize) -> Option<usize> {
    symbols[from..]
        .iter()
        .position(|s| s.is_center())
        .map(|offset| from + offset)
}

/// Scale linearly so the maximum becomes `MAX_DISTANCE`, rounding half up.
pub fn rescale(raw: &[usize]) -> Vec<u8> {
    let max = raw.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0; raw.len()];
    }
    let top = usize::from(MAX_DISTANCE);
    raw.iter()
        .map(|&d| ((d * top + max / 2) / max) as u8)
        .collect()
}

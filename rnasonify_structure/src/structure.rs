// The structure buffer and segment descriptors.
//
// `Structure` owns the symbol sequence for one generated molecule. Each
// pipeline stage borrows it mutably in turn (branch fill, unpaired insertion,
// pseudoknot insertion) and hands it back; nothing keeps an alias across
// stages. `Segment` is a half-open `[start, end)` range into the buffer, so
// branches are filled in place via `segment_mut` instead of being sliced out,
// copied, and stitched back together.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StructureError;
use crate::symbol::{Symbol, parse_symbols};

/// Half-open range of positions in a `Structure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "segment start {start} past end {end}");
        Segment { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Split into `parts` contiguous pieces whose lengths differ by at most one.
    pub fn split(self, parts: usize) -> Vec<Segment> {
        let parts = parts.max(1);
        let len = self.len();
        (0..parts)
            .map(|i| {
                Segment::new(
                    self.start + len * i / parts,
                    self.start + len * (i + 1) / parts,
                )
            })
            .collect()
    }
}

/// An owned dot-bracket symbol sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    symbols: Vec<Symbol>,
}

impl Structure {
    /// A structure of `len` copies of `symbol`.
    pub fn filled(len: usize, symbol: Symbol) -> Self {
        Structure {
            symbols: vec![symbol; len],
        }
    }

    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        Structure { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols.get(index).copied()
    }

    /// Overwrite every position of `segment`.
    pub fn paint(&mut self, segment: Segment, symbol: Symbol) {
        self.symbols[segment.range()].fill(symbol);
    }

    /// Insert a symbol before `index`, shifting the tail right by one.
    pub fn insert(&mut self, index: usize, symbol: Symbol) {
        self.symbols.insert(index, symbol);
    }

    /// Exclusive view of one segment, for in-place branch filling.
    pub fn segment_mut(&mut self, segment: Segment) -> &mut [Symbol] {
        &mut self.symbols[segment.range()]
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.symbols.iter().filter(|&&s| s == symbol).count()
    }

    /// Maximal runs of positions satisfying `pred`, in order.
    pub fn runs_where(&self, pred: impl Fn(Symbol) -> bool) -> Vec<Segment> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, &symbol) in self.symbols.iter().enumerate() {
            match (pred(symbol), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push(Segment::new(s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Segment::new(s, self.symbols.len()));
        }
        runs
    }

    /// Maximal runs of `_`.
    pub fn hairpin_runs(&self) -> Vec<Segment> {
        self.runs_where(|s| s == Symbol::Hairpin)
    }

    /// Hairpin loops including any pseudoknot markers written into them.
    pub fn loop_regions(&self) -> Vec<Segment> {
        self.runs_where(Symbol::is_distance_neutral)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.symbols.iter().map(|s| s.as_char()).collect();
        f.write_str(&text)
    }
}

impl FromStr for Structure {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbols(s).map(Structure::from_symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_covers_segment_without_gaps() {
        let seg = Segment::new(7, 57);
        for parts in 1..=3 {
            let pieces = seg.split(parts);
            assert_eq!(pieces.len(), parts);
            assert_eq!(pieces[0].start, 7);
            assert_eq!(pieces[parts - 1].end, 57);
            for pair in pieces.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            let shortest = pieces.iter().map(|p| p.len()).min().unwrap();
            let longest = pieces.iter().map(|p| p.len()).max().unwrap();
            assert!(longest - shortest <= 1);
        }
    }

    #[test]
    fn display_and_parse_agree() {
        let text = "::((<<-___[[_->>,)):";
        let structure: Structure = text.parse().unwrap();
        assert_eq!(structure.to_string(), text);
        assert_eq!(structure.count(Symbol::Interior), 2);
    }

    #[test]
    fn hairpin_runs_and_loop_regions() {
        let structure: Structure = "<___>,<_[[__>".parse().unwrap();
        assert_eq!(
            structure.hairpin_runs(),
            vec![Segment::new(1, 4), Segment::new(7, 8), Segment::new(10, 12)]
        );
        assert_eq!(
            structure.loop_regions(),
            vec![Segment::new(1, 4), Segment::new(7, 12)]
        );
    }

    #[test]
    fn run_reaching_the_end_is_closed() {
        let structure: Structure = ",,___".parse().unwrap();
        assert_eq!(structure.hairpin_runs(), vec![Segment::new(2, 5)]);
    }

    #[test]
    fn insert_shifts_tail() {
        let mut structure: Structure = "<_>".parse().unwrap();
        structure.insert(2, Symbol::Unpaired);
        assert_eq!(structure.to_string(), "<_,>");
    }
}

// The dot-bracket alphabet.
//
// One `Symbol` per nucleotide position. The textual form is the consensus
// secondary structure descriptor (CSSD) flavour of dot-bracket notation:
//
//   ,  unpaired nucleotide in a multi-branch loop (the unassigned default)
//   :  unstructured flanking nucleotide at either end
//   ( )  base pair of the closing helix
//   < >  base pair of a terminal branch stem
//   _  hairpin loop
//   -  interior loop / bulge, always placed in mirrored pairs
//   [ ]  pseudoknot markers

use serde::{Deserialize, Serialize};

use crate::error::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Unpaired,
    Unstructured,
    HelixOpen,
    HelixClose,
    StemOpen,
    StemClose,
    Hairpin,
    Interior,
    KnotOpen,
    KnotClose,
}

impl Symbol {
    pub const ALL: [Symbol; 10] = [
        Symbol::Unpaired,
        Symbol::Unstructured,
        Symbol::HelixOpen,
        Symbol::HelixClose,
        Symbol::StemOpen,
        Symbol::StemClose,
        Symbol::Hairpin,
        Symbol::Interior,
        Symbol::KnotOpen,
        Symbol::KnotClose,
    ];

    pub fn as_char(self) -> char {
        match self {
            Symbol::Unpaired => ',',
            Symbol::Unstructured => ':',
            Symbol::HelixOpen => '(',
            Symbol::HelixClose => ')',
            Symbol::StemOpen => '<',
            Symbol::StemClose => '>',
            Symbol::Hairpin => '_',
            Symbol::Interior => '-',
            Symbol::KnotOpen => '[',
            Symbol::KnotClose => ']',
        }
    }

    /// Stem positions: the only places an extra unpaired nucleotide may be
    /// inserted in front of.
    pub fn is_stem(self) -> bool {
        matches!(
            self,
            Symbol::StemOpen | Symbol::StemClose | Symbol::Interior
        )
    }

    /// Loop and pseudoknot positions inherit the distance of the position
    /// before them.
    pub fn is_distance_neutral(self) -> bool {
        matches!(self, Symbol::Hairpin | Symbol::KnotOpen | Symbol::KnotClose)
    }

    /// Symbols that may only appear inside a branch segment.
    pub fn is_branch_only(self) -> bool {
        matches!(
            self,
            Symbol::StemOpen | Symbol::StemClose | Symbol::Hairpin | Symbol::Interior
        )
    }

    /// Positions that start a new distance center: a branch's first stem
    /// pair, or the closing helix.
    pub fn is_center(self) -> bool {
        matches!(self, Symbol::StemOpen | Symbol::HelixClose)
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(ch: char) -> Result<Self, char> {
        Symbol::ALL
            .into_iter()
            .find(|s| s.as_char() == ch)
            .ok_or(ch)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse a dot-bracket string into symbols, reporting the first bad character.
pub fn parse_symbols(text: &str) -> Result<Vec<Symbol>, StructureError> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| match Symbol::try_from(ch) {
            Ok(symbol) => Ok(symbol),
            Err(ch) => Err(StructureError::InvalidSymbol { ch, position }),
        })
        .collect()
}

// Random RNA secondary-structure generator.
//
// Builds synthetic dot-bracket structures (CSSD flavour) with one to three
// hairpin branches, interior loops, optional extra unpaired nucleotides and
// optional pseudoknots, and annotates each position with its distance from
// the pairing center of its branch. The two outputs, the structure string
// and the parallel distance array, drive the sonification in
// `rnasonify_music`.
//
// Architecture:
// - symbol.rs: The ten-symbol alphabet and string parsing
// - structure.rs: Owned symbol buffer (`Structure`) and half-open `Segment`s
// - config.rs: `GeneratorConfig`, every probability and geometry constant
// - branch.rs: Fills one branch segment with a hairpin, stems and bulges
// - unpaired.rs: Inserts extra `,` positions in front of stems
// - pseudoknot.rs: Writes `[`/`]` marker runs into two hairpin loops
// - generator.rs: The staged pipeline tying the above together
// - distance.rs: Branch-relative distance pass and rescaling to [0, 127]
// - error.rs: `StructureError`
//
// All randomness comes from the caller's `RnaRng`, so a seed reproduces a
// structure exactly.

pub mod branch;
pub mod config;
pub mod distance;
pub mod error;
pub mod generator;
pub mod pseudoknot;
pub mod structure;
pub mod symbol;
pub mod unpaired;

pub use config::GeneratorConfig;
pub use distance::compute_distances;
pub use error::StructureError;
pub use generator::{GeneratedStructure, MAX_LOOPS, StructureGenerator, minimum_nucleotides};
pub use structure::{Segment, Structure};
pub use symbol::Symbol;

use rnasonify_prng::RnaRng;

/// Generate a structure with the default configuration.
///
/// Returns the dot-bracket string and the number of hairpin loops.
pub fn generate(
    nucleotides: usize,
    loops: usize,
    rng: &mut RnaRng,
) -> Result<(String, usize), StructureError> {
    let generator = StructureGenerator::default();
    let generated = generator.generate(nucleotides, loops, rng)?;
    Ok((generated.structure.to_string(), generated.loop_count))
}

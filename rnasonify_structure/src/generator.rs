// Structure generation: the pipeline that builds one random structure.
//
// Stages, in order, all on one owned `Structure` buffer:
//
//   1. Draw the optional-stage decisions: extra unpaired nucleotides
//      (subtracted from the layout length so the final length matches the
//      request) and, with more than one loop, a pseudoknot run length.
//   2. Flanking: 1..=max_flank `:` positions at each end.
//   3. Closing helix: a band of `(` just inside the left flank mirrored by
//      `)` just inside the right flank, about a tenth of the length.
//   4. Partition the central span into `loops` near-equal branch segments
//      and fill each in place (`branch.rs`).
//   5. Optional unpaired insertion (`unpaired.rs`).
//   6. Optional pseudoknot (`pseudoknot.rs`), with the marker run shortened
//      to fit the smaller of the two loops it joins.
//
// Geometry is checked before any randomness is drawn: a request must leave
// room for a minimum branch per loop after the worst-case unpaired
// subtraction and a one-position flank and helix on each side. Flank and
// helix draws are then clamped so the central span never drops below that
// minimum, which keeps every branch well formed.
//
// The RNG is threaded through every stage; a given seed and config always
// reproduce the same structure.

use rnasonify_prng::RnaRng;
use tracing::debug;

use crate::branch::fill_branch;
use crate::config::GeneratorConfig;
use crate::error::StructureError;
use crate::pseudoknot::{PseudoknotPlacement, insert_pseudoknot};
use crate::structure::{Segment, Structure};
use crate::symbol::Symbol;
use crate::unpaired::insert_unpaired;

/// Most hairpin branches a structure can have.
pub const MAX_LOOPS: usize = 3;

/// A finished structure plus what the generator decided along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStructure {
    pub structure: Structure,
    /// Number of hairpin branches (the requested loop count).
    pub loop_count: usize,
    /// Extra `,` positions inserted after the layout.
    pub unpaired_inserted: usize,
    /// Marker runs, when a pseudoknot was added.
    pub pseudoknot: Option<PseudoknotPlacement>,
    /// Branch segments in layout coordinates, i.e. before unpaired
    /// insertion shifted anything.
    pub branches: Vec<Segment>,
}

impl GeneratedStructure {
    pub fn len(&self) -> usize {
        self.structure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Rescaled branch distances of the finished structure.
    pub fn distances(&self) -> Vec<u8> {
        self.structure.distances()
    }
}

/// Smallest nucleotide count `generate` accepts for `loops` branches.
pub fn minimum_nucleotides(loops: usize, config: &GeneratorConfig) -> usize {
    config.max_unpaired + 4 + loops * config.min_branch_len()
}

#[derive(Debug, Clone, Default)]
pub struct StructureGenerator {
    config: GeneratorConfig,
}

impl StructureGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        StructureGenerator { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build one random structure of exactly `nucleotides` positions with
    /// `loops` hairpin branches.
    pub fn generate(
        &self,
        nucleotides: usize,
        loops: usize,
        rng: &mut RnaRng,
    ) -> Result<GeneratedStructure, StructureError> {
        if !(1..=MAX_LOOPS).contains(&loops) {
            return Err(StructureError::InvalidLoopCount(loops));
        }
        let minimum = minimum_nucleotides(loops, &self.config);
        if nucleotides < minimum {
            return Err(StructureError::TooShort {
                nucleotides,
                loops,
                minimum,
            });
        }
        let config = &self.config;

        let unpaired = if rng.random_bool(config.unpaired_insertion_probability) {
            self.unpaired_count(nucleotides, rng)
        } else {
            0
        };
        let knot_run = if loops > 1 && rng.random_bool(config.pseudoknot_probability) {
            rng.choose(&config.pseudoknot_runs).copied()
        } else {
            None
        };

        let len = nucleotides - unpaired;
        let mut structure = Structure::filled(len, Symbol::Unpaired);

        // Each side may use at most `room` positions for flank plus helix.
        let room = (len - loops * config.min_branch_len()) / 2;

        let flank = rng
            .range_usize_inclusive(1, config.max_flank.max(1))
            .min(room - 1);
        structure.paint(Segment::new(0, flank), Symbol::Unstructured);
        structure.paint(Segment::new(len - flank, len), Symbol::Unstructured);

        let helix_center = (len / config.helix_divisor.max(1)) as i64;
        let helix = rng
            .jitter(helix_center, config.helix_jitter)
            .clamp(1, (room - flank) as i64) as usize;
        structure.paint(Segment::new(flank, flank + helix), Symbol::HelixOpen);
        structure.paint(
            Segment::new(len - flank - helix, len - flank),
            Symbol::HelixClose,
        );
        debug!(len, flank, helix, "laid out flanks and closing helix");

        let central = Segment::new(flank + helix, len - flank - helix);
        let branches = central.split(loops);
        for &branch in &branches {
            fill_branch(structure.segment_mut(branch), config, rng);
        }

        let unpaired_inserted = insert_unpaired(&mut structure, unpaired, rng);

        let pseudoknot = match knot_run {
            Some(run) => Some(place_pseudoknot(&mut structure, run, rng)?),
            None => None,
        };

        Ok(GeneratedStructure {
            structure,
            loop_count: loops,
            unpaired_inserted,
            pseudoknot,
            branches,
        })
    }

    /// About one extra unpaired nucleotide per 22, jittered, capped.
    fn unpaired_count(&self, nucleotides: usize, rng: &mut RnaRng) -> usize {
        let config = &self.config;
        rng.jitter(
            (nucleotides / config.unpaired_divisor.max(1)) as i64,
            config.unpaired_jitter,
        )
        .clamp(0, config.max_unpaired as i64) as usize
    }
}

/// Shorten the marker run to fit the two loops it joins, then insert it.
fn place_pseudoknot(
    structure: &mut Structure,
    run: usize,
    rng: &mut RnaRng,
) -> Result<PseudoknotPlacement, StructureError> {
    let shortest = structure
        .hairpin_runs()
        .iter()
        .take(2)
        .map(|r| r.len())
        .min()
        .unwrap_or(0);
    let fitted = run.min(shortest.saturating_sub(1));
    if fitted < run {
        debug!(
            run,
            fitted,
            shortest,
            "shortened pseudoknot run to fit loop"
        );
    }
    insert_pseudoknot(structure, fitted, rng)
}

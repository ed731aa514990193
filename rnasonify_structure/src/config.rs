// Data-driven generator configuration.
//
// Every probability and geometry constant the generator uses lives in
// `GeneratorConfig`, so experiments (and tests that need a stage forced on
// or off) change data rather than code. Loaded from JSON; any omitted field
// falls back to the default below.
//
// Probabilities are explicit Bernoulli parameters. The defaults are the
// intended rates: 1/2 for a fresh base pair, 6/7 for a pair that continues a
// preceding pair, 1/7 for adding extra unpaired nucleotides and 1/2 for a
// pseudoknot.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Chance that a stem position becomes a base pair rather than an
    /// interior loop.
    pub base_pair_probability: f64,
    /// Pair chance when the previous position is already a stem pair.
    pub paired_continuation_probability: f64,
    /// Chance of inserting extra unpaired nucleotides after the layout.
    pub unpaired_insertion_probability: f64,
    /// Chance of adding a pseudoknot (only with more than one loop).
    pub pseudoknot_probability: f64,

    /// Upper bound of the flanking `:` run at each end (lower bound is 1).
    pub max_flank: usize,
    /// Closing helix length is `nucleotides / helix_divisor`, jittered.
    pub helix_divisor: usize,
    pub helix_jitter: u64,

    /// Hairpin loop length is `branch_len / loop_divisor`, jittered.
    pub loop_divisor: usize,
    pub loop_jitter: u64,
    pub min_loop_len: usize,

    /// Extra unpaired count is `nucleotides / unpaired_divisor`, jittered,
    /// then capped at `max_unpaired`.
    pub unpaired_divisor: usize,
    pub unpaired_jitter: u64,
    pub max_unpaired: usize,

    /// Candidate lengths of each pseudoknot marker run.
    pub pseudoknot_runs: Vec<usize>,
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Hairpin floor, never below one position.
    pub fn loop_floor(&self) -> usize {
        self.min_loop_len.max(1)
    }

    /// Shortest branch segment the filler accepts: a minimum loop with two
    /// stem positions on each side.
    pub fn min_branch_len(&self) -> usize {
        self.loop_floor() + 4
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_pair_probability: 0.5,
            paired_continuation_probability: 6.0 / 7.0,
            unpaired_insertion_probability: 1.0 / 7.0,
            pseudoknot_probability: 0.5,
            max_flank: 10,
            helix_divisor: 10,
            helix_jitter: 2,
            loop_divisor: 4,
            loop_jitter: 3,
            min_loop_len: 3,
            unpaired_divisor: 22,
            unpaired_jitter: 2,
            max_unpaired: 1,
            pseudoknot_runs: vec![2, 3, 4],
        }
    }
}

// Branch filling: one hairpin arm carved out of an unpaired segment.
//
// Given a segment of `,` positions, `fill_branch` places a hairpin loop near
// the middle and then walks from the segment start towards the loop, pairing
// each position `i` with its mirror on the far side of the loop:
//
//   mirror(i) = loop_start + loop_len + (loop_start - i - 1)
//
// Each mirrored pair becomes either a stem base pair (`<`/`>`) or an
// interior-loop pair (`-`/`-`). The outermost pair in bounds and the pair
// touching the loop are always base pairs, so every branch is closed on both
// ends by a stem. In between, the choice is a biased coin: a position that
// follows a base pair is more likely to pair again, so helices tend to run.
//
// Asymmetric segments: when the loop sits off-center, the longer side keeps
// its outermost positions as `,` (their mirrors fall outside the segment on
// the left, or are never reached on the right). That remainder is accepted.
//
// The filler only ever touches the slice it is given, so branches of one
// structure are independent of each other apart from the shared RNG stream.

use rnasonify_prng::RnaRng;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::symbol::Symbol;

/// Where the hairpin landed, relative to the start of the branch slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchLayout {
    pub loop_start: usize,
    pub loop_len: usize,
}

impl BranchLayout {
    pub fn loop_end(self) -> usize {
        self.loop_start + self.loop_len
    }

    /// The position mirrored across the loop from `index`, if it lies in a
    /// branch of length `len`.
    pub fn mirror(self, index: usize, len: usize) -> Option<usize> {
        if index >= self.loop_start {
            return None;
        }
        let mirror = self.loop_end() + (self.loop_start - index - 1);
        (mirror < len).then_some(mirror)
    }
}

/// Fill an all-unpaired branch slice in place with a hairpin, stem pairs and
/// interior loops.
pub fn fill_branch(
    branch: &mut [Symbol],
    config: &GeneratorConfig,
    rng: &mut RnaRng,
) -> BranchLayout {
    let n = branch.len();
    let floor = config.loop_floor();

    // Loop length: a quarter of the branch, jittered, floored at the
    // minimum, and capped so one stem position fits on each side.
    let center = (n / config.loop_divisor.max(1)) as i64;
    let drawn = rng.jitter(center, config.loop_jitter);
    let cap = if n >= floor + 2 { n - 2 } else { n };
    let loop_len = (drawn.max(floor as i64) as usize).min(cap);

    // Loop start: centered, jittered by one, never flush with an edge
    // when there is room for stems.
    let slack = n - loop_len;
    let (lo, hi) = if slack >= 2 {
        (1, slack - 1)
    } else {
        (0, slack)
    };
    let loop_start = rng
        .jitter((slack / 2) as i64, 1)
        .clamp(lo as i64, hi as i64) as usize;

    let layout = BranchLayout {
        loop_start,
        loop_len,
    };
    branch[loop_start..layout.loop_end()].fill(Symbol::Hairpin);

    let first_paired = (0..loop_start).find(|&i| layout.mirror(i, n).is_some());

    for i in 0..loop_start {
        let Some(mirror) = layout.mirror(i, n) else {
            continue;
        };

        if Some(i) == first_paired || i + 1 == loop_start {
            branch[i] = Symbol::StemOpen;
            branch[mirror] = Symbol::StemClose;
            continue;
        }

        let p = if branch[i - 1] == Symbol::StemOpen {
            config.paired_continuation_probability
        } else {
            config.base_pair_probability
        };
        let pair = rng.random_bool(p);

        if branch[mirror] == Symbol::Unpaired {
            let (open, close) = if pair {
                (Symbol::StemOpen, Symbol::StemClose)
            } else {
                (Symbol::Interior, Symbol::Interior)
            };
            branch[i] = open;
            branch[mirror] = close;
        }
    }

    debug!(len = n, loop_start, loop_len, "filled branch");
    layout
}

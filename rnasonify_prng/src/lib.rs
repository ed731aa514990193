// Deterministic, portable pseudo-random number generator.
//
// xoshiro256++ (Blackman & Vigna, 2019) seeded through SplitMix64. Every
// random decision in the structure generator and the sonification mapper
// draws from one `RnaRng` that the caller threads through each stage, so a
// fixed seed reproduces a structure (and its MIDI rendering) bit for bit.
//
// On top of the raw stream this crate provides the handful of sampling
// helpers the generator needs: half-open and inclusive integer ranges,
// signed `±spread` jitter around a center, uniform choice from a slice, and
// an explicit Bernoulli trial (`random_bool`) so that probabilities are
// written down as constants instead of being reconstructed by rounding a
// float.
//
// **Determinism.** The core generator uses integer arithmetic only. The one
// floating-point path (`next_f64`) is a fixed bit-shift-and-divide, which is
// exact under IEEE 754 on every platform.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG. The single randomness source of a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RnaRng {
    s: [u64; 4],
}

impl RnaRng {
    /// Create a PRNG from a `u64` seed.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so even small or
    /// adjacent seeds give unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a PRNG seeded from the wall clock and process id.
    ///
    /// For interactive use when the caller did not ask for a seed. Returns
    /// the seed alongside the generator so it can be reported and replayed.
    pub fn from_entropy() -> (Self, u64) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mut mix = nanos ^ (u64::from(std::process::id()) << 32);
        let seed = splitmix64(&mut mix);
        (Self::new(seed), seed)
    }

    /// Next raw `u64` of the stream.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform `f64` in [0, 1), built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)`.
    ///
    /// Rejection sampling keeps the distribution free of modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `usize` in `[low, high]`. Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "range_usize_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as usize
    }

    /// Uniform `i64` in `[low, high]`. Panics if `low > high`.
    pub fn range_i64_inclusive(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "range_i64_inclusive: low must be <= high");
        let span = high.abs_diff(low);
        let offset = self.range_u64(0, span + 1);
        low.wrapping_add(offset as i64)
    }

    /// Uniform value in `[center - spread, center + spread]`.
    ///
    /// The result may be negative; callers floor or clamp it to whatever
    /// minimum their geometry needs.
    pub fn jitter(&mut self, center: i64, spread: u64) -> i64 {
        let spread = spread as i64;
        self.range_i64_inclusive(center - spread, center + spread)
    }

    /// Uniformly pick one element, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range_usize(0, items.len());
        items.get(idx)
    }

    /// Bernoulli trial: `true` with probability `p`.
    ///
    /// `p <= 0.0` never fires and `p >= 1.0` always fires.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// SplitMix64 step, used for seeding only.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

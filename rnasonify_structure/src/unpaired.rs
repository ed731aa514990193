// Extra unpaired nucleotide insertion.
//
// Grows the structure by inserting `,` markers in front of randomly chosen
// stem positions (`<`, `>` or `-`). Positions are drawn uniformly over the
// current length and redrawn until they land on a stem, so flanking,
// closing-helix and hairpin positions never receive an insertion. Each
// insertion shifts everything after it, and the next draw uses the grown
// length.

use rnasonify_prng::RnaRng;
use tracing::{info, warn};

use crate::structure::Structure;
use crate::symbol::Symbol;

/// Insert up to `count` unpaired nucleotides. Returns how many were
/// inserted; zero when the structure has no stem positions to target.
pub fn insert_unpaired(structure: &mut Structure, count: usize, rng: &mut RnaRng) -> usize {
    if count == 0 {
        return 0;
    }
    if !structure.symbols().iter().any(|s| s.is_stem()) {
        warn!(
            count,
            "no stem positions to insert unpaired nucleotides before"
        );
        return 0;
    }

    for _ in 0..count {
        let position = loop {
            let candidate = rng.range_usize(0, structure.len());
            if structure.get(candidate).is_some_and(Symbol::is_stem) {
                break candidate;
            }
        };
        structure.insert(position, Symbol::Unpaired);
    }

    info!(count, "added extra unpaired nucleotides");
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_count_and_only_before_stems() {
        let original: Structure = "::((<<-___->>)),<___>::".parse().unwrap();
        for seed in 0..100 {
            let mut structure = original.clone();
            let inserted = insert_unpaired(&mut structure, 3, &mut RnaRng::new(seed));
            assert_eq!(inserted, 3);
            assert_eq!(structure.len(), original.len() + 3);
            assert_eq!(
                structure.count(Symbol::Unpaired),
                original.count(Symbol::Unpaired) + 3
            );

            // Every `,` run, original or inserted, ends in front of a stem.
            let text = structure.to_string();
            let chars: Vec<char> = text.chars().collect();
            for (i, &ch) in chars.iter().enumerate() {
                if ch == ',' {
                    let next_non_comma = chars[i..].iter().find(|&&c| c != ',').copied();
                    assert!(
                        matches!(next_non_comma, Some('<' | '>' | '-')),
                        "seed {seed}: stray ',' in {text}"
                    );
                }
            }
        }
    }

    #[test]
    fn hairpins_and_helices_are_untouched() {
        let original: Structure = "::((<___>))::".parse().unwrap();
        let mut structure = original.clone();
        insert_unpaired(&mut structure, 1, &mut RnaRng::new(9));
        assert_eq!(structure.hairpin_runs().len(), 1);
        assert_eq!(structure.hairpin_runs()[0].len(), 3);
        assert!(structure.to_string().starts_with("::(("));
        assert!(structure.to_string().ends_with("))::"));
    }

    #[test]
    fn no_stems_means_no_insertion() {
        let mut structure: Structure = "::((___))::".parse().unwrap();
        assert_eq!(insert_unpaired(&mut structure, 2, &mut RnaRng::new(1)), 0);
        assert_eq!(structure.len(), 11);
    }

    #[test]
    fn zero_count_draws_nothing() {
        let mut structure: Structure = "<___>".parse().unwrap();
        let mut rng = RnaRng::new(4);
        let before = rng.clone();
        insert_unpaired(&mut structure, 0, &mut rng);
        assert_eq!(rng, before);
    }
}

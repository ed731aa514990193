// Property sweeps over many seeds for generated structures and their
// distance annotation.
//
// Each test drives the public API only: `StructureGenerator`, the
// `generate`/`compute_distances` pair, and the `Structure` queries. Seeds are
// fixed so failures name a reproducible case.

use rnasonify_prng::RnaRng;
use rnasonify_structure::{
    GeneratedStructure, GeneratorConfig, Structure, StructureGenerator, Symbol, compute_distances,
    generate,
};
use rstest::rstest;

const SEEDS: u64 = 150;

fn quiet() -> GeneratorConfig {
    GeneratorConfig {
        unpaired_insertion_probability: 0.0,
        pseudoknot_probability: 0.0,
        ..GeneratorConfig::default()
    }
}

fn knotted() -> GeneratorConfig {
    GeneratorConfig {
        unpaired_insertion_probability: 0.0,
        pseudoknot_probability: 1.0,
        ..GeneratorConfig::default()
    }
}

fn run(config: GeneratorConfig, len: usize, loops: usize, seed: u64) -> GeneratedStructure {
    StructureGenerator::new(config)
        .generate(len, loops, &mut RnaRng::new(seed))
        .unwrap_or_else(|e| panic!("seed {seed}: {e}"))
}

/// Stem pairs of one branch are mirrored around its single loop.
fn assert_branch_well_formed(branch: &[Symbol], context: &str) {
    let text: String = branch.iter().map(|s| s.as_char()).collect();
    let structure: Structure = text.parse().unwrap();
    let loops = structure.hairpin_runs();
    assert_eq!(loops.len(), 1, "{context}: one loop per branch in {text}");
    let hairpin = loops[0];
    assert!(hairpin.len() >= 3, "{context}: short loop in {text}");

    for i in 0..hairpin.start {
        let mirror = hairpin.end + (hairpin.start - i - 1);
        match branch[i] {
            Symbol::StemOpen => {
                assert_eq!(
                    branch.get(mirror),
                    Some(&Symbol::StemClose),
                    "{context}: {text}"
                );
            }
            Symbol::Interior => {
                assert_eq!(
                    branch.get(mirror),
                    Some(&Symbol::Interior),
                    "{context}: {text}"
                );
            }
            Symbol::Unpaired => {}
            other => panic!("{context}: {other:?} before the loop in {text}"),
        }
    }
    assert_eq!(
        branch[hairpin.start - 1],
        Symbol::StemOpen,
        "{context}: {text}"
    );
    assert_eq!(branch[hairpin.end], Symbol::StemClose, "{context}: {text}");
}

#[rstest]
#[case(1, 100)]
#[case(2, 100)]
#[case(3, 100)]
#[case(2, 160)]
#[case(3, 200)]
fn brackets_balance_and_length_is_exact(#[case] loops: usize, #[case] nucleotides: usize) {
    let generator = StructureGenerator::default();
    for seed in 0..SEEDS {
        let result = generator
            .generate(nucleotides, loops, &mut RnaRng::new(seed))
            .unwrap();
        let s = &result.structure;
        assert_eq!(s.len(), nucleotides, "seed {seed}");
        assert_eq!(
            s.count(Symbol::HelixOpen),
            s.count(Symbol::HelixClose),
            "seed {seed}: {s}"
        );
        assert_eq!(
            s.count(Symbol::StemOpen),
            s.count(Symbol::StemClose),
            "seed {seed}: {s}"
        );
        assert_eq!(s.count(Symbol::Interior) % 2, 0, "seed {seed}: {s}");
        assert_eq!(
            s.count(Symbol::KnotOpen),
            s.count(Symbol::KnotClose),
            "seed {seed}: {s}"
        );
        assert!(s.count(Symbol::HelixOpen) >= 1, "seed {seed}: {s}");
        assert_eq!(s.loop_regions().len(), loops, "seed {seed}: {s}");
        for region in s.loop_regions() {
            assert!(region.len() >= 3, "seed {seed}: {s}");
        }
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn branches_are_mirrored_and_confined(#[case] loops: usize) {
    for seed in 0..SEEDS {
        let result = run(quiet(), 150, loops, seed);
        let symbols = result.structure.symbols();
        assert_eq!(result.branches.len(), loops);
        for (b, branch) in result.branches.iter().enumerate() {
            let context = format!("seed {seed} branch {b}");
            assert_branch_well_formed(&symbols[branch.range()], &context);
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbol.is_branch_only() {
                assert!(
                    result.branches.iter().any(|b| b.contains(i)),
                    "seed {seed}: {symbol:?} at {i} outside every branch"
                );
            }
        }
    }
}

#[rstest]
#[case(2, 120)]
#[case(3, 150)]
fn pseudoknot_runs_sit_inside_distinct_loops(#[case] loops: usize, #[case] nucleotides: usize) {
    for seed in 0..SEEDS {
        let result = run(knotted(), nucleotides, loops, seed);
        let s = &result.structure;
        let placement = result.pseudoknot.expect("pseudoknot forced on");

        let opens = s.runs_where(|x| x == Symbol::KnotOpen);
        let closes = s.runs_where(|x| x == Symbol::KnotClose);
        assert_eq!(opens, vec![placement.open], "seed {seed}: {s}");
        assert_eq!(closes, vec![placement.close], "seed {seed}: {s}");
        assert_eq!(placement.open.len(), placement.close.len());

        let regions = s.loop_regions();
        let region_of = |at: usize| regions.iter().position(|r| r.contains(at));
        let open_region = region_of(placement.open.start);
        let close_region = region_of(placement.close.start);
        assert_eq!(open_region, Some(0), "seed {seed}: {s}");
        assert_eq!(close_region, Some(1), "seed {seed}: {s}");
        // The last loop position of each region is never a marker.
        assert!(placement.open.end < regions[0].end);
        assert!(placement.close.end < regions[1].end);
    }
}

#[test]
fn scenario_hundred_nucleotides_one_loop() {
    for seed in 0..SEEDS {
        let (text, loop_count) = generate(100, 1, &mut RnaRng::new(seed)).unwrap();
        assert_eq!(loop_count, 1);
        assert_eq!(text.len(), 100);
        assert!(
            text.starts_with(':') && text.ends_with(':'),
            "seed {seed}: {text}"
        );
        assert!(text.contains('(') && text.contains(')'));

        let structure: Structure = text.parse().unwrap();
        assert_eq!(structure.hairpin_runs().len(), 1, "seed {seed}: {text}");
        // Ignoring inserted unpaired positions, the branch is one contiguous run.
        let compact: Structure = text.replace(',', "").parse().unwrap();
        let branch_runs = compact.runs_where(Symbol::is_branch_only);
        assert_eq!(
            branch_runs.len(),
            1,
            "seed {seed}: one contiguous branch in {text}"
        );

        let distances = compute_distances(&text).unwrap();
        assert_eq!(distances.len(), 100);
        assert!(distances.iter().all(|&d| d <= 127));
        assert_eq!(distances.iter().copied().max(), Some(127));

        // The outermost positions are the farthest from their centers.
        let first_stem = text.find('<').unwrap();
        let last_helix = text.rfind(')').unwrap();
        let first_close = text.find(')').unwrap();
        let (first, last) = (distances[0], distances[99]);
        assert!(distances[..first_stem].iter().all(|&d| d <= first));
        assert!(distances[first_close..].iter().all(|&d| d <= last));
        assert!(first > 0 && last > 0, "seed {seed}: {distances:?}");
        assert!(last_helix < 99);
    }
}

#[test]
fn scenario_three_loops_with_pseudoknot() {
    for seed in 0..SEEDS {
        let result = run(knotted(), 150, 3, seed);
        let s = &result.structure;
        assert_eq!(s.len(), 150);
        assert_eq!(s.loop_regions().len(), 3, "seed {seed}: {s}");
        let placement = result.pseudoknot.unwrap();
        assert!(placement.open.end <= placement.close.start);
        for (b, branch) in result.branches.iter().enumerate() {
            let slice: Vec<Symbol> = s.symbols()[branch.range()]
                .iter()
                .map(|&x| match x {
                    Symbol::KnotOpen | Symbol::KnotClose => Symbol::Hairpin,
                    other => other,
                })
                .collect();
            assert_branch_well_formed(&slice, &format!("seed {seed} branch {b}"));
        }
    }
}

#[test]
fn distances_are_bounded_and_peak_at_127() {
    let generator = StructureGenerator::default();
    for seed in 0..SEEDS {
        let loops = 1 + (seed as usize % 3);
        let mut rng = RnaRng::new(seed);
        let result = generator.generate(130, loops, &mut rng).unwrap();
        let text = result.structure.to_string();
        let distances = compute_distances(&text).unwrap();
        assert_eq!(distances.len(), text.len());
        assert_eq!(distances, result.distances());
        assert_eq!(distances.iter().copied().max(), Some(127), "seed {seed}");
        // Pure function of its input.
        assert_eq!(distances, compute_distances(&text).unwrap());
    }
}

#[test]
fn same_seed_reproduces_exactly() {
    let generator = StructureGenerator::default();
    for seed in 0..SEEDS {
        let a = generator.generate(170, 3, &mut RnaRng::new(seed)).unwrap();
        let b = generator.generate(170, 3, &mut RnaRng::new(seed)).unwrap();
        assert_eq!(a, b);
    }
    let a = generate(170, 2, &mut RnaRng::new(1)).unwrap();
    let b = generate(170, 2, &mut RnaRng::new(2)).unwrap();
    assert_ne!(a.0, b.0);
}

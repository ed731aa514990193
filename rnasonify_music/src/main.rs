// RNA structure sonifier: CLI entry point.
//
// Generates a random RNA secondary structure, annotates it with branch
// distances, maps it to a melody plus a pseudoknot voice and writes a MIDI
// file. The pipeline: config → seed → generate → distances → sonify → MIDI.
//
// Usage:
//   cargo run -p rnasonify_music -- [output.mid] [--nucleotides N] [--loops N]
//     [--seed N] [--scale NAME] [--key PC] [--tempo BPM] [--config FILE] [-v...]
//
// Scales: chromatic, major, minor, minor-pentatonic, major-pentatonic,
// whole-tone, hirajoshi

use std::path::PathBuf;

use clap::Parser;
use rnasonify_music::config::AppConfig;
use rnasonify_music::error::SonifyError;
use rnasonify_music::midi::write_midi;
use rnasonify_music::performer::sonify;
use rnasonify_music::scale::pitch_name;
use rnasonify_prng::RnaRng;
use rnasonify_structure::{MAX_LOOPS, StructureGenerator, compute_distances, minimum_nucleotides};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const RANDOM_NUCLEOTIDES: (usize, usize) = (100, 200);

#[derive(Parser, Debug)]
#[command(
    name = "rnasonify",
    version,
    about = "Sonify a random RNA secondary structure as MIDI"
)]
struct Cli {
    /// Output MIDI file
    #[arg(default_value = "rna_structure.mid")]
    output: PathBuf,

    /// Structure length; random in 100..=200 when omitted
    #[arg(short, long)]
    nucleotides: Option<usize>,

    /// Number of hairpin loops; random in 1..=3 when omitted
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    loops: Option<u8>,

    /// RNG seed; drawn from the clock when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scale name, e.g. "minor" or "whole-tone"
    #[arg(long)]
    scale: Option<String>,

    /// Key as a pitch class (0 = C)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..12))]
    key: Option<u8>,

    /// Tempo in beats per minute (at least 4)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(4..))]
    tempo: Option<u16>,

    /// JSON config with optional "structure" and "sonify" sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // RUST_LOG wins over -v when set.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn run(cli: &Cli) -> Result<(), SonifyError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(name) = &cli.scale {
        config.sonify.scale = name.parse()?;
        config.sonify.custom_intervals = None;
    }
    if let Some(key) = cli.key {
        config.sonify.key = key;
    }
    if let Some(tempo) = cli.tempo {
        config.sonify.tempo_bpm = tempo;
    }

    let (mut rng, seed) = match cli.seed {
        Some(seed) => (RnaRng::new(seed), seed),
        None => RnaRng::from_entropy(),
    };

    let loops = match cli.loops {
        Some(loops) => usize::from(loops),
        None => rng.range_usize_inclusive(1, MAX_LOOPS),
    };
    let requested = match cli.nucleotides {
        Some(n) => n,
        None => rng.range_usize_inclusive(RANDOM_NUCLEOTIDES.0, RANDOM_NUCLEOTIDES.1),
    };
    let minimum = minimum_nucleotides(loops, &config.structure);
    let nucleotides = if requested < minimum {
        warn!(
            requested,
            minimum,
            loops,
            "structure too short, using the minimum"
        );
        minimum
    } else {
        requested
    };

    println!("=== RNA Structure Sonifier ===");
    println!("Output: {}", cli.output.display());
    println!(
        "Scale: {} {}",
        pitch_name(config.sonify.key),
        config.sonify.scale
    );
    println!("Tempo: {} BPM", config.sonify.tempo_bpm);
    println!("Seed: {}", seed);
    println!();

    let generator = StructureGenerator::new(config.structure.clone());
    let generated = generator.generate(nucleotides, loops, &mut rng)?;
    let text = generated.structure.to_string();
    let distances = compute_distances(&text)?;

    println!("Structure: {}", text);
    println!("Loops: {}", generated.loop_count);
    println!("Length: {}", generated.len());
    if generated.unpaired_inserted > 0 {
        println!(
            "Extra unpaired nucleotides: {}",
            generated.unpaired_inserted
        );
    }
    if let Some(knot) = generated.pseudoknot {
        println!(
            "Pseudoknot: {} positions at {} and {}",
            knot.open.len(),
            knot.open.start,
            knot.close.start
        );
    }

    let performance = sonify(&text, &distances, &config.sonify, &mut rng)?;
    info!(notes = %performance.notation.join(" "), "melody");

    write_midi(&performance, &cli.output)?;
    println!();
    println!("Wrote {}", cli.output.display());
    Ok(())
}

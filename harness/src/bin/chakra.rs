//! `chakra`: search a toroidal grid for phonetically valid Hamiltonian cycles.
//!
//! Runs until interrupted or until `--max-accepted` / `--max-attempts` is
//! reached. Logging is controlled by `CHAKRA_LOG` (default `info`) and
//! `CHAKRA_LOG_STYLE`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::Rng;

use chakra_harness::config::{RunConfig, StartSelectionV1, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX};
use chakra_harness::output::SolutionWriter;
use chakra_harness::runner::{Orchestrator, StopSignal};
use chakra_harness::symbols::SymbolTable;
use chakra_kernel::grid::label::{LabelScheme, DEFAULT_CONSONANT_MAX, DEFAULT_VOWEL_MAX};
use chakra_kernel::grid::matrix::GridMatrix;
use chakra_kernel::grid::topology::Topology;
use chakra_search::policy::{DedupKeyV1, TieBreakV1, DEFAULT_MAX_BACKTRACKS};
use chakra_search::verify::{DEFAULT_MAX_CONSONANT_RUN, DEFAULT_MAX_VOWEL_RUN};

#[derive(Parser)]
#[command(name = "chakra")]
#[command(about = "Hamiltonian cycle discovery on a toroidal symbol grid", long_about = None)]
#[command(version)]
struct Cli {
    /// File with the grid values (square count, separated by whitespace or commas)
    input: PathBuf,

    /// Directory for solution files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Solution file name prefix
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Longest allowed run of vowels
    #[arg(long, default_value_t = DEFAULT_MAX_VOWEL_RUN)]
    max_vowels: u32,

    /// Longest allowed run of consonants
    #[arg(long, default_value_t = DEFAULT_MAX_CONSONANT_RUN)]
    max_consonants: u32,

    /// Largest cell value labelled a vowel
    #[arg(long, default_value_t = DEFAULT_VOWEL_MAX)]
    vowel_max_value: u32,

    /// Largest cell value labelled a consonant
    #[arg(long, default_value_t = DEFAULT_CONSONANT_MAX)]
    consonant_max_value: u32,

    /// Ordering among equally constrained candidates
    #[arg(long, value_enum, default_value = "seeded")]
    tie_break: TieBreakArg,

    /// Base seed for seeded tie-breaking (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed start cell as ROW,COL (rotates through all cells if omitted)
    #[arg(long, value_parser = parse_start)]
    start: Option<StartArg>,

    /// Which traversals count as the same cycle
    #[arg(long, value_enum, default_value = "literal")]
    dedup: DedupArg,

    /// Backtrack budget per attempt
    #[arg(long, default_value_t = DEFAULT_MAX_BACKTRACKS)]
    max_backtracks: u64,

    /// Stop after this many accepted cycles
    #[arg(long)]
    max_accepted: Option<u64>,

    /// Stop after this many attempts
    #[arg(long)]
    max_attempts: Option<u64>,

    /// JSON symbol table for the first rendering (default Devanagari)
    #[arg(long)]
    script_a: Option<PathBuf>,

    /// JSON symbol table for the second rendering (default Kannada)
    #[arg(long)]
    script_b: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    RowMajor,
    Seeded,
}

#[derive(Clone, Copy, ValueEnum)]
enum DedupArg {
    Literal,
    Cyclic,
}

#[derive(Clone, Copy, Debug)]
struct StartArg {
    row: u32,
    col: u32,
}

fn parse_start(s: &str) -> Result<StartArg, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| format!("bad coordinate {part:?}: {e}"))
    };
    Ok(StartArg {
        row: parse(row)?,
        col: parse(col)?,
    })
}

fn load_table(path: Option<&Path>, builtin: fn() -> SymbolTable) -> Result<SymbolTable> {
    match path {
        Some(path) => SymbolTable::load(path)
            .with_context(|| format!("loading symbol table {}", path.display())),
        None => Ok(builtin()),
    }
}

fn main() -> Result<()> {
    let env = env_logger::Env::new()
        .filter_or("CHAKRA_LOG", "info")
        .write_style("CHAKRA_LOG_STYLE");
    env_logger::init_from_env(env);

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let matrix = GridMatrix::parse_square(&text)
        .with_context(|| format!("parsing grid from {}", cli.input.display()))?;
    let labels = LabelScheme::new(cli.vowel_max_value, cli.consonant_max_value);
    let topology = Topology::build(&matrix, &labels).context("building topology")?;

    let script_a = load_table(cli.script_a.as_deref(), SymbolTable::devanagari)?;
    let script_b = load_table(cli.script_b.as_deref(), SymbolTable::kannada)?;
    script_a
        .check_covers(&topology)
        .with_context(|| format!("{} table does not cover the grid", script_a.script()))?;
    script_b
        .check_covers(&topology)
        .with_context(|| format!("{} table does not cover the grid", script_b.script()))?;

    let tie_break = match cli.tie_break {
        TieBreakArg::RowMajor => TieBreakV1::RowMajor,
        TieBreakArg::Seeded => {
            let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
            log::info!("base seed {seed}");
            TieBreakV1::Seeded { seed }
        }
    };

    let config = RunConfig {
        output_dir: cli.output_dir,
        prefix: cli.prefix,
        max_vowel_run: cli.max_vowels,
        max_consonant_run: cli.max_consonants,
        labels,
        tie_break,
        start: cli.start.map_or(StartSelectionV1::RoundRobin, |s| {
            StartSelectionV1::Fixed {
                row: s.row,
                col: s.col,
            }
        }),
        dedup_key: match cli.dedup {
            DedupArg::Literal => DedupKeyV1::LiteralSequence,
            DedupArg::Cyclic => DedupKeyV1::CyclicCanonical,
        },
        max_backtracks: cli.max_backtracks,
        max_accepted: cli.max_accepted,
        max_attempts: cli.max_attempts,
    };

    log::info!(
        "searching {}x{} grid {}",
        topology.rows(),
        topology.cols(),
        topology.identity_hash().short_hex(12)
    );

    let sink = SolutionWriter::new(&config.output_dir, config.prefix.as_str(), script_a, script_b);
    let mut orchestrator = Orchestrator::new(topology, &config, Box::new(sink), StopSignal::new())
        .context("invalid run configuration")?;
    let stats = orchestrator.run();
    log::info!("{stats}");
    Ok(())
}

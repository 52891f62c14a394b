use crate::{
    aligners::Seq,
    config::ScoringConfig,
    error::{AlignError, SeqId},
    generate::{generate_pair, GenerateArgs},
    runner::Mode,
    scoring::Score,
    sequence::parse_dna,
};
use anyhow::{bail, Context};
use bio::io::fasta;
use clap::{value_parser, Parser};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::ControlFlow,
    path::{Path, PathBuf},
    time::Duration,
};

/// Pairs aligned by `--demo`.
pub const DEMO_PAIRS: [(&str, &str); 4] = [
    ("TACGATGA", "TCCGATA"),
    ("TCCGATA", "ACGACGA"),
    ("TTATT", "TT"),
    ("ATGTGACGA", "ATACGA"),
];

#[derive(Parser, Serialize, Deserialize)]
#[clap(author, about)]
pub struct Cli {
    #[clap(flatten)]
    pub input: Input,

    /// Which gap model(s) to align with.
    #[arg(short, long, value_enum, default_value_t)]
    pub mode: Mode,

    #[clap(flatten)]
    pub scoring: ScoringArgs,

    /// Print the score lattices. The affine model prints its D, R and C layers.
    #[arg(long)]
    pub print_matrices: bool,

    /// Stop enumerating alignments of a pair after this many.
    #[arg(long)]
    pub max_alignments: Option<usize>,

    /// Stop enumerating alignments of a pair after this timeout.
    #[arg(long, value_parser = parse_duration::parse)]
    pub timeout: Option<Duration>,

    /// Write all results as JSON to this file instead of printing alignments.
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    pub output: Option<PathBuf>,

    /// Print less. Only print the score and number of alignments per pair.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub silent: u8,
}

#[derive(Parser, Serialize, Deserialize, Default)]
#[clap(next_help_heading = "Scoring")]
pub struct ScoringArgs {
    /// JSON file with `match_score`, `mismatch_score`, `matrix`, `gap_open` and `gap_extend`.
    #[arg(long, value_parser = value_parser!(PathBuf))]
    pub scoring: Option<PathBuf>,

    /// Score of aligning two equal symbols [default: 3]
    #[arg(long, allow_hyphen_values = true)]
    pub match_score: Option<Score>,

    /// Score of aligning two different symbols [default: -1]
    #[arg(long, allow_hyphen_values = true)]
    pub mismatch_score: Option<Score>,

    /// Gap score of the simple model, and the affine gap-open score [default: -2]
    #[arg(long, allow_hyphen_values = true)]
    pub gap_open: Option<Score>,

    /// Affine score per gap position [default: -1]
    #[arg(long, allow_hyphen_values = true)]
    pub gap_extend: Option<Score>,
}

impl ScoringArgs {
    /// The configuration file, or the defaults, with flags applied on top.
    pub fn to_config(&self) -> Result<ScoringConfig, AlignError> {
        let mut config = match &self.scoring {
            Some(path) => ScoringConfig::from_file(path)?,
            None => ScoringConfig::default(),
        };
        if self.match_score.is_some() || self.mismatch_score.is_some() {
            config.matrix = None;
        }
        config.match_score = self.match_score.unwrap_or(config.match_score);
        config.mismatch_score = self.mismatch_score.unwrap_or(config.mismatch_score);
        config.gap_open = self.gap_open.unwrap_or(config.gap_open);
        config.gap_extend = self.gap_extend.unwrap_or(config.gap_extend);
        Ok(config)
    }
}

#[derive(Parser, Serialize, Deserialize)]
#[clap(next_help_heading = "Input")]
pub struct Input {
    /// First sequence to align.
    #[arg(requires = "seq2")]
    pub seq1: Option<String>,

    /// Second sequence to align.
    pub seq2: Option<String>,

    /// The .seq, .txt, or Fasta file with sequence pairs to align.
    #[clap(short, long, value_parser = value_parser!(PathBuf), conflicts_with = "seq1", display_order = 1)]
    pub input: Option<PathBuf>,

    /// Align a few built-in example pairs.
    #[arg(long, conflicts_with_all = ["seq1", "input"])]
    pub demo: bool,

    /// Options to generate input pairs.
    #[clap(flatten)]
    pub generate: GenerateArgs,
}

/// Validates both sequences and passes them on.
fn run_dna(
    a: &[u8],
    b: &[u8],
    run_pair: &mut impl FnMut(Seq, Seq) -> anyhow::Result<ControlFlow<()>>,
) -> anyhow::Result<ControlFlow<()>> {
    let a = parse_dna(a, SeqId::First)?;
    let b = parse_dna(b, SeqId::Second)?;
    run_pair(&a, &b)
}

fn files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = input
        .read_dir()
        .with_context(|| format!("reading {}", input.display()))?
        .map(|x| x.map(|x| x.path()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

impl Input {
    /// Call the given function for each pair in the input.
    ///
    /// Sequences are uppercased and checked to be DNA before `run_pair` sees them.
    pub fn process_input_pairs(
        &self,
        mut run_pair: impl FnMut(Seq, Seq) -> anyhow::Result<ControlFlow<()>>,
    ) -> anyhow::Result<()> {
        if let (Some(a), Some(b)) = (&self.seq1, &self.seq2) {
            run_dna(a.as_bytes(), b.as_bytes(), &mut run_pair)?;
            return Ok(());
        }

        if self.demo {
            for (a, b) in DEMO_PAIRS {
                if run_dna(a.as_bytes(), b.as_bytes(), &mut run_pair)?.is_break() {
                    break;
                }
            }
            return Ok(());
        }

        if let Some(input) = &self.input {
            'outer: for f in files(input)? {
                let ext = f.extension().and_then(|e| e.to_str()).unwrap_or_default();
                match ext {
                    "seq" | "txt" => {
                        let reader = BufReader::new(
                            File::open(&f).with_context(|| format!("opening {}", f.display()))?,
                        );
                        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
                        for (a, b) in lines.iter().map(|l| l.trim_end()).tuples() {
                            let (a, b) = if ext == "seq" {
                                match (a.strip_prefix('>'), b.strip_prefix('<')) {
                                    (Some(a), Some(b)) => (a, b),
                                    _ => bail!("{}: .seq pairs must start with '>' and '<'", f.display()),
                                }
                            } else {
                                (a, b)
                            };
                            if run_dna(a.as_bytes(), b.as_bytes(), &mut run_pair)?.is_break() {
                                break 'outer;
                            }
                        }
                    }
                    "fna" | "fa" | "fasta" => {
                        let reader = fasta::Reader::new(BufReader::new(
                            File::open(&f).with_context(|| format!("opening {}", f.display()))?,
                        ));
                        for (a, b) in reader.records().tuples() {
                            if run_dna(a?.seq(), b?.seq(), &mut run_pair)?.is_break() {
                                break 'outer;
                            }
                        }
                    }
                    ext => bail!(
                        "Unknown file extension {ext:?} of {}. Must be in {{seq,txt,fna,fa,fasta}}.",
                        f.display()
                    ),
                }
            }
            return Ok(());
        }

        let Some(opt) = self.generate.to_generate_options() else {
            bail!("Nothing to align. Pass two sequences, --input, --demo, or --length to generate pairs.");
        };
        // Generate random input.
        let seed = self.generate.seed.unwrap_or_else(|| {
            let seed = ChaCha8Rng::from_entropy().gen_range(0..u64::MAX);
            eprintln!("Seed: {seed}");
            seed
        });
        let rng = &mut ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..self.generate.cnt {
            let (a, b) = generate_pair(&opt, rng);
            if run_pair(&a, &b)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}

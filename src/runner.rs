//! Aligning one pair end to end: build the lattice, enumerate within limits, collect a result.

use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::{
    aligners::{
        nw::SimpleLattice,
        nw_affine::{layer_name, AffineLattice, LAYERS},
        Lattice, Seq,
    },
    alignment::Alignment,
    config::ScoringConfig,
    error::AlignError,
    scoring::{AffineCost, LinearCost, Score},
    to_string,
};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Flat gap score.
    Simple,
    /// Gap open and extend scores.
    Affine,
    /// Run both models on every pair.
    #[default]
    Both,
}

impl Mode {
    pub fn models(&self) -> &'static [Model] {
        match self {
            Mode::Simple => &[Model::Simple],
            Mode::Affine => &[Model::Affine],
            Mode::Both => &[Model::Simple, Model::Affine],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Simple,
    Affine,
}

/// Bounds on the enumeration, which is otherwise unbounded for highly tied inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Limits {
    pub max_alignments: Option<usize>,
    pub timeout: Option<Duration>,
}

impl Limits {
    /// Collects alignments until the iterator ends or a limit is hit.
    /// Returns whether alignments were left behind.
    pub fn collect(&self, alignments: impl Iterator<Item = Alignment>) -> (Vec<Alignment>, bool) {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut alignments = alignments.peekable();
        let mut out = vec![];
        while alignments.peek().is_some() {
            if self.max_alignments.is_some_and(|m| out.len() >= m)
                || deadline.is_some_and(|d| Instant::now() >= d)
            {
                return (out, true);
            }
            out.extend(alignments.next());
        }
        (out, false)
    }
}

/// A titled score grid.
#[derive(Clone, Debug, Serialize)]
pub struct Matrix {
    pub title: String,
    pub rows: Vec<Vec<Option<Score>>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PairResult {
    pub seq1: String,
    pub seq2: String,
    pub model: Model,
    pub score: Option<Score>,
    pub alignments: Vec<Alignment>,
    /// True when `alignments` was cut short by `Limits`.
    pub truncated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matrices: Vec<Matrix>,
    pub elapsed: Duration,
}

pub struct Runner {
    pub linear: LinearCost,
    pub affine: AffineCost,
    pub limits: Limits,
    /// Keep the score grids in the result.
    pub matrices: bool,
}

impl Runner {
    pub fn new(config: &ScoringConfig, limits: Limits, matrices: bool) -> Result<Self, AlignError> {
        Ok(Runner {
            linear: config.linear()?,
            affine: config.affine()?,
            limits,
            matrices,
        })
    }

    pub fn run(&self, a: Seq, b: Seq, model: Model) -> Result<PairResult, AlignError> {
        let start = Instant::now();
        let result = match model {
            Model::Simple => {
                let lattice = SimpleLattice::build(a, b, &self.linear)?;
                let matrices = if self.matrices {
                    vec![Matrix {
                        title: "Simple".into(),
                        rows: lattice.score_matrix(),
                    }]
                } else {
                    vec![]
                };
                self.finish(a, b, model, &lattice, matrices, start)
            }
            Model::Affine => {
                let lattice = AffineLattice::build(a, b, &self.affine)?;
                let matrices = if self.matrices {
                    LAYERS
                        .iter()
                        .map(|&l| Matrix {
                            title: layer_name(l).into(),
                            rows: lattice.layer_matrix(l),
                        })
                        .collect()
                } else {
                    vec![]
                };
                self.finish(a, b, model, &lattice, matrices, start)
            }
        };
        info!(
            "{:?} {}x{}: score {:?}, {} alignment(s) in {:.3?}",
            model,
            a.len(),
            b.len(),
            result.score,
            result.alignments.len(),
            result.elapsed
        );
        Ok(result)
    }

    fn finish(
        &self,
        a: Seq,
        b: Seq,
        model: Model,
        lattice: &impl Lattice,
        matrices: Vec<Matrix>,
        start: Instant,
    ) -> PairResult {
        let (alignments, truncated) = self.limits.collect(lattice.alignments());
        if truncated {
            warn!(
                "{model:?}: stopped after {} alignment(s); more optimal alignments exist",
                alignments.len()
            );
        }
        PairResult {
            seq1: to_string(a),
            seq2: to_string(b),
            model,
            score: lattice.score(),
            alignments,
            truncated,
            matrices,
            elapsed: start.elapsed(),
        }
    }
}

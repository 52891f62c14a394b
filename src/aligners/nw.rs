//! Needleman-Wunsch with a flat gap score, keeping all tied-optimal parents.

use log::debug;
use smallvec::{smallvec, SmallVec};
use std::time::Instant;

use super::{
    edit_graph::{Cell, CellId, Edit},
    Aligner, Lattice, Seq,
};
use crate::{
    error::{AlignError, SeqId},
    scoring::{LinearCost, Score, ScoringModel},
};

/// Needleman-Wunsch aligner, generic over the cost model.
#[derive(Clone, Debug, Default)]
pub struct NW<CostModel> {
    pub cm: CostModel,
}

impl<CostModel> NW<CostModel> {
    pub fn new(cm: CostModel) -> Self {
        Self { cm }
    }
}

/// The `(|a|+1) x (|b|+1)` grid of the linear-gap model, stored row-major.
pub struct SimpleLattice<'a> {
    pub a: Seq<'a>,
    pub b: Seq<'a>,
    cells: Vec<Cell>,
}

impl<'a> SimpleLattice<'a> {
    pub fn build(a: Seq<'a>, b: Seq<'a>, cm: &LinearCost) -> Result<Self, AlignError> {
        let start = Instant::now();
        cm.validate()?;
        let ea = cm.sub.encode(a, SeqId::First)?;
        let eb = cm.sub.encode(b, SeqId::Second)?;

        let cols = b.len() + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        let mut cells = Vec::with_capacity((a.len() + 1) * cols);
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                if i == 0 && j == 0 {
                    cells.push(Cell::origin());
                    continue;
                }
                // Row 0 and column 0 only have the gap edge.
                let mut candidates: SmallVec<[(CellId, Score, Edit); 3]> = SmallVec::new();
                if i > 0 && j > 0 {
                    candidates.push((
                        idx(i - 1, j - 1),
                        cm.sub.score_idx(ea[i - 1], eb[j - 1]),
                        Edit::Sub(a[i - 1], b[j - 1]),
                    ));
                }
                if j > 0 {
                    candidates.push((idx(i, j - 1), cm.gap, Edit::Ins(b[j - 1])));
                }
                if i > 0 {
                    candidates.push((idx(i - 1, j), cm.gap, Edit::Del(a[i - 1])));
                }
                let cell = Cell::from_candidates(&cells, candidates);
                cells.push(cell);
            }
        }

        let lattice = SimpleLattice { a, b, cells };
        debug!(
            "simple lattice {}x{}: score {:?} in {:.3?}",
            lattice.rows(),
            lattice.cols(),
            lattice.score(),
            start.elapsed()
        );
        Ok(lattice)
    }

    pub fn rows(&self) -> usize {
        self.a.len() + 1
    }

    pub fn cols(&self) -> usize {
        self.b.len() + 1
    }

    pub fn index(&self, i: usize, j: usize) -> CellId {
        i * self.cols() + j
    }

    pub fn cell(&self, i: usize, j: usize) -> &Cell {
        &self.cells[self.index(i, j)]
    }

    /// The scores, one row per prefix of `a`.
    pub fn score_matrix(&self) -> Vec<Vec<Option<Score>>> {
        self.cells
            .chunks(self.cols())
            .map(|row| row.iter().map(|c| c.score).collect())
            .collect()
    }
}

impl Lattice for SimpleLattice<'_> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn terminals(&self) -> SmallVec<[CellId; 3]> {
        smallvec![self.cells.len() - 1]
    }
}

impl Aligner for NW<LinearCost> {
    type CostModel = LinearCost;
    type Lattice<'a> = SimpleLattice<'a>;

    fn cost_model(&self) -> &LinearCost {
        &self.cm
    }

    fn build<'a>(&self, a: Seq<'a>, b: Seq<'a>) -> Result<SimpleLattice<'a>, AlignError> {
        SimpleLattice::build(a, b, &self.cm)
    }
}

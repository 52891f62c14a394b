//! Needleman-Wunsch with affine gap scores (Gotoh), keeping all tied-optimal parents.
//!
//! The three layers live in one arena indexed by `(layer, i, j)`:
//! - the main layer (`D`) ends in a match or mismatch of `a[i]` and `b[j]`,
//! - the insert layer (`R`) ends in a gap in `a` consuming `b[j]`,
//! - the delete layer (`C`) ends in a gap in `b` consuming `a[i]`.
//!
//! Entering a gap layer costs `open + extend`, staying in it costs `extend`.
//! Boundary states that cannot be reached have score `None` rather than a
//! large negative constant, so no transition out of them is ever recorded.

use log::debug;
use smallvec::SmallVec;
use std::time::Instant;

use super::{
    edit_graph::{Cell, CellId, Edit},
    nw::NW,
    Aligner, Lattice, Seq,
};
use crate::{
    error::{AlignError, SeqId},
    scoring::{AffineCost, Score, ScoringModel},
};

/// An affine layer can either correspond to an insertion or deletion.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AffineLayerType {
    InsertLayer,
    DeleteLayer,
}

pub use AffineLayerType::*;

/// `None` is the main layer.
pub type Layer = Option<AffineLayerType>;

/// All layers, in the order their parents are listed and terminals are reported.
pub const LAYERS: [Layer; 3] = [None, Some(InsertLayer), Some(DeleteLayer)];

pub fn layer_name(layer: Layer) -> &'static str {
    match layer {
        None => "D",
        Some(InsertLayer) => "R",
        Some(DeleteLayer) => "C",
    }
}

fn layer_index(layer: Layer) -> usize {
    match layer {
        None => 0,
        Some(InsertLayer) => 1,
        Some(DeleteLayer) => 2,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct State {
    pub i: usize,
    pub j: usize,
    pub layer: Layer,
}

impl State {
    pub fn new(i: usize, j: usize, layer: Layer) -> Self {
        State { i, j, layer }
    }
}

/// Three `(|a|+1) x (|b|+1)` grids, one per layer.
pub struct AffineLattice<'a> {
    pub a: Seq<'a>,
    pub b: Seq<'a>,
    cells: Vec<Cell>,
}

impl<'a> AffineLattice<'a> {
    pub fn build(a: Seq<'a>, b: Seq<'a>, cm: &AffineCost) -> Result<Self, AlignError> {
        let start = Instant::now();
        cm.validate()?;
        let ea = cm.sub.encode(a, SeqId::First)?;
        let eb = cm.sub.encode(b, SeqId::Second)?;

        let mut lattice = AffineLattice {
            a,
            b,
            cells: vec![Cell::unreachable(); 3 * (a.len() + 1) * (b.len() + 1)],
        };
        let origin = lattice.index(State::new(0, 0, None));
        lattice.cells[origin] = Cell::origin();

        let open = cm.open_cost();
        let extend = cm.extend;
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                if i > 0 && j > 0 {
                    let edit = Edit::Sub(a[i - 1], b[j - 1]);
                    let s = cm.sub.score_idx(ea[i - 1], eb[j - 1]);
                    let candidates: SmallVec<[_; 3]> = LAYERS
                        .iter()
                        .map(|&l| (lattice.index(State::new(i - 1, j - 1, l)), s, edit))
                        .collect();
                    lattice.set(State::new(i, j, None), candidates);
                }
                if j > 0 {
                    let edit = Edit::Ins(b[j - 1]);
                    let candidates: SmallVec<[_; 3]> = LAYERS
                        .iter()
                        .map(|&l| {
                            let delta = if l == Some(InsertLayer) { extend } else { open };
                            (lattice.index(State::new(i, j - 1, l)), delta, edit)
                        })
                        .collect();
                    lattice.set(State::new(i, j, Some(InsertLayer)), candidates);
                }
                if i > 0 {
                    let edit = Edit::Del(a[i - 1]);
                    let candidates: SmallVec<[_; 3]> = LAYERS
                        .iter()
                        .map(|&l| {
                            let delta = if l == Some(DeleteLayer) { extend } else { open };
                            (lattice.index(State::new(i - 1, j, l)), delta, edit)
                        })
                        .collect();
                    lattice.set(State::new(i, j, Some(DeleteLayer)), candidates);
                }
            }
        }

        debug!(
            "affine lattice 3x{}x{}: score {:?} from {} terminal(s) in {:.3?}",
            lattice.rows(),
            lattice.cols(),
            lattice.score(),
            lattice.terminals().len(),
            start.elapsed()
        );
        Ok(lattice)
    }

    fn set(&mut self, st: State, candidates: SmallVec<[(CellId, Score, Edit); 3]>) {
        let cell = Cell::from_candidates(&self.cells, candidates);
        let id = self.index(st);
        self.cells[id] = cell;
    }

    pub fn rows(&self) -> usize {
        self.a.len() + 1
    }

    pub fn cols(&self) -> usize {
        self.b.len() + 1
    }

    pub fn index(&self, st: State) -> CellId {
        (layer_index(st.layer) * self.rows() + st.i) * self.cols() + st.j
    }

    pub fn cell(&self, st: State) -> &Cell {
        &self.cells[self.index(st)]
    }

    /// The scores of one layer, one row per prefix of `a`.
    pub fn layer_matrix(&self, layer: Layer) -> Vec<Vec<Option<Score>>> {
        let size = self.rows() * self.cols();
        let offset = layer_index(layer) * size;
        self.cells[offset..offset + size]
            .chunks(self.cols())
            .map(|row| row.iter().map(|c| c.score).collect())
            .collect()
    }
}

impl Lattice for AffineLattice<'_> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every layer whose `(|a|, |b|)` state attains the maximum, in `LAYERS` order.
    fn terminals(&self) -> SmallVec<[CellId; 3]> {
        let ends: SmallVec<[CellId; 3]> = LAYERS
            .iter()
            .map(|&l| self.index(State::new(self.a.len(), self.b.len(), l)))
            .collect();
        let best = ends.iter().map(|&id| self.cells[id].score).max().flatten();
        ends.into_iter()
            .filter(|&id| best.is_some() && self.cells[id].score == best)
            .collect()
    }
}

impl Aligner for NW<AffineCost> {
    type CostModel = AffineCost;
    type Lattice<'a> = AffineLattice<'a>;

    fn cost_model(&self) -> &AffineCost {
        &self.cm
    }

    fn build<'a>(&self, a: Seq<'a>, b: Seq<'a>) -> Result<AffineLattice<'a>, AlignError> {
        AffineLattice::build(a, b, &self.cm)
    }
}

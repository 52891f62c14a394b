//! The cells and edges shared by the simple and affine lattices.
//!
//! A lattice is an arena of `Cell`s. Every cell stores its optimal score and
//! *all* incoming edges that attain it, so the edges form a DAG whose paths
//! from the origin are exactly the optimal alignments.

use smallvec::SmallVec;

use super::cigar::CigarOp;
use crate::scoring::Score;

/// Index of a cell in its lattice's arena.
pub type CellId = usize;

/// The column emitted by following one edge.
///
/// Insertions consume a symbol of `b` only (gap in `a`), deletions a symbol of `a` only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edit {
    /// Match or mismatch of `a[i]` against `b[j]`.
    Sub(u8, u8),
    /// `'-'` against `b[j]`.
    Ins(u8),
    /// `a[i]` against `'-'`.
    Del(u8),
}

impl Edit {
    /// The symbol this column shows in the track of `a`, `b'-'` for a gap.
    pub fn top(&self) -> u8 {
        match *self {
            Edit::Sub(a, _) | Edit::Del(a) => a,
            Edit::Ins(_) => b'-',
        }
    }

    /// The symbol this column shows in the track of `b`, `b'-'` for a gap.
    pub fn bottom(&self) -> u8 {
        match *self {
            Edit::Sub(_, b) | Edit::Ins(b) => b,
            Edit::Del(_) => b'-',
        }
    }

    pub fn cigar_op(&self) -> CigarOp {
        match *self {
            Edit::Sub(a, b) if a == b => CigarOp::Match,
            Edit::Sub(..) => CigarOp::Mismatch,
            Edit::Ins(_) => CigarOp::Insertion,
            Edit::Del(_) => CigarOp::Deletion,
        }
    }
}

/// A recorded optimal transition into a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub parent: CellId,
    pub edit: Edit,
}

/// One lattice position.
///
/// `score == None` means the state is unreachable. Since `None < Some(_)`,
/// taking maxima over `Option<Score>` treats it as negative infinity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub score: Option<Score>,
    pub incoming: SmallVec<[Edge; 3]>,
}

impl Cell {
    pub fn origin() -> Self {
        Cell {
            score: Some(0),
            incoming: SmallVec::new(),
        }
    }

    pub fn unreachable() -> Self {
        Cell::default()
    }

    pub fn is_reachable(&self) -> bool {
        self.score.is_some()
    }

    /// Builds a cell from candidate transitions `(parent, score delta, edit)`.
    ///
    /// Unreachable parents are skipped. Every candidate attaining the maximum
    /// is kept, in the order given.
    pub fn from_candidates(
        cells: &[Cell],
        candidates: impl IntoIterator<Item = (CellId, Score, Edit)>,
    ) -> Self {
        let mut cell = Cell::unreachable();
        for (parent, delta, edit) in candidates {
            let Some(s) = cells[parent].score else {
                continue;
            };
            let s = Some(s + delta);
            if s > cell.score {
                cell.score = s;
                cell.incoming.clear();
            }
            if s == cell.score {
                cell.incoming.push(Edge { parent, edit });
            }
        }
        cell
    }
}

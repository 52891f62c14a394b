//! Needleman-Wunsch aligners that keep every co-optimal predecessor.

use smallvec::SmallVec;

use self::edit_graph::{Cell, CellId};
use crate::{
    alignment::Alignment,
    error::AlignError,
    scoring::{Score, ScoringModel},
    traceback::Alignments,
};

pub mod cigar;
pub mod edit_graph;
pub mod nw;
pub mod nw_affine;

#[cfg(test)]
mod tests;

/// An owned sequence.
pub type Sequence = Vec<u8>;
/// A sequence slice.
pub type Seq<'a> = &'a [u8];

/// A fully built score lattice.
pub trait Lattice {
    /// The arena of all cells. Edges only point to lower indices.
    fn cells(&self) -> &[Cell];

    /// The cells at `(|a|, |b|)` attaining the optimal score.
    fn terminals(&self) -> SmallVec<[CellId; 3]>;

    /// The optimal global alignment score, or `None` when no terminal state is reachable.
    fn score(&self) -> Option<Score> {
        let cells = self.cells();
        self.terminals()
            .iter()
            .map(|&t| cells[t].score)
            .max()
            .flatten()
    }

    /// Lazily enumerates every optimal alignment, terminal by terminal.
    fn alignments(&self) -> Alignments<'_> {
        Alignments::new(self.cells(), self.terminals())
    }
}

/// An aligner builds a `Lattice` for a pair of sequences under its scoring model.
///
/// Note that insertions are when `b` has more characters than `a`, and deletions are when `b` has less characters than `a`.
pub trait Aligner {
    type CostModel: ScoringModel;
    type Lattice<'a>: Lattice;

    /// Returns the scoring model used by the aligner.
    fn cost_model(&self) -> &Self::CostModel;

    /// Builds the full lattice. Fails on the first symbol that has no substitution score.
    fn build<'a>(&self, a: Seq<'a>, b: Seq<'a>) -> Result<Self::Lattice<'a>, AlignError>;

    /// The optimal score of aligning `a` and `b`.
    fn score(&self, a: Seq, b: Seq) -> Result<Option<Score>, AlignError> {
        Ok(self.build(a, b)?.score())
    }

    /// The optimal score and all optimal alignments.
    fn align(&self, a: Seq, b: Seq) -> Result<(Option<Score>, Vec<Alignment>), AlignError> {
        let lattice = self.build(a, b)?;
        Ok((lattice.score(), lattice.alignments().collect()))
    }
}

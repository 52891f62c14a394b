//! Global pairwise alignment of DNA that enumerates *all* optimal alignments,
//! with either a linear or an affine gap score.
//!
//! ```
//! use nw_pairwise_aligner::prelude::*;
//!
//! let lattice = align_affine(b"TTATT", b"TT", &AffineCost::default()).unwrap();
//! assert_eq!(lattice.score(), Some(1));
//! assert_eq!(lattice.alignments().count(), 3);
//! ```

pub mod aligners;
pub mod alignment;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod render;
pub mod runner;
pub mod scoring;
pub mod sequence;
pub mod traceback;

use aligners::{nw::SimpleLattice, nw_affine::AffineLattice, Seq};
use error::AlignError;
use scoring::{AffineCost, LinearCost};

pub mod prelude {
    pub use crate::aligners::{
        cigar::{Cigar, CigarOp},
        edit_graph::{Cell, CellId, Edge, Edit},
        nw::{SimpleLattice, NW},
        nw_affine::{AffineLattice, AffineLayerType, Layer, State, LAYERS},
        Aligner, Lattice, Seq, Sequence,
    };
    pub use crate::alignment::Alignment;
    pub use crate::config::ScoringConfig;
    pub use crate::error::{AlignError, SeqId};
    pub use crate::scoring::{AffineCost, LinearCost, Score, ScoringModel, SubstitutionMatrix};
    pub use crate::traceback::{Alignments, Traceback};
    pub use crate::{align_affine, align_simple, to_string};
}

/// Builds the linear-gap lattice of `a` and `b`.
pub fn align_simple<'a>(
    a: Seq<'a>,
    b: Seq<'a>,
    cm: &LinearCost,
) -> Result<SimpleLattice<'a>, AlignError> {
    SimpleLattice::build(a, b, cm)
}

/// Builds the three affine-gap lattices of `a` and `b`.
pub fn align_affine<'a>(
    a: Seq<'a>,
    b: Seq<'a>,
    cm: &AffineCost,
) -> Result<AffineLattice<'a>, AlignError> {
    AffineLattice::build(a, b, cm)
}

pub fn to_string(seq: Seq) -> String {
    String::from_utf8_lossy(seq).into_owned()
}

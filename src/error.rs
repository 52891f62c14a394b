//! Errors raised while configuring a scoring model or building a lattice.

use std::fmt;
use thiserror::Error;

use crate::scoring::Score;

/// Identifies one of the two input sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqId {
    First,
    Second,
}

impl fmt::Display for SeqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqId::First => write!(f, "seq1"),
            SeqId::Second => write!(f, "seq2"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    /// A sequence element has no entry in the substitution table.
    #[error("invalid symbol {symbol:?} at position {pos} of {seq}: not in the substitution table")]
    InvalidSymbol { seq: SeqId, pos: usize, symbol: char },

    /// The two scores for a pair of symbols differ.
    #[error("substitution table is not symmetric: {a}/{b} scores {ab} but {b}/{a} scores {ba}")]
    AsymmetricTable { a: char, b: char, ab: Score, ba: Score },

    /// A pair of alphabet symbols was left unscored.
    #[error("substitution table has no score for {a}/{b}")]
    MissingEntry { a: char, b: char },

    #[error("invalid scoring configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AlignError {
    fn from(e: serde_json::Error) -> Self {
        AlignError::Config(e.to_string())
    }
}

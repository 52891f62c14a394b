//! A single global alignment, as emitted by the traceback.

use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::fmt;

use crate::{
    aligners::{cigar::Cigar, edit_graph::Edit},
    error::{AlignError, SeqId},
    scoring::{symbol_index, Score, ScoringModel},
};

/// An ordered sequence of alignment columns, left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub edits: Vec<Edit>,
}

impl Alignment {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The first sequence with `-` for gaps.
    pub fn track1(&self) -> String {
        self.edits.iter().map(|e| e.top() as char).collect()
    }

    /// The second sequence with `-` for gaps.
    pub fn track2(&self) -> String {
        self.edits.iter().map(|e| e.bottom() as char).collect()
    }

    pub fn cigar(&self) -> Cigar {
        self.edits.iter().map(Edit::cigar_op).collect()
    }

    /// The lengths of the maximal gap runs. An insertion run directly followed
    /// by a deletion run counts as two runs.
    pub fn gap_runs(&self) -> Vec<usize> {
        self.cigar().gap_runs().collect()
    }

    /// Sums the column scores under `cm`, charging each maximal gap run `cm.gap_run(len)`.
    pub fn score(&self, cm: &impl ScoringModel) -> Result<Score, AlignError> {
        let mut score: Score = self.cigar().gap_runs().map(|len| cm.gap_run(len)).sum();
        // Symbols of `a` and `b` consumed before the current column.
        let (mut i, mut j) = (0, 0);
        for e in &self.edits {
            match *e {
                Edit::Sub(a, b) => {
                    score += cm.substitution().score(a, b).ok_or_else(|| {
                        let (seq, pos, symbol) = match symbol_index(a) {
                            None => (SeqId::First, i, a),
                            Some(_) => (SeqId::Second, j, b),
                        };
                        AlignError::InvalidSymbol {
                            seq,
                            pos,
                            symbol: symbol as char,
                        }
                    })?;
                    i += 1;
                    j += 1;
                }
                Edit::Ins(_) => j += 1,
                Edit::Del(_) => i += 1,
            }
        }
        Ok(score)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.track1())?;
        write!(f, "{}", self.track2())
    }
}

/// Serialized as its two tracks and its CIGAR string.
impl Serialize for Alignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Alignment", 3)?;
        s.serialize_field("track1", &self.track1())?;
        s.serialize_field("track2", &self.track2())?;
        s.serialize_field("cigar", &self.cigar().to_string())?;
        s.end()
    }
}

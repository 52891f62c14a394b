//! This module contains the `LinearCost` and `AffineCost` scoring models.
//!
//! Scores are maximized: matches are positive, mismatches and gaps negative.
use crate::{
    aligners::Seq,
    error::{AlignError, SeqId},
};

/// Type for storing scores. Signed, since gaps and mismatches are negative.
pub type Score = i64;

/// Largest absolute value accepted for a single substitution, open or extend score.
///
/// A lattice path sums at most `2 * (|a| + |b|)` such terms, so with 64-bit
/// scores no sum can overflow.
pub const MAX_MAGNITUDE: Score = 1 << 20;

fn check_magnitude(name: &str, value: Score) -> Result<(), AlignError> {
    if (-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&value) {
        Ok(())
    } else {
        Err(AlignError::Config(format!(
            "{name} score {value} is outside [-{MAX_MAGNITUDE}, {MAX_MAGNITUDE}]"
        )))
    }
}

/// The alphabet scored by a `SubstitutionMatrix`, in table order.
pub const ALPH: [u8; 4] = *b"ACGT";

/// Index of `c` in `ALPH`.
pub fn symbol_index(c: u8) -> Option<usize> {
    match c {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// A symmetric substitution table over `ALPH`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    table: [[Score; 4]; 4],
}

impl SubstitutionMatrix {
    /// Fails when `table[x][y] != table[y][x]` for some pair.
    pub fn new(table: [[Score; 4]; 4]) -> Result<Self, AlignError> {
        for x in 0..4 {
            for y in x + 1..4 {
                if table[x][y] != table[y][x] {
                    return Err(AlignError::AsymmetricTable {
                        a: ALPH[x] as char,
                        b: ALPH[y] as char,
                        ab: table[x][y],
                        ba: table[y][x],
                    });
                }
            }
        }
        Ok(Self { table })
    }

    /// `m` on the diagonal, `x` everywhere else.
    pub fn match_mismatch(m: Score, x: Score) -> Self {
        let mut table = [[x; 4]; 4];
        for (i, row) in table.iter_mut().enumerate() {
            row[i] = m;
        }
        Self { table }
    }

    /// The score of aligning `a` against `b`, or `None` when either is not in `ALPH`.
    pub fn score(&self, a: u8, b: u8) -> Option<Score> {
        Some(self.table[symbol_index(a)?][symbol_index(b)?])
    }

    /// Fails when some entry exceeds `MAX_MAGNITUDE`.
    pub fn validate(&self) -> Result<(), AlignError> {
        for (x, row) in self.table.iter().enumerate() {
            for (y, &score) in row.iter().enumerate() {
                if !(-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&score) {
                    let name = format!("{}/{}", ALPH[x] as char, ALPH[y] as char);
                    return check_magnitude(&name, score);
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn score_idx(&self, a: usize, b: usize) -> Score {
        self.table[a][b]
    }

    /// Maps every symbol of `seq` to its table index.
    /// The first symbol without an entry is reported as `InvalidSymbol`.
    pub fn encode(&self, seq: Seq, id: SeqId) -> Result<Vec<usize>, AlignError> {
        seq.iter()
            .enumerate()
            .map(|(pos, &c)| {
                symbol_index(c).ok_or(AlignError::InvalidSymbol {
                    seq: id,
                    pos,
                    symbol: c as char,
                })
            })
            .collect()
    }
}

impl Default for SubstitutionMatrix {
    fn default() -> Self {
        Self::match_mismatch(3, -1)
    }
}

/// A trait describing a scoring model.
pub trait ScoringModel {
    fn substitution(&self) -> &SubstitutionMatrix;

    /// Checks that every score is within `MAX_MAGNITUDE`. Lattice builders call
    /// this before any arithmetic.
    fn validate(&self) -> Result<(), AlignError>;

    /// The score of a maximal run of `len` consecutive gap columns of the same kind.
    fn gap_run(&self, len: usize) -> Score;
}

/// Every gap column costs `gap`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCost {
    pub sub: SubstitutionMatrix,
    pub gap: Score,
}

impl LinearCost {
    pub fn new(sub: SubstitutionMatrix, gap: Score) -> Self {
        Self { sub, gap }
    }
}

impl Default for LinearCost {
    fn default() -> Self {
        Self::new(SubstitutionMatrix::default(), -2)
    }
}

impl ScoringModel for LinearCost {
    fn substitution(&self) -> &SubstitutionMatrix {
        &self.sub
    }

    fn validate(&self) -> Result<(), AlignError> {
        self.sub.validate()?;
        check_magnitude("gap", self.gap)
    }

    fn gap_run(&self, len: usize) -> Score {
        len as Score * self.gap
    }
}

/// A gap run of length `l > 0` costs `open + l * extend`.
///
/// The model is meant to be used with `open < extend < 0`, but any values are accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffineCost {
    pub sub: SubstitutionMatrix,
    pub open: Score,
    pub extend: Score,
}

impl AffineCost {
    pub fn new(sub: SubstitutionMatrix, open: Score, extend: Score) -> Self {
        Self { sub, open, extend }
    }

    /// The score of the first column of a gap run.
    #[inline]
    pub fn open_cost(&self) -> Score {
        self.open + self.extend
    }
}

impl Default for AffineCost {
    fn default() -> Self {
        Self::new(SubstitutionMatrix::default(), -2, -1)
    }
}

impl ScoringModel for AffineCost {
    fn substitution(&self) -> &SubstitutionMatrix {
        &self.sub
    }

    fn validate(&self) -> Result<(), AlignError> {
        self.sub.validate()?;
        check_magnitude("gap open", self.open)?;
        check_magnitude("gap extend", self.extend)
    }

    fn gap_run(&self, len: usize) -> Score {
        if len == 0 {
            0
        } else {
            self.open + len as Score * self.extend
        }
    }
}

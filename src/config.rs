//! Serializable scoring configuration, loaded from JSON or built from CLI flags.

use crate::{
    error::AlignError,
    scoring::{
        symbol_index, AffineCost, LinearCost, Score, ScoringModel, SubstitutionMatrix, ALPH,
    },
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Scores used by both aligners.
///
/// ```json
/// { "match_score": 3, "mismatch_score": -1, "gap_open": -2, "gap_extend": -1 }
/// ```
///
/// An explicit `matrix` replaces `match_score` and `mismatch_score`. Each
/// unordered pair of symbols must be scored in at least one direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub match_score: Score,
    pub mismatch_score: Score,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<BTreeMap<String, BTreeMap<String, Score>>>,
    pub gap_open: Score,
    pub gap_extend: Score,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: 3,
            mismatch_score: -1,
            matrix: None,
            gap_open: -2,
            gap_extend: -1,
        }
    }
}

fn parse_key(key: &str) -> Result<usize, AlignError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => symbol_index(c.to_ascii_uppercase() as u8)
            .ok_or_else(|| AlignError::Config(format!("unknown symbol {key:?} in matrix"))),
        _ => Err(AlignError::Config(format!(
            "matrix keys must be single symbols, got {key:?}"
        ))),
    }
}

impl ScoringConfig {
    pub fn from_json(json: &str) -> Result<Self, AlignError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, AlignError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AlignError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn substitution(&self) -> Result<SubstitutionMatrix, AlignError> {
        let Some(matrix) = &self.matrix else {
            return Ok(SubstitutionMatrix::match_mismatch(
                self.match_score,
                self.mismatch_score,
            ));
        };
        let mut entries = [[None; 4]; 4];
        for (x, row) in matrix {
            let x = parse_key(x)?;
            for (y, &score) in row {
                entries[x][parse_key(y)?] = Some(score);
            }
        }
        let mut table = [[0; 4]; 4];
        for x in 0..4 {
            for y in 0..4 {
                table[x][y] = entries[x][y]
                    .or(entries[y][x])
                    .ok_or(AlignError::MissingEntry {
                        a: ALPH[x] as char,
                        b: ALPH[y] as char,
                    })?;
            }
        }
        SubstitutionMatrix::new(table)
    }

    pub fn linear(&self) -> Result<LinearCost, AlignError> {
        let cm = LinearCost::new(self.substitution()?, self.gap_open);
        cm.validate()?;
        Ok(cm)
    }

    pub fn affine(&self) -> Result<AffineCost, AlignError> {
        let cm = AffineCost::new(self.substitution()?, self.gap_open, self.gap_extend);
        cm.validate()?;
        Ok(cm)
    }
}

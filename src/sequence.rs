//! Validation of user-supplied DNA.

use bio::alphabets::Alphabet;

use crate::{
    aligners::Sequence,
    error::{AlignError, SeqId},
    scoring::ALPH,
};

/// Uppercases `text` and checks that it only contains `A`, `C`, `G` and `T`.
///
/// The reported position is a byte offset into `text`.
///
/// Empty input is accepted.
pub fn parse_dna(text: &[u8], id: SeqId) -> Result<Sequence, AlignError> {
    let alphabet = Alphabet::new(ALPH);
    let seq = text.to_ascii_uppercase();
    match seq
        .iter()
        .position(|&c| !alphabet.symbols.contains(c as usize))
    {
        None => Ok(seq),
        Some(pos) => Err(AlignError::InvalidSymbol {
            seq: id,
            pos,
            symbol: String::from_utf8_lossy(&text[pos..])
                .chars()
                .next()
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        }),
    }
}

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CigarOp {
    Match,
    Mismatch,
    Insertion,
    Deletion,
}

impl CigarOp {
    pub fn get_char(&self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Mismatch => 'X',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, CigarOp::Insertion | CigarOp::Deletion)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CigarElement {
    pub command: CigarOp,
    pub length: usize,
}

/// A run-length encoded sequence of `CigarOp`s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<CigarElement>,
}

impl Cigar {
    pub fn push(&mut self, command: CigarOp) {
        if let Some(s) = self.ops.last_mut() {
            if s.command == command {
                s.length += 1;
                return;
            }
        }
        self.ops.push(CigarElement { command, length: 1 });
    }

    pub fn ops(&self) -> &[CigarElement] {
        &self.ops
    }

    /// The lengths of the maximal insertion and deletion runs, left to right.
    pub fn gap_runs(&self) -> impl Iterator<Item = usize> + '_ {
        self.ops
            .iter()
            .filter(|e| e.command.is_gap())
            .map(|e| e.length)
    }
}

impl FromIterator<CigarOp> for Cigar {
    fn from_iter<T: IntoIterator<Item = CigarOp>>(iter: T) -> Self {
        let mut cigar = Cigar::default();
        for op in iter {
            cigar.push(op);
        }
        cigar
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.ops {
            write!(f, "{}{}", e.length, e.command.get_char())?;
        }
        Ok(())
    }
}

//! Plain-text rendering of lattices and alignments.

use crate::{
    aligners::{edit_graph::Edit, Seq},
    alignment::Alignment,
    scoring::Score,
};

/// Printed between consecutive alignments.
pub const SEPARATOR: &str = "~~~";

const WIDTH: usize = 6;

fn label(seq: Seq, i: usize) -> char {
    if i == 0 {
        '-'
    } else {
        seq[i - 1] as char
    }
}

/// One score grid, with `b` along the top and `a` down the side.
pub fn format_matrix(title: &str, a: Seq, b: Seq, rows: &[Vec<Option<Score>>]) -> String {
    let mut out = format!("{title}\n{:>w$}", "", w = WIDTH - 1);
    for j in 0..=b.len() {
        out += &format!("{:>w$}", label(b, j), w = WIDTH);
    }
    for (i, row) in rows.iter().enumerate() {
        out += &format!("\n{:>w$}", label(a, i), w = WIDTH - 1);
        for score in row {
            out += &match score {
                Some(s) => format!("{s:>w$}", w = WIDTH),
                None => format!("{:>w$}", "-inf", w = WIDTH),
            };
        }
    }
    out
}

/// `|` for a match, `.` for a mismatch, and a space for a gap.
pub fn match_line(alignment: &Alignment) -> String {
    alignment
        .edits
        .iter()
        .map(|e| match *e {
            Edit::Sub(a, b) if a == b => '|',
            Edit::Sub(..) => '.',
            Edit::Ins(_) | Edit::Del(_) => ' ',
        })
        .collect()
}

/// Track 1, the match line, and track 2.
pub fn format_alignment(alignment: &Alignment) -> String {
    format!(
        "{}\n{}\n{}",
        alignment.track1(),
        match_line(alignment),
        alignment.track2()
    )
}

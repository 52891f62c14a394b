//! Enumeration of all optimal alignments by walking the incoming edges of a
//! lattice back to its origin.
//!
//! The walk is an explicit-stack DFS, so memory is bounded by the length of
//! the longest path (`|a| + |b| + 1` frames) regardless of how many
//! alignments there are. Alignments are produced lazily and in a fixed order:
//! the first incoming edge of every cell is explored first.

use smallvec::SmallVec;

use crate::{
    aligners::edit_graph::{Cell, CellId, Edit},
    alignment::Alignment,
};

/// A DFS frame: a cell, and the index of the next incoming edge to explore.
struct Frame {
    cell: CellId,
    next_edge: usize,
}

/// Iterator over every path from the origin to one terminal cell.
pub struct Traceback<'a> {
    cells: &'a [Cell],
    stack: Vec<Frame>,
    /// Edits from the terminal down to the top of `stack`. Always one shorter than `stack`.
    path: Vec<Edit>,
}

impl<'a> Traceback<'a> {
    /// An unreachable terminal yields no alignments.
    pub fn new(cells: &'a [Cell], terminal: CellId) -> Self {
        let stack = if cells[terminal].is_reachable() {
            vec![Frame {
                cell: terminal,
                next_edge: 0,
            }]
        } else {
            vec![]
        };
        Traceback {
            cells,
            stack,
            path: vec![],
        }
    }
}

impl<'a> Iterator for Traceback<'a> {
    type Item = Alignment;

    fn next(&mut self) -> Option<Alignment> {
        let cells = self.cells;
        loop {
            let frame = self.stack.last_mut()?;
            let incoming = &cells[frame.cell].incoming;
            if incoming.is_empty() {
                // Reached the origin.
                let alignment = Alignment::new(self.path.iter().rev().copied().collect());
                self.stack.pop();
                self.path.pop();
                return Some(alignment);
            }
            if let Some(edge) = incoming.get(frame.next_edge) {
                frame.next_edge += 1;
                self.path.push(edge.edit);
                self.stack.push(Frame {
                    cell: edge.parent,
                    next_edge: 0,
                });
            } else {
                self.stack.pop();
                self.path.pop();
            }
        }
    }
}

/// The concatenation of the tracebacks from several terminal cells.
pub struct Alignments<'a> {
    cells: &'a [Cell],
    terminals: SmallVec<[CellId; 3]>,
    next_terminal: usize,
    current: Option<Traceback<'a>>,
}

impl<'a> Alignments<'a> {
    pub fn new(cells: &'a [Cell], terminals: SmallVec<[CellId; 3]>) -> Self {
        Alignments {
            cells,
            terminals,
            next_terminal: 0,
            current: None,
        }
    }
}

impl<'a> Iterator for Alignments<'a> {
    type Item = Alignment;

    fn next(&mut self) -> Option<Alignment> {
        loop {
            if let Some(alignment) = self.current.as_mut().and_then(Iterator::next) {
                return Some(alignment);
            }
            let terminal = *self.terminals.get(self.next_terminal)?;
            self.next_terminal += 1;
            self.current = Some(Traceback::new(self.cells, terminal));
        }
    }
}

//! This module defines the `Tape` struct, the machine's working storage: an
//! unbounded sequence of symbols of which only a finite window is ever held
//! in memory.

/// A bi-infinite tape with a movable head.
///
/// Only a contiguous window of cells is materialized, as a growable buffer
/// plus an offset mapping the logical head position onto buffer indices.
/// Every cell outside the window logically holds the blank symbol, so reads
/// anywhere succeed without allocating. The window grows only when a cell
/// outside it is written; moving the head never allocates, which keeps a
/// machine that only roams over blanks from consuming memory.
pub struct Tape<S> {
    cells: Vec<S>,
    /// Logical position of `cells[0]`. Goes negative once the machine has
    /// written to the left of its input.
    origin: i64,
    head: i64,
    blank: S,
}

impl<S: Clone> Tape<S> {
    /// Creates a tape holding `input` at logical positions `0..n`, with the
    /// head on position 0. An empty input leaves the window empty, so the
    /// first read yields the blank symbol.
    pub fn new<I>(input: I, blank: S) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Self {
            cells: input.into_iter().collect(),
            origin: 0,
            head: 0,
            blank,
        }
    }

    /// Returns the symbol under the head, or the blank symbol if the head is
    /// outside the materialized window. Never fails and never materializes.
    pub fn read(&self) -> S {
        let offset = self.head - self.origin;
        if offset >= 0 && (offset as usize) < self.cells.len() {
            self.cells[offset as usize].clone()
        } else {
            self.blank.clone()
        }
    }

    /// Writes `symbol` at the head position.
    ///
    /// If the head lies outside the window, the window is first extended
    /// with blank-filled cells up to and including the head position, so it
    /// stays contiguous.
    pub fn write(&mut self, symbol: S) {
        if self.cells.is_empty() {
            self.origin = self.head;
            self.cells.push(symbol);
        } else if self.head < self.origin {
            let pad = (self.origin - self.head) as usize;
            let mut grown = vec![self.blank.clone(); pad];
            grown.append(&mut self.cells);
            self.cells = grown;
            self.origin = self.head;
            self.cells[0] = symbol;
        } else {
            let offset = (self.head - self.origin) as usize;
            if offset >= self.cells.len() {
                self.cells.resize(offset + 1, self.blank.clone());
            }
            self.cells[offset] = symbol;
        }
    }

    /// Moves the head one position to the left.
    pub fn move_left(&mut self) {
        self.head -= 1;
    }

    /// Moves the head one position to the right.
    pub fn move_right(&mut self) {
        self.head += 1;
    }
}

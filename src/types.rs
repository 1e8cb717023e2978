//! This module defines the core data structures used throughout the Turing machine
//! simulator: machine descriptions, transitions, head directions, and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// The default blank symbol used when a description does not declare one.
pub const DEFAULT_BLANK_SYMBOL: char = ' ';
/// A special input symbol used in description files to denote the blank symbol.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a machine description in bytes.
pub const MAX_DESCRIPTION_SIZE: usize = 65536; // 64KB

/// The formal description of a deterministic single-tape Turing machine.
///
/// A description is plain data: the state set, the input and tape alphabets,
/// the transition list (in declaration order), the start state, the blank
/// symbol, and the accepting states. Nothing here is validated — a
/// description may reference undeclared states or symbols, carry duplicate
/// transitions, or describe a machine that never halts. How such
/// descriptions behave is pinned down entirely by [`Machine`].
///
/// Symbols are generic: `char` is the usual instantiation, but any
/// equality-comparable token type works.
///
/// [`Machine`]: crate::machine::Machine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Description<S> {
    /// The name of the machine.
    pub name: String,
    /// The state identifiers, in declaration order.
    pub states: Vec<String>,
    /// The input alphabet, a subset of the tape alphabet.
    pub input_alphabet: Vec<S>,
    /// The tape alphabet, including the blank symbol.
    pub tape_alphabet: Vec<S>,
    /// The transition list. Declaration order matters: when two transitions
    /// share a (state, read symbol) pair, the first one declared wins.
    pub delta: Vec<Transition<S>>,
    /// The state the machine starts in.
    pub start_state: String,
    /// The symbol occupying every tape cell that was never written.
    pub blank: S,
    /// Halting in any of these states means the input is accepted.
    pub accept_states: Vec<String>,
}

/// A single transition rule.
///
/// When the machine is in `from` and reads `read`, it writes `write`, moves
/// the head along `direction`, and enters `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition<S> {
    /// The state this transition fires from.
    pub from: String,
    /// The symbol that must be under the head.
    pub read: S,
    /// The symbol written over it.
    pub write: S,
    /// The state the machine moves to.
    pub to: String,
    /// The head movement applied after writing.
    pub direction: Direction,
}

impl<S> Transition<S> {
    /// Creates a transition rule.
    pub fn new(
        from: impl Into<String>,
        read: S,
        write: S,
        to: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            from: from.into(),
            read,
            write,
            to: to.into(),
            direction,
        }
    }
}

/// A head movement.
///
/// Only `Left` and `Right` actually move the head; `Stay` leaves it in
/// place, which is how any direction other than the two literal tokens
/// behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => f.write_str("L"),
            Direction::Right => f.write_str("R"),
            Direction::Stay => f.write_str("S"),
        }
    }
}

/// Errors that can occur while reading a machine description.
///
/// Simulation itself has no error channel: a run either halts and yields a
/// boolean, or never returns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptionError {
    /// The description text does not conform to the grammar.
    #[error("Description parsing error: {0}")]
    Parse(#[from] Box<pest::error::Error<Rule>>),
    /// The description is syntactically valid but structurally unusable.
    #[error("Description validation error: {0}")]
    Validation(String),
    /// The description could not be read from the file system.
    #[error("File error: {0}")]
    File(String),
}

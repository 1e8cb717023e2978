//! This crate provides the core logic for a deterministic single-tape
//! Turing machine simulator. It includes the lazily materialized tape, the
//! immutable machine compiled from a formal description, a parser for the
//! `.tm` description format, and a catalog of embedded sample machines.

pub mod catalog;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Catalog` registry and `CatalogEntry` from the catalog module.
pub use catalog::{Catalog, CatalogEntry, MACHINES};
/// Re-exports the `DescriptionLoader` struct from the loader module.
pub use loader::DescriptionLoader;
/// Re-exports the `Machine` struct and its stepping handle from the machine module.
pub use machine::{Machine, Run};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the description types from the types module.
pub use types::{Description, DescriptionError, Direction, Transition, MAX_DESCRIPTION_SIZE};

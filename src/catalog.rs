//! This module manages the built-in machine descriptions that ship with the
//! crate. The machines themselves are data, embedded from `machines/*.tm`;
//! nothing in the simulator depends on them.

use crate::types::{Description, DescriptionError};

use std::sync::RwLock;

// Default embedded machine descriptions
const MACHINE_TEXTS: [&str; 3] = [
    include_str!("../machines/zero-one-balance.tm"),
    include_str!("../machines/even-zeros.tm"),
    include_str!("../machines/binary-complement.tm"),
];

lazy_static::lazy_static! {
    pub static ref MACHINES: RwLock<Vec<Description<char>>> = RwLock::new(Vec::new());
}

/// Access to the embedded machine catalog.
pub struct Catalog;

impl Catalog {
    /// Parses the embedded descriptions into the catalog registry.
    pub fn load() -> Result<(), DescriptionError> {
        let mut machines = Vec::new();

        for text in MACHINE_TEXTS {
            if let Ok(description) = crate::parser::parse(text) {
                machines.push(description);
            } else {
                eprintln!("Failed to parse embedded machine");
            }
        }

        if let Ok(mut write_guard) = MACHINES.write() {
            *write_guard = machines;
        } else {
            return Err(DescriptionError::File(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the number of available machines.
    pub fn count() -> usize {
        // Initialize with the embedded machines if not already initialized
        let _ = Self::load();

        MACHINES.read().map(|machines| machines.len()).unwrap_or(0)
    }

    /// Returns a machine description by its index.
    pub fn by_index(index: usize) -> Result<Description<char>, DescriptionError> {
        // Initialize with the embedded machines if not already initialized
        let _ = Self::load();

        MACHINES
            .read()
            .map_err(|_| DescriptionError::File("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                DescriptionError::Validation(format!("Machine index {} out of range", index))
            })
    }

    /// Returns a machine description by its name.
    pub fn by_name(name: &str) -> Result<Description<char>, DescriptionError> {
        // Initialize with the embedded machines if not already initialized
        let _ = Self::load();

        MACHINES
            .read()
            .map_err(|_| DescriptionError::File("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|description| description.name == name)
            .cloned()
            .ok_or_else(|| DescriptionError::Validation(format!("Machine '{}' not found", name)))
    }

    /// Lists the names of all embedded machines.
    pub fn names() -> Vec<String> {
        // Initialize with the embedded machines if not already initialized
        let _ = Self::load();

        MACHINES
            .read()
            .map(|machines| {
                machines
                    .iter()
                    .map(|description| description.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Returns summary information about a machine by its index.
    pub fn info(index: usize) -> Result<CatalogEntry, DescriptionError> {
        let description = Self::by_index(index)?;

        Ok(CatalogEntry {
            index,
            name: description.name.clone(),
            start_state: description.start_state.clone(),
            state_count: description.states.len(),
            transition_count: description.delta.len(),
        })
    }
}

/// Summary information about one embedded machine.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub transition_count: usize,
}

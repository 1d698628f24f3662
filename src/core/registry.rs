//! Interning of textual contig names to dense numeric keys.
//!
//! Contigs are referred to by name in the input files but by dense `u32`
//! keys everywhere else, so the merge engine can index the contig table
//! directly and store paths compactly. The registry assigns keys in
//! first-seen order and can be locked once the full contig set is known;
//! after locking, any path record that names an unseen contig is an input
//! error rather than a new allocation.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::path::ContigKey;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("contig name '{0}' is not in the contig set")]
    Locked(String),

    #[error("contig key {0} has not been allocated")]
    UnknownKey(ContigKey),
}

/// Bidirectional name ⇄ key mapping with dense, first-seen key allocation.
#[derive(Debug, Default)]
pub struct ContigRegistry {
    keys: HashMap<String, ContigKey>,
    names: Vec<String>,
    locked: bool,
}

impl ContigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key for `name`, allocating the next dense key if the name
    /// is new.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Locked` if `name` is new and the registry has
    /// been locked. Known names resolve regardless of the lock.
    pub fn intern(&mut self, name: &str) -> Result<ContigKey, RegistryError> {
        if let Some(&key) = self.keys.get(name) {
            return Ok(key);
        }
        if self.locked {
            return Err(RegistryError::Locked(name.to_string()));
        }
        let key = ContigKey(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.keys.insert(name.to_string(), key);
        self.names.push(name.to_string());
        Ok(key)
    }

    /// Return the name for an allocated key.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownKey` for keys that were never
    /// allocated.
    pub fn name(&self, key: ContigKey) -> Result<&str, RegistryError> {
        self.names
            .get(key.0 as usize)
            .map(String::as_str)
            .ok_or(RegistryError::UnknownKey(key))
    }

    /// Freeze the mapping: subsequent `intern` calls for unseen names fail.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

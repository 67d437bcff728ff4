//! Source registry service for O(1) forecast-source lookups
//!
//! This module loads the configured source list once per run and indexes it
//! by short code. Pair resolution, store filenames and bulletin globs all
//! resolve through this registry; it is immutable for the run's duration.

use std::collections::HashMap;

use crate::app::models::{SourceCode, SourceType};
use crate::config::Config;
use crate::{Error, Result};

#[cfg(test)]
pub mod tests;

/// Registry of forecast sources providing O(1) lookups by short code
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    /// Source configuration indexed by code
    pub(crate) sources: HashMap<SourceCode, SourceType>,

    /// Codes in configuration order, for deterministic iteration
    pub(crate) order: Vec<SourceCode>,
}

impl SourceRegistry {
    /// Build the registry from the run configuration
    ///
    /// Every entry is validated into a typed [`SourceType`]; duplicate or
    /// malformed codes abort before any unit runs.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut sources = HashMap::with_capacity(config.sources.len());
        let mut order = Vec::with_capacity(config.sources.len());

        for entry in &config.sources {
            let source = SourceType::new(
                entry.code.clone(),
                entry.label.clone(),
                entry.bulletin_glob.clone(),
            )?;
            let code = source.code.clone();
            if sources.insert(code.clone(), source).is_some() {
                return Err(Error::configuration(format!(
                    "Duplicate source code '{code}'"
                )));
            }
            order.push(code);
        }

        if sources.is_empty() {
            return Err(Error::configuration("No sources configured"));
        }

        Ok(Self { sources, order })
    }

    /// Get a source by code (O(1) lookup)
    pub fn get(&self, code: &str) -> Option<&SourceType> {
        self.sources.get(code)
    }

    /// Resolve a code that must be registered
    pub fn lookup(&self, code: &str) -> Result<&SourceType> {
        self.sources
            .get(code)
            .ok_or_else(|| Error::unknown_source_code(code))
    }

    /// Check if a code is registered
    pub fn contains_code(&self, code: &str) -> bool {
        self.sources.contains_key(code)
    }

    /// Get the total number of registered sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Iterate sources in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &SourceType> {
        self.order.iter().filter_map(|code| self.sources.get(code))
    }

    /// Registered codes in configuration order
    pub fn codes(&self) -> &[SourceCode] {
        &self.order
    }
}

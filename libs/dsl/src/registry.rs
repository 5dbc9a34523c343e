//! Series registry - the analyzer's one external collaborator
//!
//! Maps a series name to the base units its recorded values carry. The core
//! treats this as a read-only, synchronous dependency; anything backed by a
//! mutable store brings its own concurrency discipline.

use nimbus_units::Units;
use std::collections::HashMap;

/// Resolves a series name to its recorded base units.
pub trait SeriesRegistry {
    fn lookup_series_units(&self, name: &str) -> Option<Units>;
}

/// HashMap-backed registry for tests and CLI use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    series: HashMap<String, Units>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, units: Units) {
        self.series.insert(name.to_string(), units);
    }

    pub fn with_series(mut self, name: &str, units: Units) -> Self {
        self.insert(name, units);
        self
    }
}

impl SeriesRegistry for InMemoryRegistry {
    fn lookup_series_units(&self, name: &str) -> Option<Units> {
        self.series.get(name).cloned()
    }
}

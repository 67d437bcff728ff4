//! Shared test utilities and fixtures for source registry tests

use crate::config::{Config, SourceEntry};


/// Build a configuration carrying the given (code, label) source entries
pub fn config_with_sources(entries: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    config.sources = entries
        .iter()
        .map(|(code, label)| SourceEntry {
            code: (*code).to_string(),
            label: (*label).to_string(),
            bulletin_glob: format!("bulletins/{code}_{{month}}*.txt"),
        })
        .collect();
    config
}

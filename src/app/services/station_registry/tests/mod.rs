//! Shared test utilities and fixtures for station registry tests

use crate::config::{Config, StationEntry};


/// Build a configuration carrying the given (icao, horizon) station entries
pub fn config_with_stations(entries: &[(&str, u8)]) -> Config {
    let mut config = Config::default();
    config.stations = entries
        .iter()
        .map(|(icao, horizon_hours)| StationEntry {
            icao: (*icao).to_string(),
            name: String::new(),
            horizon_hours: *horizon_hours,
        })
        .collect();
    config
}

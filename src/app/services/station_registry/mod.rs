//! Station registry service for O(1) station metadata lookups
//!
//! This module maps each verification airport (ICAO code) to its display
//! name and forecast horizon. The horizon bounds how far into a forecast's
//! validity period the statistics driver looks; the load layer never
//! consults this registry.

use std::collections::HashMap;

use crate::app::models::Station;
use crate::config::Config;
use crate::{Error, Result};

#[cfg(test)]
pub mod tests;

/// Station registry providing O(1) metadata lookups by ICAO code
#[derive(Debug, Clone)]
pub struct StationRegistry {
    /// Station metadata indexed by ICAO code
    pub(crate) stations: HashMap<String, Station>,

    /// ICAO codes in configuration order, for deterministic iteration
    pub(crate) order: Vec<String>,
}

impl StationRegistry {
    /// Build the registry from the run configuration
    ///
    /// Each entry is validated into a typed [`Station`]; a duplicate or
    /// malformed ICAO code aborts before any unit runs. An empty station
    /// list is allowed: decode/load-only runs never consult stations.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut stations = HashMap::with_capacity(config.stations.len());
        let mut order = Vec::with_capacity(config.stations.len());

        for entry in &config.stations {
            let station = entry.to_station()?;
            let icao = station.icao.clone();
            if stations.insert(icao.clone(), station).is_some() {
                return Err(Error::configuration(format!(
                    "Duplicate station '{icao}'"
                )));
            }
            order.push(icao);
        }

        Ok(Self { stations, order })
    }

    /// Get station metadata by ICAO code (O(1) lookup)
    pub fn get_station(&self, icao: &str) -> Option<&Station> {
        self.stations.get(icao)
    }

    /// Check if a station exists in the registry
    pub fn contains_station(&self, icao: &str) -> bool {
        self.stations.contains_key(icao)
    }

    /// Get the total number of stations in the registry
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Forecast horizon for a station, if registered
    pub fn horizon_hours(&self, icao: &str) -> Option<u8> {
        self.stations.get(icao).map(|s| s.horizon_hours)
    }

    /// Iterate stations in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.order.iter().filter_map(|icao| self.stations.get(icao))
    }
}

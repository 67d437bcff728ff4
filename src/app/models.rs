//! Data models for TAF processing
//!
//! This module contains the core data structures for representing forecast
//! sources, verification stations, and decoded TAF records as the decoder
//! and the verification store exchange them.

use crate::constants::{self, INVALID_DATE_SENTINEL, MONTH_PLACEHOLDER, STORE_DATE_FORMAT};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Source Types
// =============================================================================

/// Validated short code identifying a forecast source (e.g. "o2", "ma")
///
/// Codes are 2 to 8 ASCII lowercase alphanumerics. A source code names the
/// source's SQLite store file and forms half of a comparison pair code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourceCode(String);

impl SourceCode {
    /// Create a validated source code
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if !Self::is_valid(&code) {
            return Err(Error::configuration(format!(
                "Invalid source code '{}': must be 2-8 lowercase ASCII alphanumerics",
                code
            )));
        }
        Ok(Self(code))
    }

    /// Check whether a string has the source code shape
    pub fn is_valid(code: &str) -> bool {
        (2..=8).contains(&code.len())
            && code
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename of this source's SQLite store
    pub fn store_filename(&self) -> String {
        constants::store_filename(&self.0)
    }
}

impl FromStr for SourceCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for SourceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for SourceCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A registered forecast source
///
/// Each source owns a disjoint storage namespace (one SQLite file named
/// after its code) and a glob pattern locating its raw bulletin files,
/// with a `{month}` placeholder substituted per batch unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceType {
    /// Validated short code, unique within the registry
    pub code: SourceCode,

    /// Human-readable label (e.g. "Open Road v2")
    pub label: String,

    /// Glob pattern for raw bulletin files, containing `{month}`
    pub bulletin_glob: String,
}

impl SourceType {
    /// Create a new source type with validation
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        bulletin_glob: impl Into<String>,
    ) -> Result<Self> {
        let source = Self {
            code: SourceCode::new(code)?,
            label: label.into(),
            bulletin_glob: bulletin_glob.into(),
        };

        source.validate()?;
        Ok(source)
    }

    /// Validate label and glob pattern
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Source '{}' has an empty label",
                self.code
            )));
        }

        if !self.bulletin_glob.contains(MONTH_PLACEHOLDER) {
            return Err(Error::configuration(format!(
                "Source '{}' bulletin glob '{}' is missing the '{}' placeholder",
                self.code, self.bulletin_glob, MONTH_PLACEHOLDER
            )));
        }

        Ok(())
    }

    /// Glob pattern for one month's bulletin files
    pub fn bulletin_glob_for(&self, month_key: &str) -> String {
        self.bulletin_glob.replace(MONTH_PLACEHOLDER, month_key)
    }
}

/// An ordered comparison pair of registered sources
///
/// The reference side provides the baseline the candidate is verified
/// against; order is significant. Pairs are resolved from concatenated
/// pair codes (e.g. "o2x2") once, at configuration validation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePair {
    pub reference: SourceCode,
    pub candidate: SourceCode,
}

impl SourcePair {
    pub fn new(reference: SourceCode, candidate: SourceCode) -> Self {
        Self {
            reference,
            candidate,
        }
    }

    /// Concatenated pair code, as configuration spells it
    pub fn code(&self) -> String {
        format!("{}{}", self.reference, self.candidate)
    }
}

impl fmt::Display for SourcePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.reference, self.candidate)
    }
}

// =============================================================================
// Verification Stations
// =============================================================================

/// A verification station with its forecast horizon
///
/// The horizon controls how far into the validity period the statistics
/// driver verifies; it plays no part in decoding or loading.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    /// Four-letter ICAO identifier (e.g. "EGLL")
    pub icao: String,

    /// Human-readable station name (e.g. "Heathrow")
    pub name: String,

    /// Forecast horizon in hours: 9, 24, or 30
    pub horizon_hours: u8,
}

impl Station {
    /// Create a new station with validation
    pub fn new(icao: impl Into<String>, name: impl Into<String>, horizon_hours: u8) -> Result<Self> {
        let station = Self {
            icao: icao.into(),
            name: name.into(),
            horizon_hours,
        };

        station.validate()?;
        Ok(station)
    }

    /// Validate ICAO shape and horizon
    pub fn validate(&self) -> Result<()> {
        if self.icao.len() != 4 || !self.icao.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::configuration(format!(
                "Invalid ICAO identifier '{}': must be 4 uppercase ASCII letters",
                self.icao
            )));
        }

        if !constants::SUPPORTED_HORIZONS.contains(&self.horizon_hours) {
            return Err(Error::configuration(format!(
                "Station {} has unsupported horizon {} hours: must be one of {:?}",
                self.icao,
                self.horizon_hours,
                constants::SUPPORTED_HORIZONS
            )));
        }

        if self.name.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Station {} has an empty name",
                self.icao
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Canonical Dates
// =============================================================================

/// A decoder date after normalization
///
/// Under lenient parsing an unparseable token becomes the invalid sentinel
/// rather than an error; the canonical relations store it as an empty
/// string so composite keys stay total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalDate(Option<NaiveDate>);

impl CanonicalDate {
    /// A successfully parsed date
    pub fn valid(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    /// The sentinel for a token that failed lenient parsing
    pub fn invalid() -> Self {
        Self(None)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        self.0
    }

    /// Stored representation: ISO-8601, or empty for the sentinel
    pub fn to_store_string(&self) -> String {
        match self.0 {
            Some(date) => date.format(STORE_DATE_FORMAT).to_string(),
            None => INVALID_DATE_SENTINEL.to_string(),
        }
    }

    /// Parse the stored representation back
    pub fn from_store_string(value: &str) -> Result<Self> {
        if value == INVALID_DATE_SENTINEL {
            return Ok(Self::invalid());
        }
        let date = NaiveDate::parse_from_str(value, STORE_DATE_FORMAT)?;
        Ok(Self::valid(date))
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_store_string())
    }
}

// =============================================================================
// Decoder Vocabularies
// =============================================================================

/// Issue status of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TafStatus {
    /// Original issue
    Original,
    /// Correction to an earlier issue
    Correction,
    /// Amendment to an earlier issue
    Amendment,
    /// Both corrected and amended
    Both,
}

impl TafStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TafStatus::Original => constants::status::ORIGINAL,
            TafStatus::Correction => constants::status::CORRECTION,
            TafStatus::Amendment => constants::status::AMENDMENT,
            TafStatus::Both => constants::status::BOTH,
        }
    }
}

impl FromStr for TafStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            constants::status::ORIGINAL => Ok(TafStatus::Original),
            constants::status::CORRECTION => Ok(TafStatus::Correction),
            constants::status::AMENDMENT => Ok(TafStatus::Amendment),
            constants::status::BOTH => Ok(TafStatus::Both),
            _ => Err(Error::malformed_value("taf_data", "status", s)),
        }
    }
}

impl fmt::Display for TafStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Change group a decoded element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// Conditions at the start of the validity period
    Initial,
    Becoming,
    Temporary,
    Prob30,
    Prob40,
    Prob30Tempo,
    Prob40Tempo,
    From,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Initial => constants::change_type::INITIAL,
            ChangeType::Becoming => constants::change_type::BECOMING,
            ChangeType::Temporary => constants::change_type::TEMPORARY,
            ChangeType::Prob30 => constants::change_type::PROB30,
            ChangeType::Prob40 => constants::change_type::PROB40,
            ChangeType::Prob30Tempo => constants::change_type::PROB30_TEMPO,
            ChangeType::Prob40Tempo => constants::change_type::PROB40_TEMPO,
            ChangeType::From => constants::change_type::FROM,
        }
    }
}

impl FromStr for ChangeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            constants::change_type::INITIAL => Ok(ChangeType::Initial),
            constants::change_type::BECOMING => Ok(ChangeType::Becoming),
            constants::change_type::TEMPORARY => Ok(ChangeType::Temporary),
            constants::change_type::PROB30 => Ok(ChangeType::Prob30),
            constants::change_type::PROB40 => Ok(ChangeType::Prob40),
            constants::change_type::PROB30_TEMPO => Ok(ChangeType::Prob30Tempo),
            constants::change_type::PROB40_TEMPO => Ok(ChangeType::Prob40Tempo),
            constants::change_type::FROM => Ok(ChangeType::From),
            _ => Err(Error::malformed_value(
                "taf_decoded_data",
                "change_type",
                s,
            )),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast parameter a decoded element carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TafParameter {
    WindSpeed,
    WindDirection,
    GustSpeed,
    Visibility,
    CloudAmount,
    CloudBase,
    CbSignificant,
}

impl TafParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TafParameter::WindSpeed => constants::parameter::WIND_SPEED,
            TafParameter::WindDirection => constants::parameter::WIND_DIRECTION,
            TafParameter::GustSpeed => constants::parameter::GUST_SPEED,
            TafParameter::Visibility => constants::parameter::VISIBILITY,
            TafParameter::CloudAmount => constants::parameter::CLOUD_AMOUNT,
            TafParameter::CloudBase => constants::parameter::CLOUD_BASE,
            TafParameter::CbSignificant => constants::parameter::CB_SIGNIFICANT,
        }
    }
}

impl FromStr for TafParameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            constants::parameter::WIND_SPEED => Ok(TafParameter::WindSpeed),
            constants::parameter::WIND_DIRECTION => Ok(TafParameter::WindDirection),
            constants::parameter::GUST_SPEED => Ok(TafParameter::GustSpeed),
            constants::parameter::VISIBILITY => Ok(TafParameter::Visibility),
            constants::parameter::CLOUD_AMOUNT => Ok(TafParameter::CloudAmount),
            constants::parameter::CLOUD_BASE => Ok(TafParameter::CloudBase),
            constants::parameter::CB_SIGNIFICANT => Ok(TafParameter::CbSignificant),
            _ => Err(Error::malformed_value("taf_decoded_data", "parameter", s)),
        }
    }
}

impl fmt::Display for TafParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Decoded Records
// =============================================================================

/// Identity of a forecast issue, shared by header and element rows
///
/// Two decoder rows with equal identity describe the same forecast; the
/// later load replaces the earlier row entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForecastIdentity {
    pub issue_date: CanonicalDate,
    pub issue_time: i32,
    pub issue_station: String,
    pub issue_origin: String,
    pub start_date: CanonicalDate,
    pub start_time: i32,
    pub end_date: CanonicalDate,
    pub end_time: i32,
    pub station_id: String,
    pub status: TafStatus,
}

/// A normalized accepted-TAF header row
#[derive(Debug, Clone, PartialEq)]
pub struct TafHeader {
    pub identity: ForecastIdentity,

    /// Raw TAF text as the bulletin carried it
    pub taf: String,
}

impl TafHeader {
    /// Natural key of the header relation
    pub fn key(&self) -> &ForecastIdentity {
        &self.identity
    }
}

/// A normalized decoded-TAF element row
#[derive(Debug, Clone, PartialEq)]
pub struct TafElement {
    pub identity: ForecastIdentity,
    pub change_type: ChangeType,
    pub parameter: TafParameter,
    pub value: f64,
}

impl TafElement {
    /// Natural key of the element relation
    pub fn key(&self) -> ElementKey {
        ElementKey {
            identity: self.identity.clone(),
            change_type: self.change_type,
            parameter: self.parameter,
        }
    }
}

/// Natural key of the element relation: forecast identity plus the
/// change group and parameter the value belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKey {
    pub identity: ForecastIdentity,
    pub change_type: ChangeType,
    pub parameter: TafParameter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_identity() -> ForecastIdentity {
        ForecastIdentity {
            issue_date: CanonicalDate::valid(NaiveDate::from_ymd_opt(2023, 8, 5).unwrap()),
            issue_time: 1130,
            issue_station: "EGRR".to_string(),
            issue_origin: "MANL".to_string(),
            start_date: CanonicalDate::valid(NaiveDate::from_ymd_opt(2023, 8, 5).unwrap()),
            start_time: 1200,
            end_date: CanonicalDate::valid(NaiveDate::from_ymd_opt(2023, 8, 6).unwrap()),
            end_time: 1800,
            station_id: "EGLL".to_string(),
            status: TafStatus::Original,
        }
    }

    mod source_code_tests {
        use super::*;

        #[test]
        fn test_valid_codes() {
            assert!(SourceCode::new("o2").is_ok());
            assert!(SourceCode::new("ma").is_ok());
            assert!(SourceCode::new("x2").is_ok());
            assert!(SourceCode::new("blend21").is_ok());
        }

        #[test]
        fn test_invalid_codes() {
            assert!(SourceCode::new("").is_err());
            assert!(SourceCode::new("a").is_err());
            assert!(SourceCode::new("O2").is_err());
            assert!(SourceCode::new("o 2").is_err());
            assert!(SourceCode::new("toolongcode1").is_err());
        }

        #[test]
        fn test_store_filename() {
            let code = SourceCode::new("o2").unwrap();
            assert_eq!(code.store_filename(), "o2.db");
        }
    }

    mod source_type_tests {
        use super::*;

        #[test]
        fn test_source_type_creation() {
            let source = SourceType::new("o2", "Open Road v2", "bulletins/o2/{month}/*.txt");
            assert!(source.is_ok());
        }

        #[test]
        fn test_glob_requires_month_placeholder() {
            let source = SourceType::new("o2", "Open Road v2", "bulletins/o2/*.txt");
            assert!(source.is_err());
        }

        #[test]
        fn test_empty_label_rejected() {
            let source = SourceType::new("o2", "  ", "bulletins/{month}/*.txt");
            assert!(source.is_err());
        }

        #[test]
        fn test_bulletin_glob_substitution() {
            let source =
                SourceType::new("o2", "Open Road v2", "bulletins/o2/{month}/*.txt").unwrap();
            assert_eq!(
                source.bulletin_glob_for("202308"),
                "bulletins/o2/202308/*.txt"
            );
        }
    }

    mod source_pair_tests {
        use super::*;

        #[test]
        fn test_pair_code() {
            let pair = SourcePair::new(
                SourceCode::new("o2").unwrap(),
                SourceCode::new("x2").unwrap(),
            );
            assert_eq!(pair.code(), "o2x2");
        }

        #[test]
        fn test_pair_order_is_significant() {
            let forward = SourcePair::new(
                SourceCode::new("o2").unwrap(),
                SourceCode::new("x2").unwrap(),
            );
            let reverse = SourcePair::new(
                SourceCode::new("x2").unwrap(),
                SourceCode::new("o2").unwrap(),
            );
            assert_ne!(forward, reverse);
        }
    }

    mod station_tests {
        use super::*;

        #[test]
        fn test_station_creation_valid() {
            let station = Station::new("EGLL", "Heathrow", 30);
            assert!(station.is_ok());
        }

        #[test]
        fn test_icao_shape_validation() {
            assert!(Station::new("EGL", "Heathrow", 30).is_err());
            assert!(Station::new("egll", "Heathrow", 30).is_err());
            assert!(Station::new("EGLLX", "Heathrow", 30).is_err());
            assert!(Station::new("EG1L", "Heathrow", 30).is_err());
        }

        #[test]
        fn test_horizon_validation() {
            assert!(Station::new("EGLL", "Heathrow", 9).is_ok());
            assert!(Station::new("EGLL", "Heathrow", 24).is_ok());
            assert!(Station::new("EGLL", "Heathrow", 30).is_ok());
            assert!(Station::new("EGLL", "Heathrow", 12).is_err());
            assert!(Station::new("EGLL", "Heathrow", 0).is_err());
        }
    }

    mod canonical_date_tests {
        use super::*;

        #[test]
        fn test_valid_date_round_trip() {
            let date = CanonicalDate::valid(NaiveDate::from_ymd_opt(2023, 8, 5).unwrap());
            assert_eq!(date.to_store_string(), "2023-08-05");
            assert_eq!(
                CanonicalDate::from_store_string("2023-08-05").unwrap(),
                date
            );
        }

        #[test]
        fn test_invalid_sentinel_round_trip() {
            let date = CanonicalDate::invalid();
            assert_eq!(date.to_store_string(), "");
            assert_eq!(CanonicalDate::from_store_string("").unwrap(), date);
            assert!(!date.is_valid());
        }

        #[test]
        fn test_garbage_store_value_rejected() {
            assert!(CanonicalDate::from_store_string("not-a-date").is_err());
        }
    }

    mod vocabulary_tests {
        use super::*;

        #[test]
        fn test_status_round_trip() {
            for value in crate::constants::status::ALL_VALUES {
                let status = TafStatus::from_str(value).unwrap();
                assert_eq!(status.as_str(), *value);
            }
            assert!(TafStatus::from_str("XXX").is_err());
        }

        #[test]
        fn test_change_type_round_trip() {
            for value in crate::constants::change_type::ALL_VALUES {
                let change = ChangeType::from_str(value).unwrap();
                assert_eq!(change.as_str(), *value);
            }
            assert!(ChangeType::from_str("PROB50").is_err());
        }

        #[test]
        fn test_compound_change_types() {
            assert_eq!(
                ChangeType::from_str("PROB30 TEMPO").unwrap(),
                ChangeType::Prob30Tempo
            );
            assert_eq!(
                ChangeType::from_str("PROB40 TEMPO").unwrap(),
                ChangeType::Prob40Tempo
            );
        }

        #[test]
        fn test_parameter_round_trip() {
            for value in crate::constants::parameter::ALL_VALUES {
                let parameter = TafParameter::from_str(value).unwrap();
                assert_eq!(parameter.as_str(), *value);
            }
            assert!(TafParameter::from_str("TMP").is_err());
        }
    }

    mod key_tests {
        use super::*;

        #[test]
        fn test_headers_with_equal_identity_share_key() {
            let first = TafHeader {
                identity: create_test_identity(),
                taf: "TAF EGLL 051130Z ...".to_string(),
            };
            let second = TafHeader {
                identity: create_test_identity(),
                taf: "TAF EGLL 051130Z AMENDED TEXT".to_string(),
            };

            // Raw text is not part of the identity
            assert_eq!(first.key(), second.key());
        }

        #[test]
        fn test_element_key_includes_change_and_parameter() {
            let base = TafElement {
                identity: create_test_identity(),
                change_type: ChangeType::Initial,
                parameter: TafParameter::Visibility,
                value: 9999.0,
            };
            let other_parameter = TafElement {
                parameter: TafParameter::CloudBase,
                ..base.clone()
            };
            let other_change = TafElement {
                change_type: ChangeType::Temporary,
                ..base.clone()
            };

            assert_ne!(base.key(), other_parameter.key());
            assert_ne!(base.key(), other_change.key());
        }

        #[test]
        fn test_element_value_not_part_of_key() {
            let base = TafElement {
                identity: create_test_identity(),
                change_type: ChangeType::Initial,
                parameter: TafParameter::Visibility,
                value: 9999.0,
            };
            let revised = TafElement {
                value: 4000.0,
                ..base.clone()
            };

            assert_eq!(base.key(), revised.key());
        }

        #[test]
        fn test_status_distinguishes_identities() {
            let mut amended = create_test_identity();
            amended.status = TafStatus::Amendment;

            assert_ne!(create_test_identity(), amended);
        }
    }
}

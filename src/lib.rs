//! TAF Processor Library
//!
//! A Rust library for decoding archived TAF bulletins and loading the
//! results into per-source SQLite stores for forecast verification.
//!
//! This library provides tools for:
//! - Gathering raw bulletin files and driving the external TAF decoder
//! - Normalizing decoder CSV output (dates, times, numeric values)
//! - Idempotent conflict-replace loading keyed on forecast identity
//! - Registries for forecast sources and verification stations
//! - Orchestrating independent (source, month) batch units
//! - Driving the external verification statistics tool per station pair

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod decode_adapter;
        pub mod normalizer;
        pub mod orchestrator;
        pub mod pair_selector;
        pub mod source_registry;
        pub mod station_registry;
        pub mod stats_driver;
        pub mod store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{SourcePair, SourceType, Station};
pub use config::Config;

/// Result type alias for the TAF processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for TAF processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// External decoder failed for one batch unit
    #[error("decode failure for source '{source_code}' month {month}: {message}")]
    DecodeFailure {
        source_code: String,
        month: String,
        message: String,
    },

    /// A decoder field could not be cast to its storage type
    #[error("malformed value in {relation}.{field}: '{value}'")]
    MalformedValue {
        relation: String,
        field: String,
        value: String,
    },

    /// A date token was rejected under strict date parsing
    #[error("invalid date token: '{token}'")]
    InvalidDateToken { token: String },

    /// A source code is not present in the source registry
    #[error("unknown source code: '{code}'")]
    UnknownSourceCode { code: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// SQLite store error
    #[error("store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// External statistics driver failed for one invocation
    #[error("statistics driver failed for pair '{pair}', station {station}, month {month}: {message}")]
    StatsDriver {
        pair: String,
        station: String,
        month: String,
        message: String,
    },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Bulletin glob pattern error
    #[error("glob pattern error in '{pattern}': {message}")]
    GlobPattern { pattern: String, message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a decode failure for one (source, month) unit
    pub fn decode_failure(
        source_code: impl Into<String>,
        month: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DecodeFailure {
            source_code: source_code.into(),
            month: month.into(),
            message: message.into(),
        }
    }

    /// Create a malformed value error
    pub fn malformed_value(
        relation: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            relation: relation.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an invalid date token error
    pub fn invalid_date_token(token: impl Into<String>) -> Self {
        Self::InvalidDateToken {
            token: token.into(),
        }
    }

    /// Create an unknown source code error
    pub fn unknown_source_code(code: impl Into<String>) -> Self {
        Self::UnknownSourceCode { code: code.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a store error with a SQLite source
    pub fn store(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a store error with a simple message
    pub fn store_message(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a statistics driver error
    pub fn stats_driver(
        pair: impl Into<String>,
        station: impl Into<String>,
        month: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StatsDriver {
            pair: pair.into(),
            station: station.into(),
            month: month.into(),
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a glob pattern error
    pub fn glob_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GlobPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store {
            message: "SQLite operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<glob::PatternError> for Error {
    fn from(error: glob::PatternError) -> Self {
        Self::GlobPattern {
            pattern: "unknown".to_string(),
            message: error.to_string(),
        }
    }
}

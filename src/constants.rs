//! Application constants for TAF processor
//!
//! This module contains the decoder file contract, store schema names,
//! date/time formats, and vocabulary values used throughout the
//! TAF processor application.

// =============================================================================
// Decoder File Contract
// =============================================================================

/// Concatenated bulletin file the decoder reads from its input directory
pub const DECODER_INPUT_FILENAME: &str = "tafs.txt";

/// Accepted TAF headers written by the decoder (one row per forecast)
pub const ACCEPTED_TAFS_FILENAME: &str = "acceptedTafs.csv";

/// Decoded TAF elements written by the decoder (one row per parameter group)
pub const DECODED_TAFS_FILENAME: &str = "decodedTafs.csv";

/// Bulletins the decoder could not parse, preserved as diagnostics
pub const REJECTED_TAFS_FILENAME: &str = "rejectedTafs.txt";

/// Captured decoder output, preserved per unit
pub const DECODER_STDOUT_FILENAME: &str = "decoder_stdout.log";
pub const DECODER_STDERR_FILENAME: &str = "decoder_stderr.log";

/// Field counts in the decoder CSV rows (no header line is written)
pub const HEADER_FIELD_COUNT: usize = 11;
pub const ELEMENT_FIELD_COUNT: usize = 13;

// =============================================================================
// Store Schema
// =============================================================================

/// Canonical relation holding one row per accepted TAF header
pub const HEADER_TABLE: &str = "taf_data";

/// Canonical relation holding one row per decoded TAF element
pub const ELEMENT_TABLE: &str = "taf_decoded_data";

/// Column names shared by the header and element relations
pub mod columns {
    pub const ISSUE_DATE: &str = "issue_date";
    pub const ISSUE_TIME: &str = "issue_time";
    pub const ISSUE_STATION: &str = "issue_station";
    pub const ISSUE_ORIGIN: &str = "issue_origin";
    pub const START_DATE: &str = "start_date";
    pub const START_TIME: &str = "start_time";
    pub const END_DATE: &str = "end_date";
    pub const END_TIME: &str = "end_time";
    pub const STATION_ID: &str = "station_id";
    pub const STATUS: &str = "status";

    // Header relation only
    pub const TAF: &str = "taf";

    // Element relation only
    pub const CHANGE_TYPE: &str = "change_type";
    pub const PARAMETER: &str = "parameter";
    pub const VALUE: &str = "value";
}

// =============================================================================
// Date and Time Formats
// =============================================================================

/// Dates as the canonical relations store them
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored representation of a date that failed lenient parsing
pub const INVALID_DATE_SENTINEL: &str = "";

/// Century prefix applied to the decoder's two-digit years (valid 2000-2099)
pub const CENTURY_PREFIX: &str = "20";

/// Placeholder substituted with the month key in bulletin glob patterns
pub const MONTH_PLACEHOLDER: &str = "{month}";

/// Window bounds as the statistics driver expects them
pub const DRIVER_DATETIME_FORMAT: &str = "%Y%m%d%H%M";

/// The twelve month abbreviations the decoder emits, in month order
pub const MONTH_ABBREVS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// =============================================================================
// Decoder Vocabulary
// =============================================================================

/// Forecast status values the decoder emits
pub mod status {
    /// Original issue
    pub const ORIGINAL: &str = "ORG";

    /// Correction to an earlier issue
    pub const CORRECTION: &str = "COR";

    /// Amendment to an earlier issue
    pub const AMENDMENT: &str = "AMD";

    /// Both corrected and amended
    pub const BOTH: &str = "BOT";

    pub const ALL_VALUES: &[&str] = &[ORIGINAL, CORRECTION, AMENDMENT, BOTH];
}

/// Change group types the decoder emits
pub mod change_type {
    /// Conditions at the start of the validity period
    pub const INITIAL: &str = "INIT";

    pub const BECOMING: &str = "BECMG";
    pub const TEMPORARY: &str = "TEMPO";
    pub const PROB30: &str = "PROB30";
    pub const PROB40: &str = "PROB40";
    pub const PROB30_TEMPO: &str = "PROB30 TEMPO";
    pub const PROB40_TEMPO: &str = "PROB40 TEMPO";
    pub const FROM: &str = "FM";

    pub const ALL_VALUES: &[&str] = &[
        INITIAL,
        BECOMING,
        TEMPORARY,
        PROB30,
        PROB40,
        PROB30_TEMPO,
        PROB40_TEMPO,
        FROM,
    ];
}

/// Forecast parameters the decoder emits
pub mod parameter {
    pub const WIND_SPEED: &str = "WSP";
    pub const WIND_DIRECTION: &str = "WDR";
    pub const GUST_SPEED: &str = "GSP";
    pub const VISIBILITY: &str = "VIS";
    pub const CLOUD_AMOUNT: &str = "CLA";
    pub const CLOUD_BASE: &str = "CLB";
    pub const CB_SIGNIFICANT: &str = "CBS";

    pub const ALL_VALUES: &[&str] = &[
        WIND_SPEED,
        WIND_DIRECTION,
        GUST_SPEED,
        VISIBILITY,
        CLOUD_AMOUNT,
        CLOUD_BASE,
        CB_SIGNIFICANT,
    ];
}

/// Forecast horizons a verification station may carry, in hours
pub const SUPPORTED_HORIZONS: &[u8] = &[9, 24, 30];

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "taf-processor.toml";

/// Default number of batch units processed concurrently
pub const DEFAULT_PARALLEL_UNITS: usize = 4;

/// SQLite busy timeout, shared by loader connections
pub const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the store filename for a source type code
pub fn store_filename(code: &str) -> String {
    format!("{}.db", code)
}

/// Get the artifact filename for one driver invocation output
///
/// Reliability tables are netCDF files; the uncertainty companions are
/// database files.
pub fn artifact_filename(icao: &str, month: &str, kind: &str) -> String {
    let extension = if kind.ends_with("uncertainty") {
        "db"
    } else {
        "nc"
    };
    format!("{}_{}_{}.{}", icao, month, kind, extension)
}

/// Get the generated driver configuration filename for a pair
pub fn driver_config_filename(pair_code: &str) -> String {
    format!("{}.cfg", pair_code)
}

/// Month number (1-12) for a decoder month abbreviation, if recognized
///
/// The match is exact: tokens in any other casing count as unrecognized,
/// the same as arbitrary three-letter garbage.
pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTH_ABBREVS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

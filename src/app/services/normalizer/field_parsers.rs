//! Field normalization primitives for decoder CSV records
//!
//! The decoder writes headerless CSV with a fixed column order, so fields
//! are addressed by position. Dates arrive as free-text tokens with a
//! two-digit year and trailing padding; the century is fixed by prefixing
//! "20", valid only while every year falls in 2000-2099.

use chrono::NaiveDate;
use csv::StringRecord;

use crate::app::models::CanonicalDate;
use crate::config::DatePolicy;
use crate::constants::{CENTURY_PREFIX, month_number};
use crate::{Error, Result};

/// Get a trimmed field value from a positional CSV record
pub fn get_required_field<'a>(
    record: &'a StringRecord,
    index: usize,
    relation: &str,
    field_name: &str,
) -> Result<&'a str> {
    let value = record.get(index).ok_or_else(|| {
        Error::malformed_value(relation, field_name, format!("<missing field {}>", index))
    })?;
    Ok(value.trim())
}

/// Parse a decoder date token of the form `"DD-Mon-YY"`, ignoring padding
///
/// Returns `None` for anything that does not parse: an unrecognized month
/// abbreviation, a non-numeric day or year, a year token that is not two
/// digits, or a day outside the month.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let mut parts = token.trim().splitn(3, '-');

    let day = parts.next()?.parse::<u32>().ok()?;
    let month = month_number(parts.next()?)?;

    let year_token = parts.next()?;
    if year_token.len() != 2 || !year_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = format!("{CENTURY_PREFIX}{year_token}").parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a decoder date token under the run's date policy
///
/// Lenient parsing loads unparseable tokens as the invalid-date sentinel
/// rather than rejecting the row; strict parsing fails the unit instead.
pub fn normalize_date(token: &str, policy: DatePolicy) -> Result<CanonicalDate> {
    match parse_date_token(token) {
        Some(date) => Ok(CanonicalDate::valid(date)),
        None => match policy {
            DatePolicy::Lenient => Ok(CanonicalDate::invalid()),
            DatePolicy::Strict => Err(Error::invalid_date_token(token.trim())),
        },
    }
}

/// Parse a 4-digit HHMM time token as a plain integer
///
/// The store keeps times as integers, not times of day; consumers must
/// know the HHMM encoding.
pub fn normalize_time(token: &str, relation: &str, field_name: &str) -> Result<i32> {
    let trimmed = token.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| Error::malformed_value(relation, field_name, trimmed))
}

/// Trim surrounding whitespace from a text field
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

/// Cast an element value to a float
pub fn normalize_numeric(token: &str, relation: &str, field_name: &str) -> Result<f64> {
    let trimmed = token.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| Error::malformed_value(relation, field_name, trimmed))
}

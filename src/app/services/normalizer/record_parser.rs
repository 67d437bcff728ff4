//! Individual record parsing for decoder CSV rows
//!
//! Both decoder files share the same first ten columns identifying the
//! forecast issue; element rows append the change type, parameter and
//! value. Identifying fields are denormalized onto every element row so
//! headers and elements merge independently.

use csv::StringRecord;

use super::field_parsers::{
    get_required_field, normalize_date, normalize_numeric, normalize_text, normalize_time,
};
use crate::Result;
use crate::app::models::{
    ChangeType, ForecastIdentity, TafElement, TafHeader, TafParameter, TafStatus,
};
use crate::config::DatePolicy;
use crate::constants::{ELEMENT_TABLE, HEADER_TABLE, columns};

/// Decoder column order, shared by both files for the first ten fields
mod position {
    pub const ISSUE_DATE: usize = 0;
    pub const ISSUE_TIME: usize = 1;
    pub const ISSUE_STATION: usize = 2;
    pub const ISSUE_ORIGIN: usize = 3;
    pub const START_DATE: usize = 4;
    pub const START_TIME: usize = 5;
    pub const END_DATE: usize = 6;
    pub const END_TIME: usize = 7;
    pub const STATION_ID: usize = 8;
    pub const STATUS: usize = 9;

    /// Header rows only
    pub const TAF: usize = 10;

    /// Element rows only
    pub const CHANGE_TYPE: usize = 10;
    pub const PARAMETER: usize = 11;
    pub const VALUE: usize = 12;
}

/// Parse the identifying fields shared by header and element rows
fn parse_identity(
    record: &StringRecord,
    relation: &str,
    policy: DatePolicy,
) -> Result<ForecastIdentity> {
    let status: TafStatus =
        get_required_field(record, position::STATUS, relation, columns::STATUS)?.parse()?;

    Ok(ForecastIdentity {
        issue_date: normalize_date(
            get_required_field(record, position::ISSUE_DATE, relation, columns::ISSUE_DATE)?,
            policy,
        )?,
        issue_time: normalize_time(
            get_required_field(record, position::ISSUE_TIME, relation, columns::ISSUE_TIME)?,
            relation,
            columns::ISSUE_TIME,
        )?,
        issue_station: normalize_text(get_required_field(
            record,
            position::ISSUE_STATION,
            relation,
            columns::ISSUE_STATION,
        )?),
        issue_origin: normalize_text(get_required_field(
            record,
            position::ISSUE_ORIGIN,
            relation,
            columns::ISSUE_ORIGIN,
        )?),
        start_date: normalize_date(
            get_required_field(record, position::START_DATE, relation, columns::START_DATE)?,
            policy,
        )?,
        start_time: normalize_time(
            get_required_field(record, position::START_TIME, relation, columns::START_TIME)?,
            relation,
            columns::START_TIME,
        )?,
        end_date: normalize_date(
            get_required_field(record, position::END_DATE, relation, columns::END_DATE)?,
            policy,
        )?,
        end_time: normalize_time(
            get_required_field(record, position::END_TIME, relation, columns::END_TIME)?,
            relation,
            columns::END_TIME,
        )?,
        station_id: normalize_text(get_required_field(
            record,
            position::STATION_ID,
            relation,
            columns::STATION_ID,
        )?),
        status,
    })
}

/// Parse one accepted-forecast header row
pub fn parse_header_record(record: &StringRecord, policy: DatePolicy) -> Result<TafHeader> {
    let identity = parse_identity(record, HEADER_TABLE, policy)?;
    let taf = normalize_text(get_required_field(
        record,
        position::TAF,
        HEADER_TABLE,
        columns::TAF,
    )?);

    Ok(TafHeader { identity, taf })
}

/// Parse one decoded change-group element row
pub fn parse_element_record(record: &StringRecord, policy: DatePolicy) -> Result<TafElement> {
    let identity = parse_identity(record, ELEMENT_TABLE, policy)?;

    let change_type: ChangeType = get_required_field(
        record,
        position::CHANGE_TYPE,
        ELEMENT_TABLE,
        columns::CHANGE_TYPE,
    )?
    .parse()?;

    let parameter: TafParameter = get_required_field(
        record,
        position::PARAMETER,
        ELEMENT_TABLE,
        columns::PARAMETER,
    )?
    .parse()?;

    let value = normalize_numeric(
        get_required_field(record, position::VALUE, ELEMENT_TABLE, columns::VALUE)?,
        ELEMENT_TABLE,
        columns::VALUE,
    )?;

    Ok(TafElement {
        identity,
        change_type,
        parameter,
        value,
    })
}

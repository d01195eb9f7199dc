//! Time handling utilities for CF time coordinates.
//!
//! CF encodes time as numbers relative to an epoch (`"days since 1970-01-01"`).
//! This module parses those unit strings, decodes values for display labels,
//! and performs the lenient format check used by the metadata validator.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NcError, NcResult};

/// Label format used for every decoded date/time value (second precision).
pub const LABEL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Seconds in a UDUNITS year (tropical year).
const SECONDS_PER_YEAR: f64 = 365.242_198_781 * 86_400.0;

/// Base unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl TimeUnit {
    /// Parse a unit word, accepting singular and plural forms (case-insensitive).
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "second" | "seconds" => Some(Self::Seconds),
            "minute" | "minutes" => Some(Self::Minutes),
            "hour" | "hours" => Some(Self::Hours),
            "day" | "days" => Some(Self::Days),
            "month" | "months" => Some(Self::Months),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    /// Length of one unit in seconds.
    ///
    /// Months and years follow UDUNITS (a month is a twelfth of a year).
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
            Self::Months => SECONDS_PER_YEAR / 12.0,
            Self::Years => SECONDS_PER_YEAR,
        }
    }
}

/// Parsed `<unit> since <epoch>` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: NaiveDateTime,
}

impl TimeUnits {
    /// Parse a CF time units string such as `"hours since 2000-01-01 00:00:00"`.
    pub fn parse(units: &str) -> NcResult<Self> {
        let (unit_word, epoch_text) =
            split_since(units).ok_or_else(|| NcError::InvalidTimeUnits(units.to_string()))?;
        let unit = TimeUnit::from_word(unit_word)
            .ok_or_else(|| NcError::InvalidTimeUnits(units.to_string()))?;
        let epoch =
            parse_epoch(epoch_text).ok_or_else(|| NcError::InvalidTimeUnits(units.to_string()))?;
        Ok(Self { unit, epoch })
    }

    /// Decode a numeric offset into a date/time. Returns `None` for non-finite
    /// values or results outside the representable range.
    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.unit.seconds() * 1_000.0).round();
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let offset = Duration::try_milliseconds(millis as i64)?;
        self.epoch.checked_add_signed(offset)
    }
}

/// Lenient check that a units string has the `<unit> since <epoch>` shape.
///
/// The epoch text itself is not validated, only that it is present.
pub fn is_cf_time_units(units: &str) -> bool {
    match split_since(units) {
        Some((unit_word, _)) => TimeUnit::from_word(unit_word).is_some(),
        None => false,
    }
}

/// Format a date/time as a report label.
pub fn format_label(dt: &NaiveDateTime) -> String {
    dt.format(LABEL_FORMAT).to_string()
}

/// Milliseconds since the Unix epoch, treating `dt` as UTC.
pub fn epoch_millis(dt: &NaiveDateTime) -> i64 {
    Utc.from_utc_datetime(dt).timestamp_millis()
}

/// Split `"<unit> since <rest>"` into its unit word and non-empty remainder.
fn split_since(units: &str) -> Option<(&str, &str)> {
    let mut parts = units.trim_start().splitn(2, char::is_whitespace);
    let unit_word = parts.next()?;
    let rest = parts.next()?.trim_start();
    let keyword = rest.get(..5)?;
    if !keyword.eq_ignore_ascii_case("since") {
        return None;
    }
    let after = &rest[5..];
    // "since" must be followed by whitespace and a non-empty epoch
    if !after.starts_with(char::is_whitespace) {
        return None;
    }
    let epoch = after.trim();
    if epoch.is_empty() {
        return None;
    }
    Some((unit_word, epoch))
}

fn parse_epoch(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim().trim_end_matches('Z').trim_end_matches(" UTC");

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    // Date only, possibly without zero padding ("1-1-1")
    let date_part = trimmed.split_whitespace().next()?;
    let mut fields = date_part.splitn(3, '-');
    let year = fields.next()?.parse::<i32>().ok()?;
    let month = fields.next()?.parse::<u32>().ok()?;
    let day = fields.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

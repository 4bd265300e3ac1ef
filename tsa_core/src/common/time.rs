use chrono::{NaiveDate, NaiveDateTime};

use crate::common::tsa_error::{TsaError, TsaResult};

/// Parse a row date.
///
/// Supports "YYYY-MM-DD", "YYYY-MM-DD HH:MM:SS" (optionally followed by a
/// UTC offset such as "+00:00") and "YYYYMMDD". The time of day is dropped:
/// the index is one row per trading day.
pub fn parse_date(time_str: &str) -> TsaResult<NaiveDate> {
    let s = time_str.trim();
    let err = || TsaError::Parse {
        what: "date",
        input: time_str.to_string(),
    };

    if !s.contains('-') {
        return NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| err());
    }
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| err());
    }
    // Anything longer carries a time part; an offset suffix is ignored.
    let head = s.get(..19).ok_or_else(err)?;
    NaiveDateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| err())
}

/// Check that a date index is strictly increasing
pub fn is_strictly_increasing(dates: &[NaiveDate]) -> bool {
    dates.windows(2).all(|w| w[0] < w[1])
}

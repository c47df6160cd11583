//! Input validation for currency codes, dates, and date ranges.
//!
//! These checks run before any network activity. Code validation is a
//! shape check only; whether a code is actually supported is left to the
//! service. Date validation deliberately keeps the permissive day pattern
//! of the upstream service contract: a day component like `39` passes the
//! format check and is then rejected as an unsupported date.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ExchangeError;

/// Earliest date the service has data for.
pub const MIN_DATE: &str = "1999-01-04";

/// Maximum allowed span between the bounds of a time frame, in hours.
/// Spans strictly greater than this are rejected.
const MAX_TIMEFRAME_HOURS: f64 = 8759.992992006;

lazy_static! {
    static ref DATE_FORMAT: Regex =
        Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-[0-3]\d$").expect("date pattern is valid");
    static ref OLDEST_DATE: NaiveDate =
        NaiveDate::from_ymd_opt(1999, 1, 4).expect("minimum date is valid");
}

/// Validate the shape of a single currency or cryptocurrency code.
///
/// Accepts any 3-character string; no charset or case check.
pub fn validate_code(code: &str) -> Result<(), ExchangeError> {
    if code.chars().count() != 3 {
        return Err(ExchangeError::InvalidCode(code.to_string()));
    }
    Ok(())
}

/// Validate every code in a symbol list, failing on the first violation.
pub fn validate_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<(), ExchangeError> {
    for symbol in symbols {
        validate_code(symbol.as_ref())?;
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` date string and its minimum bound.
///
/// Format violations (including month 00 or 13+) fail with
/// [`ExchangeError::InvalidDateFormat`]. Dates before 1999-01-04, and
/// pattern-valid but calendar-invalid days, fail with
/// [`ExchangeError::InvalidDate`].
pub fn validate_date(date: &str) -> Result<(), ExchangeError> {
    if !DATE_FORMAT.is_match(date) {
        return Err(ExchangeError::InvalidDateFormat(date.to_string()));
    }
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ExchangeError::InvalidDate(date.to_string()))?;
    if parsed < *OLDEST_DATE {
        return Err(ExchangeError::InvalidDate(date.to_string()));
    }
    Ok(())
}

/// Validate the ordering and span of a `(start, end)` date range.
///
/// Fails with [`ExchangeError::InvalidTimeFrame`] when the bounds are
/// flipped or unparseable, and with [`ExchangeError::TimeframeExceeded`]
/// when the span exceeds 365 days.
pub fn validate_time_frame(start: &str, end: &str) -> Result<(), ExchangeError> {
    let flipped = || ExchangeError::InvalidTimeFrame {
        start: start.to_string(),
        end: end.to_string(),
    };
    let from = NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|_| flipped())?;
    let to = NaiveDate::parse_from_str(end, "%Y-%m-%d").map_err(|_| flipped())?;

    if to < from {
        return Err(flipped());
    }

    let span_hours = to.signed_duration_since(from).num_seconds() as f64 / 3600.0;
    if span_hours > MAX_TIMEFRAME_HOURS {
        return Err(ExchangeError::TimeframeExceeded {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(())
}

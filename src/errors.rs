//! Error types for the exchange rate client.
//!
//! Every fallible operation in this crate returns [`ExchangeError`].
//! Validation errors are raised before any network activity; transport
//! errors propagate unchanged; API-declared failures and response-shape
//! mismatches are reported as distinct variants.

use thiserror::Error;

/// Errors that can occur while building, issuing, or decoding a request.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The currency code does not have exactly 3 characters.
    #[error("invalid currency code: {0:?}")]
    InvalidCode(String),

    /// The date string is not in `YYYY-MM-DD` form.
    #[error("date must be formatted as YYYY-MM-DD, got {0:?}")]
    InvalidDateFormat(String),

    /// The date is before the service's earliest supported date.
    #[error("oldest supported date is 1999-01-04, got {0:?}")]
    InvalidDate(String),

    /// The end of a date range precedes its start.
    #[error("start date {start} must not be after end date {end}")]
    InvalidTimeFrame {
        /// Requested range start
        start: String,
        /// Requested range end
        end: String,
    },

    /// The date range spans more than 365 days.
    #[error("maximum allowed timeframe is 365 days ({start} to {end})")]
    TimeframeExceeded {
        /// Requested range start
        start: String,
        /// Requested range end
        end: String,
    },

    /// The API answered with `success: false` (or no `success` field).
    /// `detail` carries the body's `error` payload when the service
    /// provided one.
    #[error("unknown API error{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    ApiFailure {
        /// Raw `error` payload from the response body, if any
        detail: Option<String>,
    },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP error: {status}")]
    Http {
        /// Status code of the response
        status: reqwest::StatusCode,
    },

    /// A network-level error occurred while talking to the service.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// A request URL could not be assembled.
    #[error("invalid request URL: {0}")]
    Url(String),
}

//! Typed extraction from the service's JSON response shapes.
//!
//! Every endpoint family shares the `{"success": bool, ...}` envelope;
//! the payload under it differs. Numbers are deserialized straight into
//! [`Decimal`] through serde_json's arbitrary-precision representation,
//! never through an `f64`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::ExchangeError;

/// Verify the `success` envelope field. A missing or non-`true` value
/// fails with [`ExchangeError::ApiFailure`], carrying the body's `error`
/// payload when one is present.
pub fn check_success(body: &Value) -> Result<(), ExchangeError> {
    match body.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(()),
        _ => Err(ExchangeError::ApiFailure {
            detail: body.get("error").map(Value::to_string),
        }),
    }
}

/// Decode a listing payload: `{field: {CODE: {attribute: string}}}`.
/// Used by the `/symbols` and `/cryptocurrencies` endpoints.
pub fn decode_listing(
    body: &Value,
    field: &str,
) -> Result<HashMap<String, HashMap<String, String>>, ExchangeError> {
    extract(body, field)
}

/// Decode a flat rate map: `{rates: {CODE: number}}`. Used by the
/// latest and historical endpoints.
pub fn decode_rates(body: &Value) -> Result<HashMap<String, Decimal>, ExchangeError> {
    extract(body, "rates")
}

/// Decode a single converted amount: `{result: number}`.
pub fn decode_result(body: &Value) -> Result<Decimal, ExchangeError> {
    extract(body, "result")
}

/// Decode a two-level rate map: `{rates: {key: {CODE: number}}}`.
/// Timeseries responses key the outer map by date, fluctuation
/// responses by symbol.
pub fn decode_series(
    body: &Value,
) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
    extract(body, "rates")
}

fn extract<T: serde::de::DeserializeOwned>(body: &Value, field: &str) -> Result<T, ExchangeError> {
    let payload = body
        .get(field)
        .ok_or_else(|| ExchangeError::Decode(format!("missing `{field}` field")))?;
    serde_json::from_value(payload.clone())
        .map_err(|e| ExchangeError::Decode(format!("malformed `{field}` field: {e}")))
}

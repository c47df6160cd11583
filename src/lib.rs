//! Typed client for the exchangerate.host currency and
//! cryptocurrency rate API.
//!
//! # Overview
//!
//! The crate exposes one entry point, [`Exchange`], which composes:
//! - input validation (currency-code shape, date shape and minimum,
//!   date-range ordering and span),
//! - deterministic query serialization,
//! - a TTL response cache keyed by the fully resolved request URL,
//! - typed decoding of the service's JSON shapes into
//!   [`rust_decimal::Decimal`] values.
//!
//! ```text
//! caller --> Exchange --> Query::apply --> ResponseCache
//!                                |  (miss)     |
//!                                v             |
//!                            Transport ------->+--> typed result
//!                                          decode
//! ```
//!
//! Every accessor issues at most one GET and returns either one typed
//! result or one [`ExchangeError`]; validation failures surface before
//! any network activity.
//!
//! # Example
//!
//! ```ignore
//! use exchangerate_client::Exchange;
//!
//! let exchange = Exchange::new("USD");
//! let rates = exchange.latest_rates_multiple(&["EUR", "JPY"]).await?;
//! let eur = exchange.convert_to("EUR", 10).await?;
//! ```

pub mod cache;
pub mod decode;
pub mod errors;
pub mod exchange;
pub mod query;
pub mod transport;
pub mod validation;

pub use cache::{ExpiryPolicy, ResponseCache};
pub use errors::ExchangeError;
pub use exchange::{Exchange, DEFAULT_BASE_URL};
pub use query::Query;
pub use transport::{HttpTransport, Transport};
pub use validation::{validate_code, validate_date, validate_symbols, validate_time_frame};

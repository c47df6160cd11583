//! The `Exchange` facade: configuration, the request pipeline, and the
//! per-endpoint accessors.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use reqwest::Url;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::cache::{ExpiryPolicy, ResponseCache};
use crate::decode;
use crate::errors::ExchangeError;
use crate::query::Query;
use crate::transport::{HttpTransport, Transport};
use crate::validation::{validate_code, validate_date};

/// Service host every request is issued against.
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

/// Client for the exchangerate.host API.
///
/// Holds the configured base currency and a response cache; every
/// accessor issues at most one GET and returns either one typed result
/// or one error.
///
/// # Example
///
/// ```ignore
/// let exchange = Exchange::new("USD");
/// let eur = exchange.convert_to("EUR", 10).await?;
/// ```
pub struct Exchange {
    base: String,
    cache_enabled: bool,
    cache: ResponseCache,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl Exchange {
    /// Create a client with the given base currency. Caching is enabled
    /// and entries refresh daily, when the service republishes rates.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            cache_enabled: true,
            cache: ResponseCache::default(),
            transport: Arc::new(HttpTransport::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Replace the transport, keeping all other configuration.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the cache with one using the given expiry policy.
    pub fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.cache = ResponseCache::new(policy);
        self
    }

    /// Point the client at a different service host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The configured base currency.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Set a new base currency. Invalid codes are rejected without
    /// mutating the current configuration.
    pub fn set_base(&mut self, base: &str) -> Result<(), ExchangeError> {
        validate_code(base)?;
        self.base = base.to_string();
        Ok(())
    }

    /// Enable or disable response caching. Takes effect on the next
    /// call; existing entries are kept.
    pub fn set_cache(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
    }

    /// Serialize, consult the cache, fetch, and envelope-check one
    /// request. Returns the parsed body shared with the cache.
    async fn fetch(&self, path: &str, query: &Query) -> Result<Arc<Value>, ExchangeError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ExchangeError::Url(e.to_string()))?;
        query.apply(&mut url)?;

        let cache_key = url.to_string();
        if self.cache_enabled {
            if let Some(body) = self.cache.get(&cache_key) {
                debug!("cache hit for {cache_key}");
                return Ok(body);
            }
        }

        debug!("GET {url}");
        let text = self.transport.get(&url).await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ExchangeError::Decode(format!("response is not valid JSON: {e}")))?;
        decode::check_success(&body)?;

        let body = Arc::new(body);
        if self.cache_enabled {
            self.cache.put(cache_key, body.clone());
        }
        Ok(body)
    }

    async fn fetch_listing(
        &self,
        path: &str,
        field: &str,
    ) -> Result<HashMap<String, HashMap<String, String>>, ExchangeError> {
        let body = self.fetch(path, &Query::default()).await?;
        decode::decode_listing(&body, field)
    }

    async fn fetch_rates(
        &self,
        path: &str,
        query: Query,
    ) -> Result<HashMap<String, Decimal>, ExchangeError> {
        let body = self.fetch(path, &query).await?;
        decode::decode_rates(&body)
    }

    async fn fetch_series(
        &self,
        path: &str,
        query: Query,
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        let body = self.fetch(path, &query).await?;
        decode::decode_series(&body)
    }

    /// Sorted list of supported forex currency codes.
    pub async fn forex_codes(&self) -> Result<Vec<String>, ExchangeError> {
        let listing = self.fetch_listing("symbols", "symbols").await?;
        Ok(sorted_keys(&listing))
    }

    /// Supported forex currencies with their descriptive attributes.
    pub async fn forex_data(
        &self,
    ) -> Result<HashMap<String, HashMap<String, String>>, ExchangeError> {
        self.fetch_listing("symbols", "symbols").await
    }

    /// Sorted list of supported cryptocurrency codes.
    pub async fn crypto_codes(&self) -> Result<Vec<String>, ExchangeError> {
        let listing = self
            .fetch_listing("cryptocurrencies", "cryptocurrencies")
            .await?;
        Ok(sorted_keys(&listing))
    }

    /// Supported cryptocurrencies with their descriptive attributes.
    pub async fn crypto_data(
        &self,
    ) -> Result<HashMap<String, HashMap<String, String>>, ExchangeError> {
        self.fetch_listing("cryptocurrencies", "cryptocurrencies")
            .await
    }

    /// Latest rates for all supported currencies against the base.
    pub async fn latest_rates_all(&self) -> Result<HashMap<String, Decimal>, ExchangeError> {
        self.fetch_rates(
            "latest",
            Query {
                base: Some(self.base.clone()),
                ..Query::default()
            },
        )
        .await
    }

    /// Latest rates for the given symbols against the base.
    pub async fn latest_rates_multiple(
        &self,
        symbols: &[&str],
    ) -> Result<HashMap<String, Decimal>, ExchangeError> {
        self.fetch_rates(
            "latest",
            Query {
                base: Some(self.base.clone()),
                symbols: to_owned_symbols(symbols),
                ..Query::default()
            },
        )
        .await
    }

    /// Latest rate for a single symbol against the base.
    pub async fn latest_rate(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        let rates = self.latest_rates_multiple(&[symbol]).await?;
        take_rate(rates, symbol)
    }

    /// Convert `amount` from the base currency into `target` at the
    /// latest rate.
    pub async fn convert_to(&self, target: &str, amount: u64) -> Result<Decimal, ExchangeError> {
        let body = self
            .fetch(
                "convert",
                &Query {
                    from: Some(self.base.clone()),
                    to: Some(target.to_string()),
                    amount: Some(amount),
                    ..Query::default()
                },
            )
            .await?;
        decode::decode_result(&body)
    }

    /// Convert `amount` from the base currency into `target` at the
    /// rate of a historical date.
    pub async fn convert_at(
        &self,
        date: &str,
        target: &str,
        amount: u64,
    ) -> Result<Decimal, ExchangeError> {
        let body = self
            .fetch(
                "convert",
                &Query {
                    from: Some(self.base.clone()),
                    to: Some(target.to_string()),
                    amount: Some(amount),
                    date: Some(date.to_string()),
                    ..Query::default()
                },
            )
            .await?;
        decode::decode_result(&body)
    }

    /// Rates for all supported currencies against the base on a
    /// historical date.
    pub async fn historical_rates_all(
        &self,
        date: &str,
    ) -> Result<HashMap<String, Decimal>, ExchangeError> {
        validate_date(date)?;
        self.fetch_rates(
            date,
            Query {
                base: Some(self.base.clone()),
                ..Query::default()
            },
        )
        .await
    }

    /// Rates for the given symbols against the base on a historical
    /// date.
    pub async fn historical_rates_multiple(
        &self,
        date: &str,
        symbols: &[&str],
    ) -> Result<HashMap<String, Decimal>, ExchangeError> {
        validate_date(date)?;
        self.fetch_rates(
            date,
            Query {
                base: Some(self.base.clone()),
                symbols: to_owned_symbols(symbols),
                ..Query::default()
            },
        )
        .await
    }

    /// Rate for a single symbol against the base on a historical date.
    pub async fn historical_rate(
        &self,
        date: &str,
        symbol: &str,
    ) -> Result<Decimal, ExchangeError> {
        let rates = self.historical_rates_multiple(date, &[symbol]).await?;
        take_rate(rates, symbol)
    }

    /// Day-by-day rates for all supported currencies over a date range.
    pub async fn timeseries_all(
        &self,
        start: &str,
        end: &str,
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        self.fetch_series("timeseries", self.time_frame_query(start, end, &[]))
            .await
    }

    /// Day-by-day rates for the given symbols over a date range.
    pub async fn timeseries_multiple(
        &self,
        start: &str,
        end: &str,
        symbols: &[&str],
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        self.fetch_series("timeseries", self.time_frame_query(start, end, symbols))
            .await
    }

    /// Day-by-day rates for a single symbol over a date range.
    pub async fn timeseries_single(
        &self,
        start: &str,
        end: &str,
        symbol: &str,
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        self.fetch_series("timeseries", self.time_frame_query(start, end, &[symbol]))
            .await
    }

    /// Rate fluctuation for all supported currencies over a date range.
    pub async fn fluctuation_all(
        &self,
        start: &str,
        end: &str,
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        self.fetch_series("fluctuation", self.time_frame_query(start, end, &[]))
            .await
    }

    /// Rate fluctuation for the given symbols over a date range.
    pub async fn fluctuation_multiple(
        &self,
        start: &str,
        end: &str,
        symbols: &[&str],
    ) -> Result<HashMap<String, HashMap<String, Decimal>>, ExchangeError> {
        self.fetch_series("fluctuation", self.time_frame_query(start, end, symbols))
            .await
    }

    /// Fluctuation fields (`start_rate`, `end_rate`, `change`,
    /// `change_pct`) for a single symbol over a date range.
    pub async fn fluctuation_single(
        &self,
        start: &str,
        end: &str,
        symbol: &str,
    ) -> Result<HashMap<String, Decimal>, ExchangeError> {
        let mut series = self
            .fetch_series("fluctuation", self.time_frame_query(start, end, &[symbol]))
            .await?;
        series
            .remove(symbol)
            .ok_or_else(|| ExchangeError::Decode(format!("no fluctuation data for `{symbol}`")))
    }

    fn time_frame_query(&self, start: &str, end: &str, symbols: &[&str]) -> Query {
        Query {
            base: Some(self.base.clone()),
            time_frame: Some((start.to_string(), end.to_string())),
            symbols: to_owned_symbols(symbols),
            ..Query::default()
        }
    }
}

fn to_owned_symbols(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

fn sorted_keys(listing: &HashMap<String, HashMap<String, String>>) -> Vec<String> {
    let mut codes: Vec<String> = listing.keys().cloned().collect();
    codes.sort();
    codes
}

fn take_rate(
    mut rates: HashMap<String, Decimal>,
    symbol: &str,
) -> Result<Decimal, ExchangeError> {
    rates
        .remove(symbol)
        .ok_or_else(|| ExchangeError::Decode(format!("no rate for `{symbol}` in response")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_base_rejects_invalid_code_without_mutating() {
        let mut exchange = Exchange::new("USD");
        let result = exchange.set_base("EURO");
        assert!(matches!(result, Err(ExchangeError::InvalidCode(_))));
        assert_eq!(exchange.base(), "USD");
    }

    #[test]
    fn set_base_accepts_valid_code() {
        let mut exchange = Exchange::new("USD");
        exchange.set_base("EUR").unwrap();
        assert_eq!(exchange.base(), "EUR");
    }
}

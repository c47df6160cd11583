//! Request parameter model and its serialization onto a URL.

use reqwest::Url;

use crate::errors::ExchangeError;
use crate::validation::{validate_code, validate_date, validate_time_frame};

/// All possible request parameters. Absent fields produce no query
/// parameter; construction via struct update on `Query::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Base currency the rates are expressed against.
    pub base: Option<String>,
    /// Source currency for conversions.
    pub from: Option<String>,
    /// Target currency for conversions.
    pub to: Option<String>,
    /// Amount to convert. An amount of 1 is the service default and is
    /// not sent.
    pub amount: Option<u64>,
    /// Symbols to restrict the response to, in caller order.
    pub symbols: Vec<String>,
    /// Single date for historical conversions.
    pub date: Option<String>,
    /// `(start, end)` date range for timeseries and fluctuation.
    pub time_frame: Option<(String, String)>,
}

impl Query {
    /// Serialize this query onto `url`, validating each field just
    /// before it is appended. Parameter order is fixed: `base`, `from`,
    /// `to`, `amount`, `symbols`, then either `date` or
    /// `start_date`/`end_date`. The first validation failure aborts and
    /// leaves `url` partially extended; callers treat the whole URL as
    /// discarded on error.
    pub fn apply(&self, url: &mut Url) -> Result<(), ExchangeError> {
        if let Some(base) = &self.base {
            validate_code(base)?;
            url.query_pairs_mut().append_pair("base", base);
        }

        if let Some(from) = &self.from {
            validate_code(from)?;
            url.query_pairs_mut().append_pair("from", from);
        }

        if let Some(to) = &self.to {
            validate_code(to)?;
            url.query_pairs_mut().append_pair("to", to);
        }

        // amount == 1 is the service default; sending it would only
        // bloat the cache key space.
        if let Some(amount) = self.amount {
            if amount > 1 {
                url.query_pairs_mut()
                    .append_pair("amount", &amount.to_string());
            }
        }

        if !self.symbols.is_empty() {
            url.query_pairs_mut()
                .append_pair("symbols", &self.symbols.join(","));
        }

        if let Some(date) = &self.date {
            validate_date(date)?;
            url.query_pairs_mut().append_pair("date", date);
        }

        if let Some((start, end)) = &self.time_frame {
            validate_date(start)?;
            validate_time_frame(start, end)?;
            url.query_pairs_mut()
                .append_pair("start_date", start)
                .append_pair("end_date", end);
        }

        Ok(())
    }
}

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Daily closing prices for one asset, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    symbol: String,
    prices: BTreeMap<NaiveDate, f64>,
}

impl AssetSeries {
    /// Build a series from `(date, close)` observations.
    ///
    /// Later observations for the same date replace earlier ones. Prices must be
    /// finite and strictly positive.
    pub fn new<I>(symbol: impl Into<String>, observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "asset symbol must not be empty".to_string(),
            ));
        }

        let mut prices = BTreeMap::new();
        for (date, price) in observations {
            if !price.is_finite() || price <= 0.0 {
                return Err(AnalyticsError::InvalidInput(format!(
                    "{}: price on {} must be positive, got {}",
                    symbol, date, price
                )));
            }
            prices.insert(date, price);
        }

        Ok(Self { symbol, prices })
    }

    /// A series with no observations, used when retrieval fails.
    pub fn empty(symbol: impl Into<String>) -> Result<Self> {
        Self::new(symbol, std::iter::empty())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.prices.get(&date).copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.prices.keys().copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.prices.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.prices.keys().next_back().copied()
    }
}

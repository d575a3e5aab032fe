//! Price retrieval seam.
//!
//! The engine only needs a complete series per symbol; how it is obtained is up
//! to the [`PriceSource`] implementation.

use crate::market_data::AssetSeries;
use crate::portfolio::PortfolioDefinition;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait PriceSource {
    fn fetch(&self, symbol: &str) -> Result<AssetSeries>;
}

/// Reads `<dir>/<SYMBOL>.json`, an object mapping `YYYY-MM-DD` to closing price.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol))
    }
}

impl PriceSource for JsonFileSource {
    fn fetch(&self, symbol: &str) -> Result<AssetSeries> {
        let path = self.path_for(symbol);
        debug!("Reading prices for {} from {}", symbol, path.display());
        parse_price_file(symbol, &path)
    }
}

fn parse_price_file(symbol: &str, path: &Path) -> Result<AssetSeries> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_price_json(symbol, &raw).with_context(|| format!("invalid price file {}", path.display()))
}

/// Parse a `{"YYYY-MM-DD": close, ...}` document into a series.
pub fn parse_price_json(symbol: &str, raw: &str) -> Result<AssetSeries> {
    let closes: BTreeMap<NaiveDate, f64> = serde_json::from_str(raw)?;
    Ok(AssetSeries::new(symbol, closes)?)
}

/// Fetch a series for every holding. A failed fetch becomes an empty series so
/// the builder drops that asset instead of failing the run.
pub fn fetch_all<S>(source: &S, definition: &PortfolioDefinition) -> Result<Vec<AssetSeries>>
where
    S: PriceSource + ?Sized,
{
    definition
        .holdings()
        .iter()
        .map(|h| fetch_or_empty(source, h.symbol()))
        .collect()
}

/// Fetch one symbol, substituting an empty series on failure.
pub fn fetch_or_empty<S>(source: &S, symbol: &str) -> Result<AssetSeries>
where
    S: PriceSource + ?Sized,
{
    match source.fetch(symbol) {
        Ok(series) => Ok(series),
        Err(e) => {
            warn!("Failed to fetch prices for {}: {:#}", symbol, e);
            Ok(AssetSeries::empty(symbol)?)
        }
    }
}

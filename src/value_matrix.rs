//! Price matrix builder.
//!
//! Aligns per-asset closing prices on the dates every retained asset shares and
//! turns them into market values (price × quantity). The portfolio total is
//! always derived from the asset cells, never stored on its own.

use crate::error::{AnalyticsError, Diagnostic, Result};
use crate::market_data::AssetSeries;
use crate::portfolio::Holding;
use chrono::NaiveDate;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Label of the derived portfolio total column.
pub const TOTAL_VALUE: &str = "TotalValue";

/// Time-aligned market values, one row per common date and one column per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMatrix {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    values: Array2<f64>,
}

impl ValueMatrix {
    pub fn rows(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Asset value cells, shaped `(rows, assets)`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn value(&self, row: usize, symbol: &str) -> Option<f64> {
        let col = self.column_index(symbol)?;
        self.values.get((row, col)).copied()
    }

    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        let col = self.column_index(symbol)?;
        Some(self.values.column(col))
    }

    fn column_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Row-wise sum of the asset columns.
    pub fn total_value(&self) -> Array1<f64> {
        self.values.sum_axis(Axis(1))
    }

    /// `TotalValue` as `(date, value)` pairs, ready for charting.
    pub fn total_value_series(&self) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .copied()
            .zip(self.total_value().to_vec())
            .collect()
    }

    pub fn latest_total_value(&self) -> Option<f64> {
        let last = self.rows().checked_sub(1)?;
        Some(self.values.row(last).sum())
    }
}

/// A built matrix together with the assets that were dropped on the way.
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    pub matrix: ValueMatrix,
    pub warnings: Vec<Diagnostic>,
}

/// Build the value matrix for `holdings` from already-fetched `series`.
///
/// A holding whose series is missing or empty is dropped with an
/// [`Diagnostic::EmptySeries`] warning. The date index is the strict
/// intersection of the retained series' dates, ascending.
pub fn build_value_matrix(holdings: &[Holding], series: &[AssetSeries]) -> Result<MatrixBuild> {
    if holdings.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio { dropped: vec![] });
    }

    let mut seen = HashSet::new();
    for holding in holdings {
        if !seen.insert(holding.symbol()) {
            return Err(AnalyticsError::InvalidInput(format!(
                "duplicate holding for {}",
                holding.symbol()
            )));
        }
    }

    let mut by_symbol: HashMap<&str, &AssetSeries> = HashMap::with_capacity(series.len());
    for s in series {
        if by_symbol.insert(s.symbol(), s).is_some() {
            return Err(AnalyticsError::InvalidInput(format!(
                "duplicate price series for {}",
                s.symbol()
            )));
        }
    }

    let mut retained: Vec<(&Holding, &AssetSeries)> = Vec::with_capacity(holdings.len());
    let mut warnings = Vec::new();
    let mut dropped = Vec::new();

    for holding in holdings {
        match by_symbol.get(holding.symbol()) {
            Some(s) if !s.is_empty() => retained.push((holding, *s)),
            _ => {
                warn!("Dropping {}: no price data", holding.symbol());
                warnings.push(Diagnostic::EmptySeries {
                    symbol: holding.symbol().to_string(),
                });
                dropped.push(holding.symbol().to_string());
            }
        }
    }

    for s in series {
        if !seen.contains(s.symbol()) {
            debug!("Ignoring price series for {}: not held", s.symbol());
        }
    }

    if retained.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio { dropped });
    }

    let dates = common_dates(retained.iter().map(|(_, s)| *s));
    if dates.is_empty() {
        let assets = retained.iter().map(|(h, _)| h.symbol().to_string()).collect();
        return Err(AnalyticsError::Alignment { assets });
    }

    // Every date in `dates` is present in each retained series.
    let values = Array2::from_shape_fn((dates.len(), retained.len()), |(row, col)| {
        let (holding, s) = retained[col];
        s.price_on(dates[row]).unwrap_or_default() * holding.quantity()
    });

    let symbols: Vec<String> = retained.iter().map(|(h, _)| h.symbol().to_string()).collect();

    info!(
        "Aligned {} asset(s) on {} common date(s) ({} dropped)",
        symbols.len(),
        dates.len(),
        dropped.len()
    );

    Ok(MatrixBuild {
        matrix: ValueMatrix {
            dates,
            symbols,
            values,
        },
        warnings,
    })
}

/// Dates present in every series, ascending.
fn common_dates<'a, I>(series: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a AssetSeries>,
{
    let mut iter = series.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut common: BTreeSet<NaiveDate> = first.dates().collect();
    for s in iter {
        common.retain(|d| s.price_on(*d).is_some());
    }
    common.into_iter().collect()
}

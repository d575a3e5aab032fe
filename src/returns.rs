//! Day-over-day simple returns derived from a [`ValueMatrix`].

use crate::error::{AnalyticsError, Result};
use crate::stats::simple_return;
use crate::value_matrix::{TOTAL_VALUE, ValueMatrix};
use chrono::NaiveDate;
use log::debug;
use std::fmt;

/// Identifies a returns column: one held asset or the portfolio total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Asset(String),
    Total,
}

impl ColumnId {
    pub fn name(&self) -> &str {
        match self {
            ColumnId::Asset(symbol) => symbol,
            ColumnId::Total => TOTAL_VALUE,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Defined daily returns of one column, keyed by returns-row index.
///
/// Rows whose change is undefined (zero prior value) are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnColumn {
    pub id: ColumnId,
    observations: Vec<(usize, f64)>,
}

impl ReturnColumn {
    pub fn observations(&self) -> &[(usize, f64)] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|(_, r)| *r).collect()
    }

    pub fn get(&self, row: usize) -> Option<f64> {
        self.observations
            .binary_search_by_key(&row, |(i, _)| *i)
            .ok()
            .map(|idx| self.observations[idx].1)
    }

    pub fn defined_count(&self) -> usize {
        self.observations.len()
    }
}

/// One presentation row of the returns matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub cells: Vec<Option<f64>>,
}

/// Simple daily returns for every asset column plus `TotalValue`.
///
/// Row `i` holds the change from value-matrix row `i` to row `i + 1` and is
/// dated with the later day, so there is exactly one fewer row than the
/// value matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsMatrix {
    dates: Vec<NaiveDate>,
    columns: Vec<ReturnColumn>,
}

impl ReturnsMatrix {
    /// Derive returns from `matrix`; at least two rows are required.
    pub fn from_values(matrix: &ValueMatrix) -> Result<Self> {
        let rows = matrix.rows();
        if rows < 2 {
            return Err(AnalyticsError::InsufficientData { rows });
        }

        let values = matrix.values();
        let mut columns: Vec<ReturnColumn> = matrix
            .symbols()
            .iter()
            .enumerate()
            .map(|(col, symbol)| {
                let column = values.column(col);
                ReturnColumn {
                    id: ColumnId::Asset(symbol.clone()),
                    observations: pairwise_returns(column.iter().copied()),
                }
            })
            .collect();

        columns.push(ReturnColumn {
            id: ColumnId::Total,
            observations: pairwise_returns(matrix.total_value().iter().copied()),
        });

        for column in &columns {
            let undefined = rows - 1 - column.defined_count();
            if undefined > 0 {
                debug!("{}: {} undefined return(s) excluded", column.id, undefined);
            }
        }

        Ok(Self {
            dates: matrix.dates()[1..].to_vec(),
            columns,
        })
    }

    pub fn rows(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[ReturnColumn] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> Option<&ReturnColumn> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn asset_columns(&self) -> impl Iterator<Item = &ReturnColumn> {
        self.columns
            .iter()
            .filter(|c| matches!(c.id, ColumnId::Asset(_)))
    }

    pub fn total_column(&self) -> Option<&ReturnColumn> {
        self.column(&ColumnId::Total)
    }

    /// The last `n` rows, every column, oldest first.
    pub fn tail(&self, n: usize) -> Vec<ReturnRow> {
        let start = self.rows().saturating_sub(n);
        (start..self.rows())
            .map(|row| ReturnRow {
                date: self.dates[row],
                cells: self.columns.iter().map(|c| c.get(row)).collect(),
            })
            .collect()
    }
}

fn pairwise_returns<I>(values: I) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().collect();
    values
        .windows(2)
        .enumerate()
        .filter_map(|(row, w)| simple_return(w[0], w[1]).map(|r| (row, r)))
        .collect()
}

use crate::error::{Diagnostic, Stat, UnavailableReason};
use crate::returns::{ReturnColumn, ReturnsMatrix};
use crate::stats::pearson_correlation;
use log::{debug, warn};
use ndarray::Array2;

/// Pairwise Pearson correlation of held assets' daily returns.
///
/// Symmetric by construction. The diagonal is exactly 1.0 for every asset with
/// at least two defined returns; assets with fewer have their whole row and
/// column marked unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Array2<Stat>,
}

impl CorrelationMatrix {
    /// Correlate every asset column of `returns` (the `TotalValue` column is excluded).
    pub fn from_returns(returns: &ReturnsMatrix) -> (Self, Vec<Diagnostic>) {
        let columns: Vec<&ReturnColumn> = returns.asset_columns().collect();
        let n = columns.len();
        let mut diagnostics = Vec::new();

        let usability: Vec<Option<UnavailableReason>> = columns
            .iter()
            .map(|c| match c.defined_count() {
                0 => Some(UnavailableReason::NoDefinedReturns),
                1 => Some(UnavailableReason::TooFewReturns),
                _ => None,
            })
            .collect();

        for (column, unusable) in columns.iter().zip(&usability) {
            if let Some(reason) = unusable {
                warn!("{}: correlation unavailable ({})", column.id, reason);
                diagnostics.push(Diagnostic::StatUnavailable {
                    column: column.id.to_string(),
                    statistic: "correlation",
                    reason: *reason,
                });
            }
        }

        let mut values = Array2::from_elem(
            (n, n),
            Stat::Unavailable(UnavailableReason::NoDefinedReturns),
        );

        for i in 0..n {
            if let Some(reason) = usability[i] {
                for j in 0..n {
                    values[[i, j]] = Stat::Unavailable(reason);
                    values[[j, i]] = Stat::Unavailable(reason);
                }
                continue;
            }

            values[[i, i]] = Stat::Available(1.0);

            for j in (i + 1)..n {
                if usability[j].is_some() {
                    continue;
                }
                let correlation = paired_correlation(columns[i], columns[j]);
                if let Stat::Unavailable(reason) = correlation {
                    debug!(
                        "Correlation {} / {} unavailable ({})",
                        columns[i].id, columns[j].id, reason
                    );
                }
                values[[i, j]] = correlation;
                values[[j, i]] = correlation;
            }
        }

        let labels = columns.iter().map(|c| c.id.to_string()).collect();
        (Self { labels, values }, diagnostics)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<Stat> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[[i, j]])
    }

    pub fn get_by_index(&self, i: usize, j: usize) -> Option<Stat> {
        self.values.get((i, j)).copied()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Sub-matrix over the given labels, in the given order. Unknown labels are skipped.
    pub fn restricted_to(&self, labels: &[String]) -> Self {
        let indices: Vec<usize> = labels.iter().filter_map(|l| self.index_of(l)).collect();
        let values = Array2::from_shape_fn((indices.len(), indices.len()), |(i, j)| {
            self.values[[indices[i], indices[j]]]
        });
        Self {
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
            values,
        }
    }
}

/// Correlation restricted to rows where both columns have a defined return.
fn paired_correlation(a: &ReturnColumn, b: &ReturnColumn) -> Stat {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .observations()
        .iter()
        .filter_map(|&(row, x)| b.get(row).map(|y| (x, y)))
        .unzip();
    pearson_correlation(&xs, &ys)
}

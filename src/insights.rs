use crate::error::{Stat, UnavailableReason};
use crate::returns::ReturnRow;
use crate::risk::RiskReport;
use crate::stats::mean_of_available;
use crate::value_matrix::ValueMatrix;
use chrono::NaiveDate;

/// Headline figures handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioInsights {
    pub latest_total_value: f64,
    /// Column labels for `recent_returns` cells: assets, then `TotalValue`.
    pub return_columns: Vec<String>,
    pub recent_returns: Vec<ReturnRow>,
    /// Mean of the available annualized volatilities over all assets and the total.
    pub average_volatility: Stat,
    pub value_series: Vec<(NaiveDate, f64)>,
}

impl PortfolioInsights {
    pub fn from_run(matrix: &ValueMatrix, report: &RiskReport, window: usize) -> Self {
        let volatilities = report
            .assets
            .iter()
            .map(|a| a.stats.annualized_volatility)
            .chain(std::iter::once(report.portfolio.annualized_volatility));

        let average_volatility = match mean_of_available(volatilities) {
            Some(v) => Stat::Available(v),
            None => Stat::Unavailable(UnavailableReason::NoDefinedReturns),
        };

        Self {
            latest_total_value: matrix.latest_total_value().unwrap_or_default(),
            return_columns: report
                .returns
                .columns()
                .iter()
                .map(|c| c.id.to_string())
                .collect(),
            recent_returns: report.returns.tail(window),
            average_volatility,
            value_series: matrix.total_value_series(),
        }
    }
}

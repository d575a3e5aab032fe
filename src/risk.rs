//! Returns and risk calculator.
//!
//! Produces per-column annualized return, volatility and Sharpe ratio, plus the
//! correlation matrix of held assets. Columns that cannot be measured are
//! reported as unavailable and the rest of the run continues.

use crate::correlation::CorrelationMatrix;
use crate::error::{Diagnostic, Result, Stat};
use crate::returns::{ColumnId, ReturnColumn, ReturnsMatrix};
use crate::stats::{annualized_mean_return, annualized_volatility, sharpe_ratio};
use crate::value_matrix::ValueMatrix;
use log::{info, warn};

/// Annualized risk/return figures for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskStats {
    pub annualized_mean_return: Stat,
    pub annualized_volatility: Stat,
    pub sharpe_ratio: Stat,
}

impl RiskStats {
    pub fn from_returns(returns: &[f64]) -> Self {
        let annualized_mean_return = annualized_mean_return(returns);
        let annualized_volatility = annualized_volatility(returns);
        Self {
            annualized_mean_return,
            annualized_volatility,
            sharpe_ratio: sharpe_ratio(annualized_mean_return, annualized_volatility),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.annualized_mean_return.is_available()
            && self.annualized_volatility.is_available()
            && self.sharpe_ratio.is_available()
    }
}

/// Risk figures for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRisk {
    pub symbol: String,
    pub stats: RiskStats,
}

/// Everything the calculator derives from a value matrix.
#[derive(Debug, Clone)]
pub struct RiskReport {
    pub returns: ReturnsMatrix,
    /// In value-matrix column order.
    pub assets: Vec<AssetRisk>,
    pub portfolio: RiskStats,
    pub correlation: CorrelationMatrix,
    pub diagnostics: Vec<Diagnostic>,
}

impl RiskReport {
    pub fn asset(&self, symbol: &str) -> Option<&RiskStats> {
        self.assets
            .iter()
            .find(|a| a.symbol == symbol)
            .map(|a| &a.stats)
    }
}

/// Run the calculator over `matrix`. Fails only when fewer than two rows exist.
pub fn analyze(matrix: &ValueMatrix) -> Result<RiskReport> {
    let returns = ReturnsMatrix::from_values(matrix)?;
    let mut diagnostics = Vec::new();

    let mut assets = Vec::new();
    let mut portfolio = None;

    for column in returns.columns() {
        let stats = column_stats(column, &mut diagnostics);
        match &column.id {
            ColumnId::Asset(symbol) => assets.push(AssetRisk {
                symbol: symbol.clone(),
                stats,
            }),
            ColumnId::Total => portfolio = Some(stats),
        }
    }

    // ReturnsMatrix always carries a total column; fall back to an empty measurement.
    let portfolio = portfolio.unwrap_or_else(|| RiskStats::from_returns(&[]));

    let (correlation, correlation_diagnostics) = CorrelationMatrix::from_returns(&returns);
    diagnostics.extend(correlation_diagnostics);

    info!(
        "Analysed {} return row(s) across {} asset(s); {} statistic(s) unavailable",
        returns.rows(),
        assets.len(),
        diagnostics.len()
    );

    Ok(RiskReport {
        returns,
        assets,
        portfolio,
        correlation,
        diagnostics,
    })
}

fn column_stats(column: &ReturnColumn, diagnostics: &mut Vec<Diagnostic>) -> RiskStats {
    let stats = RiskStats::from_returns(&column.values());

    let named = [
        ("annualized mean return", stats.annualized_mean_return),
        ("annualized volatility", stats.annualized_volatility),
        ("sharpe ratio", stats.sharpe_ratio),
    ];
    for (statistic, value) in named {
        if let Stat::Unavailable(reason) = value {
            warn!("{}: {} unavailable ({})", column.id, statistic, reason);
            diagnostics.push(Diagnostic::StatUnavailable {
                column: column.id.to_string(),
                statistic,
                reason,
            });
        }
    }

    stats
}

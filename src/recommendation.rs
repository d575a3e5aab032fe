//! Recommendation engine.
//!
//! Ranks held assets by Sharpe ratio and by how little they move with the rest
//! of the portfolio. Only held assets are considered; there is no external
//! candidate universe.

use crate::correlation::CorrelationMatrix;
use crate::error::{Diagnostic, Stat, UnavailableReason};
use crate::risk::AssetRisk;
use log::{debug, warn};
use std::cmp::Ordering;

/// How many assets the diversification ranking keeps.
pub const DIVERSIFICATION_TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SharpeRank {
    pub symbol: String,
    pub sharpe_ratio: Stat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiversificationRank {
    pub symbol: String,
    pub mean_correlation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Descending by Sharpe ratio; unavailable ratios last, in input order.
    pub by_sharpe: Vec<SharpeRank>,
    /// Ascending by mean correlation to the other holdings, at most
    /// [`DIVERSIFICATION_TOP_K`] entries.
    pub by_diversification: Vec<DiversificationRank>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build both rankings from per-asset risk and the held-asset correlation matrix.
pub fn recommend(assets: &[AssetRisk], correlation: &CorrelationMatrix) -> Recommendation {
    let by_sharpe = rank_by_sharpe(assets);
    let symbols: Vec<String> = assets.iter().map(|a| a.symbol.clone()).collect();
    let (by_diversification, diagnostics) =
        rank_by_diversification(&correlation.restricted_to(&symbols), DIVERSIFICATION_TOP_K);

    Recommendation {
        by_sharpe,
        by_diversification,
        diagnostics,
    }
}

/// Stable descending sort by Sharpe ratio.
pub fn rank_by_sharpe(assets: &[AssetRisk]) -> Vec<SharpeRank> {
    let mut ranked: Vec<SharpeRank> = assets
        .iter()
        .map(|a| SharpeRank {
            symbol: a.symbol.clone(),
            sharpe_ratio: a.stats.sharpe_ratio,
        })
        .collect();

    ranked.sort_by(|a, b| compare_sharpe_descending(a.sharpe_ratio, b.sharpe_ratio));
    ranked
}

fn compare_sharpe_descending(a: Stat, b: Stat) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Mean off-diagonal correlation per asset, ascending, truncated to `top_k`.
///
/// Unavailable pairs are left out of an asset's mean. An asset with no
/// available pair at all is not ranked and is reported instead.
pub fn rank_by_diversification(
    correlation: &CorrelationMatrix,
    top_k: usize,
) -> (Vec<DiversificationRank>, Vec<Diagnostic>) {
    let n = correlation.len();
    let mut ranked = Vec::with_capacity(n);
    let mut diagnostics = Vec::new();

    if n < 2 {
        debug!("Diversification ranking needs at least two holdings, have {}", n);
        return (ranked, diagnostics);
    }

    for (i, symbol) in correlation.labels().iter().enumerate() {
        let others: Vec<f64> = (0..n)
            .filter(|&j| j != i)
            .filter_map(|j| correlation.get_by_index(i, j).and_then(|s| s.value()))
            .collect();

        if others.is_empty() {
            warn!("{}: no correlation to other holdings, not ranked", symbol);
            diagnostics.push(Diagnostic::StatUnavailable {
                column: symbol.clone(),
                statistic: "mean correlation",
                reason: UnavailableReason::InsufficientOverlap,
            });
            continue;
        }

        ranked.push(DiversificationRank {
            symbol: symbol.clone(),
            mean_correlation: others.iter().sum::<f64>() / others.len() as f64,
        });
    }

    ranked.sort_by(|a, b| {
        a.mean_correlation
            .partial_cmp(&b.mean_correlation)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_k);

    (ranked, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskStats;

    fn asset(symbol: &str, sharpe: Stat) -> AssetRisk {
        AssetRisk {
            symbol: symbol.to_string(),
            stats: RiskStats {
                annualized_mean_return: Stat::Available(0.1),
                annualized_volatility: Stat::Available(0.2),
                sharpe_ratio: sharpe,
            },
        }
    }

    fn symbols(ranked: &[SharpeRank]) -> Vec<&str> {
        ranked.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn test_sharpe_descending_with_unavailable_last() {
        let unavailable = Stat::Unavailable(UnavailableReason::ZeroVolatility);
        let assets = vec![
            asset("N1", unavailable),
            asset("LOW", Stat::Available(0.2)),
            asset("N2", unavailable),
            asset("HIGH", Stat::Available(1.4)),
            asset("MID", Stat::Available(0.7)),
        ];

        let ranked = rank_by_sharpe(&assets);
        assert_eq!(symbols(&ranked), vec!["HIGH", "MID", "LOW", "N1", "N2"]);
    }

    #[test]
    fn test_sharpe_ties_keep_input_order() {
        let assets = vec![
            asset("B", Stat::Available(0.5)),
            asset("A", Stat::Available(0.5)),
            asset("C", Stat::Available(0.9)),
        ];
        let ranked = rank_by_sharpe(&assets);
        assert_eq!(symbols(&ranked), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_negative_sharpe_ranks_below_positive() {
        let assets = vec![
            asset("NEG", Stat::Available(-0.3)),
            asset("POS", Stat::Available(0.1)),
        ];
        assert_eq!(symbols(&rank_by_sharpe(&assets)), vec!["POS", "NEG"]);
    }
}

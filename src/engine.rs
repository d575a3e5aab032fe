use crate::error::{Diagnostic, Result};
use crate::insights::PortfolioInsights;
use crate::market_data::AssetSeries;
use crate::portfolio::PortfolioDefinition;
use crate::recommendation::{Recommendation, recommend};
use crate::risk::{RiskReport, analyze};
use crate::value_matrix::{ValueMatrix, build_value_matrix};
use log::info;

/// Output of one analytics run.
#[derive(Debug, Clone)]
pub struct AnalyticsRun {
    pub matrix: ValueMatrix,
    pub report: RiskReport,
    pub recommendation: Recommendation,
    /// Warnings from every stage, in stage order.
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalyticsRun {
    pub fn insights(&self, window: usize) -> PortfolioInsights {
        PortfolioInsights::from_run(&self.matrix, &self.report, window)
    }
}

/// Build the value matrix, measure risk, and rank holdings.
///
/// Pure function of its inputs. Only alignment, insufficient data and invalid
/// input abort the run; everything else lands in `diagnostics`.
pub fn run_analytics(
    definition: &PortfolioDefinition,
    series: &[AssetSeries],
) -> Result<AnalyticsRun> {
    info!("Running analytics for {} holding(s)", definition.len());

    let build = build_value_matrix(definition.holdings(), series)?;
    let report = analyze(&build.matrix)?;
    let recommendation = recommend(&report.assets, &report.correlation);

    let mut diagnostics = build.warnings;
    diagnostics.extend(report.diagnostics.iter().cloned());
    diagnostics.extend(recommendation.diagnostics.iter().cloned());

    Ok(AnalyticsRun {
        matrix: build.matrix,
        report,
        recommendation,
        diagnostics,
    })
}

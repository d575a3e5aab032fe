use anyhow::Result;
use chrono::NaiveDate;
use portfolio_insights::recommendation::DIVERSIFICATION_TOP_K;
use portfolio_insights::{
    AnalyticsError, AssetSeries, Diagnostic, PortfolioDefinition, Stat, UnavailableReason,
    run_analytics,
};

#[cfg(test)]
mod engine_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn series(symbol: &str, points: &[(u32, f64)]) -> AssetSeries {
        AssetSeries::new(symbol, points.iter().map(|(d, p)| (day(*d), *p))).unwrap()
    }

    fn consecutive(symbol: &str, prices: &[f64]) -> AssetSeries {
        AssetSeries::new(
            symbol,
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| (day(i as u32 + 1), *p)),
        )
        .unwrap()
    }

    #[test]
    fn test_value_matrix_rows_for_two_assets() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("X", 10.0)?
            .with_holding("Y", 5.0)?;
        let data = vec![
            series("X", &[(1, 100.0), (2, 102.0), (3, 101.0)]),
            series("Y", &[(1, 50.0), (2, 50.0), (3, 55.0)]),
        ];

        let run = run_analytics(&definition, &data)?;
        let matrix = &run.matrix;

        assert_eq!(matrix.dates(), &[day(1), day(2), day(3)]);
        assert_eq!(matrix.column("X").unwrap().to_vec(), vec![1000.0, 1020.0, 1010.0]);
        assert_eq!(matrix.column("Y").unwrap().to_vec(), vec![250.0, 250.0, 275.0]);
        assert_eq!(matrix.total_value().to_vec(), vec![1250.0, 1270.0, 1285.0]);
        assert_eq!(run.report.returns.rows(), 2);
        assert!(run.diagnostics.iter().all(|d| !matches!(d, Diagnostic::EmptySeries { .. })));

        Ok(())
    }

    #[test]
    fn test_empty_series_is_dropped_with_warning() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("X", 10.0)?
            .with_holding("EMPTY", 3.0)?;
        let data = vec![
            series("X", &[(1, 100.0), (2, 102.0), (3, 101.0)]),
            AssetSeries::empty("EMPTY")?,
        ];

        let run = run_analytics(&definition, &data)?;

        assert_eq!(run.matrix.symbols(), &["X".to_string()]);
        assert_eq!(run.matrix.total_value().to_vec(), vec![1000.0, 1020.0, 1010.0]);
        assert!(run.diagnostics.contains(&Diagnostic::EmptySeries {
            symbol: "EMPTY".to_string()
        }));

        Ok(())
    }

    #[test]
    fn test_disjoint_dates_fail_alignment() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("X", 1.0)?
            .with_holding("Y", 1.0)?;
        let data = vec![
            series("X", &[(1, 100.0), (2, 101.0)]),
            series("Y", &[(3, 50.0), (4, 51.0)]),
        ];

        let err = run_analytics(&definition, &data).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::Alignment {
                assets: vec!["X".to_string(), "Y".to_string()]
            }
        );
        assert!(err.to_string().contains("X"));
        assert!(err.to_string().contains("Y"));

        Ok(())
    }

    #[test]
    fn test_single_common_date_is_insufficient() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("X", 1.0)?
            .with_holding("Y", 1.0)?;
        let data = vec![
            series("X", &[(1, 100.0), (2, 101.0)]),
            series("Y", &[(2, 50.0), (3, 51.0)]),
        ];

        let err = run_analytics(&definition, &data).unwrap_err();
        assert_eq!(err, AnalyticsError::InsufficientData { rows: 1 });

        Ok(())
    }

    #[test]
    fn test_flat_prices_make_sharpe_unavailable() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("MOVER", 1.0)?
            .with_holding("FLAT", 4.0)?;
        let data = vec![
            consecutive("MOVER", &[10.0, 10.5, 10.2, 10.9]),
            consecutive("FLAT", &[25.0, 25.0, 25.0, 25.0]),
        ];

        let run = run_analytics(&definition, &data)?;
        let flat = run.report.asset("FLAT").unwrap();

        assert_eq!(flat.annualized_volatility, Stat::Available(0.0));
        assert_eq!(
            flat.sharpe_ratio,
            Stat::Unavailable(UnavailableReason::ZeroVolatility)
        );

        // FLAT sorts after every asset with a defined ratio
        let order: Vec<&str> = run
            .recommendation
            .by_sharpe
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(order, vec!["MOVER", "FLAT"]);

        Ok(())
    }

    #[test]
    fn test_diversification_top_three_of_five() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("A", 1.0)?
            .with_holding("B", 2.0)?
            .with_holding("C", 1.5)?
            .with_holding("D", 3.0)?
            .with_holding("E", 1.0)?;
        let data = vec![
            consecutive("A", &[10.0, 10.4, 10.1, 10.8, 10.6, 11.0, 10.7]),
            consecutive("B", &[20.0, 20.9, 20.1, 21.5, 21.0, 22.1, 21.3]),
            consecutive("C", &[30.0, 29.5, 30.4, 29.9, 30.8, 30.1, 31.0]),
            consecutive("D", &[40.0, 40.2, 39.7, 40.9, 40.1, 40.6, 41.2]),
            consecutive("E", &[50.0, 49.0, 50.5, 51.5, 50.2, 49.8, 50.9]),
        ];

        let run = run_analytics(&definition, &data)?;
        let ranked = &run.recommendation.by_diversification;

        assert_eq!(ranked.len(), DIVERSIFICATION_TOP_K);
        for pair in ranked.windows(2) {
            assert!(pair[0].mean_correlation <= pair[1].mean_correlation);
        }

        // means exclude the unit self-correlation
        let correlation = &run.report.correlation;
        for rank in ranked {
            let others: Vec<f64> = correlation
                .labels()
                .iter()
                .filter(|l| **l != rank.symbol)
                .map(|l| correlation.get(&rank.symbol, l).unwrap().value().unwrap())
                .collect();
            let expected = others.iter().sum::<f64>() / others.len() as f64;
            assert!((rank.mean_correlation - expected).abs() < 1e-12);
        }

        Ok(())
    }

    #[test]
    fn test_fewer_than_four_holdings_return_all() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("A", 1.0)?
            .with_holding("B", 1.0)?;
        let data = vec![
            consecutive("A", &[10.0, 10.4, 10.1, 10.8]),
            consecutive("B", &[20.0, 19.5, 20.6, 20.2]),
        ];

        let run = run_analytics(&definition, &data)?;
        assert_eq!(run.recommendation.by_diversification.len(), 2);

        Ok(())
    }

    #[test]
    fn test_single_holding_has_no_diversification_ranking() -> Result<()> {
        let definition = PortfolioDefinition::new().with_holding("A", 1.0)?;
        let data = vec![consecutive("A", &[10.0, 10.4, 10.1, 10.8])];

        let run = run_analytics(&definition, &data)?;
        assert!(run.recommendation.by_diversification.is_empty());
        assert_eq!(run.recommendation.by_sharpe.len(), 1);

        Ok(())
    }

    #[test]
    fn test_insights_report_latest_value() -> Result<()> {
        let definition = PortfolioDefinition::new()
            .with_holding("X", 10.0)?
            .with_holding("Y", 5.0)?;
        let data = vec![
            series("X", &[(1, 100.0), (2, 102.0), (3, 101.0)]),
            series("Y", &[(1, 50.0), (2, 50.0), (3, 55.0)]),
        ];

        let run = run_analytics(&definition, &data)?;
        let insights = run.insights(5);

        assert_eq!(insights.latest_total_value, 1285.0);
        assert_eq!(insights.recent_returns.len(), 2);
        assert_eq!(
            insights.value_series,
            vec![(day(1), 1250.0), (day(2), 1270.0), (day(3), 1285.0)]
        );
        assert!(insights.average_volatility.is_available());

        Ok(())
    }
}

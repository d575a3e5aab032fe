//! Portfolio analytics engine.
//!
//! Aligns per-asset daily closing prices into a value matrix, derives returns,
//! annualized risk and Sharpe ratios, correlates held assets, and ranks them by
//! risk-adjusted return and diversification.
//!
//! Data flows one way: [`value_matrix`] → [`risk`] → [`recommendation`], tied
//! together by [`engine::run_analytics`].

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod insights;
pub mod market_data;
pub mod portfolio;
pub mod recommendation;
pub mod returns;
pub mod risk;
pub mod source;
pub mod stats;
pub mod value_matrix;

pub use engine::{AnalyticsRun, run_analytics};
pub use error::{AnalyticsError, Diagnostic, Stat, UnavailableReason};
pub use market_data::AssetSeries;
pub use portfolio::{Holding, PortfolioDefinition};

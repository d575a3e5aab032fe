//! Error and diagnostic types shared by every analytics stage.
//!
//! Fatal conditions abort a run through [`AnalyticsError`]. Everything else is
//! collected as a [`Diagnostic`] and handed back next to the successful result.

use std::fmt;

/// Conditions that abort the current analytics run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("no common trading dates across assets: {}", assets.join(", "))]
    Alignment { assets: Vec<String> },

    #[error("insufficient data: {rows} aligned row(s), at least 2 are required")]
    InsufficientData { rows: usize },

    #[error("no usable price series (dropped: {})", dropped.join(", "))]
    EmptyPortfolio { dropped: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The column has no defined daily return at all.
    NoDefinedReturns,
    /// Fewer defined returns than the statistic needs.
    TooFewReturns,
    /// Annualized volatility is exactly zero.
    ZeroVolatility,
    /// One side of a correlation pair never moves.
    ZeroVariance,
    /// Two columns share fewer than two rows with defined returns.
    InsufficientOverlap,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnavailableReason::NoDefinedReturns => "no defined returns",
            UnavailableReason::TooFewReturns => "too few returns",
            UnavailableReason::ZeroVolatility => "zero volatility",
            UnavailableReason::ZeroVariance => "zero variance",
            UnavailableReason::InsufficientOverlap => "insufficient overlapping returns",
        };
        f.write_str(text)
    }
}

/// A statistic that is either a finite number or explicitly unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    Available(f64),
    Unavailable(UnavailableReason),
}

impl Stat {
    pub fn value(&self) -> Option<f64> {
        match self {
            Stat::Available(v) => Some(*v),
            Stat::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Stat::Available(_))
    }

    pub fn reason(&self) -> Option<UnavailableReason> {
        match self {
            Stat::Available(_) => None,
            Stat::Unavailable(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Available(v) => write!(f, "{:.4}", v),
            Stat::Unavailable(reason) => write!(f, "n/a ({})", reason),
        }
    }
}

/// Non-fatal conditions recorded while a run proceeds.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An asset contributed no prices and was dropped from the portfolio.
    EmptySeries { symbol: String },
    /// A statistic for one column could not be computed.
    StatUnavailable {
        column: String,
        statistic: &'static str,
        reason: UnavailableReason,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptySeries { symbol } => {
                write!(f, "{}: empty price series, asset dropped", symbol)
            }
            Diagnostic::StatUnavailable {
                column,
                statistic,
                reason,
            } => write!(f, "{}: {} unavailable ({})", column, statistic, reason),
        }
    }
}

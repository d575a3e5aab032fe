use crate::error::{Stat, UnavailableReason};
use statrs::statistics::Statistics;

/// Trading days in a year, used for every annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Risk-free rate used by the Sharpe ratio. Fixed at zero; not configurable.
pub const RISK_FREE_RATE: f64 = 0.0;

/// Simple fractional change between two consecutive values.
///
/// Undefined when the prior value is zero.
pub fn simple_return(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let r = (current - previous) / previous;
    r.is_finite().then_some(r)
}

/// Annualized mean of daily returns: `mean × 252`.
pub fn annualized_mean_return(returns: &[f64]) -> Stat {
    if returns.is_empty() {
        return Stat::Unavailable(UnavailableReason::NoDefinedReturns);
    }
    Stat::Available(returns.mean() * TRADING_DAYS_PER_YEAR)
}

/// Annualized volatility: sample (n-1) standard deviation × √252.
pub fn annualized_volatility(returns: &[f64]) -> Stat {
    match returns.len() {
        0 => Stat::Unavailable(UnavailableReason::NoDefinedReturns),
        1 => Stat::Unavailable(UnavailableReason::TooFewReturns),
        _ => Stat::Available(returns.std_dev() * TRADING_DAYS_PER_YEAR.sqrt()),
    }
}

/// Sharpe ratio from already-annualized mean return and volatility.
///
/// Zero volatility yields `Unavailable(ZeroVolatility)` rather than a division by zero.
/// Volatility within rounding noise of the mean counts as zero.
pub fn sharpe_ratio(annualized_mean: Stat, annualized_volatility: Stat) -> Stat {
    let (mean, vol) = match (annualized_mean, annualized_volatility) {
        (Stat::Available(mean), Stat::Available(vol)) => (mean, vol),
        (Stat::Unavailable(reason), _) | (_, Stat::Unavailable(reason)) => {
            return Stat::Unavailable(reason);
        }
    };

    if vol <= f64::EPSILON * mean.abs().max(1.0) * TRADING_DAYS_PER_YEAR.sqrt() {
        return Stat::Unavailable(UnavailableReason::ZeroVolatility);
    }

    Stat::Available((mean - RISK_FREE_RATE) / vol)
}

/// Pearson correlation of two equally long samples.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Stat {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.len() < 2 {
        return Stat::Unavailable(UnavailableReason::InsufficientOverlap);
    }

    let sd_x = xs.std_dev();
    let sd_y = ys.std_dev();
    if is_rounding_noise(sd_x, xs) || is_rounding_noise(sd_y, ys) {
        return Stat::Unavailable(UnavailableReason::ZeroVariance);
    }

    let correlation = xs.covariance(ys) / (sd_x * sd_y);
    if !correlation.is_finite() {
        return Stat::Unavailable(UnavailableReason::ZeroVariance);
    }

    // Rounding can push a perfectly correlated pair just past ±1.
    Stat::Available(correlation.clamp(-1.0, 1.0))
}

/// A standard deviation no larger than float rounding on the sample's magnitude.
fn is_rounding_noise(sd: f64, sample: &[f64]) -> bool {
    let magnitude = sample.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    sd <= f64::EPSILON * magnitude.max(1.0)
}

/// Arithmetic mean of the available values, if any.
pub fn mean_of_available<I>(stats: I) -> Option<f64>
where
    I: IntoIterator<Item = Stat>,
{
    let values: Vec<f64> = stats.into_iter().filter_map(|s| s.value()).collect();
    if values.is_empty() {
        return None;
    }
    Some((&values).mean())
}

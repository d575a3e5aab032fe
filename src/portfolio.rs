use crate::error::{AnalyticsError, Result};

/// An asset symbol paired with the quantity held.
///
/// Only constructible through [`Holding::new`], so every holding is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    symbol: String,
    quantity: f64,
}

impl Holding {
    /// Fractional quantities are allowed; negative or non-finite ones are not.
    pub fn new(symbol: impl Into<String>, quantity: f64) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "holding symbol must not be empty".to_string(),
            ));
        }
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "{}: quantity must be a non-negative number, got {}",
                symbol, quantity
            )));
        }
        Ok(Self { symbol, quantity })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}

/// Snapshot of the holdings for a single analytics run.
///
/// Rebuilt from caller input each run; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioDefinition {
    holdings: Vec<Holding>,
}

impl PortfolioDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a holding, or replace the quantity of a symbol already present.
    /// Insertion order is preserved.
    pub fn with_holding(mut self, symbol: impl Into<String>, quantity: f64) -> Result<Self> {
        let holding = Holding::new(symbol, quantity)?;
        match self.holdings.iter_mut().find(|h| h.symbol == holding.symbol) {
            Some(existing) => existing.quantity = holding.quantity,
            None => self.holdings.push(holding),
        }
        Ok(self)
    }

    pub fn without_holding(mut self, symbol: &str) -> Self {
        self.holdings.retain(|h| h.symbol != symbol);
        self
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn quantity_of(&self, symbol: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.symbol == symbol)
            .map(|h| h.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }
}

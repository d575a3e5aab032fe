use crate::portfolio::PortfolioDefinition;
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub holdings: Vec<HoldingConfig>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_recent_returns_window")]
    pub recent_returns_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingConfig {
    pub symbol: String,
    pub quantity: f64,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_recent_returns_window() -> usize {
    5 // last five trading days
}

impl PortfolioConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_file("config.json")
    }

    /// Load from `path`, falling back to the default portfolio when the file is missing.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No configuration at {}, using defaults", path);
                Self::default_config_json()?
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path));
            }
        };

        let config: PortfolioConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("failed to parse configuration {}", path))?;
        Ok(config)
    }

    fn default_config_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::default())?)
    }

    /// Snapshot the configured holdings for one run.
    pub fn portfolio_definition(&self) -> Result<PortfolioDefinition> {
        let mut definition = PortfolioDefinition::new();
        for holding in &self.holdings {
            definition = definition.with_holding(holding.symbol.trim(), holding.quantity)?;
        }
        Ok(definition)
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            holdings: vec![HoldingConfig {
                symbol: "AAPL".to_string(),
                quantity: 10.0,
            }],
            data_dir: default_data_dir(),
            recent_returns_window: default_recent_returns_window(),
        }
    }
}

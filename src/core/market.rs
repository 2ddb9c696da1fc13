use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::PlannerError;

/// Annual S&P 500-pattern returns, 1950 onwards. Illustrative data, sliced
/// from the start whenever a realistic return path is needed.
pub const CANONICAL_HISTORICAL_RETURNS: [f64; 72] = [
    0.31, 0.18, -0.25, 0.37, 0.23, -0.09, 0.20, 0.32, -0.03, 0.30, //
    0.07, 0.10, 0.01, 0.37, 0.22, -0.06, 0.31, 0.18, 0.05, 0.16, //
    -0.38, 0.26, 0.15, 0.02, 0.16, 0.32, 0.13, 0.01, 0.12, 0.21, //
    -0.11, -0.13, -0.23, 0.29, 0.11, 0.04, 0.10, 0.15, 0.05, -0.37, //
    0.26, 0.15, 0.02, 0.16, 0.32, 0.13, 0.01, 0.12, 0.21, 0.28, //
    0.10, 0.04, 0.15, 0.05, -0.07, 0.20, 0.31, 0.18, 0.05, 0.16, //
    -0.09, 0.12, 0.00, 0.16, 0.31, 0.28, 0.21, -0.04, 0.07, 0.10, //
    0.13, 0.01,
];

/// Flat rate at which missed contributions are assumed to have compounded.
pub const ASSUMED_CATCH_UP_RETURN: f64 = 0.07;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketAssumptions {
    pub historical_returns: Vec<f64>,
    pub catch_up_return: f64,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            historical_returns: CANONICAL_HISTORICAL_RETURNS.to_vec(),
            catch_up_return: ASSUMED_CATCH_UP_RETURN,
        }
    }
}

impl MarketAssumptions {
    pub fn from_json_str(json: &str) -> Result<Self, PlannerError> {
        let assumptions: Self = serde_json::from_str(json)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PlannerError> {
        let raw = fs::read_to_string(path)?;
        let assumptions = Self::from_json_str(&raw)?;
        log::info!(
            "loaded {} historical returns from {}",
            assumptions.historical_returns.len(),
            path.display()
        );
        Ok(assumptions)
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.historical_returns.is_empty() {
            return Err(PlannerError::InvalidAssumptions(
                "historicalReturns must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .historical_returns
            .iter()
            .position(|r| !r.is_finite() || *r <= -1.0)
        {
            return Err(PlannerError::InvalidAssumptions(format!(
                "historicalReturns[{bad}] must be finite and > -1"
            )));
        }
        if !self.catch_up_return.is_finite() || self.catch_up_return <= -1.0 {
            return Err(PlannerError::InvalidAssumptions(
                "catchUpReturn must be finite and > -1".to_string(),
            ));
        }
        Ok(())
    }

    /// First `years` entries of the historical table, truncated at its length.
    pub fn historical_slice(&self, years: u32) -> &[f64] {
        let end = (years as usize).min(self.historical_returns.len());
        &self.historical_returns[..end]
    }
}

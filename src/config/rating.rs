//! Rating system configuration

use crate::error::{RankingError, Result};
use crate::types::RatingParameters;
use serde::{Deserialize, Serialize};

/// Glicko-2 system constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating given to unseen competitors, also the centre of the internal scale
    pub initial_rating: f64,
    /// Deviation given to unseen competitors
    pub initial_deviation: f64,
    /// Volatility given to unseen competitors
    pub initial_volatility: f64,
    /// Volatility change constraint (tau)
    pub tau: f64,
    /// Stop the volatility solve once estimates differ by less than this
    pub convergence_tolerance: f64,
    /// Hard cap on volatility solve iterations
    pub max_iterations: u32,
    /// Inactivity never pushes deviation above this
    pub max_deviation: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            initial_deviation: 350.0,
            initial_volatility: 0.06,
            tau: 0.5,
            convergence_tolerance: 0.000_001,
            max_iterations: 100,
            max_deviation: 350.0,
        }
    }
}

impl RatingConfig {
    /// Low tau, volatility barely moves between periods
    pub fn conservative() -> Self {
        Self {
            tau: 0.3,
            ..Self::default()
        }
    }

    /// High tau, volatility reacts quickly to surprising results
    pub fn volatile() -> Self {
        Self {
            tau: 1.2,
            ..Self::default()
        }
    }

    /// Parameters assigned to a competitor the first time it is seen
    pub fn unrated(&self) -> RatingParameters {
        RatingParameters {
            rating: self.initial_rating,
            deviation: self.initial_deviation,
            volatility: self.initial_volatility,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(config_error("Initial rating must be finite"));
        }

        if !(self.initial_deviation.is_finite() && self.initial_deviation > 0.0) {
            return Err(config_error("Initial deviation must be positive"));
        }

        if !(self.initial_volatility.is_finite() && self.initial_volatility > 0.0) {
            return Err(config_error("Initial volatility must be positive"));
        }

        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(config_error("Tau must be positive"));
        }

        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return Err(config_error("Convergence tolerance must be positive"));
        }

        if self.max_iterations == 0 {
            return Err(config_error("Max iterations must be greater than 0"));
        }

        if !(self.max_deviation.is_finite() && self.max_deviation > 0.0) {
            return Err(config_error("Max deviation must be positive"));
        }

        if self.initial_deviation > self.max_deviation {
            return Err(config_error(
                "Initial deviation cannot exceed the maximum deviation",
            ));
        }

        Ok(())
    }
}

fn config_error(message: &str) -> RankingError {
    RankingError::ConfigurationError {
        message: message.to_string(),
    }
}

//! Rating engine trait
//!
//! This module defines the interface a period uses to turn one competitor's
//! accumulated games into updated rating parameters.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::types::{OpponentResult, RatingParameters};

/// Trait for computing a competitor's parameters at the end of a rating period
#[cfg_attr(test, mockall::automock)]
pub trait RatingEngine: Send + Sync {
    /// Compute updated parameters for one competitor
    ///
    /// # Arguments
    /// * `competitor` - Identity used when reporting errors
    /// * `prior` - The competitor's parameters at the start of the period
    /// * `results` - Every game the competitor played in the period, with each
    ///   opponent's start-of-period parameters
    ///
    /// An empty `results` slice means the competitor was inactive.
    fn rate(
        &self,
        competitor: &str,
        prior: &RatingParameters,
        results: &[OpponentResult],
    ) -> Result<RatingParameters>;

    /// Parameters for a competitor seen for the first time
    fn initial_rating(&self) -> RatingParameters;

    /// Constants the engine was built with
    fn config(&self) -> &RatingConfig;
}

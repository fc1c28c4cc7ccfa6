//! Test fixtures and scripted engines for integration testing

use race_rank::config::RatingConfig;
use race_rank::error::{RankingError, Result};
use race_rank::rating::RatingEngine;
use race_rank::types::{OpponentResult, Race, RatingParameters};
use std::sync::{Arc, Mutex};

/// Engine wrapper that records every call and can fail on a chosen competitor
#[derive(Debug, Default)]
pub struct RecordingEngine {
    inner: race_rank::Glicko2Engine,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
    fail_on: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a volatility solve failure whenever `competitor` is rated
    pub fn failing_on(competitor: &str) -> Self {
        Self {
            fail_on: Some(competitor.to_string()),
            ..Self::default()
        }
    }

    /// Shared handle to the recorded (competitor, game count) calls
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, usize)>>> {
        self.calls.clone()
    }
}

impl RatingEngine for RecordingEngine {
    fn rate(
        &self,
        competitor: &str,
        prior: &RatingParameters,
        results: &[OpponentResult],
    ) -> Result<RatingParameters> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((competitor.to_string(), results.len()));
        }

        if self.fail_on.as_deref() == Some(competitor) {
            return Err(RankingError::VolatilitySolveFailed {
                competitor: competitor.to_string(),
                iterations: 100,
            });
        }

        self.inner.rate(competitor, prior, results)
    }

    fn initial_rating(&self) -> RatingParameters {
        self.inner.initial_rating()
    }

    fn config(&self) -> &RatingConfig {
        self.inner.config()
    }
}

/// The ten-entrant race whose priors rise as placement falls
pub fn reversed_priors_race() -> Race {
    Race::from_ratings([
        ("first_place", 1400.0),
        ("second_place", 1430.0),
        ("third_place", 1460.0),
        ("fourth_place", 1480.0),
        ("fifth_place", 1510.0),
        ("sixth_place", 1540.0),
        ("seventh_place", 1570.0),
        ("eighth_place", 1600.0),
        ("ninth_place", 1630.0),
        ("tenth_place", 1660.0),
    ])
}

/// A valid race where the sole finisher is joined by a forfeit
pub fn good_race() -> Race {
    Race::new().rated("first_place", 1600.0).forfeit("second_place")
}

/// A race where every entrant forfeited
pub fn all_forfeit_race() -> Race {
    Race::new().forfeit("forfeit_1").forfeit("forfeit_2")
}

/// A race with a single entrant
pub fn single_entrant_race() -> Race {
    Race::new().rated("only_racer", 1500.0)
}

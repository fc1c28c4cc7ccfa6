//! Thread-safe handle to a rating period
//!
//! Every operation runs under one exclusive lock per period. Snapshots are
//! owned values and can be read without holding it.

use crate::config::RatingConfig;
use crate::error::{RankingError, Result};
use crate::rating::period::Period;
use crate::types::{CompetitorId, Race, RatingParameters, RatingSnapshot};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-protected period for hosts with concurrent callers
#[derive(Debug, Clone)]
pub struct SharedPeriod {
    inner: Arc<Mutex<Period>>,
}

impl SharedPeriod {
    pub fn new(period: Period) -> Self {
        Self {
            inner: Arc::new(Mutex::new(period)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Period>> {
        self.inner.lock().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire period lock".to_string(),
        })
    }

    pub fn add_races(&self, races: Vec<Race>) -> Result<()> {
        self.lock()?.add_races(races)
    }

    pub fn rank(&self) -> Result<RatingSnapshot> {
        self.lock()?.rank()
    }

    pub fn add_previous_players<I>(&self, players: I) -> Result<()>
    where
        I: IntoIterator<Item = (CompetitorId, RatingParameters)>,
    {
        self.lock()?.add_previous_players(players)
    }

    pub fn new_unrated(&self, competitor: impl Into<CompetitorId>) -> Result<()> {
        self.lock()?.new_unrated(competitor);
        Ok(())
    }

    /// Rank and roll the shared period over under one lock
    pub fn conclude(&self) -> Result<RatingSnapshot> {
        self.lock()?.conclude()
    }

    pub fn rating_of(&self, competitor: &str) -> Result<Option<RatingParameters>> {
        Ok(self.lock()?.rating_of(competitor))
    }

    pub fn race_count(&self) -> Result<usize> {
        Ok(self.lock()?.race_count())
    }

    /// Copy of the races accepted so far
    pub fn races(&self) -> Result<Vec<Race>> {
        Ok(self.lock()?.races().to_vec())
    }

    pub fn competitors(&self) -> Result<Vec<CompetitorId>> {
        Ok(self.lock()?.competitors().cloned().collect())
    }

    pub fn config(&self) -> Result<RatingConfig> {
        Ok(self.lock()?.config().clone())
    }
}

impl Default for SharedPeriod {
    fn default() -> Self {
        Self::new(Period::new())
    }
}

impl From<Period> for SharedPeriod {
    fn from(period: Period) -> Self {
        Self::new(period)
    }
}

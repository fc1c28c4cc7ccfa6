//! Error types for the rating engine
//!
//! Batch validation failures and rating computation failures share one
//! enum so hosts can match on the exact reason a call was refused.

use crate::types::CompetitorId;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RankingError>;

/// Custom error types for race ingestion and rating computation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("Race {race_index} has {entrants} entrant(s), at least two are required")]
    InsufficientEntrants { race_index: usize, entrants: usize },

    #[error("Race {race_index} lists competitor '{competitor}' more than once")]
    DuplicateEntrant {
        race_index: usize,
        competitor: CompetitorId,
    },

    #[error("Race {race_index} has no resolvable outcome: every entrant forfeited")]
    NoResolvableOutcome { race_index: usize },

    #[error("Race {race_index} gives competitor '{competitor}' a non-finite rating hint")]
    NonFiniteRatingHint {
        race_index: usize,
        competitor: CompetitorId,
    },

    #[error("Invalid rating state for '{competitor}': {reason}")]
    InvalidRatingState {
        competitor: CompetitorId,
        reason: String,
    },

    #[error("Volatility solve for '{competitor}' did not converge within {iterations} iterations")]
    VolatilitySolveFailed {
        competitor: CompetitorId,
        iterations: u32,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl RankingError {
    /// True for errors raised while validating a batch of races.
    ///
    /// These never leave partial state behind and the caller may simply
    /// resubmit a corrected batch.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RankingError::InsufficientEntrants { .. }
                | RankingError::DuplicateEntrant { .. }
                | RankingError::NoResolvableOutcome { .. }
                | RankingError::NonFiniteRatingHint { .. }
        )
    }

    /// Index of the offending race within its batch, if any
    pub fn race_index(&self) -> Option<usize> {
        match self {
            RankingError::InsufficientEntrants { race_index, .. }
            | RankingError::DuplicateEntrant { race_index, .. }
            | RankingError::NoResolvableOutcome { race_index }
            | RankingError::NonFiniteRatingHint { race_index, .. } => Some(*race_index),
            _ => None,
        }
    }
}

//! Structural validation of races before they enter a period
//!
//! Validation is a pure pass over the batch. Nothing is admitted unless every
//! race in the batch is legal.

use crate::error::{RankingError, Result};
use crate::types::Race;
use std::collections::HashSet;

/// Check a single race, reporting it under `race_index`
pub fn validate_race(race_index: usize, race: &Race) -> Result<()> {
    if race.len() < 2 {
        return Err(RankingError::InsufficientEntrants {
            race_index,
            entrants: race.len(),
        });
    }

    let mut seen = HashSet::with_capacity(race.len());
    for entrant in &race.entrants {
        if !seen.insert(entrant.competitor.as_str()) {
            return Err(RankingError::DuplicateEntrant {
                race_index,
                competitor: entrant.competitor.clone(),
            });
        }
    }

    if let Some(entrant) = race
        .entrants
        .iter()
        .find(|entrant| matches!(entrant.hint.rating(), Some(rating) if !rating.is_finite()))
    {
        return Err(RankingError::NonFiniteRatingHint {
            race_index,
            competitor: entrant.competitor.clone(),
        });
    }

    if race.finishers().next().is_none() {
        return Err(RankingError::NoResolvableOutcome { race_index });
    }

    Ok(())
}

/// Validate every race in the batch
///
/// Returns every failure in input order, so `errors[0]` is the first failing race.
pub fn validate_batch(races: &[Race]) -> std::result::Result<(), Vec<RankingError>> {
    let errors: Vec<RankingError> = races
        .iter()
        .enumerate()
        .filter_map(|(index, race)| validate_race(index, race).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Common types used throughout the rating engine

use crate::error::{RankingError, Result};
use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use std::collections::{BTreeMap, HashMap};

/// Caller-supplied identity of a competitor
pub type CompetitorId = String;

/// Current rating parameters for every known competitor
pub type RatingTable = HashMap<CompetitorId, RatingParameters>;

/// Immutable result of a ranking pass, ordered by competitor identity
pub type RatingSnapshot = BTreeMap<CompetitorId, RatingParameters>;

/// Glicko-2 rating parameters on the external (~1500-centered) scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingParameters {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl RatingParameters {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            deviation,
            volatility,
        }
    }

    /// Same deviation and volatility, different rating
    pub fn with_rating(self, rating: f64) -> Self {
        Self { rating, ..self }
    }

    /// Reject parameters the engine cannot start from
    ///
    /// Rating must be finite; deviation and volatility must be finite and positive.
    pub fn validate(&self, competitor: &str) -> Result<()> {
        let reason = if !self.rating.is_finite() {
            format!("rating {} is not finite", self.rating)
        } else if !(self.deviation.is_finite() && self.deviation > 0.0) {
            format!("deviation {} must be positive", self.deviation)
        } else if !(self.volatility.is_finite() && self.volatility > 0.0) {
            format!("volatility {} must be positive", self.volatility)
        } else {
            return Ok(());
        };

        Err(RankingError::InvalidRatingState {
            competitor: competitor.to_string(),
            reason,
        })
    }
}

impl Default for RatingParameters {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl From<Glicko2Rating> for RatingParameters {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

impl From<RatingParameters> for Glicko2Rating {
    fn from(rating: RatingParameters) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

/// What a race says about an entrant's prior rating
///
/// Serialized untagged: a number is a rating hint, `null` means no hint,
/// and the string `"forfeit"` marks a forfeiting entrant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "HintRepr", into = "HintRepr")]
pub enum RatingHint {
    /// Use the competitor's stored (or default) parameters
    #[default]
    Standing,
    /// Override the stored rating for this period's computation only
    Rating(f64),
    /// Listed in the race but contributes no game outcomes
    Forfeit,
}

impl RatingHint {
    pub fn is_forfeit(&self) -> bool {
        matches!(self, RatingHint::Forfeit)
    }

    /// Numeric override, if one was given
    pub fn rating(&self) -> Option<f64> {
        match self {
            RatingHint::Rating(rating) => Some(*rating),
            _ => None,
        }
    }
}

const FORFEIT_MARKER: &str = "forfeit";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HintRepr {
    Rating(f64),
    Marker(Option<String>),
}

impl TryFrom<HintRepr> for RatingHint {
    type Error = String;

    fn try_from(repr: HintRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            HintRepr::Rating(rating) => Ok(RatingHint::Rating(rating)),
            HintRepr::Marker(None) => Ok(RatingHint::Standing),
            HintRepr::Marker(Some(marker)) if marker.eq_ignore_ascii_case(FORFEIT_MARKER) => {
                Ok(RatingHint::Forfeit)
            }
            HintRepr::Marker(Some(other)) => Err(format!(
                "unknown rating hint '{}', expected a number, null or \"{}\"",
                other, FORFEIT_MARKER
            )),
        }
    }
}

impl From<RatingHint> for HintRepr {
    fn from(hint: RatingHint) -> Self {
        match hint {
            RatingHint::Standing => HintRepr::Marker(None),
            RatingHint::Rating(rating) => HintRepr::Rating(rating),
            RatingHint::Forfeit => HintRepr::Marker(Some(FORFEIT_MARKER.to_string())),
        }
    }
}

/// One line of a race listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub competitor: CompetitorId,
    #[serde(default)]
    pub hint: RatingHint,
}

impl Entrant {
    pub fn new(competitor: impl Into<CompetitorId>, hint: RatingHint) -> Self {
        Self {
            competitor: competitor.into(),
            hint,
        }
    }
}

/// A race in finishing order: index 0 finished ahead of index 1, and so on
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Race {
    pub entrants: Vec<Entrant>,
}

impl Race {
    pub fn new() -> Self {
        Self::default()
    }

    /// Race where every finisher uses its stored parameters
    pub fn from_placements<I, S>(placements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompetitorId>,
    {
        Self {
            entrants: placements
                .into_iter()
                .map(|id| Entrant::new(id, RatingHint::Standing))
                .collect(),
        }
    }

    /// Race where every finisher carries a numeric rating hint
    pub fn from_ratings<I, S>(placements: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<CompetitorId>,
    {
        Self {
            entrants: placements
                .into_iter()
                .map(|(id, rating)| Entrant::new(id, RatingHint::Rating(rating)))
                .collect(),
        }
    }

    /// Append a finisher using its stored parameters
    pub fn standing(mut self, competitor: impl Into<CompetitorId>) -> Self {
        self.entrants
            .push(Entrant::new(competitor, RatingHint::Standing));
        self
    }

    /// Append a finisher with a rating hint
    pub fn rated(mut self, competitor: impl Into<CompetitorId>, rating: f64) -> Self {
        self.entrants
            .push(Entrant::new(competitor, RatingHint::Rating(rating)));
        self
    }

    /// Append a forfeiting entrant
    pub fn forfeit(mut self, competitor: impl Into<CompetitorId>) -> Self {
        self.entrants
            .push(Entrant::new(competitor, RatingHint::Forfeit));
        self
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    /// Entrants that take part in pairwise games, in finishing order
    pub fn finishers(&self) -> impl Iterator<Item = &Entrant> {
        self.entrants.iter().filter(|entrant| !entrant.hint.is_forfeit())
    }
}

/// Result of a single pairwise game from one competitor's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Glicko score: 1 for a win, 0 for a loss
    pub fn score(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
        }
    }
}

/// A game as the update engine sees it: opponent's prior parameters and the outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentResult {
    pub opponent: RatingParameters,
    pub outcome: Outcome,
}

//! Rating period orchestration
//!
//! A period owns the races accepted since the last rollover, the derived game
//! ledger, and the rating table the next ranking starts from. Ranking is always
//! recomputed from the table plus the full race history, never incrementally,
//! so it can be repeated and interleaved with further `add_races` calls.

use crate::config::RatingConfig;
use crate::error::{RankingError, Result};
use crate::rating::engine::RatingEngine;
use crate::rating::expansion::GameLedger;
use crate::rating::glicko2::Glicko2Engine;
use crate::rating::validator::validate_batch;
use crate::types::{
    CompetitorId, OpponentResult, Race, RatingParameters, RatingSnapshot, RatingTable,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// One batch-processing cycle of the rating model
pub struct Period {
    engine: Box<dyn RatingEngine>,
    table: RatingTable,
    races: Vec<Race>,
    ledger: GameLedger,
    /// Latest numeric hint per competitor, applied on top of the table
    hints: HashMap<CompetitorId, f64>,
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Period")
            .field("table", &self.table)
            .field("races", &self.races.len())
            .field("games", &self.ledger.game_count())
            .finish_non_exhaustive()
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::with_engine(Box::new(Glicko2Engine::default()))
    }
}

impl Period {
    /// Empty period with the canonical Glicko-2 constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty period using custom Glicko-2 constants
    pub fn with_config(config: RatingConfig) -> Result<Self> {
        Ok(Self::with_engine(Box::new(Glicko2Engine::new(config)?)))
    }

    /// Empty period driven by any rating engine
    pub fn with_engine(engine: Box<dyn RatingEngine>) -> Self {
        Self {
            engine,
            table: RatingTable::new(),
            races: Vec::new(),
            ledger: GameLedger::new(),
            hints: HashMap::new(),
        }
    }

    /// Validate a batch and, only if every race is legal, admit all of it
    ///
    /// On failure the period is untouched and the first failing race (in input
    /// order) is reported.
    pub fn add_races(&mut self, races: Vec<Race>) -> Result<()> {
        if let Err(errors) = validate_batch(&races) {
            warn!(
                "Rejected batch of {} race(s): {} invalid, first error: {}",
                races.len(),
                errors.len(),
                errors[0]
            );
            return Err(errors.into_iter().next().unwrap_or_else(|| {
                RankingError::InternalError {
                    message: "Validation failed without reporting an error".to_string(),
                }
            }));
        }

        let games_before = self.ledger.game_count();
        for race in &races {
            self.ledger.record_race(race);
            for entrant in &race.entrants {
                if let Some(rating) = entrant.hint.rating() {
                    self.hints.insert(entrant.competitor.clone(), rating);
                }
            }
        }

        info!(
            "Accepted batch of {} race(s) adding {} game(s); period now holds {} race(s)",
            races.len(),
            self.ledger.game_count() - games_before,
            self.races.len() + races.len()
        );
        self.races.extend(races);

        Ok(())
    }

    /// Compute updated parameters for every competitor active in this period
    ///
    /// Opponent parameters are the start-of-period priors, so the result does
    /// not depend on the order competitors are processed in. Either every
    /// competitor is rated or the call fails without touching the table.
    pub fn rank(&mut self) -> Result<RatingSnapshot> {
        let priors = self.priors()?;

        let mut snapshot = RatingSnapshot::new();
        for competitor in self.ledger.participants() {
            let prior = lookup(&priors, competitor)?;
            let results = self
                .ledger
                .results_for(competitor)
                .iter()
                .map(|result| {
                    Ok(OpponentResult {
                        opponent: lookup(&priors, &result.opponent)?,
                        outcome: result.outcome,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let updated = self
                .engine
                .rate(competitor, &prior, &results)
                .map_err(|e| {
                    warn!("Ranking aborted while rating '{}': {}", competitor, e);
                    e
                })?;
            snapshot.insert(competitor.clone(), updated);
        }

        let mut registered = 0;
        for competitor in self.ledger.participants() {
            if !self.table.contains_key(competitor) {
                self.table
                    .insert(competitor.clone(), self.engine.initial_rating());
                registered += 1;
            }
        }

        info!(
            "Ranked {} competitor(s) over {} race(s) and {} game(s); {} newly registered",
            snapshot.len(),
            self.races.len(),
            self.ledger.game_count(),
            registered
        );

        Ok(snapshot)
    }

    /// Start-of-period parameters for every participant, with hints applied
    fn priors(&self) -> Result<HashMap<&CompetitorId, RatingParameters>> {
        self.ledger
            .participants()
            .map(|competitor| {
                let prior = self.prior_for(competitor);
                prior.validate(competitor)?;
                Ok((competitor, prior))
            })
            .collect()
    }

    fn prior_for(&self, competitor: &str) -> RatingParameters {
        let stored = self
            .table
            .get(competitor)
            .copied()
            .unwrap_or_else(|| self.engine.initial_rating());

        match self.hints.get(competitor) {
            Some(rating) => stored.with_rating(*rating),
            None => stored,
        }
    }

    /// Seed the table with ratings carried over from an earlier period
    ///
    /// Every entry is checked first; nothing is stored if any is malformed.
    pub fn add_previous_players<I>(&mut self, players: I) -> Result<()>
    where
        I: IntoIterator<Item = (CompetitorId, RatingParameters)>,
    {
        let players: Vec<(CompetitorId, RatingParameters)> = players.into_iter().collect();
        for (competitor, params) in &players {
            params.validate(competitor)?;
        }

        debug!("Seeding {} previous player(s)", players.len());
        self.table.extend(players);
        Ok(())
    }

    /// Register a competitor with default parameters without a race
    pub fn new_unrated(&mut self, competitor: impl Into<CompetitorId>) {
        let initial = self.engine.initial_rating();
        self.table.entry(competitor.into()).or_insert(initial);
    }

    /// Stored (start-of-period) parameters for a competitor
    pub fn rating_of(&self, competitor: &str) -> Option<RatingParameters> {
        self.table.get(competitor).copied()
    }

    /// Races accepted so far, in submission order
    pub fn races(&self) -> &[Race] {
        &self.races
    }

    pub fn race_count(&self) -> usize {
        self.races.len()
    }

    /// Every competitor listed in an accepted race of this period
    pub fn competitors(&self) -> impl Iterator<Item = &CompetitorId> {
        self.ledger.participants()
    }

    /// Rank, fold the results into the table, and start the next period
    ///
    /// Races, games and hints are cleared only once ranking has succeeded; on
    /// error the period is left exactly as it was.
    pub fn conclude(&mut self) -> Result<RatingSnapshot> {
        let snapshot = self.rank()?;
        self.table
            .extend(snapshot.iter().map(|(id, params)| (id.clone(), *params)));

        info!(
            "Concluded period of {} race(s); table holds {} competitor(s)",
            self.races.len(),
            self.table.len()
        );

        self.races.clear();
        self.ledger = GameLedger::new();
        self.hints.clear();

        Ok(snapshot)
    }

    /// Glicko-2 constants this period rates with
    pub fn config(&self) -> &RatingConfig {
        self.engine.config()
    }
}

fn lookup(
    priors: &HashMap<&CompetitorId, RatingParameters>,
    competitor: &CompetitorId,
) -> Result<RatingParameters> {
    priors
        .get(competitor)
        .copied()
        .ok_or_else(|| RankingError::InternalError {
            message: format!("No prior recorded for '{}'", competitor),
        })
}

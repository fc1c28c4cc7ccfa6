//! Pairwise expansion of races and per-competitor game aggregation
//!
//! A race with n finishers implies n·(n−1)/2 games: every finisher beat every
//! finisher placed below it. Forfeiting entrants play no games.

use crate::types::{CompetitorId, Outcome, Race};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One resolved win/loss observation derived from relative placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairwiseGame {
    pub winner: CompetitorId,
    pub loser: CompetitorId,
}

/// A game from one competitor's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub opponent: CompetitorId,
    pub outcome: Outcome,
}

/// Expand a validated race into the full transitive set of pairwise games
///
/// Games are produced winner-major: all of 1st place's wins, then 2nd's, and so on.
pub fn expand_race(race: &Race) -> Vec<PairwiseGame> {
    let finishers: Vec<&CompetitorId> = race.finishers().map(|e| &e.competitor).collect();
    let n = finishers.len();
    let mut games = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for (i, winner) in finishers.iter().enumerate() {
        for loser in &finishers[i + 1..] {
            games.push(PairwiseGame {
                winner: (*winner).clone(),
                loser: (*loser).clone(),
            });
        }
    }

    games
}

/// Per-competitor aggregation of every game in a period
#[derive(Debug, Clone, Default)]
pub struct GameLedger {
    results: HashMap<CompetitorId, Vec<GameResult>>,
    participants: BTreeSet<CompetitorId>,
    games: usize,
}

impl GameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one validated race into the ledger
    pub fn record_race(&mut self, race: &Race) {
        for entrant in &race.entrants {
            if !self.participants.contains(&entrant.competitor) {
                self.participants.insert(entrant.competitor.clone());
            }
        }

        for game in expand_race(race) {
            self.record_game(game);
        }
    }

    fn record_game(&mut self, game: PairwiseGame) {
        self.results
            .entry(game.winner.clone())
            .or_default()
            .push(GameResult {
                opponent: game.loser.clone(),
                outcome: Outcome::Win,
            });
        self.results.entry(game.loser).or_default().push(GameResult {
            opponent: game.winner,
            outcome: Outcome::Loss,
        });
        self.games += 1;
    }

    /// Games played by `competitor`, in race order then placement order
    pub fn results_for(&self, competitor: &str) -> &[GameResult] {
        self.results
            .get(competitor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every competitor listed in any recorded race, forfeiters included
    pub fn participants(&self) -> impl Iterator<Item = &CompetitorId> {
        self.participants.iter()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Total number of pairwise games recorded
    pub fn game_count(&self) -> usize {
        self.games
    }
}

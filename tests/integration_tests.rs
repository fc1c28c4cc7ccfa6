//! Integration tests for the race-rank engine
//!
//! These tests drive the public API end to end:
//! - Race ingestion and batch atomicity
//! - Placement monotonicity of ranked results
//! - Idempotent ranking and recomputation after new races
//! - Inactivity decay, rating hints and forfeits
//! - Computation failures and period rollover

mod fixtures;

use race_rank::types::{Race, RatingParameters, RatingSnapshot};
use race_rank::{Period, RankingError, RatingConfig};

use fixtures::{
    all_forfeit_race, good_race, reversed_priors_race, single_entrant_race, RecordingEngine,
};

fn assert_strictly_decreasing(race: &Race, rankings: &RatingSnapshot) {
    let ratings: Vec<f64> = race
        .entrants
        .iter()
        .map(|entrant| rankings[&entrant.competitor].rating)
        .collect();

    for (place, pair) in ratings.windows(2).enumerate() {
        assert!(
            pair[0] > pair[1],
            "place {} rated {} but place {} rated {}",
            place + 1,
            pair[0],
            place + 2,
            pair[1]
        );
    }
}

#[test]
fn test_scoring_new_period() {
    let mut period_10 = Period::new();
    period_10.add_races(vec![reversed_priors_race()]).unwrap();
    let rankings_10 = period_10.rank().unwrap();
    assert_eq!(rankings_10.len(), 10);
    assert_strictly_decreasing(&reversed_priors_race(), &rankings_10);

    let race_3 = Race::from_ratings([
        ("first_place", 1400.0),
        ("second_place", 1500.0),
        ("third_place", 1600.0),
    ]);
    let mut period_3 = Period::new();
    period_3.add_races(vec![race_3.clone()]).unwrap();
    let rankings_3 = period_3.rank().unwrap();
    assert_strictly_decreasing(&race_3, &rankings_3);
}

#[test]
fn test_adding_races_rejects_forfeit_only_batch() {
    let mut period = Period::new();
    period
        .add_races(vec![Race::from_placements(["alice", "bob"])])
        .unwrap();
    let before = period.rank().unwrap();

    let err = period
        .add_races(vec![good_race(), all_forfeit_race()])
        .unwrap_err();
    assert_eq!(err, RankingError::NoResolvableOutcome { race_index: 1 });
    assert!(err.is_validation());

    let after = period.rank().unwrap();
    assert_eq!(before, after);
    assert!(!after.contains_key("first_place"));
    assert_eq!(period.race_count(), 1);
}

#[test]
fn test_adding_races_rejects_single_entrant_batch() {
    let mut period = Period::new();
    period
        .add_races(vec![Race::from_placements(["alice", "bob"])])
        .unwrap();
    let before = period.rank().unwrap();

    let err = period
        .add_races(vec![good_race(), single_entrant_race()])
        .unwrap_err();
    assert_eq!(
        err,
        RankingError::InsufficientEntrants {
            race_index: 1,
            entrants: 1
        }
    );

    assert_eq!(period.rank().unwrap(), before);
}

#[test]
fn test_first_failing_race_is_reported() {
    let mut period = Period::new();
    let err = period
        .add_races(vec![
            Race::from_placements(["a", "b", "a"]),
            single_entrant_race(),
        ])
        .unwrap_err();

    assert_eq!(
        err,
        RankingError::DuplicateEntrant {
            race_index: 0,
            competitor: "a".to_string()
        }
    );
    assert_eq!(err.race_index(), Some(0));
}

#[test]
fn test_good_race_alone_is_accepted() {
    let mut period = Period::new();
    period.add_races(vec![good_race()]).unwrap();

    let rankings = period.rank().unwrap();
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings["first_place"].rating, 1600.0);
    assert_eq!(rankings["second_place"].rating, 1500.0);
}

#[test]
fn test_rank_twice_is_bit_identical() {
    let mut period = Period::new();
    period
        .add_races(vec![
            reversed_priors_race(),
            Race::from_placements(["tenth_place", "first_place", "newcomer"]),
        ])
        .unwrap();

    let first = period.rank().unwrap();
    let second = period.rank().unwrap();

    assert_eq!(first.len(), second.len());
    for (id, params) in &first {
        let again = second[id];
        assert_eq!(params.rating.to_bits(), again.rating.to_bits());
        assert_eq!(params.deviation.to_bits(), again.deviation.to_bits());
        assert_eq!(params.volatility.to_bits(), again.volatility.to_bits());
    }
}

#[test]
fn test_two_entrant_race_moves_ratings_apart() {
    let mut period = Period::new();
    period
        .add_previous_players(vec![
            ("winner".to_string(), RatingParameters::new(1550.0, 120.0, 0.06)),
            ("loser".to_string(), RatingParameters::new(1450.0, 90.0, 0.06)),
        ])
        .unwrap();
    period
        .add_races(vec![Race::from_placements(["winner", "loser"])])
        .unwrap();

    let rankings = period.rank().unwrap();
    assert!(rankings["winner"].rating > 1550.0);
    assert!(rankings["loser"].rating < 1450.0);
    assert!(rankings["winner"].deviation < 120.0);
    assert!(rankings["loser"].deviation < 90.0);
}

#[test]
fn test_inactive_entrant_keeps_rating() {
    let mut period = Period::new();
    period
        .add_previous_players(vec![(
            "quitter".to_string(),
            RatingParameters::new(1580.0, 70.0, 0.06),
        )])
        .unwrap();
    period
        .add_races(vec![Race::new()
            .standing("a")
            .forfeit("quitter")
            .standing("b")])
        .unwrap();

    let rankings = period.rank().unwrap();
    assert_eq!(rankings["quitter"].rating, 1580.0);
    assert!(rankings["quitter"].deviation >= 70.0);
    assert!(rankings["quitter"].deviation <= 350.0);
    assert!(rankings["a"].rating > rankings["b"].rating);
}

#[test]
fn test_results_span_every_race_in_period() {
    let engine = RecordingEngine::new();
    let calls = engine.calls();

    let mut period = Period::with_engine(Box::new(engine));
    period
        .add_races(vec![
            Race::from_placements(["a", "b", "c"]),
            Race::from_placements(["c", "a"]),
        ])
        .unwrap();
    period
        .add_races(vec![Race::new().standing("d").forfeit("a").standing("b")])
        .unwrap();
    period.rank().unwrap();

    let mut calls = calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            ("a".to_string(), 3),
            ("b".to_string(), 3),
            ("c".to_string(), 3),
            ("d".to_string(), 1),
        ]
    );
}

#[test]
fn test_computation_failure_aborts_whole_ranking() {
    let mut period = Period::with_engine(Box::new(RecordingEngine::failing_on("c")));
    period
        .add_races(vec![Race::from_placements(["a", "b", "c", "d"])])
        .unwrap();

    let err = period.rank().unwrap_err();
    assert_eq!(
        err,
        RankingError::VolatilitySolveFailed {
            competitor: "c".to_string(),
            iterations: 100
        }
    );
    assert!(!err.is_validation());
    assert_eq!(period.rating_of("a"), None);
}

#[test]
fn test_iteration_cap_surfaces_from_rank() {
    let config = RatingConfig {
        max_iterations: 1,
        ..RatingConfig::default()
    };
    let mut period = Period::with_config(config).unwrap();
    period.add_races(vec![reversed_priors_race()]).unwrap();

    assert!(matches!(
        period.rank(),
        Err(RankingError::VolatilitySolveFailed { .. })
    ));
}

#[test]
fn test_corrupt_previous_rating_is_reported() {
    let mut period = Period::new();
    period.new_unrated("fresh");
    assert!(period
        .add_previous_players(vec![(
            "corrupt".to_string(),
            RatingParameters::new(1500.0, 200.0, 0.0)
        )])
        .is_err());
    assert_eq!(period.rating_of("corrupt"), None);
    assert_eq!(period.rating_of("fresh"), Some(RatingParameters::default()));
}

#[test]
fn test_multiple_periods() {
    let mut period = Period::new();
    period
        .add_races(vec![Race::from_placements(["a", "b", "c"])])
        .unwrap();
    let first = period.conclude().unwrap();
    assert_eq!(period.race_count(), 0);

    period
        .add_races(vec![Race::from_placements(["c", "b", "a"])])
        .unwrap();
    let second = period.rank().unwrap();

    assert!(second["a"].rating < first["a"].rating);
    assert!(second["c"].rating > first["c"].rating);
    // Deviation keeps shrinking as evidence accumulates across periods
    assert!(second["b"].deviation < first["b"].deviation);
}

#[test]
fn test_races_from_json() {
    let races: Vec<Race> = serde_json::from_str(
        r#"[
            [
                {"competitor": "alice", "hint": 1450.0},
                {"competitor": "bob"},
                {"competitor": "carol", "hint": "forfeit"}
            ],
            [
                {"competitor": "bob"},
                {"competitor": "alice"}
            ]
        ]"#,
    )
    .unwrap();

    let mut period = Period::new();
    period.add_races(races).unwrap();
    let rankings = period.rank().unwrap();

    assert_eq!(rankings.len(), 3);
    assert_eq!(rankings["carol"].rating, 1500.0);

    let json = serde_json::to_value(&rankings).unwrap();
    assert!(json["alice"]["rating"].is_number());
    assert!(json["bob"]["volatility"].is_number());
}

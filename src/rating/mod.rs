//! Glicko-2 rating periods for multi-entrant races
//!
//! This module provides race validation, pairwise expansion, the Glicko-2
//! update engine and the period that ties them together.

pub mod engine;
pub mod expansion;
pub mod glicko2;
pub mod period;
pub mod shared;
pub mod validator;

// Re-export commonly used types
pub use engine::RatingEngine;
pub use expansion::{expand_race, GameLedger, GameResult, PairwiseGame};
pub use glicko2::{Glicko2Engine, GLICKO2_SCALE};
pub use period::Period;
pub use shared::SharedPeriod;
pub use validator::{validate_batch, validate_race};

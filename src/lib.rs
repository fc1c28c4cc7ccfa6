//! Race Rank - Glicko-2 ratings for multi-entrant races
//!
//! This crate turns ordered race results into pairwise games, aggregates them
//! over a rating period, and computes updated rating, deviation and volatility
//! for every competitor who took part.

pub mod config;
pub mod error;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use config::RatingConfig;
pub use rating::{Glicko2Engine, Period, RatingEngine, SharedPeriod};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

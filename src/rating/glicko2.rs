//! Glicko-2 rating engine
//!
//! Implements the single-period, multi-opponent update from Glickman's
//! "Example of the Glicko-2 system", including the Illinois root-find for the
//! new volatility. Every game in a period is treated as simultaneous.

use crate::config::RatingConfig;
use crate::error::{RankingError, Result};
use crate::rating::engine::RatingEngine;
use crate::types::{OpponentResult, RatingParameters};
use std::f64::consts::PI;
use tracing::debug;

/// Ratio between the external rating scale and the internal Glicko-2 scale
pub const GLICKO2_SCALE: f64 = 173.7178;

/// Glicko-2 rating engine
#[derive(Debug, Clone, Default)]
pub struct Glicko2Engine {
    config: RatingConfig,
}

impl Glicko2Engine {
    /// Create a new engine, rejecting invalid constants
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn to_mu(&self, rating: f64) -> f64 {
        (rating - self.config.initial_rating) / GLICKO2_SCALE
    }

    fn from_mu(&self, mu: f64) -> f64 {
        mu * GLICKO2_SCALE + self.config.initial_rating
    }

    /// Probability that `player` beats `opponent`
    pub fn expected_score(&self, player: &RatingParameters, opponent: &RatingParameters) -> f64 {
        expectation(
            self.to_mu(player.rating),
            self.to_mu(opponent.rating),
            opponent.deviation / GLICKO2_SCALE,
        )
    }

    /// Deviation growth for a competitor who played no games this period
    fn decay(&self, prior: &RatingParameters) -> RatingParameters {
        let phi = prior.deviation / GLICKO2_SCALE;
        let phi_star = (phi.powi(2) + prior.volatility.powi(2)).sqrt();
        let grown = (phi_star * GLICKO2_SCALE).min(self.config.max_deviation);

        RatingParameters {
            rating: prior.rating,
            deviation: grown.max(prior.deviation),
            volatility: prior.volatility,
        }
    }

    /// Illinois (regula falsi) solve for the new volatility
    ///
    /// Returns σ′ and the number of iterations taken.
    fn solve_volatility(
        &self,
        competitor: &str,
        phi: f64,
        sigma: f64,
        delta: f64,
        v: f64,
    ) -> Result<(f64, u32)> {
        let tau = self.config.tau;
        let epsilon = self.config.convergence_tolerance;
        let max_iterations = self.config.max_iterations;
        let failed = |iterations| RankingError::VolatilitySolveFailed {
            competitor: competitor.to_string(),
            iterations,
        };

        let alpha = sigma.powi(2).ln();
        let phi_sq = phi.powi(2);
        let f = |x: f64| -> f64 {
            let ex = x.exp();
            let numer = ex * (delta.powi(2) - phi_sq - v - ex);
            let denom = 2.0 * (phi_sq + v + ex).powi(2);
            numer / denom - (x - alpha) / tau.powi(2)
        };

        let mut a = alpha;
        let mut b = if delta.powi(2) > phi_sq + v {
            (delta.powi(2) - phi_sq - v).ln()
        } else {
            bracket_below(alpha, tau, max_iterations, &f).map_err(failed)?
        };

        let mut fa = f(a);
        let mut fb = f(b);
        let mut iterations = 0u32;
        while (b - a).abs() > epsilon {
            if iterations >= max_iterations {
                return Err(failed(iterations));
            }
            iterations += 1;

            let c = a + (a - b) * fa / (fb - fa);
            let fc = f(c);
            if fc * fb <= 0.0 {
                a = b;
                fa = fb;
            } else {
                fa /= 2.0;
            }
            b = c;
            fb = fc;
        }

        let sigma_prime = (a / 2.0).exp();
        if !(sigma_prime.is_finite() && sigma_prime > 0.0) {
            return Err(failed(iterations));
        }

        Ok((sigma_prime, iterations))
    }
}

impl RatingEngine for Glicko2Engine {
    fn rate(
        &self,
        competitor: &str,
        prior: &RatingParameters,
        results: &[OpponentResult],
    ) -> Result<RatingParameters> {
        prior.validate(competitor)?;

        if results.is_empty() {
            return Ok(self.decay(prior));
        }

        let mu = self.to_mu(prior.rating);
        let phi = prior.deviation / GLICKO2_SCALE;

        let mut v_inv = 0.0;
        let mut score_sum = 0.0;
        for result in results {
            result.opponent.validate(competitor)?;

            let mu_j = self.to_mu(result.opponent.rating);
            let phi_j = result.opponent.deviation / GLICKO2_SCALE;
            let g_j = g(phi_j);
            let e_j = expectation(mu, mu_j, phi_j);

            v_inv += g_j.powi(2) * e_j * (1.0 - e_j);
            score_sum += g_j * (result.outcome.score() - e_j);
        }

        let v = v_inv.recip();
        if !(v.is_finite() && v > 0.0) {
            return Err(RankingError::InvalidRatingState {
                competitor: competitor.to_string(),
                reason: format!("estimated variance is not finite ({})", v),
            });
        }
        let delta = v * score_sum;

        let (sigma_prime, iterations) =
            self.solve_volatility(competitor, phi, prior.volatility, delta, v)?;

        let phi_star = (phi.powi(2) + sigma_prime.powi(2)).sqrt();
        let phi_prime = (phi_star.powi(2).recip() + v.recip()).sqrt().recip();
        let mu_prime = mu + phi_prime.powi(2) * score_sum;

        let updated = RatingParameters {
            rating: self.from_mu(mu_prime),
            deviation: phi_prime * GLICKO2_SCALE,
            volatility: sigma_prime,
        };
        updated.validate(competitor)?;

        debug!(
            "Rated '{}' over {} game(s): {:.2} -> {:.2} (volatility solve took {} iteration(s))",
            competitor,
            results.len(),
            prior.rating,
            updated.rating,
            iterations
        );

        Ok(updated)
    }

    fn initial_rating(&self) -> RatingParameters {
        self.config.unrated()
    }

    fn config(&self) -> &RatingConfig {
        &self.config
    }
}

/// Step down from `alpha` in multiples of tau until the objective is non-negative
///
/// Gives up with the number of steps taken once `max_iterations` is reached.
fn bracket_below(
    alpha: f64,
    tau: f64,
    max_iterations: u32,
    f: impl Fn(f64) -> f64,
) -> std::result::Result<f64, u32> {
    let mut k = 1u32;
    while f(alpha - f64::from(k) * tau) < 0.0 {
        if k >= max_iterations {
            return Err(k);
        }
        k += 1;
    }
    Ok(alpha - f64::from(k) * tau)
}

/// Weighting that shrinks the impact of opponents with uncertain ratings
fn g(phi: f64) -> f64 {
    (1.0 + 3.0 * phi.powi(2) / PI.powi(2)).sqrt().recip()
}

fn expectation(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    (1.0 + (-g(phi_j) * (mu - mu_j)).exp()).recip()
}

/// Elo rating update with per-track confidence weighting.
///
/// Stateless and deterministic. Every function here is defined for all finite
/// inputs; extreme rating gaps just push the expected score towards 0 or 1.
use crate::constants::{
    CALIBRATION_MATCHES, ESTABLISHED_K_FACTOR, PROVISIONAL_K_FACTOR, RATING_SCALE,
};

/// Outcome of one comparison from the first track's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Actual score for the first track: 1.0, 0.5 or 0.0.
    pub fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// How hard a single outcome moves a rating.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingPolicy {
    /// Tracks with fewer comparisons than this use `provisional_k`.
    pub calibration_matches: u32,
    pub provisional_k: f64,
    pub established_k: f64,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        RatingPolicy {
            calibration_matches: CALIBRATION_MATCHES,
            provisional_k: PROVISIONAL_K_FACTOR,
            established_k: ESTABLISHED_K_FACTOR,
        }
    }
}

impl RatingPolicy {
    /// K-factor for a track given its comparison count before this update.
    pub fn k_factor(&self, match_count: u32) -> f64 {
        if match_count < self.calibration_matches {
            self.provisional_k
        } else {
            self.established_k
        }
    }

    /// New ratings for A and B after one comparison.
    ///
    /// Each side gets its own K-factor, so the update is only zero-sum when
    /// both tracks sit in the same regime.
    pub fn update(
        &self,
        rating_a: f64,
        rating_b: f64,
        matches_a: u32,
        matches_b: u32,
        score_a: f64,
    ) -> (f64, f64) {
        let expected_a = expected_score(rating_a, rating_b);
        let expected_b = 1.0 - expected_a;
        let score_b = 1.0 - score_a;

        let new_a = rating_a + self.k_factor(matches_a) * (score_a - expected_a);
        let new_b = rating_b + self.k_factor(matches_b) * (score_b - expected_b);

        (round_rating(new_a), round_rating(new_b))
    }
}

/// Probability that a track rated `rating_a` beats one rated `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / RATING_SCALE))
}

/// K-factor under the default policy: 64 during calibration, 32 afterwards.
pub fn k_factor(match_count: u32) -> f64 {
    RatingPolicy::default().k_factor(match_count)
}

/// Round to 2 decimal places, halves away from zero.
pub fn round_rating(rating: f64) -> f64 {
    (rating * 100.0).round() / 100.0
}

/// New ratings for A and B under the default policy.
///
/// `score_a` is 1.0 when A won, 0.0 when A lost and 0.5 for a draw.
pub fn calculate_new_ratings(
    rating_a: f64,
    rating_b: f64,
    matches_a: u32,
    matches_b: u32,
    score_a: f64,
) -> (f64, f64) {
    RatingPolicy::default().update(rating_a, rating_b, matches_a, matches_b, score_a)
}

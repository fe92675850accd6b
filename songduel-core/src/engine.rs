/// Ranking engine: matchmaking plus outcome recording over one `ItemSet`.
///
/// Pure computation. The caller owns the set, shows the matchup to a
/// listener, and feeds the verdict back through `apply_outcome`. Persisting
/// the mutated set, and making sure only one outcome per container is in
/// flight at a time, is also the caller's job.
use rand::Rng;

use crate::error::{RankError, Result};
use crate::matchmaking::MatchmakingPolicy;
use crate::rating::{Outcome, RatingPolicy};
use crate::types::{ItemSet, Matchup, RatingChange};

/// Policies for both halves of the engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub rating: RatingPolicy,
    pub matchmaking: MatchmakingPolicy,
}

/// Stateless apart from its configuration; every call takes the set it works on.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: EngineConfig,
}

impl RankingEngine {
    pub fn new(config: EngineConfig) -> Self {
        RankingEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Next matchup. Fails with `InsufficientItems` below two tracks.
    pub fn select_pair<R: Rng>(&self, items: &ItemSet, rng: &mut R) -> Result<Matchup> {
        self.config.matchmaking.select_pair(items, rng)
    }

    /// Record that `winner` beat `loser`.
    ///
    /// Both tracks get a new rating and one more completed comparison. Both
    /// identities are checked before anything is written, so a failed call
    /// leaves the set untouched. An absent identity is reported as
    /// `UnknownItem` even when it is named twice.
    pub fn apply_outcome(&self, items: &mut ItemSet, winner: &str, loser: &str) -> Result<RatingChange> {
        let w = items
            .get(winner)
            .ok_or_else(|| RankError::UnknownItem(winner.to_string()))?;
        let l = items
            .get(loser)
            .ok_or_else(|| RankError::UnknownItem(loser.to_string()))?;
        if winner == loser {
            return Err(RankError::SelfMatch(winner.to_string()));
        }

        let (winner_rating, loser_rating) = self.config.rating.update(
            w.rating,
            l.rating,
            w.match_count,
            l.match_count,
            Outcome::Win.score(),
        );

        // Both lookups succeeded above. Counts stop at u32::MAX rather than
        // wrapping back into the cold-start tier.
        if let Some(w) = items.get_mut(winner) {
            w.rating = winner_rating;
            w.match_count = w.match_count.saturating_add(1);
        }
        if let Some(l) = items.get_mut(loser) {
            l.rating = loser_rating;
            l.match_count = l.match_count.saturating_add(1);
        }

        Ok(RatingChange {
            winner_rating,
            loser_rating,
        })
    }
}

/// Record an outcome under the default policies.
pub fn apply_outcome(items: &mut ItemSet, winner: &str, loser: &str) -> Result<RatingChange> {
    RankingEngine::default().apply_outcome(items, winner, loser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchmaking::select_pair;
    use crate::types::RateableItem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn set_of(tracks: &[(&str, f64, u32)]) -> ItemSet {
        tracks
            .iter()
            .map(|&(uri, rating, matches)| {
                RateableItem::new(uri, uri, "artist", "").with_record(rating, matches)
            })
            .collect()
    }

    #[test]
    fn test_apply_outcome_updates_both_tracks() {
        let mut items = set_of(&[("a", 1000.0, 0), ("b", 1000.0, 10), ("c", 1000.0, 0)]);
        let change = apply_outcome(&mut items, "a", "b").unwrap();

        assert_eq!(change.winner_rating, 1032.0);
        assert_eq!(change.loser_rating, 984.0);

        let a = items.get("a").unwrap();
        let b = items.get("b").unwrap();
        assert_eq!((a.rating, a.match_count), (1032.0, 1));
        assert_eq!((b.rating, b.match_count), (984.0, 11));

        let c = items.get("c").unwrap();
        assert_eq!((c.rating, c.match_count), (1000.0, 0));
    }

    #[test]
    fn test_apply_outcome_equal_tracks_symmetric() {
        let mut items = set_of(&[("a", 1000.0, 0), ("b", 1000.0, 0)]);
        let change = apply_outcome(&mut items, "b", "a").unwrap();
        assert_eq!(change.winner_rating - 1000.0, 1000.0 - change.loser_rating);
    }

    #[test]
    fn test_unknown_winner_leaves_set_untouched() {
        let mut items = set_of(&[("a", 1010.0, 3), ("b", 990.0, 3)]);
        let before = items.clone();

        let err = apply_outcome(&mut items, "ghost", "a").unwrap_err();
        assert_eq!(err, RankError::UnknownItem("ghost".to_string()));
        assert_eq!(items, before);
    }

    #[test]
    fn test_unknown_loser_leaves_set_untouched() {
        let mut items = set_of(&[("a", 1010.0, 3), ("b", 990.0, 3)]);
        let before = items.clone();

        let err = apply_outcome(&mut items, "a", "ghost").unwrap_err();
        assert_eq!(err, RankError::UnknownItem("ghost".to_string()));
        assert_eq!(items, before);
    }

    #[test]
    fn test_self_match_rejected() {
        let mut items = set_of(&[("a", 1000.0, 0), ("b", 1000.0, 0)]);
        let before = items.clone();
        assert_eq!(
            apply_outcome(&mut items, "a", "a"),
            Err(RankError::SelfMatch("a".to_string()))
        );
        assert_eq!(items, before);
    }

    #[test]
    fn test_unknown_track_named_twice_is_unknown() {
        let mut items = set_of(&[("a", 1000.0, 0), ("b", 1000.0, 0)]);
        let before = items.clone();
        assert_eq!(
            apply_outcome(&mut items, "ghost", "ghost"),
            Err(RankError::UnknownItem("ghost".to_string()))
        );
        assert_eq!(items, before);
    }

    #[test]
    fn test_match_count_saturates_instead_of_wrapping() {
        let mut items = set_of(&[("a", 1000.0, u32::MAX), ("b", 1000.0, 0)]);
        let change = apply_outcome(&mut items, "a", "b").unwrap();

        let a = items.get("a").unwrap();
        assert_eq!(a.match_count, u32::MAX);
        assert_eq!(a.rating, change.winner_rating);
        // Established K for the veteran, provisional K for the newcomer.
        assert_eq!(change.winner_rating, 1016.0);
        assert_eq!(change.loser_rating, 968.0);
        assert_eq!(items.get("b").unwrap().match_count, 1);
    }

    #[test]
    fn test_engine_uses_configured_rating_policy() {
        let engine = RankingEngine::new(EngineConfig {
            rating: RatingPolicy {
                calibration_matches: 1,
                provisional_k: 10.0,
                established_k: 2.0,
            },
            ..EngineConfig::default()
        });
        let mut items = set_of(&[("a", 1000.0, 0), ("b", 1000.0, 1)]);
        let change = engine.apply_outcome(&mut items, "a", "b").unwrap();
        assert_eq!(change.winner_rating, 1005.0);
        assert_eq!(change.loser_rating, 999.0);
    }

    #[test]
    fn test_select_then_record_loop_calibrates_every_track() {
        let mut items: ItemSet = (0..6)
            .map(|i| RateableItem::new(format!("t{i}"), format!("Track {i}"), "artist", ""))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..60 {
            let m = select_pair(&items, &mut rng).unwrap();
            apply_outcome(&mut items, &m.first, &m.second).unwrap();
        }

        let total: u32 = items.iter().map(|i| i.match_count).sum();
        assert_eq!(total, 120);
        assert!(items.iter().all(|i| i.match_count > 0));
    }
}

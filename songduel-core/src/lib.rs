/// songduel-core: head-to-head rating engine for playlist tracks.
///
/// Matchmaking picks two tracks → a listener picks the better one → the Elo
/// update revises both ratings. No IO, no HTTP, no filesystem. The caller
/// owns the `ItemSet`, persists it, and serializes writes per playlist.
///
/// Tracks are identified by their URI.
///
/// # Quick start
///
/// ```rust
/// use songduel_core::{apply_outcome, select_pair, ItemSet, RateableItem};
///
/// let mut items: ItemSet = ["spotify:track:a", "spotify:track:b", "spotify:track:c"]
///     .into_iter()
///     .map(|uri| RateableItem::new(uri, "Song", "Artist", ""))
///     .collect();
///
/// let mut rng = rand::rng();
/// let matchup = select_pair(&items, &mut rng).unwrap();
///
/// // Pretend the listener preferred the first track.
/// let change = apply_outcome(&mut items, &matchup.first, &matchup.second).unwrap();
/// assert_eq!(change.winner_rating, 1032.0);
///
/// for item in items.leaderboard() {
///     println!("{:>8.2}  {}", item.rating, item.uri);
/// }
/// ```

pub mod catalog;
pub mod constants;
pub mod engine;
pub mod error;
pub mod matchmaking;
pub mod rating;
pub mod reorder;
pub mod types;

// Re-export primary public API at crate root.
pub use catalog::{IngestReport, ObservedTrack};
pub use engine::{apply_outcome, EngineConfig, RankingEngine};
pub use error::{RankError, Result};
pub use matchmaking::{select_pair, MatchmakingPolicy, Tier};
pub use rating::{calculate_new_ratings, expected_score, k_factor, Outcome, RatingPolicy};
pub use reorder::{plan_reorder, ReorderBatch};
pub use types::{ItemSet, Matchup, RateableItem, RatingChange};

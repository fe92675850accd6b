use thiserror::Error;

/// Result type for songduel-core operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Precondition failures surfaced by the matchmaker and the rating update.
///
/// None of these are retryable from inside the core. Each one means the
/// caller's view of the item set is out of step with what it asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// The matchmaker needs at least two tracks to build a matchup.
    #[error("need at least 2 tracks to build a matchup, found {found}")]
    InsufficientItems { found: usize },

    /// An outcome referenced a track that is not in the set.
    #[error("unknown track: {0}")]
    UnknownItem(String),

    /// Winner and loser of an outcome were the same track.
    #[error("a track cannot be matched against itself: {0}")]
    SelfMatch(String),

    /// Reorder batches must hold at least one track.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

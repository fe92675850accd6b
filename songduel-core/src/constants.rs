/// Rating assigned to a track the first time it is observed.
pub const INITIAL_RATING: f64 = 1000.0;

/// Logistic scale of the expected-score curve.
///
/// A gap of this many points means the higher-rated track is expected to win
/// roughly ten times out of eleven.
pub const RATING_SCALE: f64 = 400.0;

/// Number of completed comparisons before a track leaves its calibration period.
///
/// Below this count a track gets the provisional K-factor and is eligible for
/// the calibration matchmaking tier. This is a policy choice, not a derived
/// value; `RatingPolicy` and `MatchmakingPolicy` can override it.
pub const CALIBRATION_MATCHES: u32 = 5;

/// K-factor for tracks still in their calibration period.
pub const PROVISIONAL_K_FACTOR: f64 = 64.0;

/// K-factor once a track has at least `CALIBRATION_MATCHES` comparisons.
pub const ESTABLISHED_K_FACTOR: f64 = 32.0;

/// Proximity matchmaking considers opponents whose rating is strictly closer
/// than this many points to the anchor track.
///
/// Close matchups are the most informative ones once ratings settle. 100 is
/// a policy choice; `MatchmakingPolicy::proximity_window` overrides it.
pub const PROXIMITY_WINDOW: f64 = 100.0;

/// Maximum number of tracks the playlist service accepts in one write.
pub const DEFAULT_PAGE_SIZE: usize = 100;

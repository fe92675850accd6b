/// Matchmaking: which two tracks to compare next.
///
/// Selection runs an ordered list of tiers (`Tier::ORDER`). Each tier has an
/// eligibility predicate and a selection strategy; the first tier that can
/// produce a pair wins. Proximity and fallback share one anchor track, drawn
/// the first time either of them needs it.
///
/// Internally tracks are addressed by their index in a snapshot of the set;
/// only the returned `Matchup` carries URIs.
use rand::seq::index::sample;
use rand::Rng;

use crate::constants::{CALIBRATION_MATCHES, PROXIMITY_WINDOW};
use crate::error::{RankError, Result};
use crate::types::{ItemSet, Matchup, RateableItem};

/// One rule in the matchmaking policy chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Tier {
    /// Tracks that have never been compared.
    ColdStart,
    /// Tracks still inside their calibration period.
    Calibration,
    /// A random anchor against an opponent with a nearby rating.
    Proximity,
    /// A random anchor against any other track.
    Fallback,
}

impl Tier {
    /// Evaluation order. Fallback always produces a pair once two tracks exist.
    pub const ORDER: [Tier; 4] = [Tier::ColdStart, Tier::Calibration, Tier::Proximity, Tier::Fallback];

    /// Whether `item` may be drawn by this tier's pool.
    pub fn is_eligible(self, item: &RateableItem, policy: &MatchmakingPolicy) -> bool {
        match self {
            Tier::ColdStart => item.match_count == 0,
            Tier::Calibration => item.match_count < policy.calibration_matches,
            Tier::Proximity | Tier::Fallback => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::ColdStart => "cold-start",
            Tier::Calibration => "calibration",
            Tier::Proximity => "proximity",
            Tier::Fallback => "fallback",
        }
    }

    fn select<R: Rng>(
        self,
        pool: &mut Pool<'_>,
        policy: &MatchmakingPolicy,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        match self {
            Tier::ColdStart => {
                let fresh = pool.eligible(self, policy);
                match fresh.len() {
                    0 => None,
                    // A lone new track still gets its first comparison now.
                    1 => Some((fresh[0], pool.random_other(fresh[0], rng))),
                    _ => Some(pick_two(&fresh, rng)),
                }
            }
            Tier::Calibration => {
                let calibrating = pool.eligible(self, policy);
                if calibrating.len() >= 2 {
                    Some(pick_two(&calibrating, rng))
                } else {
                    None
                }
            }
            Tier::Proximity => {
                let anchor = pool.anchor(rng);
                let anchor_rating = pool.items[anchor].rating;
                let candidates: Vec<usize> = (0..pool.items.len())
                    .filter(|&i| i != anchor)
                    .filter(|&i| (pool.items[i].rating - anchor_rating).abs() < policy.proximity_window)
                    .collect();
                if candidates.is_empty() {
                    None
                } else {
                    Some((anchor, candidates[rng.random_range(0..candidates.len())]))
                }
            }
            Tier::Fallback => {
                let anchor = pool.anchor(rng);
                Some((anchor, pool.random_other(anchor, rng)))
            }
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tunable knobs of the matchmaking tiers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchmakingPolicy {
    /// Tracks below this comparison count are drawn by the calibration tier.
    pub calibration_matches: u32,
    /// Proximity opponents must be strictly closer than this in rating.
    pub proximity_window: f64,
}

impl Default for MatchmakingPolicy {
    fn default() -> Self {
        MatchmakingPolicy {
            calibration_matches: CALIBRATION_MATCHES,
            proximity_window: PROXIMITY_WINDOW,
        }
    }
}

impl MatchmakingPolicy {
    /// Choose the next two distinct tracks to compare.
    pub fn select_pair<R: Rng>(&self, items: &ItemSet, rng: &mut R) -> Result<Matchup> {
        if items.len() < 2 {
            return Err(RankError::InsufficientItems { found: items.len() });
        }

        let mut pool = Pool {
            items: items.iter().collect(),
            anchor: None,
        };

        for tier in Tier::ORDER {
            if let Some((a, b)) = tier.select(&mut pool, self, rng) {
                debug_assert_ne!(a, b);
                return Ok(Matchup {
                    first: pool.items[a].uri.clone(),
                    second: pool.items[b].uri.clone(),
                    tier,
                });
            }
        }

        unreachable!("fallback tier always yields a pair for two or more tracks")
    }
}

/// Choose the next matchup under the default policy.
pub fn select_pair<R: Rng>(items: &ItemSet, rng: &mut R) -> Result<Matchup> {
    MatchmakingPolicy::default().select_pair(items, rng)
}

/// Snapshot of the set for one selection, plus the shared anchor.
struct Pool<'a> {
    items: Vec<&'a RateableItem>,
    anchor: Option<usize>,
}

impl Pool<'_> {
    fn eligible(&self, tier: Tier, policy: &MatchmakingPolicy) -> Vec<usize> {
        (0..self.items.len())
            .filter(|&i| tier.is_eligible(self.items[i], policy))
            .collect()
    }

    fn anchor<R: Rng>(&mut self, rng: &mut R) -> usize {
        let len = self.items.len();
        *self.anchor.get_or_insert_with(|| rng.random_range(0..len))
    }

    /// Uniform pick from every index except `exclude`. Needs at least two items.
    fn random_other<R: Rng>(&self, exclude: usize, rng: &mut R) -> usize {
        let r = rng.random_range(0..self.items.len() - 1);
        if r >= exclude { r + 1 } else { r }
    }
}

/// Two distinct entries of `indices`, uniformly without replacement.
fn pick_two<R: Rng>(indices: &[usize], rng: &mut R) -> (usize, usize) {
    let picked = sample(rng, indices.len(), 2);
    (indices[picked.index(0)], indices[picked.index(1)])
}

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::constants::INITIAL_RATING;

/// One playlist track under comparison.
///
/// `uri` is the identity and never changes. `rating` and `match_count` are
/// only ever written together, once per recorded outcome.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateableItem {
    pub uri: String,
    pub name: String,
    pub artist: String,
    /// Cover art URL, empty when the catalog had none.
    pub image: String,
    pub rating: f64,
    /// Completed comparisons this track took part in.
    #[cfg_attr(feature = "serde", serde(rename = "matches", alias = "matchCount"))]
    pub match_count: u32,
}

impl RateableItem {
    /// A freshly observed track: initial rating, no comparisons yet.
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        RateableItem {
            uri: uri.into(),
            name: name.into(),
            artist: artist.into(),
            image: image.into(),
            rating: INITIAL_RATING,
            match_count: 0,
        }
    }

    /// Same track with a given rating history. Mostly useful for seeding tests
    /// and for loading stored records.
    pub fn with_record(mut self, rating: f64, match_count: u32) -> Self {
        self.rating = rating;
        self.match_count = match_count;
        self
    }
}

/// Every rateable track in one container (playlist), keyed by URI.
///
/// Keys are kept sorted so that a seeded matchmaker picks the same pair on
/// every run. Nothing else depends on the order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemSet {
    items: BTreeMap<String, RateableItem>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, uri: &str) -> Option<&RateableItem> {
        self.items.get(uri)
    }

    pub(crate) fn get_mut(&mut self, uri: &str) -> Option<&mut RateableItem> {
        self.items.get_mut(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.items.contains_key(uri)
    }

    /// Insert or replace a track, keyed by its own URI.
    pub fn insert(&mut self, item: RateableItem) -> Option<RateableItem> {
        self.items.insert(item.uri.clone(), item)
    }

    pub(crate) fn remove(&mut self, uri: &str) -> Option<RateableItem> {
        self.items.remove(uri)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, RateableItem> {
        self.items.values()
    }

    /// Stored key and record pairs, for callers that validate the mapping.
    pub fn entries(&self) -> btree_map::Iter<'_, String, RateableItem> {
        self.items.iter()
    }

    /// Tracks by descending rating. Ties fall back to URI order.
    pub fn leaderboard(&self) -> Vec<&RateableItem> {
        let mut sorted: Vec<&RateableItem> = self.items.values().collect();
        sorted.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.uri.cmp(&b.uri))
        });
        sorted
    }

    /// Put every track back to the initial rating with no comparisons.
    pub fn reset_ratings(&mut self) {
        for item in self.items.values_mut() {
            item.rating = INITIAL_RATING;
            item.match_count = 0;
        }
    }
}

impl FromIterator<RateableItem> for ItemSet {
    fn from_iter<I: IntoIterator<Item = RateableItem>>(iter: I) -> Self {
        let mut set = ItemSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a RateableItem;
    type IntoIter = btree_map::Values<'a, String, RateableItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

/// The two tracks chosen for the next comparison, and the tier that chose them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matchup {
    pub first: String,
    pub second: String,
    pub tier: crate::matchmaking::Tier,
}

/// Ratings of both tracks after an outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingChange {
    pub winner_rating: f64,
    pub loser_rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(uri: &str, rating: f64, matches: u32) -> RateableItem {
        RateableItem::new(uri, uri, "artist", "").with_record(rating, matches)
    }

    #[test]
    fn test_new_item_starts_at_initial_rating() {
        let item = RateableItem::new("spotify:track:1", "Song", "Band", "");
        assert_eq!(item.rating, 1000.0);
        assert_eq!(item.match_count, 0);
    }

    #[test]
    fn test_insert_keys_by_uri() {
        let mut set = ItemSet::new();
        set.insert(track("b", 1000.0, 0));
        set.insert(track("a", 1000.0, 0));
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        let keys: Vec<&str> = set.iter().map(|i| i.uri.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_leaderboard_descending_with_uri_tiebreak() {
        let set: ItemSet = vec![
            track("c", 1010.0, 3),
            track("b", 990.0, 3),
            track("a", 1010.0, 3),
        ]
        .into_iter()
        .collect();

        let order: Vec<&str> = set.leaderboard().into_iter().map(|i| i.uri.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_reset_ratings() {
        let mut set: ItemSet = vec![track("a", 1200.0, 9), track("b", 850.5, 2)]
            .into_iter()
            .collect();
        set.reset_ratings();
        for item in &set {
            assert_eq!(item.rating, 1000.0);
            assert_eq!(item.match_count, 0);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip_preserves_record() {
        let set: ItemSet = vec![track("a", 1031.57, 7), track("b", 968.43, 12)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"matches\":7"));

        let back: ItemSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.get("a").unwrap().rating, 1031.57);
        assert_eq!(back.get("b").unwrap().match_count, 12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_accepts_match_count_alias() {
        let json = r#"{"x": {"uri": "x", "name": "X", "artist": "A", "image": "",
                             "rating": 1016.0, "matchCount": 1}}"#;
        let set: ItemSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.get("x").unwrap().match_count, 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_missing_rating() {
        let json = r#"{"x": {"uri": "x", "name": "X", "artist": "A", "image": "", "matches": 1}}"#;
        assert!(serde_json::from_str::<ItemSet>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_negative_match_count() {
        let json = r#"{"x": {"uri": "x", "name": "X", "artist": "A", "image": "",
                             "rating": 1000.0, "matches": -1}}"#;
        assert!(serde_json::from_str::<ItemSet>(json).is_err());
    }
}

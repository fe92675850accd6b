/// Merging a fresh catalog snapshot into an existing item set.
///
/// The playlist is the container: tracks in the snapshot survive, with their
/// rating history intact, and tracks missing from it are dropped.
use std::collections::HashSet;

use crate::types::{ItemSet, RateableItem};

/// A track as reported by the external catalog, before it has any rating.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservedTrack {
    pub uri: String,
    pub name: String,
    pub artist: String,
    pub image: String,
}

/// What a merge did to the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngestReport {
    /// Tracks seen for the first time.
    pub added: usize,
    /// Known tracks whose metadata was refreshed.
    pub refreshed: usize,
    /// Known tracks no longer in the catalog.
    pub dropped: usize,
    /// Repeated URIs in the snapshot, ignored after the first.
    pub duplicates: usize,
}

impl ItemSet {
    /// Replace the set's membership with `observed`.
    ///
    /// Known URIs keep `rating` and `match_count`; only display metadata is
    /// overwritten. New URIs start at the initial rating with no comparisons.
    pub fn merge_catalog<I>(&mut self, observed: I) -> IngestReport
    where
        I: IntoIterator<Item = ObservedTrack>,
    {
        let mut report = IngestReport::default();
        let mut previous = std::mem::take(self);
        let mut seen: HashSet<String> = HashSet::new();

        for track in observed {
            if !seen.insert(track.uri.clone()) {
                report.duplicates += 1;
                continue;
            }

            let item = match previous.remove(&track.uri) {
                Some(mut known) => {
                    known.name = track.name;
                    known.artist = track.artist;
                    known.image = track.image;
                    report.refreshed += 1;
                    known
                }
                None => {
                    report.added += 1;
                    RateableItem::new(track.uri, track.name, track.artist, track.image)
                }
            };
            self.insert(item);
        }

        report.dropped = previous.len();
        report
    }
}

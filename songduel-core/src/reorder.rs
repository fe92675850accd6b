/// Turning ratings into playlist write operations.
///
/// The playlist service caps how many tracks one write may carry, so the
/// ranked order goes out in pages: the first page replaces the playlist
/// contents, every later page appends.
use crate::error::{RankError, Result};
use crate::types::ItemSet;

/// One write against the external playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", content = "uris", rename_all = "lowercase"))]
pub enum ReorderBatch {
    Replace(Vec<String>),
    Append(Vec<String>),
}

impl ReorderBatch {
    pub fn uris(&self) -> &[String] {
        match self {
            ReorderBatch::Replace(uris) | ReorderBatch::Append(uris) => uris,
        }
    }
}

/// Batches that rewrite the playlist in descending rating order.
///
/// An empty set yields no batches.
pub fn plan_reorder(items: &ItemSet, page_size: usize) -> Result<Vec<ReorderBatch>> {
    if page_size == 0 {
        return Err(RankError::InvalidPageSize);
    }

    let ranked: Vec<String> = items.leaderboard().into_iter().map(|i| i.uri.clone()).collect();

    Ok(ranked
        .chunks(page_size)
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                ReorderBatch::Replace(chunk.to_vec())
            } else {
                ReorderBatch::Append(chunk.to_vec())
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PAGE_SIZE;
    use crate::types::RateableItem;

    fn ranked_set(n: usize) -> ItemSet {
        (0..n)
            .map(|i| {
                RateableItem::new(format!("t{i:03}"), "name", "artist", "")
                    .with_record(1000.0 + i as f64, 5)
            })
            .collect()
    }

    #[test]
    fn test_empty_set_has_no_batches() {
        assert!(plan_reorder(&ItemSet::new(), DEFAULT_PAGE_SIZE).unwrap().is_empty());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(plan_reorder(&ranked_set(3), 0), Err(RankError::InvalidPageSize));
    }

    #[test]
    fn test_single_page_replaces() {
        let batches = plan_reorder(&ranked_set(3), DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(
            batches,
            vec![ReorderBatch::Replace(vec![
                "t002".to_string(),
                "t001".to_string(),
                "t000".to_string(),
            ])]
        );
    }

    #[test]
    fn test_pages_replace_then_append() {
        let batches = plan_reorder(&ranked_set(250), DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(batches.len(), 3);
        assert!(matches!(batches[0], ReorderBatch::Replace(_)));
        assert!(matches!(batches[1], ReorderBatch::Append(_)));
        assert!(matches!(batches[2], ReorderBatch::Append(_)));
        assert_eq!(batches[0].uris().len(), 100);
        assert_eq!(batches[2].uris().len(), 50);
        assert_eq!(batches[0].uris()[0], "t249");
        assert_eq!(batches[2].uris()[49], "t000");
    }
}

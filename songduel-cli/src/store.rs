/// JSON track store: one object keyed by track URI.
///
/// Writes go to a uniquely named temp file beside the store and are renamed
/// over it, so a crash mid-write never leaves a half-written file behind and
/// two writers never share a temp file.
use songduel_core::ItemSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to write store {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("Store {} is corrupt: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("Failed to encode store {}: {source}", .path.display())]
    Encode { path: PathBuf, source: serde_json::Error },

    #[error("Store {} is corrupt: record under key {key} has uri {uri}", .path.display())]
    KeyMismatch { path: PathBuf, key: String, uri: String },

    #[error("Store {} is corrupt: track {uri} has rating {rating}", .path.display())]
    BadRating { path: PathBuf, uri: String, rating: f64 },
}

/// Load the store. A missing file is an empty set; anything unreadable is an error.
pub fn load(path: &Path) -> Result<ItemSet, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store yet, starting empty");
            return Ok(ItemSet::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let items: ItemSet = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(path, &items)?;

    info!(path = %path.display(), tracks = items.len(), "loaded store");
    Ok(items)
}

/// Every record must sit under its own URI and carry a usable rating.
fn validate(path: &Path, items: &ItemSet) -> Result<(), StoreError> {
    for (key, item) in items.entries() {
        if *key != item.uri {
            return Err(StoreError::KeyMismatch {
                path: path.to_path_buf(),
                key: key.clone(),
                uri: item.uri.clone(),
            });
        }
        if !item.rating.is_finite() {
            return Err(StoreError::BadRating {
                path: path.to_path_buf(),
                uri: item.uri.clone(),
                rating: item.rating,
            });
        }
    }
    Ok(())
}

/// Atomically replace the store with `items`.
pub fn save(path: &Path, items: &ItemSet) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    // A bare file name has an empty parent.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let json = serde_json::to_string_pretty(items).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".songduel-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), tracks = items.len(), "saved store");
    Ok(())
}

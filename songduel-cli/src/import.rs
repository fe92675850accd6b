/// Reading exported playlist pages into observed tracks.
///
/// Accepts the playlist-items page shape of the music service's web API,
/// either one page object or a JSON array of pages.
use serde::Deserialize;
use songduel_core::ObservedTrack;

#[derive(Debug, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistEntry>,
    /// URL of the following page. Present on the last page we were given
    /// means the export stopped early.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistEntry {
    /// Null for tracks the service has since removed.
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumObject {
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    pub url: String,
}

/// Parse a file's content as either a single page or a JSON array of pages.
pub fn parse_pages(content: &str) -> Result<Vec<PlaylistPage>, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
    } else {
        serde_json::from_str::<PlaylistPage>(trimmed).map(|page| vec![page])
    }
}

/// Tracks worth rating, plus how many entries were skipped.
///
/// Removed tracks (null) and local files have no stable catalog identity.
pub fn observed_tracks(pages: &[PlaylistPage]) -> (Vec<ObservedTrack>, usize) {
    let mut tracks = Vec::new();
    let mut skipped = 0;

    for entry in pages.iter().flat_map(|p| &p.items) {
        let Some(track) = entry.track.as_ref().filter(|t| !t.is_local) else {
            skipped += 1;
            continue;
        };

        let image = track
            .album
            .as_ref()
            .and_then(|a| a.images.first())
            .map(|img| img.url.clone())
            .unwrap_or_default();
        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        tracks.push(ObservedTrack {
            uri: track.uri.clone(),
            name: track.name.clone(),
            artist,
            image,
        });
    }

    (tracks, skipped)
}

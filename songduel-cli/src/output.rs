/// Output formatting: terminal table and JSON.
use serde::Serialize;
use songduel_core::{ItemSet, Matchup, RateableItem, ReorderBatch};

use crate::bail;

#[derive(Serialize)]
struct JsonRankedTrack<'a> {
    rank: usize,
    uri: &'a str,
    name: &'a str,
    artist: &'a str,
    rating: f64,
    matches: u32,
}

#[derive(Serialize)]
struct JsonMatchup<'a> {
    tier: &'a str,
    first: &'a RateableItem,
    second: &'a RateableItem,
}

fn print_pretty<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => bail(format!("Failed to encode JSON output: {e}")),
    }
}

/// Print the leaderboard as a formatted terminal table.
///
/// `ranked` may be a truncated view; the footer always describes all of `items`.
pub fn print_table(ranked: &[&RateableItem], items: &ItemSet) {
    if ranked.is_empty() {
        println!("No tracks yet. Run `songduel ingest <page.json>` first.");
        return;
    }

    // Widest track name for padding, at least "Track"
    let name_width = ranked.iter().map(|t| t.name.chars().count()).max().unwrap_or(5).max(5);
    let artist_width = ranked.iter().map(|t| t.artist.chars().count()).max().unwrap_or(6).max(6);

    println!("  # | {:<name_width$} | {:<artist_width$} |  Rating | Matches", "Track", "Artist");
    println!(
        "----|-{}-|-{}-|---------|--------",
        "-".repeat(name_width),
        "-".repeat(artist_width)
    );

    for (i, t) in ranked.iter().enumerate() {
        println!(
            "{:>3} | {:<name_width$} | {:<artist_width$} | {:>7.2} | {:>7}",
            i + 1,
            t.name,
            t.artist,
            t.rating,
            t.match_count,
        );
    }

    println!("\n{}", summary_line(items));
}

/// Each comparison adds one match to both tracks.
fn summary_line(items: &ItemSet) -> String {
    let comparisons = items.iter().map(|t| u64::from(t.match_count)).sum::<u64>() / 2;
    format!("{} tracks, {} comparisons recorded", items.len(), comparisons)
}

/// Print the leaderboard as JSON.
pub fn print_json(ranked: &[&RateableItem]) {
    let rows: Vec<JsonRankedTrack> = ranked
        .iter()
        .enumerate()
        .map(|(i, t)| JsonRankedTrack {
            rank: i + 1,
            uri: &t.uri,
            name: &t.name,
            artist: &t.artist,
            rating: t.rating,
            matches: t.match_count,
        })
        .collect();
    print_pretty(&rows);
}

/// Print the next matchup, as text or JSON.
pub fn print_matchup(items: &ItemSet, matchup: &Matchup, json: bool) {
    let (Some(first), Some(second)) = (items.get(&matchup.first), items.get(&matchup.second)) else {
        bail("Matchup refers to a track that is not in the store");
    };

    if json {
        print_pretty(&JsonMatchup {
            tier: matchup.tier.label(),
            first,
            second,
        });
    } else {
        println!("{} ({:.2})  vs  {} ({:.2})  [{}]", first.name, first.rating, second.name, second.rating, matchup.tier);
        println!("  1: {}", first.uri);
        println!("  2: {}", second.uri);
    }
}

/// Print the playlist write plan.
pub fn print_plan(batches: &[ReorderBatch], json: bool) {
    if json {
        print_pretty(&batches);
        return;
    }

    if batches.is_empty() {
        println!("Nothing to reorder.");
        return;
    }

    for (i, batch) in batches.iter().enumerate() {
        let op = match batch {
            ReorderBatch::Replace(_) => "replace",
            ReorderBatch::Append(_) => "append",
        };
        println!("# batch {} ({op}, {} tracks)", i + 1, batch.uris().len());
        for uri in batch.uris() {
            println!("{uri}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_every_track_not_just_shown_rows() {
        let items: ItemSet = [("a", 1040.0, 3), ("b", 1000.0, 2), ("c", 960.0, 3)]
            .into_iter()
            .map(|(uri, rating, matches)| RateableItem::new(uri, uri, "artist", "").with_record(rating, matches))
            .collect();

        let mut ranked = items.leaderboard();
        ranked.truncate(1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(summary_line(&items), "3 tracks, 4 comparisons recorded");
    }
}

mod config;
mod import;
mod output;
mod prompt;
mod store;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use songduel_core::{plan_reorder, ItemSet, Matchup, RankError, RankingEngine, RatingChange};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppContext;
use crate::prompt::{build_prompt, parse_choice, Choice};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "songduel", version, about = "Rank playlist tracks head-to-head")]
struct Cli {
    /// Path to config file (default: ~/.config/songduel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Track store to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file
    Init,
    /// Merge exported playlist pages into the store, keeping existing ratings
    Ingest {
        /// JSON files, each one page or an array of pages
        #[arg(required = true)]
        pages: Vec<PathBuf>,
    },
    /// Show the next matchup without recording anything
    Next {
        #[arg(long)]
        json: bool,
        /// Seed the matchmaker for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Record one outcome
    Record {
        #[arg(long)]
        winner: String,
        #[arg(long)]
        loser: String,
    },
    /// Rank interactively: pick the better track, repeat
    Rank {
        /// Stop after this many recorded outcomes
        #[arg(long)]
        rounds: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print tracks by descending rating
    Leaderboard {
        #[arg(long)]
        json: bool,
        /// Only the top N tracks
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the playlist writes that apply the current ranking
    Plan {
        /// Tracks per write (default from config, else 100)
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Put every track back to the initial rating
    Reset {
        /// Required, since this discards all recorded comparisons
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => config::config_path().unwrap_or_else(|e| bail(e)),
    };

    if let Commands::Init = cli.command {
        config::create_default_config(&config_path).unwrap_or_else(|e| bail(e));
        println!("Created config at {}", config_path.display());
        println!("Edit it to set your store path, page size, etc.");
        return;
    }

    let cfg = config::load_config(&config_path).unwrap_or_else(|e| bail(e));
    let ctx = AppContext::resolve(cfg, cli.store).unwrap_or_else(|e| bail(e));
    info!(store = %ctx.store_path.display(), "using store");

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Ingest { pages } => run_ingest(&ctx, &pages),
        Commands::Next { json, seed } => run_next(&ctx, json, seed),
        Commands::Record { winner, loser } => run_record(&ctx, &winner, &loser),
        Commands::Rank { rounds, seed } => run_rank(&ctx, rounds, seed),
        Commands::Leaderboard { json, limit } => run_leaderboard(&ctx, json, limit),
        Commands::Plan { page_size, json } => run_plan(&ctx, page_size, json),
        Commands::Reset { yes } => run_reset(&ctx, yes),
    }
}

fn load_items(ctx: &AppContext) -> ItemSet {
    store::load(&ctx.store_path).unwrap_or_else(|e| bail(e))
}

fn save_items(ctx: &AppContext, items: &ItemSet) {
    store::save(&ctx.store_path, items).unwrap_or_else(|e| bail(e));
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn next_matchup(engine: &RankingEngine, items: &ItemSet, rng: &mut StdRng) -> Matchup {
    match engine.select_pair(items, rng) {
        Ok(m) => m,
        Err(RankError::InsufficientItems { found }) => bail(format!(
            "Need at least 2 tracks to rank, found {found}. Run `songduel ingest <page.json>` first."
        )),
        Err(e) => bail(e),
    }
}

/// Apply one outcome to the store as it is on disk right now.
///
/// Another command may have written the store since the matchup was picked,
/// so this never works from an earlier snapshot. Nothing is saved when the
/// outcome is rejected.
fn record_latest(
    ctx: &AppContext,
    engine: &RankingEngine,
    winner: &str,
    loser: &str,
) -> Result<RatingChange, RankError> {
    let mut items = load_items(ctx);
    let change = engine.apply_outcome(&mut items, winner, loser)?;
    save_items(ctx, &items);
    Ok(change)
}

fn run_ingest(ctx: &AppContext, paths: &[PathBuf]) {
    let mut pages = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read {}: {e}", path.display())));
        let parsed = import::parse_pages(&content)
            .unwrap_or_else(|e| bail(format!("{} is not a playlist export: {e}", path.display())));
        pages.extend(parsed);
    }

    if pages.last().is_some_and(|p| p.next.is_some()) {
        warn!("last page has a `next` link, the export looks incomplete; missing tracks will be dropped");
    }

    let (observed, skipped) = import::observed_tracks(&pages);
    let mut items = load_items(ctx);
    let report = items.merge_catalog(observed);
    save_items(ctx, &items);

    info!(
        added = report.added,
        refreshed = report.refreshed,
        dropped = report.dropped,
        duplicates = report.duplicates,
        skipped,
        "ingested playlist"
    );
    println!(
        "{} tracks: {} new, {} updated, {} removed, {} skipped",
        items.len(),
        report.added,
        report.refreshed,
        report.dropped,
        skipped + report.duplicates,
    );
}

fn run_next(ctx: &AppContext, json: bool, seed: Option<u64>) {
    let items = load_items(ctx);
    let engine = RankingEngine::new(ctx.engine.clone());
    let matchup = next_matchup(&engine, &items, &mut make_rng(seed));
    output::print_matchup(&items, &matchup, json);
}

fn run_record(ctx: &AppContext, winner: &str, loser: &str) {
    let engine = RankingEngine::new(ctx.engine.clone());
    let change = record_latest(ctx, &engine, winner, loser).unwrap_or_else(|e| bail(e));

    info!(winner, loser, winner_rating = change.winner_rating, loser_rating = change.loser_rating, "recorded outcome");
    println!("{winner}: {:.2}", change.winner_rating);
    println!("{loser}: {:.2}", change.loser_rating);
}

fn run_rank(ctx: &AppContext, rounds: Option<usize>, seed: Option<u64>) {
    let engine = RankingEngine::new(ctx.engine.clone());
    let mut rng = make_rng(seed);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut recorded: usize = 0;
    let mut skipped: usize = 0;

    'rounds: while rounds.map_or(true, |limit| recorded < limit) {
        // Reloaded every round so writes from other commands are picked up.
        let items = load_items(ctx);
        let matchup = next_matchup(&engine, &items, &mut rng);
        let (Some(first), Some(second)) = (items.get(&matchup.first), items.get(&matchup.second)) else {
            bail("Matchup refers to a track that is not in the store");
        };
        let question = build_prompt(recorded + 1, first, second, matchup.tier);

        let choice = loop {
            print!("{question}");
            io::stdout().flush().unwrap_or_else(|e| bail(format!("Failed to write prompt: {e}")));

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => bail(format!("Failed to read from stdin: {e}")),
                None => {
                    println!();
                    break 'rounds;
                }
            };
            match parse_choice(&line) {
                Some(choice) => break choice,
                None => println!("Please answer 1, 2, s or q."),
            }
        };

        let (winner, loser) = match choice {
            Choice::First => (&matchup.first, &matchup.second),
            Choice::Second => (&matchup.second, &matchup.first),
            Choice::Skip => {
                skipped += 1;
                continue;
            }
            Choice::Quit => break,
        };

        let change = match record_latest(ctx, &engine, winner, loser) {
            Ok(change) => change,
            Err(RankError::UnknownItem(uri)) => {
                warn!(uri = %uri, "track left the store during the session");
                println!("  {uri} is no longer in the store, picking a new matchup.");
                continue;
            }
            Err(e) => bail(e),
        };
        recorded += 1;

        info!(
            winner = %winner,
            loser = %loser,
            tier = %matchup.tier,
            winner_rating = change.winner_rating,
            loser_rating = change.loser_rating,
            "recorded outcome"
        );
        println!("  → {:.2} / {:.2}", change.winner_rating, change.loser_rating);
    }

    println!("Recorded {recorded} outcomes ({skipped} skipped).");
}

fn run_leaderboard(ctx: &AppContext, json: bool, limit: Option<usize>) {
    let items = load_items(ctx);
    let mut ranked = items.leaderboard();
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    if json {
        output::print_json(&ranked);
    } else {
        output::print_table(&ranked, &items);
    }
}

fn run_plan(ctx: &AppContext, page_size: Option<usize>, json: bool) {
    let items = load_items(ctx);
    let page_size = page_size.unwrap_or(ctx.page_size);
    let batches = plan_reorder(&items, page_size).unwrap_or_else(|e| bail(e));
    info!(batches = batches.len(), page_size, "planned reorder");
    output::print_plan(&batches, json);
}

fn run_reset(ctx: &AppContext, yes: bool) {
    if !yes {
        bail("Reset discards every recorded comparison. Pass --yes to confirm.");
    }
    let mut items = load_items(ctx);
    items.reset_ratings();
    save_items(ctx, &items);
    info!(tracks = items.len(), "reset ratings");
    println!("Reset {} tracks to the initial rating.", items.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SongduelConfig;
    use songduel_core::{apply_outcome, RateableItem};

    fn context_with(dir: &tempfile::TempDir, uris: &[&str]) -> AppContext {
        let path = dir.path().join("songs.json");
        let items: ItemSet = uris
            .iter()
            .map(|&uri| RateableItem::new(uri, uri, "artist", ""))
            .collect();
        store::save(&path, &items).unwrap();
        AppContext::resolve(SongduelConfig::default(), Some(path)).unwrap()
    }

    #[test]
    fn test_record_keeps_outcomes_written_by_another_command() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with(&dir, &["a", "b"]);
        let engine = RankingEngine::new(ctx.engine.clone());

        // A session picks its matchup from this snapshot...
        let snapshot = store::load(&ctx.store_path).unwrap();
        assert_eq!(snapshot.len(), 2);

        // ...while a second command records b over a.
        let mut other = store::load(&ctx.store_path).unwrap();
        apply_outcome(&mut other, "b", "a").unwrap();
        store::save(&ctx.store_path, &other).unwrap();

        let change = record_latest(&ctx, &engine, "a", "b").unwrap();

        let stored = store::load(&ctx.store_path).unwrap();
        let a = stored.get("a").unwrap();
        let b = stored.get("b").unwrap();
        assert_eq!((a.match_count, b.match_count), (2, 2));
        assert_eq!(a.rating, change.winner_rating);
        assert_eq!(b.rating, change.loser_rating);
        // b's earlier win still counts: it is rated above where a lone loss leaves it.
        assert!(b.rating > 984.0);
    }

    #[test]
    fn test_record_rejects_track_removed_by_another_command() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with(&dir, &["a", "b", "c"]);
        let engine = RankingEngine::new(ctx.engine.clone());

        let remaining: ItemSet = vec![
            RateableItem::new("a", "a", "artist", ""),
            RateableItem::new("c", "c", "artist", ""),
        ]
        .into_iter()
        .collect();
        store::save(&ctx.store_path, &remaining).unwrap();

        assert_eq!(
            record_latest(&ctx, &engine, "a", "b"),
            Err(RankError::UnknownItem("b".to_string()))
        );
        assert_eq!(store::load(&ctx.store_path).unwrap(), remaining);
    }
}

/// Terminal prompt for one head-to-head matchup.
use songduel_core::{RateableItem, Tier};

/// What the listener answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    First,
    Second,
    Skip,
    Quit,
}

/// Build the question shown for a matchup.
pub fn build_prompt(round: usize, first: &RateableItem, second: &RateableItem, tier: Tier) -> String {
    format!(
        "\nRound {round} ({tier})\n\
         \x20 [1] {} by {}  ({:.2}, {} matches)\n\
         \x20 [2] {} by {}  ({:.2}, {} matches)\n\
         Which is better? [1/2, s = skip, q = quit] ",
        first.name,
        first.artist,
        first.rating,
        first.match_count,
        second.name,
        second.artist,
        second.rating,
        second.match_count,
    )
}

/// Interpret one line of input. `None` means ask again.
pub fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "a" => Some(Choice::First),
        "2" | "b" => Some(Choice::Second),
        "s" | "skip" => Some(Choice::Skip),
        "q" | "quit" | "exit" => Some(Choice::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_contains_both_tracks() {
        let a = RateableItem::new("u:a", "Pizza Song", "The Ovens", "").with_record(1032.0, 1);
        let b = RateableItem::new("u:b", "Sushi Song", "Raw Fish", "");
        let prompt = build_prompt(3, &a, &b, Tier::ColdStart);
        assert!(prompt.contains("Round 3 (cold-start)"));
        assert!(prompt.contains("[1] Pizza Song by The Ovens  (1032.00, 1 matches)"));
        assert!(prompt.contains("[2] Sushi Song by Raw Fish  (1000.00, 0 matches)"));
        assert!(prompt.ends_with("q = quit] "));
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n"), Some(Choice::First));
        assert_eq!(parse_choice(" B "), Some(Choice::Second));
        assert_eq!(parse_choice("s"), Some(Choice::Skip));
        assert_eq!(parse_choice("QUIT"), Some(Choice::Quit));
        assert_eq!(parse_choice("3"), None);
        assert_eq!(parse_choice(""), None);
    }
}

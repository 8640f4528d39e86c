//! Shared utility functions.

use chrono::{DateTime, Utc};

use crate::types::UserId;

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Collapses whitespace and lowercases, for keyword trigger matching.
pub fn normalize_for_match(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parses a raw mention token (`<@123>` or `<@!123>`) into a user ID.
///
/// Returns `None` when the token is not a mention or the inner digits do
/// not form a valid ID.
pub fn parse_mention(token: &str) -> Option<UserId> {
    let inner = token
        .strip_prefix("<@")?
        .strip_suffix('>')?
        .trim_start_matches('!');
    inner.parse().ok().map(UserId)
}

/// Renders a user ID as a Discord mention.
pub fn mention(id: UserId) -> String {
    format!("<@!{id}>")
}

/// Truncates a string to a maximum byte length with ellipsis.
///
/// The cut lands on a char boundary, so multibyte input never splits
/// mid-character.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.len() <= max_length {
        return input.to_string();
    }
    let mut cut = max_length.saturating_sub(3);
    while !input.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &input[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("Mr ForT NitE"), "mrfortnite");
        assert_eq!(normalize_for_match("  hello\tworld "), "helloworld");
    }

    #[test]
    fn test_parse_mention() {
        assert_eq!(parse_mention("<@123>"), Some(UserId(123)));
        assert_eq!(parse_mention("<@!456>"), Some(UserId(456)));
        assert_eq!(parse_mention("@someone"), None);
        assert_eq!(parse_mention("<@notanumber>"), None);
    }

    #[test]
    fn test_mention_round_trip() {
        let id = UserId(987654321098765432);
        assert_eq!(parse_mention(&mention(id)), Some(id));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 20), "short");
        assert_eq!(
            truncate_string("This is a very long string that should be truncated", 20),
            "This is a very lo..."
        );
    }

    #[test]
    fn test_truncate_string_multibyte_boundary() {
        let input = "é".repeat(1200);
        let truncated = truncate_string(&input, 1900);
        assert!(truncated.len() <= 1900);
        assert!(truncated.ends_with("..."));
        assert!(truncated.trim_end_matches("...").chars().all(|c| c == 'é'));
    }
}

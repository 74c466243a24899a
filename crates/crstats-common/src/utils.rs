//! Shared utility functions.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %-I:%M:%S %P").to_string()
}

/// Returns the moment a Discord snowflake was minted.
pub fn snowflake_created_at(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(i64::try_from(millis).unwrap_or(i64::MAX))
        .single()
        .unwrap_or_default()
}

/// Wraps the words in a Markdown code block.
pub fn code_block(text: &str) -> String {
    format!("```{text}```")
}

/// Formats a duration as `1d 2h 3m 4s`, omitting leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 15, 4, 5).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-01 3:04:05 pm");
    }

    #[test]
    fn test_snowflake_created_at() {
        // Example id from Discord's developer documentation.
        let created = snowflake_created_at(175_928_847_299_117_063);
        assert_eq!(created.timestamp_millis(), 1_462_015_105_796);
    }

    #[test]
    fn test_snowflake_zero_is_discord_epoch() {
        let created = snowflake_created_at(0);
        assert_eq!(created, Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_code_block() {
        assert_eq!(code_block("Rust"), "```Rust```");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(125)), "2m 5s");
        assert_eq!(format_duration(Duration::seconds(3_725)), "1h 2m 5s");
        assert_eq!(format_duration(Duration::seconds(90_061)), "1d 1h 1m 1s");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        assert_eq!(truncate_string(input, 20), "This is a very lo...");
        assert_eq!(truncate_string("Short", 20), "Short");
    }
}

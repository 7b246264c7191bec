#![forbid(unsafe_code)]

//! ISO 8601 duration decoding and the short-form classification rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::VideoDetailRecord;

/// Longest runtime, in seconds, that still counts as a short.
pub const SHORT_FORM_MAX_SECONDS: u64 = 60;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
});

/// Decodes `PT#H#M#S` into whole seconds.
///
/// Each component is optional but the order is fixed. Anything that does not
/// start with `PT` decodes to 0; text after the matched prefix is ignored.
/// This never fails.
pub fn parse_duration(text: &str) -> u64 {
    let Some(captures) = DURATION_PATTERN.captures(text) else {
        return 0;
    };
    let component = |index: usize| -> u64 {
        captures
            .get(index)
            .map(|value| value.as_str().parse::<u64>().unwrap_or(u64::MAX))
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}

/// Duration is the only operative signal: anything up to a minute is a short.
pub fn is_short_form(record: &VideoDetailRecord) -> bool {
    parse_duration(&record.duration) <= SHORT_FORM_MAX_SECONDS
}

/// Renders durations as `H:MM:SS` or `M:SS` for short clips.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

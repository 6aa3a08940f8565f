//! Parsing and ordering of resolution labels such as "720p" or "1080p60"

use std::borrow::Cow;
use std::cmp::Ordering;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Labels hidden unless the user asks for higher resolutions
pub const HIGH_RESOLUTIONS: [&str; 2] = ["1440p", "2160p"];

/// Numeric value of a label
///
/// A trailing `0p<fps>` becomes `1`, so a high frame rate variant sits just above its
/// plain counterpart:
///
/// ```text
/// 360p    ->  360
/// 720p    ->  720
/// 720p60  ->  721
/// 1080p   ->  1080
/// 1080p60 ->  1081
/// ```
///
/// Everything except digits and dots is then dropped and the rest parsed as an `i32`.
pub fn resolution_value(label: &str) -> Option<i32> {
    let replaced = regex!(r"0p\d+$").replace(label, "1");
    let digits: String = replaced
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<i32>().ok()
}

/// Compare two labels by their numeric value
///
/// When either label cannot be parsed the first one is reported as greater: there is
/// no way to tell whether the two are different.
pub fn compare_resolutions(a: &str, b: &str) -> Ordering {
    match (resolution_value(a), resolution_value(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Greater,
    }
}

/// Drop the frame rate from a label: "1080p60" -> "1080p"
pub fn strip_refresh_rate(label: &str) -> Cow<'_, str> {
    regex!(r"p\d+$").replace(label, "p")
}

/// Whether the label, ignoring its frame rate, is one of `high_resolutions`
pub fn is_high_resolution(label: &str, high_resolutions: &[&str]) -> bool {
    let stripped = strip_refresh_rate(label);
    high_resolutions.iter().any(|r| *r == stripped)
}

/// Total order over labels used when sorting stream lists
///
/// Unparsable labels rank above every parsable one and tie with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionKey {
    Parsed(i32),
    Unparsable,
}

pub fn resolution_sort_key(label: &str) -> ResolutionKey {
    resolution_value(label).map_or(ResolutionKey::Unparsable, ResolutionKey::Parsed)
}

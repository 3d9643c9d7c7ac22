//! Literal phrases the watchers look for, and text-matching helpers.
//!
//! Matching is strictly literal: the watchdog has no understanding of the page
//! beyond these strings. If the host UI rewords its banners, the watchers
//! degrade to no-ops.

/// Phrases marking the tool-call-ceiling banner. Any element whose subtree
/// text contains one of these anchors the resume-link search.
pub const RESUME_LIMIT_PHRASES: [&str; 2] = [
    "stop the agent after 25 tool calls",
    "Note: we default stop",
];

/// Exact trimmed text of the resume link inside the ceiling banner.
pub const RESUME_LINK_TEXT: &str = "resume the conversation";

/// Prefix of the connection-failure banner text.
pub const CONNECTION_FAILURE_PREFIX: &str = "Connection failed";

/// Normalized text of the explicit retry button.
pub const TRY_AGAIN_TEXT: &str = "try again";

/// Normalized text of the single-button failure presentation.
pub const RESUME_BUTTON_TEXT: &str = "resume";

/// Trim plus whitespace-collapse plus lowercase.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `haystack`, normalized, equals or contains `needle` (which must
/// already be lowercase).
pub fn matches_normalized(haystack: &str, needle: &str) -> bool {
    let norm = normalize(haystack);
    norm == needle || norm.contains(needle)
}

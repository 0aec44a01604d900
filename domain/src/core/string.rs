//! String utilities for the domain layer.

/// Shorten text to at most `max_chars` characters for log lines.
///
/// Counts characters rather than bytes so CJK question text keeps a
/// readable length. Appends `...` only when something was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

//! Answer-to-option reconciliation.
//!
//! Providers are told to answer with option *content* ("北京"), while
//! downstream consumers expect the canonical `"<letter>. <content>"` form
//! ("A. 北京"). [`match_option`] restores that form when it can and returns
//! the answer untouched when it cannot. This is a heuristic: containment
//! matching takes the first option in listed order, so a short answer that
//! appears in several options resolves to the earliest one.

use super::parsing::MULTI_ANSWER_SEPARATOR;
use regex::Regex;
use std::sync::LazyLock;

static CANONICAL_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][.、]\s").expect("valid regex"));

static OPTION_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])[.、．\s]+(.+)$").expect("valid regex"));

static LETTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)([A-Z])[.、．]").expect("valid regex"));

static SPACED_LETTER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\s+\S").expect("valid regex"));

/// One structured option parsed from the raw options text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub letter: char,
    pub content: String,
    /// Canonical `"<letter>. <content>"` form
    pub full: String,
}

/// How an answer was reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Answer was already `"<letter>. ..."`
    AlreadyCanonical,
    Exact,
    Containment,
    /// Answer equals an unstructured option token (e.g. `对` / `错`)
    RawToken,
    /// Each `###` part was matched separately
    MultiPart,
    Unmatched,
}

/// Result of [`match_option_detailed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMatch {
    pub answer: String,
    pub kind: MatchKind,
}

/// Restore the canonical option form for an answer.
///
/// # Examples
///
/// ```
/// use qbank_domain::answer::matching::match_option;
///
/// assert_eq!(match_option("北京", "A. 北京 B. 上海"), "A. 北京");
/// assert_eq!(match_option("A. 北京", "A. 北京 B. 上海"), "A. 北京");
/// assert_eq!(match_option("对", "对 错"), "对");
/// ```
pub fn match_option(answer: &str, options: &str) -> String {
    match_option_detailed(answer, options).answer
}

/// Like [`match_option`], but also reports which pass matched.
pub fn match_option_detailed(answer: &str, options: &str) -> OptionMatch {
    if answer.contains(MULTI_ANSWER_SEPARATOR) {
        let parts: Vec<String> = answer
            .split(MULTI_ANSWER_SEPARATOR)
            .map(|part| match_single(part.trim(), options).answer)
            .collect();
        return OptionMatch {
            answer: parts.join(MULTI_ANSWER_SEPARATOR),
            kind: MatchKind::MultiPart,
        };
    }
    match_single(answer, options)
}

fn match_single(answer: &str, options: &str) -> OptionMatch {
    let unchanged = |kind| OptionMatch {
        answer: answer.to_string(),
        kind,
    };

    if CANONICAL_ANSWER.is_match(answer) {
        return unchanged(MatchKind::AlreadyCanonical);
    }

    let needle = answer.trim();
    if needle.is_empty() {
        return unchanged(MatchKind::Unmatched);
    }

    let entries = parse_options(options);

    if let Some(entry) = entries.iter().find(|e| e.content == needle) {
        return OptionMatch {
            answer: entry.full.clone(),
            kind: MatchKind::Exact,
        };
    }

    if let Some(entry) = entries
        .iter()
        .find(|e| e.content.contains(needle) || needle.contains(e.content.as_str()))
    {
        return OptionMatch {
            answer: entry.full.clone(),
            kind: MatchKind::Containment,
        };
    }

    if options.split_whitespace().any(|token| token == needle) {
        return unchanged(MatchKind::RawToken);
    }

    unchanged(MatchKind::Unmatched)
}

/// Parse raw options text into structured entries.
///
/// Lines are split at letter markers (`A.`, `B、`, ...) taken in alphabetical
/// sequence, so `"A. 北京 B. 上海"` yields two entries while a period inside
/// content such as `"A. U.S. capital"` does not start a new one. Lines
/// without markers fall back to whitespace tokens.
pub fn parse_options(options: &str) -> Vec<OptionEntry> {
    options
        .lines()
        .flat_map(segment_line)
        .filter_map(|segment| parse_entry(&segment))
        .collect()
}

fn segment_line(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let mut starts = Vec::new();
    let mut expected: Option<u8> = None;
    for caps in LETTER_MARKER.captures_iter(line) {
        let Some(letter) = caps.get(1) else { continue };
        let byte = letter.as_str().as_bytes()[0];
        if expected.is_none_or(|next| next == byte) {
            starts.push(letter.start());
            expected = Some(byte + 1);
        }
    }

    if !starts.is_empty() {
        let mut bounds = starts.clone();
        bounds.push(line.len());
        return bounds
            .windows(2)
            .map(|w| line[w[0]..w[1]].trim().to_string())
            .collect();
    }

    if SPACED_LETTER_LINE.is_match(line) {
        return vec![line.to_string()];
    }

    line.split_whitespace().map(str::to_string).collect()
}

fn parse_entry(segment: &str) -> Option<OptionEntry> {
    let caps = OPTION_ENTRY.captures(segment)?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    let content = caps.get(2)?.as_str().trim().to_string();
    if content.is_empty() {
        return None;
    }
    Some(OptionEntry {
        letter,
        full: format!("{}. {}", letter, content),
        content,
    })
}

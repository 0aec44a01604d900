//! Provider reply parsing.
//!
//! Providers are asked for a `{"answer": "..."}` envelope but routinely
//! return something close to it: unquoted keys, single quotes, trailing
//! prose, or a bare sentence. These functions recover the answer text
//! without ever failing. Pure domain logic, no I/O.
//!
//! # Strategies (first match wins)
//!
//! | Strategy | Handles |
//! |----------|---------|
//! | [`ParseStrategy::FieldPattern`] | `"answer": "..."` anywhere in the text |
//! | [`ParseStrategy::RepairedJson`] | `{answer:'...'}`, trailing commas, `anwser` typo |
//! | [`ParseStrategy::LeadingPhrase`] | `Answer is: ...`, `答案是：...` |

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Separator used between multiple answers (multiple choice, several blanks).
pub const MULTI_ANSWER_SEPARATOR: &str = "###";

/// `"answer": "<json string body>"`, escapes included
static ANSWER_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"answer"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex")
});

static UNQUOTED_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)").expect("valid regex")
});

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static LEADING_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?:the\s+)?(?:final\s+|correct\s+)?(?:answer|result|正确答案|答案|结果|回答|답안|정답)(?:\s*(?:is\b|是|为|:|：|=))+\s*(.+)$",
    )
    .expect("valid regex")
});

/// Which strategy produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    FieldPattern,
    RepairedJson,
    LeadingPhrase,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::FieldPattern => "field_pattern",
            ParseStrategy::RepairedJson => "repaired_json",
            ParseStrategy::LeadingPhrase => "leading_phrase",
        }
    }
}

/// Answer text recovered from a provider reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnswer {
    pub answer: String,
    pub strategy: ParseStrategy,
}

/// Parse a provider reply, returning the answer text if one can be found.
///
/// # Examples
///
/// ```
/// use qbank_domain::answer::parsing::parse_answer;
///
/// assert_eq!(parse_answer(r#"{"answer": "北京"}"#).as_deref(), Some("北京"));
/// assert_eq!(parse_answer(r#"{answer:"北京"}"#).as_deref(), Some("北京"));
/// assert_eq!(parse_answer("답안是：北京").as_deref(), Some("北京"));
/// assert_eq!(parse_answer("no json here"), None);
/// ```
pub fn parse_answer(raw: &str) -> Option<String> {
    parse_answer_detailed(raw).map(|parsed| parsed.answer)
}

/// Like [`parse_answer`], but also reports which strategy matched.
pub fn parse_answer_detailed(raw: &str) -> Option<ParsedAnswer> {
    if raw.trim().is_empty() {
        return None;
    }

    if let Some(answer) = extract_answer_field(raw) {
        return Some(ParsedAnswer {
            answer,
            strategy: ParseStrategy::FieldPattern,
        });
    }

    if let Some(answer) = extract_from_json_span(raw) {
        return Some(ParsedAnswer {
            answer,
            strategy: ParseStrategy::RepairedJson,
        });
    }

    strip_leading_phrase(raw).map(|answer| ParsedAnswer {
        answer,
        strategy: ParseStrategy::LeadingPhrase,
    })
}

fn extract_answer_field(raw: &str) -> Option<String> {
    let body = ANSWER_FIELD.captures(raw)?.get(1)?.as_str();
    let decoded = decode_json_string(body).unwrap_or_else(|| body.to_string());
    let answer = decoded.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Decode the body of a JSON string literal (`\uXXXX`, `\"`, `\n`, ...).
fn decode_json_string(body: &str) -> Option<String> {
    serde_json::from_str::<String>(&format!("\"{}\"", body)).ok()
}

fn extract_from_json_span(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let span = &raw[start..=end];

    let parsed = serde_json::from_str::<Value>(span)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&repair_json(span)).ok())?;

    let object = parsed.as_object()?;
    object
        .iter()
        .find(|(key, _)| {
            key.eq_ignore_ascii_case("answer") || key.eq_ignore_ascii_case("anwser")
        })
        .and_then(|(_, value)| value_to_answer(value))
}

/// Best-effort repair of near-JSON produced by language models.
fn repair_json(span: &str) -> String {
    let repaired = span.replace('\'', "\"");
    let repaired = UNQUOTED_KEY.replace_all(&repaired, r#"$1"$2"$3"#);
    let repaired = TRAILING_COMMA.replace_all(&repaired, "$1");
    WHITESPACE_RUN
        .replace_all(&repaired, " ")
        .trim()
        .to_string()
}

fn value_to_answer(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(MULTI_ANSWER_SEPARATOR),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

fn strip_leading_phrase(raw: &str) -> Option<String> {
    LEADING_PHRASE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Field pattern ====================

    #[test]
    fn test_well_formed_json() {
        let parsed = parse_answer_detailed(r#"{"answer": "北京"}"#).unwrap();
        assert_eq!(parsed.answer, "北京");
        assert_eq!(parsed.strategy, ParseStrategy::FieldPattern);
    }

    #[test]
    fn test_field_pattern_inside_prose() {
        let reply = "Sure! Here you go:\n```json\n{\"Answer\" : \"上海\"}\n```\nHope it helps.";
        assert_eq!(parse_answer(reply).as_deref(), Some("上海"));
    }

    #[test]
    fn test_unicode_escapes_decoded() {
        let parsed = parse_answer_detailed(r#"{"answer": "\u5317\u4eac"}"#).unwrap();
        assert_eq!(parsed.answer, "北京");
        assert_eq!(parsed.strategy, ParseStrategy::FieldPattern);
    }

    #[test]
    fn test_escaped_quotes_kept_whole() {
        assert_eq!(
            parse_answer(r#"{"answer": "He said \"yes\""}"#).as_deref(),
            Some(r#"He said "yes""#)
        );
    }

    #[test]
    fn test_escaped_separator_answer() {
        assert_eq!(
            parse_answer(r#"{"answer": "A. \u82f9\u679c###C. \u9999\u8549"}"#).as_deref(),
            Some("A. 苹果###C. 香蕉")
        );
    }

    #[test]
    fn test_invalid_escape_falls_back_to_raw() {
        assert_eq!(
            parse_answer(r#"{"answer": "C:\path"}"#).as_deref(),
            Some(r"C:\path")
        );
    }

    // ==================== Repaired JSON ====================

    #[test]
    fn test_unquoted_key() {
        let parsed = parse_answer_detailed(r#"{answer:"北京"}"#).unwrap();
        assert_eq!(parsed.answer, "北京");
        assert_eq!(parsed.strategy, ParseStrategy::RepairedJson);
    }

    #[test]
    fn test_single_quotes_and_trailing_comma() {
        assert_eq!(
            parse_answer("{'answer': '对',}").as_deref(),
            Some("对")
        );
    }

    #[test]
    fn test_misspelled_key() {
        assert_eq!(
            parse_answer(r#"{"anwser": "有穷性"}"#).as_deref(),
            Some("有穷性")
        );
    }

    #[test]
    fn test_array_answer_joined() {
        assert_eq!(
            parse_answer(r#"{"answer": ["有穷性", "确定性"]}"#).as_deref(),
            Some("有穷性###确定性")
        );
    }

    #[test]
    fn test_numeric_answer() {
        assert_eq!(parse_answer(r#"{answer: 42}"#).as_deref(), Some("42"));
    }

    #[test]
    fn test_json_without_answer_key() {
        assert_eq!(parse_answer(r#"{"result": "北京"}"#), None);
    }

    // ==================== Leading phrase ====================

    #[test]
    fn test_prefixed_natural_language() {
        let parsed = parse_answer_detailed("답안是：北京").unwrap();
        assert_eq!(parsed.answer, "北京");
        assert_eq!(parsed.strategy, ParseStrategy::LeadingPhrase);
    }

    #[test]
    fn test_english_prefixes() {
        assert_eq!(parse_answer("The answer is: Paris").as_deref(), Some("Paris"));
        assert_eq!(parse_answer("result: 42 ").as_deref(), Some("42"));
        assert_eq!(parse_answer("答案是：上海").as_deref(), Some("上海"));
    }

    // ==================== Nothing extractable ====================

    #[test]
    fn test_no_json_here() {
        assert_eq!(parse_answer("no json here"), None);
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("  \n "), None);
        assert_eq!(parse_answer(r#"{"answer": ""}"#), None);
    }

    #[test]
    fn test_broken_braces_never_panic() {
        assert_eq!(parse_answer("}{"), None);
        assert_eq!(parse_answer("{answer: "), None);
    }

    #[test]
    fn test_repair_json() {
        assert_eq!(
            repair_json("{ answer :\n 'x' ,\n other: 1, }"),
            r#"{ "answer" : "x" , "other": 1}"#
        );
    }
}

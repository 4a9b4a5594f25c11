//! Response splitting and structured-payload extraction.
//!
//! The model is instructed to answer with a narrative section, the
//! [`JSON_SEPARATOR`](crate::prompt::JSON_SEPARATOR) literal, then a JSON
//! array. Real responses deviate from that contract often enough that
//! everything here degrades instead of failing: the splitter always yields a
//! summary and a JSON candidate, and the extractor signals `Absent` rather
//! than erroring when no payload can be recovered.

use crate::metrics::KeywordMetric;
use crate::prompt::{INSIGHTS_HEADING, JSON_SEPARATOR};
use serde_json::Value;

/// Summary substituted when the model produced no usable narrative.
pub const FALLBACK_SUMMARY: &str = "Analysis loaded. See details below.";

/// A response text split into its narrative and payload candidates.
#[derive(Debug, Clone)]
pub struct SplitResponse {
    pub summary: String,
    pub json_candidate: String,
}

/// Outcome of payload extraction. `Absent` is an expected branch, not a
/// failure: the model may have answered in prose only.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(Vec<KeywordMetric>),
    Absent,
}

/// Split raw response text on the first separator occurrence.
///
/// Without a separator the whole text becomes the JSON candidate and the
/// summary falls back to [`FALLBACK_SUMMARY`], so the caller can still try
/// to dig a payload out of a non-compliant response.
pub fn split_response(text: &str) -> SplitResponse {
    match text.split_once(JSON_SEPARATOR) {
        Some((narrative, payload)) => SplitResponse {
            summary: strip_heading(narrative).trim().to_string(),
            json_candidate: payload.to_string(),
        },
        None => SplitResponse {
            summary: FALLBACK_SUMMARY.to_string(),
            json_candidate: text.to_string(),
        },
    }
}

/// Recover the metrics array from a JSON candidate string.
///
/// Strategies, first success wins: a ```json fenced block, then the
/// substring from the first `[` to the last `]`. A strategy whose matched
/// substring is not valid JSON fails whole; there is no field-level repair.
pub fn extract_metrics(text: &str) -> Extraction {
    let value = match locate_json(text) {
        Some(value) => value,
        None => return Extraction::Absent,
    };

    match value {
        Value::Array(_) => match serde_json::from_value::<Vec<KeywordMetric>>(value) {
            Ok(metrics) => Extraction::Found(metrics),
            Err(_) => Extraction::Absent,
        },
        _ => Extraction::Absent,
    }
}

fn locate_json(text: &str) -> Option<Value> {
    if let Some(block) = fenced_json_block(text) {
        if let Ok(value) = serde_json::from_str(block) {
            return Some(value);
        }
    }

    // Outermost bracket pair. When the text holds several arrays this slice
    // spans them all and the parse fails; downstream already assumes that
    // exact behavior, so no bracket balancing here.
    let first = text.find('[')?;
    let last = text.rfind(']')?;
    if last <= first {
        return None;
    }
    serde_json::from_str(&text[first..=last]).ok()
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let start = text.find("```json")?;
    let rest = &text[start + "```json".len()..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Remove the first occurrence of the narrative heading, any case.
fn strip_heading(text: &str) -> String {
    let haystack = text.to_ascii_lowercase();
    let needle = INSIGHTS_HEADING.to_ascii_lowercase();
    match haystack.find(&needle) {
        Some(idx) => {
            let mut out = String::with_capacity(text.len() - needle.len());
            out.push_str(&text[..idx]);
            out.push_str(&text[idx + needle.len()..]);
            out
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRIC_JSON: &str = r#"[{"keyword": "espresso", "searchVolume": "1k", "competition": "Low"}]"#;

    #[test]
    fn splits_on_separator_and_strips_heading() {
        let text = format!(
            "## Market Insights\nStrong opportunity overall.\n{}\n[]",
            JSON_SEPARATOR
        );
        let parts = split_response(&text);
        assert_eq!(parts.summary, "Strong opportunity overall.");
        assert_eq!(parts.json_candidate.trim(), "[]");
    }

    #[test]
    fn heading_strip_is_case_insensitive() {
        let text = format!("## MARKET INSIGHTS\nGood niche.\n{}\n[]", JSON_SEPARATOR);
        let parts = split_response(&text);
        assert_eq!(parts.summary, "Good niche.");
    }

    #[test]
    fn missing_separator_routes_everything_to_json_candidate() {
        let text = "Here are your results without any separator.";
        let parts = split_response(text);
        assert_eq!(parts.summary, FALLBACK_SUMMARY);
        assert_eq!(parts.json_candidate, text);
    }

    #[test]
    fn fenced_block_wins_over_surrounding_brackets() {
        let text = format!(
            "Some [bracketed] prose.\n```json\n{}\n```\nMore [noise] after.",
            METRIC_JSON
        );
        match extract_metrics(&text) {
            Extraction::Found(metrics) => {
                assert_eq!(metrics.len(), 1);
                assert_eq!(metrics[0].keyword, "espresso");
            }
            Extraction::Absent => panic!("expected fenced payload"),
        }
    }

    #[test]
    fn bare_array_is_found_without_fence() {
        let text = format!("Prose before {} prose after.", METRIC_JSON);
        match extract_metrics(&text) {
            Extraction::Found(metrics) => assert_eq!(metrics[0].search_volume, "1k"),
            Extraction::Absent => panic!("expected bare array"),
        }
    }

    #[test]
    fn malformed_fence_falls_through_to_bracket_strategy() {
        let text = format!("```json\nnot json at all\n```\n{}", METRIC_JSON);
        assert!(matches!(extract_metrics(&text), Extraction::Found(_)));
    }

    #[test]
    fn two_arrays_select_the_outermost_pair() {
        // The slice from the first '[' to the last ']' spans both arrays and
        // the unrelated text between them, so the parse fails.
        let text = r#"[{"keyword": "a"}] and separately [{"keyword": "b"}]"#;
        assert_eq!(extract_metrics(text), Extraction::Absent);
    }

    #[test]
    fn no_json_signals_absent() {
        assert_eq!(extract_metrics("nothing structured here"), Extraction::Absent);
        assert_eq!(extract_metrics(""), Extraction::Absent);
    }

    #[test]
    fn non_array_json_signals_absent() {
        assert_eq!(
            extract_metrics("```json\n{\"keyword\": \"a\"}\n```"),
            Extraction::Absent
        );
    }

    #[test]
    fn nested_arrays_inside_one_payload_still_parse() {
        let text = r#"[{"keyword": "a", "serpResults": [{"position": 1, "title": "t", "url": "u", "snippet": "s"}]}]"#;
        match extract_metrics(text) {
            Extraction::Found(metrics) => assert_eq!(metrics[0].serp_results.len(), 1),
            Extraction::Absent => panic!("nested arrays should parse"),
        }
    }
}

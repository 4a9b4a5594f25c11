//! Core data model for keyword analysis results.
//!
//! Field names follow the camelCase wire schema the model is instructed to
//! emit, so these types deserialize directly from the extracted payload.

use serde::{Deserialize, Serialize};

/// Competition level for a keyword.
///
/// The model is asked for `Low`/`Medium`/`High`, but real responses drift;
/// anything else is kept verbatim in `Other` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Competition {
    Low,
    Medium,
    High,
    Unknown,
    Other(String),
}

impl Default for Competition {
    fn default() -> Self {
        Competition::Unknown
    }
}

impl From<String> for Competition {
    fn from(raw: String) -> Self {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("low") => Competition::Low,
            s if s.eq_ignore_ascii_case("medium") => Competition::Medium,
            s if s.eq_ignore_ascii_case("high") => Competition::High,
            s if s.eq_ignore_ascii_case("unknown") || s.is_empty() => Competition::Unknown,
            _ => Competition::Other(raw),
        }
    }
}

impl From<Competition> for String {
    fn from(c: Competition) -> Self {
        match c {
            Competition::Low => "Low".to_string(),
            Competition::Medium => "Medium".to_string(),
            Competition::High => "High".to_string(),
            Competition::Unknown => "Unknown".to_string(),
            Competition::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Competition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Competition::Low => write!(f, "Low"),
            Competition::Medium => write!(f, "Medium"),
            Competition::High => write!(f, "High"),
            Competition::Unknown => write!(f, "Unknown"),
            Competition::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Broad (1-2 words) vs specific (3+ words) keyword classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeywordType {
    ShortTail,
    LongTail,
    Other(String),
}

impl Default for KeywordType {
    fn default() -> Self {
        KeywordType::Other(String::new())
    }
}

impl From<String> for KeywordType {
    fn from(raw: String) -> Self {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("short-tail") => KeywordType::ShortTail,
            s if s.eq_ignore_ascii_case("long-tail") => KeywordType::LongTail,
            _ => KeywordType::Other(raw),
        }
    }
}

impl From<KeywordType> for String {
    fn from(t: KeywordType) -> Self {
        match t {
            KeywordType::ShortTail => "Short-tail".to_string(),
            KeywordType::LongTail => "Long-tail".to_string(),
            KeywordType::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for KeywordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordType::ShortTail => write!(f, "Short-tail"),
            KeywordType::LongTail => write!(f, "Long-tail"),
            KeywordType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// A suggested alternative to an analyzed keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedKeyword {
    pub keyword: String,
    pub search_volume: String,
    pub competition: Competition,
    pub keyword_type: KeywordType,
    /// Why this alternative beats the parent keyword, when the model says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_better: Option<String>,
}

/// One organic search result from the SERP for a keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerpResult {
    /// 1-based rank on the results page.
    pub position: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Full analysis of one input keyword.
///
/// `search_volume` and `difficulty` stay free-form strings: the model may
/// answer with an exact count, a range, a qualitative band, or the
/// "Data Unavailable" sentinel. [`crate::volume::normalize_volume`] turns
/// the volume into a chartable magnitude when one is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordMetric {
    pub keyword: String,
    pub search_volume: String,
    pub competition: Competition,
    pub difficulty: String,
    pub keyword_type: KeywordType,
    pub is_quick_win: bool,
    /// Present only when the caller supplied a website to audit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_audit: Option<String>,
    pub recommendation: String,
    pub rationale: String,
    pub related_keywords: Vec<RelatedKeyword>,
    pub serp_results: Vec<SerpResult>,
}

/// A web citation the model asserts its answer was derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The terminal value returned to the caller of an analysis.
///
/// `metrics` is empty (never absent) on total extraction failure, and
/// `summary` always holds text, falling back to a placeholder when the model
/// produced no narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metrics: Vec<KeywordMetric>,
    pub summary: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

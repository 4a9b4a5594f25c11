//! Instruction rendering for the analysis request.
//!
//! The rendered prompt carries the exact two-part output contract the
//! response splitter and payload extractor rely on, so the separator and
//! heading literals live here and are shared with [`crate::extract`].

/// Separator the model must emit between narrative and JSON payload.
pub const JSON_SEPARATOR: &str = "---JSON_START---";

/// Heading the model must put above the narrative section.
pub const INSIGHTS_HEADING: &str = "## Market Insights";

/// A rendered analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    /// The full instruction text sent to the model.
    pub text: String,
    /// Whether the request asks for web-search grounding.
    pub web_search: bool,
    /// Whether site-audit instructions were included.
    pub site_audit: bool,
}

/// Split a raw keyword submission into the canonical ordered batch.
///
/// Commas and newlines both separate keywords and may be mixed freely;
/// empty tokens are dropped.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render the instruction payload for a keyword batch.
///
/// `keywords` must be non-empty; callers tokenize with [`split_keywords`]
/// and reject empty batches before getting here. A blank `website` counts
/// as absent.
pub fn build_prompt(keywords: &[String], location: &str, website: Option<&str>) -> AnalysisPrompt {
    let website = website.map(str::trim).filter(|w| !w.is_empty());
    let count = keywords.len();
    let keyword_list = keywords.join(", ");

    let website_context = match website {
        Some(site) => format!(
            "CONTEXT: The user owns the website \"{}\". You must check whether this site has content relevant to the keywords.\n",
            site
        ),
        None => String::new(),
    };

    let site_search_instruction = match website {
        Some(site) => format!(
            "5.  **Site Performance**: Search for \"site:{} {}\" to check indexing and ranking visibility.\n",
            site,
            keywords.first().map(String::as_str).unwrap_or_default()
        ),
        None => String::new(),
    };

    let site_audit_rule = if website.is_some() {
        "- **Site Audit**: Estimate the provided website's current performance for each keyword (e.g. \"Indexed\", \"Not found\", \"Low relevance content\").\n"
    } else {
        ""
    };

    let text = format!(
        r#"Role: Senior SEO Data Scientist.
Task: Conduct a deep-dive keyword analysis for the following {count} keywords: "{keyword_list}" in location: "{location}".
{website_context}
OBJECTIVE:
Provide ACCURATE, REAL-WORLD data using web search.

CRITICAL INSTRUCTION:
You have received exactly {count} keywords. You MUST return a JSON array containing exactly {count} objects. Do not combine them. Do not skip any.

SEARCH INSTRUCTIONS:
1.  **Volume & Stats**: Search for "[keyword] search volume range", "[keyword] monthly searches {location}".
2.  **Competition**: Search for "[keyword] keyword difficulty".
3.  **Alternatives**: Look for "better keywords for [keyword]" or "related long-tail keywords for [keyword]".
4.  **SERP Analysis**: Search for the exact keyword "[keyword]" to see the current top ranking pages.
{site_search_instruction}
DATA EXTRACTION RULES:
- **No Fabrication**: Never invent figures. If no data can be found, use the string "Data Unavailable".
- **Search Volume**: Priority: specific numbers (e.g. "12,500"). Fallback: ranges (e.g. "1k-10k") or qualitative bands (Low/Medium/High).
- **Tail Type**: Classify as 'Short-tail' (1-2 words, broad) or 'Long-tail' (3+ words, specific).
- **Quick Win**: Set 'isQuickWin' to true ONLY if volume is decent (e.g. >500) AND competition is Low or Medium.
- **Alternatives**: Provide exactly 5 BETTER alternative keywords. For EACH alternative, include its estimated volume, competition, and why it is better.
- **SERP Results**: List the top 10 organic search results found for the keyword. Include title, URL, and a brief snippet.
{site_audit_rule}
OUTPUT STRUCTURE:
1. First, provide a "{heading}" section. This must be plain text. Summarize the overall opportunity, competition levels, and top recommendations. Do NOT put JSON here.
2. Then, output this exact separator string on a new line: {separator}
3. Finally, output the strictly valid JSON array containing the data for ALL {count} keywords.

JSON SCHEMA (for the part after the separator):
[
  {{
    "keyword": "string (the input keyword)",
    "searchVolume": "string (e.g. '12,500', '1k-10k')",
    "competition": "string (Low, Medium, High)",
    "difficulty": "string (e.g. '45/100', 'Hard')",
    "keywordType": "string (Short-tail or Long-tail)",
    "isQuickWin": boolean,
    "siteAudit": "string (optional, only when a website was provided)",
    "recommendation": "string (actionable advice)",
    "rationale": "string (why this recommendation?)",
    "serpResults": [
      {{ "position": 1, "title": "string", "url": "string", "snippet": "string" }}
    ],
    "relatedKeywords": [
      {{
        "keyword": "string",
        "searchVolume": "string",
        "competition": "string",
        "keywordType": "string (Short-tail | Long-tail)",
        "whyBetter": "string (optional)"
      }}
    ]
  }}
]
"#,
        count = count,
        keyword_list = keyword_list,
        location = location,
        website_context = website_context,
        site_search_instruction = site_search_instruction,
        site_audit_rule = site_audit_rule,
        heading = INSIGHTS_HEADING,
        separator = JSON_SEPARATOR,
    );

    AnalysisPrompt {
        text,
        web_search: true,
        site_audit: website.is_some(),
    }
}

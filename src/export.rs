//! CSV export of a metrics table.

use crate::metrics::KeywordMetric;
use chrono::NaiveDate;

const HEADERS: [&str; 10] = [
    "Keyword",
    "Volume",
    "Competition",
    "Difficulty",
    "Type",
    "Quick Win",
    "Site Audit",
    "Recommendation",
    "Rationale",
    "Better Alternatives (Format: Keyword [Vol | Comp])",
];

/// Render a metrics table as CSV text.
///
/// Text fields are quoted with inner quotes doubled; the quick-win flag
/// renders as `Yes`/`No` and an absent site audit as `N/A`.
pub fn metrics_to_csv(metrics: &[KeywordMetric]) -> String {
    let mut lines = Vec::with_capacity(metrics.len() + 1);
    lines.push(HEADERS.join(","));

    for metric in metrics {
        let alternatives = metric
            .related_keywords
            .iter()
            .map(|alt| {
                format!(
                    "{} [{} | {}]",
                    alt.keyword, alt.search_volume, alt.competition
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let row = [
            quote(&metric.keyword),
            quote(&metric.search_volume),
            quote(&metric.competition.to_string()),
            quote(&metric.difficulty),
            quote(&metric.keyword_type.to_string()),
            if metric.is_quick_win { "Yes" } else { "No" }.to_string(),
            quote(metric.site_audit.as_deref().unwrap_or("N/A")),
            quote(&metric.recommendation),
            quote(&metric.rationale),
            quote(&alternatives),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Dated default filename for a CSV download
pub fn default_csv_filename(date: NaiveDate) -> String {
    format!("seo_analysis_{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

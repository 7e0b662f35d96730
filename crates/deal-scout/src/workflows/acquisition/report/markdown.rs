use super::super::domain::{format_dollars, format_percent};
use super::super::repository::CandidateRecord;
use super::summary::{DailyReport, REJECTED_LIMIT, REVIEW_LIMIT, SHORTLIST_LIMIT};

const NOT_AVAILABLE: &str = "N/A";

/// Render the daily report as Markdown.
pub fn render_markdown(report: &DailyReport) -> String {
    let counts = &report.counts;
    let mut lines = vec![
        format!("# Deal Scout: {}", report.date.format("%Y-%m-%d")),
        String::new(),
        format!("New listings processed: **{}**", report.processed()),
        format!(
            "Shortlisted: **{}** | Review: **{}** | Auto-Rejected: **{}**",
            counts.shortlist, counts.review, counts.auto_reject
        ),
        String::new(),
    ];

    lines.push("## SHORTLIST".to_string());
    if report.shortlist.is_empty() {
        lines.push("_None today._".to_string());
    }
    for record in report.shortlist.iter().take(SHORTLIST_LIMIT) {
        lines.extend(shortlist_entry(record));
    }

    lines.push("## REVIEW".to_string());
    if report.review.is_empty() {
        lines.push("_None today._".to_string());
    }
    for record in report.review.iter().take(REVIEW_LIMIT) {
        lines.push(format!(
            "- **{}** (score {}) {}",
            record.title_or_untitled(),
            record.score,
            record.asking_price_text
        ));
        lines.push(format!("  {}", record.url));
        lines.push(format!("  _Why_: {}", record.reasons.join(", ")));
        lines.push(String::new());
    }

    lines.push(format!("## AUTO-REJECTED ({})", report.rejected.len()));
    for record in report.rejected.iter().take(REJECTED_LIMIT) {
        lines.push(format!(
            "- {}: {}",
            record.title_or_untitled(),
            record.reasons.join(", ")
        ));
    }

    lines.join("\n")
}

fn shortlist_entry(record: &CandidateRecord) -> Vec<String> {
    let price = if record.asking_price_text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        record.asking_price_text.clone()
    };
    let dollars = |value: Option<f64>| value.map_or_else(|| NOT_AVAILABLE.to_string(), format_dollars);
    let coc = record
        .coc_return_20pct
        .map_or_else(|| NOT_AVAILABLE.to_string(), format_percent);
    let dscr = record
        .dscr_20pct
        .map_or_else(|| NOT_AVAILABLE.to_string(), |dscr| format!("{dscr:.2}x"));

    vec![
        format!(
            "- **{}** (score {})",
            record.title_or_untitled(),
            record.score
        ),
        format!(
            "  Price: {price} | CF: {} | CF After Debt: {}",
            dollars(record.annual_cash_flow),
            dollars(record.cf_after_debt_20pct)
        ),
        format!(
            "  CoC: {coc} | DSCR: {dscr} | Absentee: {}",
            record.absentee
        ),
        format!("  {}", record.url),
        format!("  _Why_: {}", record.reasons.join(", ")),
        String::new(),
    ]
}

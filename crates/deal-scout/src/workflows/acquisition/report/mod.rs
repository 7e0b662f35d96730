mod markdown;
mod summary;
pub mod views;

pub use markdown::render_markdown;
pub use summary::{summary_line, DailyReport, REJECTED_LIMIT, REVIEW_LIMIT, SHORTLIST_LIMIT};
pub use views::{
    BucketCounts, CandidateListing, CandidateTotals, CandidateView, FinancingComparisonRow,
    ScenarioView,
};

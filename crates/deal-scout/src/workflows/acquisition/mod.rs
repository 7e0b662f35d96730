//! Acquisition pipeline: normalize scraped listings, model SBA financing, score against
//! the investment criteria, and keep the ranked candidates.

pub mod dashboard;
pub mod domain;
pub mod evaluation;
pub mod financials;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;

pub use dashboard::{CandidateFilter, FilterError};
pub use domain::{
    AbsenteeLikelihood, Bucket, Financing, ListingId, NormalizedListing, RawListing, Scenario,
    ScenarioMetrics, ScoreCategory, ScoreComponent, ScoredListing,
};
pub use evaluation::{CriteriaConfig, RejectionReason, ScoringEngine};
pub use financials::{normalize, normalize_batch};
pub use report::{render_markdown, summary_line, DailyReport};
pub use repository::{CandidateRecord, CandidateRepository, CsvCandidateStore, RepositoryError};
pub use router::candidate_router;
pub use service::{RunOptions, RunOutcome, ScoutService, ScoutServiceError};
pub use state::{RunState, StateError, MAX_SEEN_IDS};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::dashboard::{self, CandidateFilter, FilterError};
use super::domain::{ListingId, RawListing, ScoredListing};
use super::evaluation::{CriteriaConfig, ScoringEngine};
use super::financials::normalize_batch;
use super::report::{BucketCounts, CandidateListing, FinancingComparisonRow};
use super::repository::{CandidateRecord, CandidateRepository, RepositoryError};
use super::state::RunState;

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Score every listing, including ids already recorded in the run state.
    pub rescore: bool,
}

/// What one run did.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub fetched: usize,
    pub new: usize,
    pub scored: Vec<ScoredListing>,
    pub records: Vec<CandidateRecord>,
    pub counts: BucketCounts,
}

/// Service composing normalization, the scoring engine, and candidate storage.
pub struct ScoutService<R> {
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
}

impl<R> ScoutService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>, criteria: CriteriaConfig) -> Self {
        Self {
            engine: Arc::new(ScoringEngine::new(criteria)),
            repository,
        }
    }

    pub fn criteria(&self) -> &CriteriaConfig {
        self.engine.criteria()
    }

    /// Normalize and score a batch without touching storage.
    pub fn score_batch(&self, raw_listings: Vec<RawListing>) -> Vec<ScoredListing> {
        normalize_batch(raw_listings)
            .into_iter()
            .map(|listing| self.engine.score(listing))
            .collect()
    }

    /// Score the listings not yet seen, persist them, and mark them seen.
    pub fn process(
        &self,
        raw_listings: Vec<RawListing>,
        state: &mut RunState,
        options: RunOptions,
        seen_at: DateTime<Utc>,
    ) -> Result<RunOutcome, ScoutServiceError> {
        let fetched = raw_listings.len();
        let fresh: Vec<_> = normalize_batch(raw_listings)
            .into_iter()
            .filter(|listing| options.rescore || !state.has_seen(&listing.id()))
            .collect();

        let scored: Vec<ScoredListing> = fresh
            .into_iter()
            .map(|listing| {
                let scored = self.engine.score(listing);
                debug!(
                    id = %scored.id(),
                    score = scored.score,
                    bucket = %scored.bucket,
                    "listing scored"
                );
                scored
            })
            .collect();

        let records: Vec<CandidateRecord> =
            scored.iter().map(CandidateRecord::from_scored).collect();
        if !records.is_empty() {
            self.repository.upsert(records.clone(), seen_at)?;
        }
        state.record(scored.iter().map(ScoredListing::id));

        let counts = BucketCounts::tally(scored.iter().map(|listing| listing.bucket));
        info!(
            fetched,
            new = scored.len(),
            shortlist = counts.shortlist,
            review = counts.review,
            auto_reject = counts.auto_reject,
            rescore = options.rescore,
            "scout run complete"
        );

        Ok(RunOutcome {
            fetched,
            new: scored.len(),
            scored,
            records,
            counts,
        })
    }

    pub fn candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<CandidateListing, ScoutServiceError> {
        let records = self.repository.all()?;
        Ok(dashboard::list_candidates(
            &records,
            filter,
            &self.criteria().geography,
        )?)
    }

    pub fn candidate(&self, id: &ListingId) -> Result<CandidateRecord, ScoutServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ScoutServiceError::NotFound(id.clone()))
    }

    pub fn financing(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<FinancingComparisonRow>, ScoutServiceError> {
        let records = self.repository.all()?;
        Ok(dashboard::financing_comparison(
            &records,
            filter,
            &self.criteria().geography,
        )?)
    }
}

/// Error raised by the scout service.
#[derive(Debug, thiserror::Error)]
pub enum ScoutServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("candidate {0} not found")]
    NotFound(ListingId),
}

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::acquisition::domain::{ListingId, RawListing, ScoredListing};
use crate::workflows::acquisition::evaluation::{score, CriteriaConfig};
use crate::workflows::acquisition::financials::normalize;
use crate::workflows::acquisition::repository::{
    merge_records, CandidateRecord, CandidateRepository, RepositoryError,
};
use crate::workflows::acquisition::service::ScoutService;

pub(crate) fn criteria() -> CriteriaConfig {
    CriteriaConfig::standard()
}

/// Twin Cities HVAC shop at $500,000 asking with $150,000 cash flow.
pub(crate) fn minneapolis_listing(id: &str) -> RawListing {
    RawListing {
        id: id.to_string(),
        title: Some("HVAC Service Company".to_string()),
        url: Some(format!("https://listings.test/business/{id}")),
        industry: Some("Service".to_string()),
        location: Some("Minneapolis, Minnesota".to_string()),
        asking_price_text: Some("$500,000".to_string()),
        cash_flow_text: Some("$150,000".to_string()),
        revenue_text: Some("$900,000".to_string()),
        employees_full_time: Some("6".to_string()),
        employees_part_time: Some("2".to_string()),
        description: Some(
            "Turnkey HVAC business with recurring maintenance agreement customers. \
             No website; all word of mouth referrals."
                .to_string(),
        ),
        years_in_business: Some("22".to_string()),
        is_franchise: Some("No".to_string()),
        reason_for_selling: Some("Retirement".to_string()),
        sba_available: Some("Yes".to_string()),
        listing_agent: Some("Pat Broker".to_string()),
        ..RawListing::default()
    }
}

/// Minnesota listing that clears every rejection rule but earns few points.
pub(crate) fn plain_listing(id: &str) -> RawListing {
    RawListing {
        id: id.to_string(),
        title: Some("Regional Gift Shop".to_string()),
        industry: Some("Retail".to_string()),
        location: Some("Duluth, Minnesota".to_string()),
        asking_price_text: Some("$900,000".to_string()),
        cash_flow_text: Some("$200,000".to_string()),
        employees_full_time: Some("60".to_string()),
        description: Some("Large inventory of seasonal goods.".to_string()),
        ..RawListing::default()
    }
}

pub(crate) fn out_of_state_listing(id: &str) -> RawListing {
    RawListing {
        location: Some("Fargo, North Dakota".to_string()),
        ..minneapolis_listing(id)
    }
}

pub(crate) fn scored(id: &str) -> ScoredListing {
    score(normalize(minneapolis_listing(id)), &criteria())
}

pub(crate) fn scored_raw(raw: RawListing) -> ScoredListing {
    score(normalize(raw), &criteria())
}

/// Unique scratch path under the system temp directory.
pub(crate) fn temp_path(stem: &str, extension: &str) -> PathBuf {
    static SEQUENCE: AtomicUsize = AtomicUsize::new(0);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!(
        "deal-scout-{stem}-{}-{nanos}-{sequence}.{extension}",
        std::process::id()
    ))
}

pub(crate) fn build_service() -> (ScoutService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScoutService::new(repository.clone(), criteria());
    (service, repository)
}

pub(crate) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

#[derive(Default, Clone)]
pub(crate) struct MemoryRepository {
    pub(crate) records: Arc<Mutex<Vec<CandidateRecord>>>,
}

impl MemoryRepository {
    pub(crate) fn seeded(records: Vec<CandidateRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<CandidateRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl CandidateRepository for MemoryRepository {
    fn upsert(
        &self,
        records: Vec<CandidateRecord>,
        seen_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(merge_records(&mut guard, records, seen_at))
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(self.snapshot())
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Ok(self.snapshot().into_iter().find(|record| &record.id == id))
    }
}

pub(crate) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn upsert(
        &self,
        _records: Vec<CandidateRecord>,
        _seen_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use deal_scout::workflows::acquisition::repository::merge_records;
use deal_scout::workflows::acquisition::{
    CandidateRecord, CandidateRepository, ListingId, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Candidate storage that lives only as long as the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    records: Arc<Mutex<Vec<CandidateRecord>>>,
}

impl InMemoryCandidateRepository {
    fn poisoned() -> RepositoryError {
        RepositoryError::Unavailable("candidate mutex poisoned".to_string())
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn upsert(
        &self,
        records: Vec<CandidateRecord>,
        seen_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(merge_records(&mut guard, records, seen_at))
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.clone())
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

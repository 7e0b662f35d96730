use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::{
    format_dollars, AbsenteeLikelihood, Bucket, ListingId, Scenario, ScenarioMetrics,
    ScoredListing,
};

/// One stored candidate: the flattened listing, both financing scenarios, and the score.
///
/// Field order is the column order of `candidates.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: ListingId,
    pub title: String,
    pub url: String,
    pub industry: String,
    pub location: String,
    pub asking_price: Option<f64>,
    pub asking_price_text: String,
    pub annual_cash_flow: Option<f64>,
    pub annual_revenue: Option<f64>,
    pub employees: Option<u32>,
    pub down_10: Option<f64>,
    pub sba_monthly_10pct: Option<f64>,
    pub annual_debt_service_10pct: Option<f64>,
    pub cf_after_debt_10pct: Option<f64>,
    pub coc_return_10pct: Option<f64>,
    pub dscr_10pct: Option<f64>,
    pub payoff_years_10pct: Option<f64>,
    pub down_20: Option<f64>,
    pub sba_monthly_20pct: Option<f64>,
    pub annual_debt_service_20pct: Option<f64>,
    pub cf_after_debt_20pct: Option<f64>,
    pub coc_return_20pct: Option<f64>,
    pub dscr_20pct: Option<f64>,
    pub payoff_years_20pct: Option<f64>,
    pub score: u8,
    pub bucket: Bucket,
    pub absentee: AbsenteeLikelihood,
    #[serde(
        serialize_with = "serialize_reasons",
        deserialize_with = "deserialize_reasons"
    )]
    pub reasons: Vec<String>,
    pub years_in_business: String,
    pub is_franchise: String,
    pub reason_for_selling: String,
    pub sba_available: String,
    pub listing_agent: String,
    #[serde(
        default,
        serialize_with = "serialize_last_seen",
        deserialize_with = "deserialize_last_seen"
    )]
    pub last_seen: Option<DateTime<Utc>>,
}

/// Separator used for the reasons column. A `;` or `\` inside a reason is escaped
/// with a backslash so each reason reads back intact.
pub const REASON_SEPARATOR: &str = "; ";

impl CandidateRecord {
    pub fn from_scored(scored: &ScoredListing) -> Self {
        let listing = &scored.listing;
        let raw = &listing.raw;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let ten = ScenarioColumns::from(listing.scenario(Scenario::TenPercentDown));
        let twenty = ScenarioColumns::from(listing.scenario(Scenario::TwentyPercentDown));

        Self {
            id: listing.id(),
            title: text(&raw.title),
            url: text(&raw.url),
            industry: text(&raw.industry),
            location: text(&raw.location),
            asking_price: listing.asking_price,
            asking_price_text: listing.asking_price.map(format_dollars).unwrap_or_default(),
            annual_cash_flow: listing.annual_cash_flow,
            annual_revenue: listing.annual_revenue,
            employees: listing.employee_count,
            down_10: ten.down_payment,
            sba_monthly_10pct: ten.monthly_payment,
            annual_debt_service_10pct: ten.annual_debt_service,
            cf_after_debt_10pct: ten.cash_flow_after_debt,
            coc_return_10pct: ten.cash_on_cash_return,
            dscr_10pct: ten.debt_service_coverage_ratio,
            payoff_years_10pct: ten.payoff_years,
            down_20: twenty.down_payment,
            sba_monthly_20pct: twenty.monthly_payment,
            annual_debt_service_20pct: twenty.annual_debt_service,
            cf_after_debt_20pct: twenty.cash_flow_after_debt,
            coc_return_20pct: twenty.cash_on_cash_return,
            dscr_20pct: twenty.debt_service_coverage_ratio,
            payoff_years_20pct: twenty.payoff_years,
            score: scored.score,
            bucket: scored.bucket,
            absentee: scored.absentee,
            reasons: scored.reasons.clone(),
            years_in_business: text(&raw.years_in_business),
            is_franchise: text(&raw.is_franchise),
            reason_for_selling: text(&raw.reason_for_selling),
            sba_available: text(&raw.sba_available),
            listing_agent: text(&raw.listing_agent),
            last_seen: None,
        }
    }

    pub fn title_or_untitled(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

#[derive(Default)]
struct ScenarioColumns {
    down_payment: Option<f64>,
    monthly_payment: Option<f64>,
    annual_debt_service: Option<f64>,
    cash_flow_after_debt: Option<f64>,
    cash_on_cash_return: Option<f64>,
    debt_service_coverage_ratio: Option<f64>,
    payoff_years: Option<f64>,
}

impl From<Option<&ScenarioMetrics>> for ScenarioColumns {
    fn from(metrics: Option<&ScenarioMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self {
                down_payment: Some(metrics.down_payment),
                monthly_payment: Some(metrics.monthly_payment),
                annual_debt_service: Some(metrics.annual_debt_service),
                cash_flow_after_debt: metrics.cash_flow_after_debt,
                cash_on_cash_return: metrics.cash_on_cash_return,
                debt_service_coverage_ratio: metrics.debt_service_coverage_ratio,
                payoff_years: metrics.payoff_years,
            },
            None => Self::default(),
        }
    }
}

fn serialize_reasons<S: Serializer>(reasons: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    let escaped: Vec<String> = reasons
        .iter()
        .map(|reason| reason.replace('\\', "\\\\").replace(';', "\\;"))
        .collect();
    serializer.serialize_str(&escaped.join(REASON_SEPARATOR))
}

fn split_reasons(joined: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    let mut current = String::new();
    let mut chars = joined.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => current.extend(chars.next()),
            ';' => reasons.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    reasons.push(current);
    reasons
        .into_iter()
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .collect()
}

fn deserialize_reasons<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(split_reasons(&joined))
}

fn serialize_last_seen<S: Serializer>(
    last_seen: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match last_seen {
        Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_last_seen<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// Storage abstraction for scored candidates.
pub trait CandidateRepository: Send + Sync {
    /// Replace records by id in place, append unseen ids, and stamp `last_seen`.
    fn upsert(
        &self,
        records: Vec<CandidateRecord>,
        seen_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError>;
    /// Every stored record in storage order.
    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<CandidateRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to access candidate store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("candidate store is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Merge `incoming` into `existing` by id, keeping first-seen positions.
pub fn merge_records(
    existing: &mut Vec<CandidateRecord>,
    incoming: Vec<CandidateRecord>,
    seen_at: DateTime<Utc>,
) -> usize {
    let mut written = 0;
    for mut record in incoming {
        record.last_seen = Some(seen_at);
        match existing.iter_mut().find(|stored| stored.id == record.id) {
            Some(stored) => *stored = record,
            None => existing.push(record),
        }
        written += 1;
    }
    written
}

/// Candidates persisted to a CSV file, rewritten on every upsert.
pub struct CsvCandidateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvCandidateStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path).map_err(|source| self.io_error(source))?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let mut records = Vec::new();
        for record in reader.deserialize::<CandidateRecord>() {
            records.push(record?);
        }
        Ok(records)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // Readers only ever see the previous file or the complete new one.
    fn write(&self, records: &[CandidateRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let staging = self.staging_path();
        let mut writer = csv::Writer::from_path(&staging)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|source| self.io_error(source))?;
        drop(writer);
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))?;
        Ok(())
    }
}

impl CandidateRepository for CsvCandidateStore {
    fn upsert(
        &self,
        records: Vec<CandidateRecord>,
        seen_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("candidate store lock poisoned".into()))?;
        let mut stored = self.read()?;
        let written = merge_records(&mut stored, records, seen_at);
        self.write(&stored)?;
        tracing::info!(
            path = %self.path.display(),
            written,
            total = stored.len(),
            "candidates upserted"
        );
        Ok(written)
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        self.read()
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Ok(self.read()?.into_iter().find(|record| &record.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::acquisition::domain::RawListing;
    use crate::workflows::acquisition::tests::common::{
        minneapolis_listing, scored, scored_raw, temp_path,
    };
    use chrono::TimeZone;

    fn seen_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn record_flattens_both_scenarios() {
        let record = CandidateRecord::from_scored(&scored("48812"));
        assert_eq!(record.asking_price_text, "$500,000");
        assert_eq!(record.down_10, Some(50_000.0));
        assert_eq!(record.down_20, Some(100_000.0));
        assert_eq!(record.annual_debt_service_20pct, Some(63_432.36));
        assert_eq!(record.dscr_20pct, Some(2.36));
        assert_eq!(record.bucket, Bucket::Shortlist);
    }

    #[test]
    fn csv_store_round_trips_records_and_keeps_order() {
        let path = temp_path("candidates", "csv");
        let store = CsvCandidateStore::new(&path);

        let first = CandidateRecord::from_scored(&scored("1"));
        let second = CandidateRecord::from_scored(&scored("2"));
        store
            .upsert(vec![first.clone(), second.clone()], seen_at())
            .expect("initial upsert");

        let mut rescored = first.clone();
        rescored.score = 12;
        rescored.bucket = Bucket::Review;
        let third = CandidateRecord::from_scored(&scored("3"));
        store
            .upsert(vec![third, rescored], seen_at())
            .expect("second upsert");

        let stored = store.all().expect("read back");
        let ids: Vec<&str> = stored.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(stored[0].score, 12);
        assert_eq!(stored[0].bucket, Bucket::Review);
        assert_eq!(stored[1].reasons, second.reasons);
        assert_eq!(stored[1].last_seen, Some(seen_at()));
        assert_eq!(stored[1].coc_return_20pct, second.coc_return_20pct);

        let fetched = store
            .fetch(&ListingId::from("3"))
            .expect("fetch")
            .expect("record present");
        assert_eq!(fetched.id.as_str(), "3");
        assert!(store.fetch(&ListingId::from("99")).expect("fetch").is_none());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn header_uses_the_candidate_columns() {
        let path = temp_path("candidates-header", "csv");
        let store = CsvCandidateStore::new(&path);
        store
            .upsert(vec![CandidateRecord::from_scored(&scored("5"))], seen_at())
            .expect("upsert");

        let contents = std::fs::read_to_string(&path).expect("csv written");
        let header = contents.lines().next().expect("header line");
        assert!(header.starts_with("id,title,url,industry,location,asking_price,asking_price_text"));
        assert!(header.ends_with("sba_available,listing_agent,last_seen"));
        assert!(contents.contains("2026-10-17T12:30:00Z"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_store_reads_as_empty() {
        let store = CsvCandidateStore::new(temp_path("absent", "csv"));
        assert!(store.all().expect("empty store").is_empty());
    }

    #[test]
    fn reasons_column_splits_on_semicolons() {
        let path = temp_path("reasons", "csv");
        let store = CsvCandidateStore::new(&path);
        let mut record = CandidateRecord::from_scored(&scored("8"));
        record.reasons = vec!["strong CF $400,000".to_string(), "DSCR 2.36".to_string()];
        store.upsert(vec![record], seen_at()).expect("upsert");

        let contents = std::fs::read_to_string(&path).expect("csv written");
        assert!(contents.contains("strong CF $400,000; DSCR 2.36"));
        let stored = store.all().expect("read back");
        assert_eq!(stored[0].reasons, vec!["strong CF $400,000", "DSCR 2.36"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn semicolons_inside_a_reason_survive_storage() {
        let path = temp_path("reasons-escaped", "csv");
        let store = CsvCandidateStore::new(&path);
        let rejected = scored_raw(RawListing {
            location: Some("Fargo; North Dakota".to_string()),
            ..minneapolis_listing("9")
        });
        assert_eq!(rejected.reasons, vec!["not Minnesota: Fargo; North Dakota"]);

        let mut record = CandidateRecord::from_scored(&rejected);
        record.reasons.push(r"path C:\deals; backup".to_string());
        store.upsert(vec![record], seen_at()).expect("upsert");

        let stored = store.fetch(&ListingId::from("9")).expect("read back");
        let stored = stored.expect("record stored");
        assert_eq!(
            stored.reasons,
            vec!["not Minnesota: Fargo; North Dakota", r"path C:\deals; backup"]
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn upsert_replaces_the_file_without_leaving_a_staging_copy() {
        let path = temp_path("candidates-staged", "csv");
        let store = CsvCandidateStore::new(&path);
        store
            .upsert(vec![CandidateRecord::from_scored(&scored("1"))], seen_at())
            .expect("first upsert");
        store
            .upsert(vec![CandidateRecord::from_scored(&scored("2"))], seen_at())
            .expect("second upsert");

        assert!(!store.staging_path().exists());
        let ids: Vec<String> = store
            .all()
            .expect("read back")
            .iter()
            .map(|record| record.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);

        std::fs::remove_file(&path).ok();
    }
}

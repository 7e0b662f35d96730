//! Filtering and ranking of stored candidates for the dashboard API.

use super::domain::Bucket;
use super::evaluation::GeographyCriteria;
use super::report::{CandidateListing, CandidateTotals, CandidateView, FinancingComparisonRow};
use super::repository::CandidateRecord;
use serde::Deserialize;

/// Rows shown in the financing comparison.
pub const FINANCING_LIMIT: usize = 20;

/// Score floor applied when a request does not set `min_score`.
pub const DEFAULT_MIN_SCORE: u8 = 35;

/// Query parameters accepted by the candidate endpoints. Absent values do not filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    /// Comma-separated bucket labels; `SHORTLIST,REVIEW` when absent.
    pub bucket: Option<String>,
    /// Defaults to [`DEFAULT_MIN_SCORE`]; pass `0` to include rejected listings.
    pub min_score: Option<u8>,
    pub max_price: Option<f64>,
    pub min_cash_flow: Option<f64>,
    /// Minimum 20%-down cash-on-cash return as a fraction.
    pub min_coc: Option<f64>,
    pub absentee_only: bool,
    pub proximity_only: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown bucket `{0}`; expected SHORTLIST, REVIEW, or AUTO-REJECT")]
    UnknownBucket(String),
}

impl CandidateFilter {
    pub fn buckets(&self) -> Result<Vec<Bucket>, FilterError> {
        let Some(raw) = self.bucket.as_deref().filter(|raw| !raw.trim().is_empty()) else {
            return Ok(vec![Bucket::Shortlist, Bucket::Review]);
        };
        raw.split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(|label| {
                Bucket::from_label(label).ok_or_else(|| FilterError::UnknownBucket(label.into()))
            })
            .collect()
    }

    fn matches(
        &self,
        record: &CandidateRecord,
        buckets: &[Bucket],
        geography: &GeographyCriteria,
    ) -> bool {
        let at_least = |value: Option<f64>, floor: Option<f64>| match (value, floor) {
            (Some(value), Some(floor)) => value >= floor,
            _ => true,
        };
        let price_ok = match (record.asking_price, self.max_price) {
            (Some(price), Some(max)) => price <= max,
            _ => true,
        };
        let coc_floor = self.min_coc.filter(|floor| *floor > 0.0);

        buckets.contains(&record.bucket)
            && record.score >= self.min_score.unwrap_or(DEFAULT_MIN_SCORE)
            && price_ok
            && at_least(record.annual_cash_flow, self.min_cash_flow)
            && at_least(record.coc_return_20pct, coc_floor)
            && (!self.absentee_only || record.absentee.is_absentee())
            && (!self.proximity_only || is_nearby(record, geography))
    }
}

fn is_nearby(record: &CandidateRecord, geography: &GeographyCriteria) -> bool {
    let location = record.location.to_lowercase();
    let label = geography.proximity_label.to_lowercase();
    geography
        .proximity_signals
        .iter()
        .any(|signal| location.contains(signal.as_str()))
        || record
            .reasons
            .iter()
            .any(|reason| reason.to_lowercase().contains(&label))
}

fn filtered<'a>(
    records: &'a [CandidateRecord],
    filter: &CandidateFilter,
    geography: &GeographyCriteria,
) -> Result<Vec<&'a CandidateRecord>, FilterError> {
    let buckets = filter.buckets()?;
    let mut matched: Vec<&CandidateRecord> = records
        .iter()
        .filter(|record| filter.matches(record, &buckets, geography))
        .collect();
    matched.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(matched)
}

/// Filtered candidates, highest score first, with table totals.
pub fn list_candidates(
    records: &[CandidateRecord],
    filter: &CandidateFilter,
    geography: &GeographyCriteria,
) -> Result<CandidateListing, FilterError> {
    let matched = filtered(records, filter, geography)?;
    let count = |bucket: Bucket| records.iter().filter(|r| r.bucket == bucket).count();

    Ok(CandidateListing {
        totals: CandidateTotals {
            total: records.len(),
            filtered: matched.len(),
            shortlisted: count(Bucket::Shortlist),
            rejected: count(Bucket::AutoReject),
        },
        candidates: matched.into_iter().map(CandidateView::from).collect(),
    })
}

/// 10% vs 20% down for the top non-rejected candidates that pass the filter.
pub fn financing_comparison(
    records: &[CandidateRecord],
    filter: &CandidateFilter,
    geography: &GeographyCriteria,
) -> Result<Vec<FinancingComparisonRow>, FilterError> {
    Ok(filtered(records, filter, geography)?
        .into_iter()
        .filter(|record| record.bucket != Bucket::AutoReject)
        .take(FINANCING_LIMIT)
        .map(FinancingComparisonRow::from)
        .collect())
}

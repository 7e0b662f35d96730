use super::super::domain::{AbsenteeLikelihood, Bucket, ListingId};
use super::super::repository::CandidateRecord;
use serde::Serialize;

/// Dashboard row for one candidate, with 20%-down metrics up front.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub id: ListingId,
    pub title: String,
    pub score: u8,
    pub bucket: Bucket,
    pub asking_price: Option<f64>,
    pub asking_price_text: String,
    pub annual_cash_flow: Option<f64>,
    pub cf_after_debt_20pct: Option<f64>,
    pub coc_return_20pct: Option<f64>,
    pub dscr_20pct: Option<f64>,
    pub absentee: AbsenteeLikelihood,
    pub location: String,
    pub url: String,
    pub reasons: Vec<String>,
}

impl From<&CandidateRecord> for CandidateView {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title_or_untitled().to_string(),
            score: record.score,
            bucket: record.bucket,
            asking_price: record.asking_price,
            asking_price_text: record.asking_price_text.clone(),
            annual_cash_flow: record.annual_cash_flow,
            cf_after_debt_20pct: record.cf_after_debt_20pct,
            coc_return_20pct: record.coc_return_20pct,
            dscr_20pct: record.dscr_20pct,
            absentee: record.absentee,
            location: record.location.clone(),
            url: record.url.clone(),
            reasons: record.reasons.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioView {
    pub down_payment: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub cash_flow_after_debt: Option<f64>,
    pub cash_on_cash_return: Option<f64>,
}

/// Side-by-side 10% and 20% down comparison.
#[derive(Debug, Clone, Serialize)]
pub struct FinancingComparisonRow {
    pub id: ListingId,
    pub title: String,
    pub asking_price: Option<f64>,
    pub ten_percent_down: ScenarioView,
    pub twenty_percent_down: ScenarioView,
}

impl From<&CandidateRecord> for FinancingComparisonRow {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title_or_untitled().to_string(),
            asking_price: record.asking_price,
            ten_percent_down: ScenarioView {
                down_payment: record.down_10,
                monthly_payment: record.sba_monthly_10pct,
                cash_flow_after_debt: record.cf_after_debt_10pct,
                cash_on_cash_return: record.coc_return_10pct,
            },
            twenty_percent_down: ScenarioView {
                down_payment: record.down_20,
                monthly_payment: record.sba_monthly_20pct,
                cash_flow_after_debt: record.cf_after_debt_20pct,
                cash_on_cash_return: record.coc_return_20pct,
            },
        }
    }
}

/// Number of candidates per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub shortlist: usize,
    pub review: usize,
    pub auto_reject: usize,
}

impl BucketCounts {
    pub fn tally<I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = Bucket>,
    {
        let mut counts = Self::default();
        for bucket in buckets {
            match bucket {
                Bucket::Shortlist => counts.shortlist += 1,
                Bucket::Review => counts.review += 1,
                Bucket::AutoReject => counts.auto_reject += 1,
            }
        }
        counts
    }

    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Shortlist => self.shortlist,
            Bucket::Review => self.review,
            Bucket::AutoReject => self.auto_reject,
        }
    }

    pub fn total(&self) -> usize {
        self.shortlist + self.review + self.auto_reject
    }

    /// Non-empty buckets in label order, e.g. `2 AUTO-REJECT, 1 SHORTLIST`.
    pub fn describe(&self) -> String {
        let mut buckets = Bucket::ordered().to_vec();
        buckets.sort_by_key(|bucket| bucket.label());
        buckets
            .into_iter()
            .filter(|bucket| self.get(*bucket) > 0)
            .map(|bucket| format!("{} {}", self.get(bucket), bucket.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Headline numbers for the candidate table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CandidateTotals {
    pub total: usize,
    pub filtered: usize,
    pub shortlisted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateListing {
    pub totals: CandidateTotals,
    pub candidates: Vec<CandidateView>,
}

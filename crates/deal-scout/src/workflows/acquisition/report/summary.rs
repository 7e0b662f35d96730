use super::super::domain::Bucket;
use super::super::repository::CandidateRecord;
use super::views::BucketCounts;
use chrono::NaiveDate;

pub const SHORTLIST_LIMIT: usize = 20;
pub const REVIEW_LIMIT: usize = 30;
pub const REJECTED_LIMIT: usize = 10;

/// Daily digest of one run's newly scored candidates.
#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub counts: BucketCounts,
    /// Highest score first.
    pub shortlist: Vec<CandidateRecord>,
    /// Highest score first.
    pub review: Vec<CandidateRecord>,
    /// Run order.
    pub rejected: Vec<CandidateRecord>,
}

impl DailyReport {
    pub fn build(records: &[CandidateRecord], date: NaiveDate) -> Self {
        let in_bucket = |bucket: Bucket| -> Vec<CandidateRecord> {
            records
                .iter()
                .filter(|record| record.bucket == bucket)
                .cloned()
                .collect()
        };

        let mut shortlist = in_bucket(Bucket::Shortlist);
        let mut review = in_bucket(Bucket::Review);
        shortlist.sort_by(|a, b| b.score.cmp(&a.score));
        review.sort_by(|a, b| b.score.cmp(&a.score));

        Self {
            date,
            counts: BucketCounts::tally(records.iter().map(|record| record.bucket)),
            shortlist,
            review,
            rejected: in_bucket(Bucket::AutoReject),
        }
    }

    pub fn processed(&self) -> usize {
        self.counts.total()
    }
}

/// One-line console summary, e.g. `Done. 40 fetched, 12 new. 7 AUTO-REJECT, 3 REVIEW, 2 SHORTLIST`.
pub fn summary_line(fetched: usize, new: usize, counts: &BucketCounts) -> String {
    let described = counts.describe();
    if described.is_empty() {
        format!("Done. {fetched} fetched, {new} new.")
    } else {
        format!("Done. {fetched} fetched, {new} new. {described}")
    }
}

mod absentee;
mod config;
mod policy;
mod rules;
mod tiers;

pub use config::{
    AbsenteeSignals, BucketThresholds, BudgetCriteria, CategoryWeights, CriteriaConfig,
    FinancialCriteria, GeographyCriteria, IndustryCriteria, NoGoCriteria, OperationsCriteria,
    RecurringRevenueCriteria, RegionCriteria, TargetCriteria, TechDeficiencyCriteria,
};
pub use policy::RejectionReason;
pub use tiers::{CeilingTier, FloorTier};

pub(crate) use tiers::{
    ceilings_ascending, floors_descending, top_ceiling_points, top_floor_points,
};

use super::domain::{AbsenteeLikelihood, Bucket, NormalizedListing, ScoreComponent, ScoredListing};
use absentee::detect_absentee;
use policy::{first_rejection, Candidate};
use std::collections::BTreeSet;

/// Stateless scorer that applies one criteria set to normalized listings.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    criteria: CriteriaConfig,
}

impl ScoringEngine {
    pub fn new(criteria: CriteriaConfig) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &CriteriaConfig {
        &self.criteria
    }

    pub fn score(&self, listing: NormalizedListing) -> ScoredListing {
        score(listing, &self.criteria)
    }

    /// Re-derive only the rejection decision, without scoring.
    pub fn rejection(&self, listing: &NormalizedListing) -> Option<RejectionReason> {
        let text = ListingText::from_listing(listing);
        first_rejection(&Candidate { listing, text: &text }, &self.criteria)
    }
}

/// Score one normalized listing. Deterministic for a given listing and criteria set.
pub fn score(listing: NormalizedListing, criteria: &CriteriaConfig) -> ScoredListing {
    let text = ListingText::from_listing(&listing);
    let absentee = detect_absentee(
        &text,
        listing.raw.absentee_owner.as_deref(),
        &criteria.absentee_signals,
    );

    let rejection = first_rejection(
        &Candidate {
            listing: &listing,
            text: &text,
        },
        criteria,
    );
    if let Some(reason) = rejection {
        return rejected(listing, reason, absentee);
    }

    let mut reasons = Vec::new();
    let mut components = Vec::new();
    let mut total: u32 = 0;
    for tally in rules::score_categories(&listing, &text, criteria) {
        total = total.saturating_add(tally.points);
        reasons.extend(tally.reasons);
        components.push(ScoreComponent {
            category: tally.category,
            points: tally.points,
            cap: tally.cap,
        });
    }

    let score = u8::try_from(total.min(100)).unwrap_or(100);

    ScoredListing {
        listing,
        score,
        bucket: bucket_for(score, &criteria.thresholds),
        reasons,
        absentee,
        components,
    }
}

/// Listings that survive rejection are either shortlisted or sent to review.
pub fn bucket_for(score: u8, thresholds: &BucketThresholds) -> Bucket {
    if u32::from(score) >= thresholds.shortlist {
        Bucket::Shortlist
    } else {
        Bucket::Review
    }
}

fn rejected(
    listing: NormalizedListing,
    reason: RejectionReason,
    absentee: AbsenteeLikelihood,
) -> ScoredListing {
    ScoredListing {
        listing,
        score: 0,
        bucket: Bucket::AutoReject,
        reasons: vec![reason.summary()],
        absentee,
        components: Vec::new(),
    }
}

/// Lower-cased listing text used for keyword matching.
///
/// `context` is title, description, and industry joined by spaces; location is kept
/// apart because only the region and proximity rules read it.
#[derive(Debug, Clone)]
pub(crate) struct ListingText {
    pub context: String,
    pub location: String,
}

impl ListingText {
    pub(crate) fn new(title: &str, description: &str, industry: &str, location: &str) -> Self {
        Self {
            context: format!("{title} {description} {industry}").to_lowercase(),
            location: location.trim().to_lowercase(),
        }
    }

    pub(crate) fn from_listing(listing: &NormalizedListing) -> Self {
        let raw = &listing.raw;
        Self::new(
            raw.title.as_deref().unwrap_or_default(),
            raw.description.as_deref().unwrap_or_default(),
            raw.industry.as_deref().unwrap_or_default(),
            raw.location.as_deref().unwrap_or_default(),
        )
    }

    /// First keyword, in configured order, found in the context text.
    pub(crate) fn first_match<'k>(&self, keywords: &'k [String]) -> Option<&'k str> {
        keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| !keyword.is_empty() && self.context.contains(keyword))
    }

    pub(crate) fn distinct_matches<'k>(&self, keywords: &'k [String]) -> BTreeSet<&'k str> {
        keywords
            .iter()
            .map(String::as_str)
            .filter(|keyword| !keyword.is_empty() && self.context.contains(keyword))
            .collect()
    }
}

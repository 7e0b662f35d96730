use super::config::CriteriaConfig;
use super::ListingText;
use crate::workflows::acquisition::domain::{format_dollars, NormalizedListing, Scenario};
use serde::{Deserialize, Serialize};

/// Why a listing was auto-rejected. Each variant is one guard in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingFinancials,
    UnderMinimumPrice { asking_price: f64 },
    OverMaximumPrice { asking_price: f64 },
    MissingCashFlow,
    LowDebtCoverage { dscr: f64, minimum: f64 },
    NegativeCashFlowAfterDebt { cash_flow_after_debt: f64 },
    OutsideRegion { region: String, location: String },
    RegulatedIndustry { keyword: String },
    OnlineOnlyBusiness { keyword: String },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::MissingFinancials => "missing financials".to_string(),
            RejectionReason::UnderMinimumPrice { asking_price } => {
                format!("under min price {}", format_dollars(*asking_price))
            }
            RejectionReason::OverMaximumPrice { asking_price } => {
                format!("over max price {}", format_dollars(*asking_price))
            }
            RejectionReason::MissingCashFlow => "no cash flow data".to_string(),
            RejectionReason::LowDebtCoverage { dscr, minimum } => {
                format!("DSCR {dscr:.2} below {minimum}")
            }
            RejectionReason::NegativeCashFlowAfterDebt {
                cash_flow_after_debt,
            } => format!(
                "negative CF after debt {}",
                format_dollars(*cash_flow_after_debt)
            ),
            RejectionReason::OutsideRegion { region, location } => {
                format!("not {region}: {location}")
            }
            RejectionReason::RegulatedIndustry { keyword } => format!("regulated: {keyword}"),
            RejectionReason::OnlineOnlyBusiness { keyword } => {
                format!("digital/online: {keyword}")
            }
        }
    }
}

/// Everything a guard may look at.
pub(crate) struct Candidate<'a> {
    pub listing: &'a NormalizedListing,
    pub text: &'a ListingText,
}

type Guard = fn(&Candidate<'_>, &CriteriaConfig) -> Option<RejectionReason>;

/// Evaluated in order; the first guard that fires ends the evaluation.
const GUARDS: [Guard; 8] = [
    missing_financials,
    price_out_of_budget,
    missing_cash_flow,
    low_debt_coverage,
    negative_cash_flow_after_debt,
    outside_region,
    regulated_industry,
    online_only_business,
];

pub(crate) fn first_rejection(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    GUARDS.iter().find_map(|guard| guard(candidate, criteria))
}

fn missing_financials(candidate: &Candidate<'_>, _: &CriteriaConfig) -> Option<RejectionReason> {
    let listing = candidate.listing;
    (listing.asking_price.is_none() && listing.annual_cash_flow.is_none())
        .then_some(RejectionReason::MissingFinancials)
}

fn price_out_of_budget(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    let asking_price = candidate.listing.asking_price?;
    if asking_price < criteria.budget.min_asking_price {
        return Some(RejectionReason::UnderMinimumPrice { asking_price });
    }
    if asking_price > criteria.budget.max_asking_price {
        return Some(RejectionReason::OverMaximumPrice { asking_price });
    }
    None
}

fn missing_cash_flow(candidate: &Candidate<'_>, _: &CriteriaConfig) -> Option<RejectionReason> {
    candidate
        .listing
        .annual_cash_flow
        .is_none()
        .then_some(RejectionReason::MissingCashFlow)
}

fn low_debt_coverage(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    let dscr = candidate
        .listing
        .scenario(Scenario::TwentyPercentDown)?
        .debt_service_coverage_ratio?;
    let minimum = criteria.targets.min_dscr;
    (dscr < minimum).then_some(RejectionReason::LowDebtCoverage { dscr, minimum })
}

fn negative_cash_flow_after_debt(
    candidate: &Candidate<'_>,
    _: &CriteriaConfig,
) -> Option<RejectionReason> {
    let cash_flow_after_debt = candidate
        .listing
        .scenario(Scenario::TwentyPercentDown)?
        .cash_flow_after_debt?;
    (cash_flow_after_debt < 0.0).then_some(RejectionReason::NegativeCashFlowAfterDebt {
        cash_flow_after_debt,
    })
}

fn outside_region(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    let location = candidate.text.location.as_str();
    if location.is_empty() || location.contains(&criteria.region.required_term) {
        return None;
    }
    Some(RejectionReason::OutsideRegion {
        region: criteria.region.name.clone(),
        location: candidate.listing.location().trim().to_string(),
    })
}

fn regulated_industry(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    candidate
        .text
        .first_match(&criteria.no_go.regulated_keywords)
        .map(|keyword| RejectionReason::RegulatedIndustry {
            keyword: keyword.to_string(),
        })
}

fn online_only_business(
    candidate: &Candidate<'_>,
    criteria: &CriteriaConfig,
) -> Option<RejectionReason> {
    candidate
        .text
        .first_match(&criteria.no_go.digital_keywords)
        .map(|keyword| RejectionReason::OnlineOnlyBusiness {
            keyword: keyword.to_string(),
        })
}

use super::common::*;

use crate::workflows::acquisition::domain::{Bucket, RawListing};
use crate::workflows::acquisition::evaluation::{score, RejectionReason, ScoringEngine};
use crate::workflows::acquisition::financials::normalize;

fn with_financials(price: Option<&str>, cash_flow: Option<&str>) -> RawListing {
    RawListing {
        asking_price_text: price.map(str::to_string),
        cash_flow_text: cash_flow.map(str::to_string),
        ..minneapolis_listing("r-1")
    }
}

fn rejection_reasons(raw: RawListing) -> Vec<String> {
    let scored = scored_raw(raw);
    assert_eq!(scored.bucket, Bucket::AutoReject);
    assert_eq!(scored.score, 0);
    assert!(scored.components.is_empty());
    scored.reasons
}

#[test]
fn missing_price_and_cash_flow_is_missing_financials() {
    assert_eq!(
        rejection_reasons(with_financials(None, Some("call broker"))),
        vec!["missing financials"]
    );
}

#[test]
fn missing_financials_outranks_a_regulated_industry() {
    let raw = RawListing {
        title: Some("Cannabis Dispensary".to_string()),
        description: Some("Cannabis dispensary with a loyal customer base.".to_string()),
        ..with_financials(None, None)
    };
    assert_eq!(rejection_reasons(raw), vec!["missing financials"]);
}

#[test]
fn price_outside_budget_is_rejected() {
    assert_eq!(
        rejection_reasons(with_financials(Some("$150,000"), Some("$90,000"))),
        vec!["under min price $150,000"]
    );
    assert_eq!(
        rejection_reasons(with_financials(Some("$3,500,000"), None)),
        vec!["over max price $3,500,000"]
    );
}

#[test]
fn budget_bounds_are_inclusive() {
    let at_floor = scored_raw(with_financials(Some("$200,000"), Some("$90,000")));
    assert_ne!(at_floor.bucket, Bucket::AutoReject, "{:?}", at_floor.reasons);
}

#[test]
fn missing_cash_flow_is_rejected_after_budget() {
    assert_eq!(
        rejection_reasons(with_financials(Some("$500,000"), None)),
        vec!["no cash flow data"]
    );
}

#[test]
fn debt_coverage_uses_the_rounded_ratio() {
    // $79,000 / $63,432.36 rounds to exactly 1.25 and clears the minimum.
    let passing = scored_raw(with_financials(Some("$500,000"), Some("$79,000")));
    assert_ne!(passing.bucket, Bucket::AutoReject, "{:?}", passing.reasons);

    assert_eq!(
        rejection_reasons(with_financials(Some("$500,000"), Some("$78,900"))),
        vec!["DSCR 1.24 below 1.25"]
    );
    assert_eq!(
        rejection_reasons(with_financials(Some("$500,000"), Some("$70,000"))),
        vec!["DSCR 1.10 below 1.25"]
    );
}

#[test]
fn zero_cash_flow_fails_debt_coverage() {
    assert_eq!(
        rejection_reasons(with_financials(Some("$500,000"), Some("$0"))),
        vec!["DSCR 0.00 below 1.25"]
    );
}

#[test]
fn negative_post_debt_cash_flow_is_rejected_when_coverage_allows_it() {
    let mut criteria = criteria();
    criteria.targets.min_dscr = 0.5;
    let scored = score(
        normalize(with_financials(Some("$500,000"), Some("$50,000"))),
        &criteria,
    );
    assert_eq!(scored.bucket, Bucket::AutoReject);
    assert_eq!(scored.reasons, vec!["negative CF after debt -$13,432"]);
}

#[test]
fn listings_outside_the_region_are_rejected() {
    assert_eq!(
        rejection_reasons(out_of_state_listing("nd")),
        vec!["not Minnesota: Fargo, North Dakota"]
    );
}

#[test]
fn missing_location_does_not_trigger_the_region_rule() {
    let scored = scored_raw(RawListing {
        location: None,
        ..minneapolis_listing("no-loc")
    });
    assert_ne!(scored.bucket, Bucket::AutoReject, "{:?}", scored.reasons);
}

#[test]
fn regulated_and_online_businesses_are_rejected() {
    assert_eq!(
        rejection_reasons(RawListing {
            description: Some("Licensed liquor store with loyal customers.".to_string()),
            ..minneapolis_listing("liq")
        }),
        vec!["regulated: liquor"]
    );
    assert_eq!(
        rejection_reasons(RawListing {
            title: Some("Amazon FBA Brand".to_string()),
            ..minneapolis_listing("fba")
        }),
        vec!["digital/online: amazon fba"]
    );
}

#[test]
fn first_failing_rule_wins() {
    let raw = RawListing {
        description: Some("Cannabis dispensary".to_string()),
        ..out_of_state_listing("both")
    };
    assert_eq!(
        rejection_reasons(raw),
        vec!["not Minnesota: Fargo, North Dakota"]
    );

    let raw = with_financials(Some("$3,500,000"), None);
    let engine = ScoringEngine::new(criteria());
    assert_eq!(
        engine.rejection(&normalize(raw)),
        Some(RejectionReason::OverMaximumPrice {
            asking_price: 3_500_000.0
        })
    );
}

#[test]
fn shortlisted_listing_has_no_rejection() {
    let engine = ScoringEngine::new(criteria());
    assert_eq!(engine.rejection(&normalize(minneapolis_listing("ok"))), None);
}

//! Financial normalizer: scraped text to typed numbers and SBA-style loan scenarios.
//!
//! Nothing in this module fails. Text that does not parse becomes `None`, and every
//! value derived from it stays `None`.

use super::domain::{Financing, NormalizedListing, RawListing, Scenario, ScenarioMetrics};
use std::collections::HashMap;

pub const ANNUAL_INTEREST_RATE: f64 = 0.10;
pub const TERM_YEARS: u32 = 10;

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Normalize one raw listing.
pub fn normalize(mut raw: RawListing) -> NormalizedListing {
    let asking_price = parse_dollars(raw.asking_price_text.as_deref());
    let annual_cash_flow = parse_dollars(raw.cash_flow_text.as_deref());
    let annual_revenue = parse_dollars(raw.revenue_text.as_deref());
    let employee_count = employee_total(
        raw.employees_full_time.as_deref(),
        raw.employees_part_time.as_deref(),
    );
    let financing = derive_financing(asking_price, annual_cash_flow);

    raw.title = raw.title.map(|title| truncate_chars(&title, TITLE_MAX_CHARS));
    raw.description = raw
        .description
        .map(|description| truncate_chars(&description, DESCRIPTION_MAX_CHARS));

    NormalizedListing {
        raw,
        asking_price,
        annual_cash_flow,
        annual_revenue,
        employee_count,
        financing,
    }
}

/// Normalize a fetch cycle's listings.
///
/// Listings without an identifier are dropped. Repeated identifiers keep the position of
/// their first appearance and the content of their last.
pub fn normalize_batch(raw_listings: Vec<RawListing>) -> Vec<NormalizedListing> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<NormalizedListing> = Vec::new();

    for mut raw in raw_listings {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            continue;
        }

        raw.id = id.clone();
        let normalized = normalize(raw);
        match positions.get(&id) {
            Some(&index) => out[index] = normalized,
            None => {
                positions.insert(id, out.len());
                out.push(normalized);
            }
        }
    }

    out
}

/// Parse a loosely formatted dollar string such as `"$1,219,947"`.
pub fn parse_dollars(text: Option<&str>) -> Option<f64> {
    let cleaned: String = text?
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a head count, ignoring every non-digit character.
pub fn parse_count(text: Option<&str>) -> Option<u32> {
    let digits: String = text?.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Full-time plus part-time staff. A missing full-time count makes the total unknown.
pub fn employee_total(full_time: Option<&str>, part_time: Option<&str>) -> Option<u32> {
    let full_time = parse_count(full_time)?;
    Some(full_time.saturating_add(parse_count(part_time).unwrap_or(0)))
}

/// Fixed monthly payment for a fully amortizing loan.
pub fn amortized_monthly_payment(principal: f64, annual_rate: f64, years: u32) -> Option<f64> {
    if principal.is_nan() || principal <= 0.0 {
        return None;
    }
    let periods = i32::try_from(years.checked_mul(12)?).ok()?;
    if periods == 0 {
        return None;
    }
    let rate = annual_rate / 12.0;
    if rate == 0.0 {
        return Some(round_to(principal / f64::from(periods), 2));
    }
    let growth = (1.0 + rate).powi(periods);
    let payment = principal * (rate * growth) / (growth - 1.0);
    Some(round_to(payment, 2))
}

pub fn derive_financing(
    asking_price: Option<f64>,
    annual_cash_flow: Option<f64>,
) -> Option<Financing> {
    let asking_price = asking_price.filter(|price| *price > 0.0)?;

    Some(Financing {
        ten_percent_down: derive_scenario(
            Scenario::TenPercentDown,
            asking_price,
            annual_cash_flow,
        )?,
        twenty_percent_down: derive_scenario(
            Scenario::TwentyPercentDown,
            asking_price,
            annual_cash_flow,
        )?,
    })
}

fn derive_scenario(
    scenario: Scenario,
    asking_price: f64,
    annual_cash_flow: Option<f64>,
) -> Option<ScenarioMetrics> {
    let fraction = scenario.down_payment_fraction();
    let down_payment = round_to(asking_price * fraction, 2);
    let loan_principal = round_to(asking_price * (1.0 - fraction), 2);
    let monthly_payment =
        amortized_monthly_payment(loan_principal, ANNUAL_INTEREST_RATE, TERM_YEARS)?;
    let annual_debt_service = round_to(monthly_payment * 12.0, 2);

    let mut metrics = ScenarioMetrics {
        scenario,
        down_payment,
        loan_principal,
        monthly_payment,
        annual_debt_service,
        cash_flow_after_debt: None,
        debt_service_coverage_ratio: None,
        cash_on_cash_return: None,
        payoff_years: None,
    };

    if let Some(cash_flow) = annual_cash_flow {
        if annual_debt_service > 0.0 {
            let after_debt = round_to(cash_flow - annual_debt_service, 2);
            metrics.cash_flow_after_debt = Some(after_debt);
            metrics.debt_service_coverage_ratio =
                Some(round_to(cash_flow / annual_debt_service, 2));
            if down_payment > 0.0 {
                metrics.cash_on_cash_return = Some(round_to(after_debt / down_payment, 4));
                if after_debt > 0.0 {
                    metrics.payoff_years = Some(round_to(down_payment / after_debt, 2));
                }
            }
        }
    }

    Some(metrics)
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Normalizes -0.0 so serialized output stays stable.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(price: Option<&str>, cash_flow: Option<&str>) -> RawListing {
        RawListing {
            id: "L-100".to_string(),
            asking_price_text: price.map(str::to_string),
            cash_flow_text: cash_flow.map(str::to_string),
            ..RawListing::default()
        }
    }

    #[test]
    fn parse_dollars_strips_formatting() {
        assert_eq!(parse_dollars(Some("$1,219,947")), Some(1_219_947.0));
        assert_eq!(parse_dollars(Some(" $85,000.50 ")), Some(85_000.5));
        assert_eq!(parse_dollars(Some("Not disclosed")), None);
        assert_eq!(parse_dollars(Some("")), None);
        assert_eq!(parse_dollars(Some("1.2.3")), None);
        assert_eq!(parse_dollars(None), None);
        assert_eq!(parse_dollars(Some("$0")), Some(0.0));
    }

    #[test]
    fn employee_total_requires_full_time_count() {
        assert_eq!(employee_total(Some("12"), Some("4")), Some(16));
        assert_eq!(employee_total(Some("12"), None), Some(12));
        assert_eq!(employee_total(Some("12"), Some("n/a")), Some(12));
        assert_eq!(employee_total(None, Some("4")), None);
        assert_eq!(employee_total(Some("none"), Some("4")), None);
    }

    #[test]
    fn amortization_matches_fixed_payment_formula() {
        let payment = amortized_monthly_payment(100_000.0, 0.10, 10).expect("payment");
        assert!((payment - 1321.51).abs() < 0.005, "payment was {payment}");
        assert_eq!(amortized_monthly_payment(0.0, 0.10, 10), None);
        assert_eq!(amortized_monthly_payment(-5.0, 0.10, 10), None);
    }

    #[test]
    fn absent_or_non_positive_price_yields_no_scenarios() {
        for price in [None, Some("$0"), Some("call for price"), Some("")] {
            let listing = normalize(raw(price, Some("$150,000")));
            assert!(listing.financing.is_none(), "price {price:?}");
            assert_eq!(listing.annual_cash_flow, Some(150_000.0));
        }
    }

    #[test]
    fn missing_cash_flow_keeps_debt_service_only() {
        let listing = normalize(raw(Some("$500,000"), None));
        let twenty = listing
            .scenario(Scenario::TwentyPercentDown)
            .expect("scenario present");
        assert_eq!(twenty.down_payment, 100_000.0);
        assert_eq!(twenty.loan_principal, 400_000.0);
        assert!(twenty.annual_debt_service > 0.0);
        assert_eq!(twenty.cash_flow_after_debt, None);
        assert_eq!(twenty.debt_service_coverage_ratio, None);
        assert_eq!(twenty.cash_on_cash_return, None);
        assert_eq!(twenty.payoff_years, None);
    }

    #[test]
    fn down_payment_plus_loan_equals_price() {
        for price in [1.0, 99_999.99, 333_333.0, 500_000.0, 2_750_001.0] {
            let financing = derive_financing(Some(price), Some(100_000.0)).expect("financing");
            for scenario in Scenario::ordered() {
                let metrics = financing.scenario(scenario);
                let total = metrics.down_payment + metrics.loan_principal;
                assert!((total - price).abs() <= 0.01, "{scenario:?} at {price}");
            }
        }
    }

    #[test]
    fn higher_price_never_improves_coverage_or_return() {
        let prices: Vec<f64> = (2..=30).map(|step| f64::from(step) * 100_000.0).collect();
        for scenario in Scenario::ordered() {
            let metrics: Vec<(f64, f64)> = prices
                .iter()
                .map(|price| {
                    let financing =
                        derive_financing(Some(*price), Some(150_000.0)).expect("financing");
                    let metrics = financing.scenario(scenario);
                    (
                        metrics.debt_service_coverage_ratio.expect("dscr"),
                        metrics.cash_on_cash_return.expect("coc"),
                    )
                })
                .collect();
            for (pair, price) in metrics.windows(2).zip(&prices[1..]) {
                let ((dscr_before, coc_before), (dscr, coc)) = (pair[0], pair[1]);
                assert!(dscr <= dscr_before, "{scenario:?} DSCR rose at {price}");
                assert!(coc <= coc_before, "{scenario:?} CoC rose at {price}");
            }
        }
    }

    #[test]
    fn payoff_requires_positive_post_debt_cash_flow() {
        let listing = normalize(raw(Some("$1,000,000"), Some("$50,000")));
        let twenty = listing
            .scenario(Scenario::TwentyPercentDown)
            .expect("scenario present");
        assert!(twenty.cash_flow_after_debt.expect("after debt") < 0.0);
        assert!(twenty.cash_on_cash_return.expect("coc") < 0.0);
        assert_eq!(twenty.payoff_years, None);
    }

    #[test]
    fn zero_cash_flow_is_a_value_not_an_absence() {
        let listing = normalize(raw(Some("$500,000"), Some("$0")));
        let twenty = listing
            .scenario(Scenario::TwentyPercentDown)
            .expect("scenario present");
        assert_eq!(twenty.debt_service_coverage_ratio, Some(0.0));
        assert!(twenty.cash_flow_after_debt.expect("after debt") < 0.0);
    }

    #[test]
    fn batch_skips_blank_ids_and_collapses_duplicates() {
        let mut first = raw(Some("$100,000"), None);
        first.id = "A".to_string();
        let mut blank = raw(Some("$100,000"), None);
        blank.id = "  ".to_string();
        let mut second = raw(Some("$200,000"), None);
        second.id = "B".to_string();
        let mut replacement = raw(Some("$300,000"), None);
        replacement.id = "A".to_string();

        let listings = normalize_batch(vec![first, blank, second, replacement]);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].raw.id, "A");
        assert_eq!(listings[0].asking_price, Some(300_000.0));
        assert_eq!(listings[1].raw.id, "B");
    }

    #[test]
    fn long_text_is_truncated_on_char_boundaries() {
        let mut listing = raw(None, None);
        listing.title = Some("é".repeat(250));
        let normalized = normalize(listing);
        assert_eq!(normalized.title().chars().count(), 200);
    }
}

use super::config::CriteriaConfig;
use super::tiers::{first_under, highest_reached};
use super::ListingText;
use crate::workflows::acquisition::domain::{
    format_dollars, format_percent, NormalizedListing, Scenario, ScoreCategory,
};

/// Points and reasons for one category, already capped.
pub(crate) struct CategoryTally {
    pub category: ScoreCategory,
    pub points: u32,
    pub cap: u32,
    pub reasons: Vec<String>,
}

impl CategoryTally {
    fn new(category: ScoreCategory, criteria: &CriteriaConfig) -> Self {
        Self {
            category,
            points: 0,
            cap: criteria.weights.cap(category),
            reasons: Vec::new(),
        }
    }

    fn award(&mut self, points: u32, reason: impl Into<String>) {
        self.points = self.points.saturating_add(points);
        self.reasons.push(reason.into());
    }

    fn note(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    fn capped(mut self) -> Self {
        self.points = self.points.min(self.cap);
        self
    }
}

pub(crate) fn score_categories(
    listing: &NormalizedListing,
    text: &ListingText,
    criteria: &CriteriaConfig,
) -> Vec<CategoryTally> {
    vec![
        financial_strength(listing, criteria).capped(),
        operational_simplicity(listing, text, criteria).capped(),
        tech_deficiency(text, criteria).capped(),
        recurring_revenue(text, criteria).capped(),
        industry_durability(text, criteria).capped(),
        geographic_fit(text, criteria).capped(),
    ]
}

fn financial_strength(listing: &NormalizedListing, criteria: &CriteriaConfig) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::FinancialStrength, criteria);
    let financial = &criteria.financial;

    if let Some(cash_flow) = listing.annual_cash_flow {
        match highest_reached(&financial.cash_flow_tiers, cash_flow) {
            Some(tier) => {
                let label = tier.label.as_deref().unwrap_or("tier");
                tally.award(tier.points, format!("{label} CF {}", format_dollars(cash_flow)));
            }
            None => tally.note(format!(
                "{} CF {}",
                financial.low_cash_flow_label,
                format_dollars(cash_flow)
            )),
        }
    }

    let twenty = listing.scenario(Scenario::TwentyPercentDown);

    if let Some(dscr) = twenty.and_then(|metrics| metrics.debt_service_coverage_ratio) {
        if let Some(tier) = highest_reached(&financial.dscr_tiers, dscr) {
            tally.award(tier.points, format!("DSCR {dscr:.2}"));
        }
    }

    if let Some(coc) = twenty.and_then(|metrics| metrics.cash_on_cash_return) {
        if let Some(tier) = highest_reached(&financial.coc_tiers, coc) {
            tally.award(tier.points, format!("CoC {}", format_percent(coc)));
        }
    }

    tally
}

fn operational_simplicity(
    listing: &NormalizedListing,
    text: &ListingText,
    criteria: &CriteriaConfig,
) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::OperationalSimplicity, criteria);
    let operations = &criteria.operations;

    if let Some(employees) = listing.employee_count {
        match first_under(&operations.employee_tiers, employees) {
            Some(tier) => tally.award(tier.points, format!("{employees} employees")),
            None => tally.note(format!("large team: {employees}")),
        }
    }

    if text.first_match(&operations.heavy_inventory_phrases).is_none() {
        tally.award(operations.no_heavy_inventory_points, "no heavy inventory");
    }

    if text.first_match(&operations.simple_phrases).is_some() {
        tally.award(operations.simple_points, "operationally simple");
    }

    tally
}

fn tech_deficiency(text: &ListingText, criteria: &CriteriaConfig) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::TechDeficiency, criteria);
    let matched = text.distinct_matches(&criteria.tech_deficiency.signals);
    let raw = criteria
        .tech_deficiency
        .points_per_signal
        .saturating_mul(u32::try_from(matched.len()).unwrap_or(u32::MAX));

    if raw > 0 {
        let awarded = raw.min(tally.cap);
        tally.award(awarded, format!("tech opportunity ({awarded} pts)"));
    }

    tally
}

fn recurring_revenue(text: &ListingText, criteria: &CriteriaConfig) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::RecurringRevenue, criteria);
    let recurring = &criteria.recurring_revenue;
    let matched = text.distinct_matches(&recurring.signals).len();

    if matched >= recurring.strong_min_signals.max(1) {
        tally.award(tally.cap, "recurring revenue (strong)");
    } else if matched >= 1 {
        tally.award(recurring.partial_points, "recurring revenue signal");
    }

    tally
}

fn industry_durability(text: &ListingText, criteria: &CriteriaConfig) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::IndustryDurability, criteria);

    if let Some(keyword) = text.first_match(&criteria.industry.durable) {
        tally.award(tally.cap, format!("durable industry: {keyword}"));
    }

    tally
}

fn geographic_fit(text: &ListingText, criteria: &CriteriaConfig) -> CategoryTally {
    let mut tally = CategoryTally::new(ScoreCategory::GeographicFit, criteria);
    let geography = &criteria.geography;

    let near = geography.proximity_signals.iter().any(|signal| {
        text.location.contains(signal.as_str()) || text.context.contains(signal.as_str())
    });

    if near {
        tally.award(tally.cap, geography.proximity_label.clone());
    } else if text.location.contains(&criteria.region.required_term) {
        tally.award(geography.state_points, geography.state_label.clone());
    }

    tally
}

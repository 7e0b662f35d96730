use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing identifier as published by the listing site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Listing fields exactly as scraped. Every text field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub asking_price_text: Option<String>,
    pub cash_flow_text: Option<String>,
    pub revenue_text: Option<String>,
    pub employees_full_time: Option<String>,
    pub employees_part_time: Option<String>,
    pub description: Option<String>,
    pub years_in_business: Option<String>,
    pub is_franchise: Option<String>,
    pub reason_for_selling: Option<String>,
    pub sba_available: Option<String>,
    pub real_estate: Option<String>,
    pub listing_agent: Option<String>,
    pub absentee_owner: Option<String>,
}

/// The two modeled capital structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    TenPercentDown,
    TwentyPercentDown,
}

impl Scenario {
    pub const fn ordered() -> [Self; 2] {
        [Self::TenPercentDown, Self::TwentyPercentDown]
    }

    pub const fn down_payment_fraction(self) -> f64 {
        match self {
            Self::TenPercentDown => 0.10,
            Self::TwentyPercentDown => 0.20,
        }
    }
}

/// Loan and return metrics for one scenario.
///
/// The debt-service fields are always populated; the cash-flow-dependent fields are
/// `None` whenever the listing has no parseable cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub scenario: Scenario,
    pub down_payment: f64,
    pub loan_principal: f64,
    pub monthly_payment: f64,
    pub annual_debt_service: f64,
    pub cash_flow_after_debt: Option<f64>,
    pub debt_service_coverage_ratio: Option<f64>,
    pub cash_on_cash_return: Option<f64>,
    pub payoff_years: Option<f64>,
}

/// Both scenarios, which only exist together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub ten_percent_down: ScenarioMetrics,
    pub twenty_percent_down: ScenarioMetrics,
}

impl Financing {
    pub fn scenario(&self, scenario: Scenario) -> &ScenarioMetrics {
        match scenario {
            Scenario::TenPercentDown => &self.ten_percent_down,
            Scenario::TwentyPercentDown => &self.twenty_percent_down,
        }
    }
}

/// Raw listing enriched with typed financials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub raw: RawListing,
    pub asking_price: Option<f64>,
    pub annual_cash_flow: Option<f64>,
    pub annual_revenue: Option<f64>,
    pub employee_count: Option<u32>,
    pub financing: Option<Financing>,
}

impl NormalizedListing {
    pub fn id(&self) -> ListingId {
        ListingId(self.raw.id.clone())
    }

    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioMetrics> {
        self.financing
            .as_ref()
            .map(|financing| financing.scenario(scenario))
    }

    pub fn title(&self) -> &str {
        self.raw.title.as_deref().unwrap_or_default()
    }

    pub fn location(&self) -> &str {
        self.raw.location.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "AUTO-REJECT")]
    AutoReject,
    #[serde(rename = "REVIEW")]
    Review,
    #[serde(rename = "SHORTLIST")]
    Shortlist,
}

impl Bucket {
    pub const fn ordered() -> [Self; 3] {
        [Self::Shortlist, Self::Review, Self::AutoReject]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AutoReject => "AUTO-REJECT",
            Self::Review => "REVIEW",
            Self::Shortlist => "SHORTLIST",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUTO-REJECT" | "AUTO_REJECT" | "REJECT" => Some(Self::AutoReject),
            "REVIEW" => Some(Self::Review),
            "SHORTLIST" => Some(Self::Shortlist),
            _ => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsenteeLikelihood {
    No,
    Possible,
    Likely,
}

impl AbsenteeLikelihood {
    pub const fn label(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Possible => "Possible",
            Self::Likely => "Likely",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "no" => Some(Self::No),
            "possible" => Some(Self::Possible),
            "likely" => Some(Self::Likely),
            _ => None,
        }
    }

    pub const fn is_absentee(self) -> bool {
        matches!(self, Self::Possible | Self::Likely)
    }
}

impl fmt::Display for AbsenteeLikelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring categories in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    FinancialStrength,
    OperationalSimplicity,
    TechDeficiency,
    RecurringRevenue,
    IndustryDurability,
    GeographicFit,
}

impl ScoreCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::FinancialStrength,
            Self::OperationalSimplicity,
            Self::TechDeficiency,
            Self::RecurringRevenue,
            Self::IndustryDurability,
            Self::GeographicFit,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FinancialStrength => "Financial strength",
            Self::OperationalSimplicity => "Operational simplicity",
            Self::TechDeficiency => "Tech deficiency opportunity",
            Self::RecurringRevenue => "Recurring revenue",
            Self::IndustryDurability => "Industry durability",
            Self::GeographicFit => "Geographic fit",
        }
    }
}

/// Capped contribution of one category, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub category: ScoreCategory,
    pub points: u32,
    pub cap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    pub listing: NormalizedListing,
    pub score: u8,
    pub bucket: Bucket,
    pub reasons: Vec<String>,
    pub absentee: AbsenteeLikelihood,
    pub components: Vec<ScoreComponent>,
}

impl ScoredListing {
    pub fn id(&self) -> ListingId {
        self.listing.id()
    }
}

/// Dollar amount with thousands separators and no cents, e.g. `$1,250,000`.
pub fn format_dollars(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

/// Fraction rendered as a whole percentage, e.g. `0.8657` -> `87%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_dollars_groups_thousands() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(999.4), "$999");
        assert_eq!(format_dollars(1_000.0), "$1,000");
        assert_eq!(format_dollars(1_219_947.0), "$1,219,947");
        assert_eq!(format_dollars(-12_345.6), "-$12,346");
    }

    #[test]
    fn bucket_labels_round_trip() {
        for bucket in Bucket::ordered() {
            assert_eq!(Bucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(Bucket::from_label("shortlist"), Some(Bucket::Shortlist));
        assert_eq!(Bucket::from_label("maybe"), None);
    }

    #[test]
    fn bucket_serializes_with_display_labels() {
        let json = serde_json::to_string(&Bucket::AutoReject).expect("serialize bucket");
        assert_eq!(json, "\"AUTO-REJECT\"");
    }
}

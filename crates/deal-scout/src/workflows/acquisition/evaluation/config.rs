use super::tiers::{CeilingTier, FloorTier};
use crate::workflows::acquisition::domain::ScoreCategory;
use serde::{Deserialize, Serialize};

/// Investment criteria applied to every listing in a run.
///
/// Loaded once and treated as immutable. Keyword lists are matched as lower-case
/// substrings of the listing text, so the loader lower-cases them up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaConfig {
    pub version: String,
    pub budget: BudgetCriteria,
    pub region: RegionCriteria,
    pub targets: TargetCriteria,
    pub thresholds: BucketThresholds,
    pub weights: CategoryWeights,
    pub financial: FinancialCriteria,
    pub operations: OperationsCriteria,
    pub tech_deficiency: TechDeficiencyCriteria,
    pub recurring_revenue: RecurringRevenueCriteria,
    pub industry: IndustryCriteria,
    pub geography: GeographyCriteria,
    pub no_go: NoGoCriteria,
    pub absentee_signals: AbsenteeSignals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetCriteria {
    pub min_asking_price: f64,
    pub max_asking_price: f64,
}

/// Region every listing must be located in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionCriteria {
    pub name: String,
    pub required_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetCriteria {
    pub min_dscr: f64,
}

/// `review` is kept for reporting; anything below `shortlist` is bucketed as REVIEW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketThresholds {
    pub shortlist: u32,
    pub review: u32,
}

/// Per-category caps. They add up to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeights {
    pub financial_strength: u32,
    pub operational_simplicity: u32,
    pub tech_deficiency: u32,
    pub recurring_revenue: u32,
    pub industry_durability: u32,
    pub geographic_fit: u32,
}

impl CategoryWeights {
    pub fn cap(&self, category: ScoreCategory) -> u32 {
        match category {
            ScoreCategory::FinancialStrength => self.financial_strength,
            ScoreCategory::OperationalSimplicity => self.operational_simplicity,
            ScoreCategory::TechDeficiency => self.tech_deficiency,
            ScoreCategory::RecurringRevenue => self.recurring_revenue,
            ScoreCategory::IndustryDurability => self.industry_durability,
            ScoreCategory::GeographicFit => self.geographic_fit,
        }
    }

    pub fn total(&self) -> u32 {
        ScoreCategory::ordered()
            .into_iter()
            .fold(0u32, |total, category| total.saturating_add(self.cap(category)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinancialCriteria {
    pub cash_flow_tiers: Vec<FloorTier>,
    pub low_cash_flow_label: String,
    pub dscr_tiers: Vec<FloorTier>,
    pub coc_tiers: Vec<FloorTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationsCriteria {
    pub employee_tiers: Vec<CeilingTier>,
    pub heavy_inventory_phrases: Vec<String>,
    pub no_heavy_inventory_points: u32,
    pub simple_phrases: Vec<String>,
    pub simple_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechDeficiencyCriteria {
    pub points_per_signal: u32,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecurringRevenueCriteria {
    pub strong_min_signals: usize,
    pub partial_points: u32,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndustryCriteria {
    pub durable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeographyCriteria {
    pub proximity_label: String,
    pub proximity_signals: Vec<String>,
    pub state_label: String,
    pub state_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoGoCriteria {
    pub regulated_keywords: Vec<String>,
    pub digital_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbsenteeSignals {
    pub likely: Vec<String>,
    pub possible: Vec<String>,
}

fn words(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn floor(min: f64, points: u32, label: Option<&str>) -> FloorTier {
    FloorTier {
        min,
        points,
        label: label.map(str::to_string),
    }
}

impl CriteriaConfig {
    /// Criteria for a Twin Cities acquirer buying with an SBA 7(a) loan.
    pub fn standard() -> Self {
        Self {
            version: "2026.10".to_string(),
            budget: BudgetCriteria {
                min_asking_price: 200_000.0,
                max_asking_price: 3_000_000.0,
            },
            region: RegionCriteria {
                name: "Minnesota".to_string(),
                required_term: "minnesota".to_string(),
            },
            targets: TargetCriteria { min_dscr: 1.25 },
            thresholds: BucketThresholds {
                shortlist: 60,
                review: 40,
            },
            weights: CategoryWeights {
                financial_strength: 40,
                operational_simplicity: 15,
                tech_deficiency: 15,
                recurring_revenue: 10,
                industry_durability: 10,
                geographic_fit: 10,
            },
            financial: FinancialCriteria {
                cash_flow_tiers: vec![
                    floor(300_000.0, 20, Some("strong")),
                    floor(150_000.0, 10, Some("decent")),
                    floor(75_000.0, 5, Some("modest")),
                ],
                low_cash_flow_label: "low".to_string(),
                dscr_tiers: vec![
                    floor(1.5, 12, None),
                    floor(1.35, 7, None),
                    floor(1.25, 3, None),
                ],
                coc_tiers: vec![
                    floor(0.30, 8, None),
                    floor(0.20, 5, None),
                    floor(0.15, 2, None),
                ],
            },
            operations: OperationsCriteria {
                employee_tiers: vec![
                    CeilingTier {
                        below: 20,
                        points: 8,
                    },
                    CeilingTier {
                        below: 50,
                        points: 4,
                    },
                ],
                heavy_inventory_phrases: words(&[
                    "heavy inventory",
                    "warehouse",
                    "large inventory",
                    "extensive inventory",
                ]),
                no_heavy_inventory_points: 4,
                simple_phrases: words(&[
                    "simple",
                    "straightforward",
                    "easy to run",
                    "turnkey",
                    "well-established",
                ]),
                simple_points: 3,
            },
            tech_deficiency: TechDeficiencyCriteria {
                points_per_signal: 3,
                signals: words(&[
                    "no website",
                    "outdated website",
                    "paper-based",
                    "paper based",
                    "manual process",
                    "no online presence",
                    "no social media",
                    "word of mouth",
                    "no crm",
                    "spreadsheets",
                    "little to no marketing",
                    "untapped online",
                ]),
            },
            recurring_revenue: RecurringRevenueCriteria {
                strong_min_signals: 2,
                partial_points: 6,
                signals: words(&[
                    "recurring",
                    "contract",
                    "subscription",
                    "service agreement",
                    "maintenance agreement",
                    "repeat customers",
                    "route-based",
                    "retainer",
                    "membership",
                ]),
            },
            industry: IndustryCriteria {
                durable: words(&[
                    "hvac",
                    "plumbing",
                    "electrical",
                    "roofing",
                    "pest control",
                    "landscaping",
                    "lawn care",
                    "commercial cleaning",
                    "janitorial",
                    "waste",
                    "septic",
                    "fire protection",
                    "elevator",
                    "auto repair",
                    "collision",
                    "manufacturing",
                    "distribution",
                    "laundromat",
                    "car wash",
                    "self storage",
                    "equipment rental",
                ]),
            },
            geography: GeographyCriteria {
                proximity_label: "Twin Cities area".to_string(),
                proximity_signals: words(&[
                    "minneapolis",
                    "saint paul",
                    "st. paul",
                    "bloomington",
                    "plymouth",
                    "eden prairie",
                    "burnsville",
                    "minnetonka",
                    "eagan",
                    "edina",
                    "maple grove",
                    "woodbury",
                    "coon rapids",
                    "brooklyn park",
                    "twin cities",
                    "metro",
                ]),
                state_label: "Minnesota (not TC)".to_string(),
                state_points: 5,
            },
            no_go: NoGoCriteria {
                regulated_keywords: words(&[
                    "cannabis",
                    "dispensary",
                    "liquor",
                    "tobacco",
                    "vape",
                    "firearm",
                    "pharmacy",
                    "home health",
                    "home care",
                    "assisted living",
                    "child care",
                    "daycare",
                    "medical practice",
                    "dental practice",
                    "veterinary",
                    "insurance agency",
                    "mortgage",
                ]),
                digital_keywords: words(&[
                    "e-commerce",
                    "ecommerce",
                    "online store",
                    "amazon fba",
                    "dropship",
                    "saas",
                    "affiliate",
                    "website business",
                    "digital marketing agency",
                ]),
            },
            absentee_signals: AbsenteeSignals {
                likely: words(&[
                    "absentee owner",
                    "absentee-run",
                    "absentee run",
                    "fully managed",
                    "manager in place",
                    "management in place",
                    "owner not involved",
                ]),
                possible: words(&[
                    "semi-absentee",
                    "semi absentee",
                    "part-time owner",
                    "part time owner",
                    "limited owner involvement",
                    "key employees in place",
                ]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_caps_sum_to_one_hundred() {
        assert_eq!(CriteriaConfig::standard().weights.total(), 100);
    }
}

//! Loading and validation of the criteria file.
//!
//! A criteria set that loads here is safe to hand to the scorer: caps add up to 100,
//! tier tables are ordered, and each category's top tiers add up to its cap.

use crate::workflows::acquisition::domain::ScoreCategory;
use crate::workflows::acquisition::evaluation::{
    ceilings_ascending, floors_descending, top_ceiling_points, top_floor_points, CriteriaConfig,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    #[error("failed to read criteria file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("criteria file is not valid TOML for the criteria schema: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("category caps must sum to 100, found {total}")]
    CapsTotal { total: u32 },
    #[error("{category} tiers award up to {actual} points but the cap is {cap}")]
    WeightMismatch {
        category: &'static str,
        cap: u32,
        actual: u32,
    },
    #[error("tier table `{table}` must be non-empty and ordered from best tier to worst")]
    UnorderedTiers { table: &'static str },
    #[error("budget bounds are invalid: min {min} / max {max}")]
    InvalidBudget { min: f64, max: f64 },
    #[error("minimum DSCR must be positive, found {0}")]
    InvalidMinimumDscr(f64),
    #[error("bucket thresholds are invalid: review {review} / shortlist {shortlist}")]
    InvalidThresholds { review: u32, shortlist: u32 },
    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },
}

/// Read, normalize, and validate a criteria file.
pub fn load_criteria<P: AsRef<Path>>(path: P) -> Result<CriteriaConfig, CriteriaError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CriteriaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_criteria(&contents)
}

/// Configured file when given, the built-in standard criteria otherwise.
pub fn load_criteria_or_standard(path: Option<&Path>) -> Result<CriteriaConfig, CriteriaError> {
    match path {
        Some(path) => load_criteria(path),
        None => prepare(CriteriaConfig::standard()),
    }
}

pub fn parse_criteria(contents: &str) -> Result<CriteriaConfig, CriteriaError> {
    let criteria: CriteriaConfig = toml::from_str(contents)?;
    prepare(criteria)
}

pub fn to_toml(criteria: &CriteriaConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(criteria)
}

fn prepare(mut criteria: CriteriaConfig) -> Result<CriteriaConfig, CriteriaError> {
    normalize_keywords(&mut criteria);
    validate(&criteria)?;
    Ok(criteria)
}

fn normalize_keywords(criteria: &mut CriteriaConfig) {
    criteria.region.required_term = criteria.region.required_term.trim().to_lowercase();

    let lists = [
        &mut criteria.operations.heavy_inventory_phrases,
        &mut criteria.operations.simple_phrases,
        &mut criteria.tech_deficiency.signals,
        &mut criteria.recurring_revenue.signals,
        &mut criteria.industry.durable,
        &mut criteria.geography.proximity_signals,
        &mut criteria.no_go.regulated_keywords,
        &mut criteria.no_go.digital_keywords,
        &mut criteria.absentee_signals.likely,
        &mut criteria.absentee_signals.possible,
    ];
    for list in lists {
        let mut seen = HashSet::new();
        let cleaned: Vec<String> = list
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.clone()))
            .collect();
        *list = cleaned;
    }
}

pub fn validate(criteria: &CriteriaConfig) -> Result<(), CriteriaError> {
    let weights = &criteria.weights;
    let total = weights.total();
    if total != 100 {
        return Err(CriteriaError::CapsTotal { total });
    }

    let budget = &criteria.budget;
    let budget_valid =
        budget.min_asking_price >= 0.0 && budget.min_asking_price <= budget.max_asking_price;
    if !budget_valid {
        return Err(CriteriaError::InvalidBudget {
            min: budget.min_asking_price,
            max: budget.max_asking_price,
        });
    }

    let dscr_positive = criteria.targets.min_dscr > 0.0;
    if !dscr_positive {
        return Err(CriteriaError::InvalidMinimumDscr(criteria.targets.min_dscr));
    }

    let thresholds = &criteria.thresholds;
    if thresholds.shortlist > 100 || thresholds.review > thresholds.shortlist {
        return Err(CriteriaError::InvalidThresholds {
            review: thresholds.review,
            shortlist: thresholds.shortlist,
        });
    }

    if criteria.region.required_term.is_empty() {
        return Err(CriteriaError::Empty {
            field: "region.required_term",
        });
    }

    let financial = &criteria.financial;
    for (table, ordered) in [
        (
            "financial.cash_flow_tiers",
            floors_descending(&financial.cash_flow_tiers),
        ),
        ("financial.dscr_tiers", floors_descending(&financial.dscr_tiers)),
        ("financial.coc_tiers", floors_descending(&financial.coc_tiers)),
        (
            "operations.employee_tiers",
            ceilings_ascending(&criteria.operations.employee_tiers),
        ),
    ] {
        if !ordered {
            return Err(CriteriaError::UnorderedTiers { table });
        }
    }

    let financial_top = points_total([
        top_floor_points(&financial.cash_flow_tiers),
        top_floor_points(&financial.dscr_tiers),
        top_floor_points(&financial.coc_tiers),
    ]);
    expect_exact(ScoreCategory::FinancialStrength, criteria, financial_top)?;

    let operations = &criteria.operations;
    let operations_top = points_total([
        top_ceiling_points(&operations.employee_tiers),
        operations.no_heavy_inventory_points,
        operations.simple_points,
    ]);
    expect_exact(ScoreCategory::OperationalSimplicity, criteria, operations_top)?;

    let tech = &criteria.tech_deficiency;
    if tech.points_per_signal == 0 {
        return Err(CriteriaError::Empty {
            field: "tech_deficiency.points_per_signal",
        });
    }
    expect_at_most(ScoreCategory::TechDeficiency, criteria, tech.points_per_signal)?;

    expect_at_most(
        ScoreCategory::RecurringRevenue,
        criteria,
        criteria.recurring_revenue.partial_points,
    )?;
    expect_at_most(
        ScoreCategory::GeographicFit,
        criteria,
        criteria.geography.state_points,
    )?;

    Ok(())
}

// Saturates so oversized tier points surface as a cap mismatch.
fn points_total(points: [u32; 3]) -> u32 {
    points
        .into_iter()
        .fold(0u32, |total, points| total.saturating_add(points))
}

fn expect_exact(
    category: ScoreCategory,
    criteria: &CriteriaConfig,
    actual: u32,
) -> Result<(), CriteriaError> {
    let cap = criteria.weights.cap(category);
    if actual == cap {
        Ok(())
    } else {
        Err(CriteriaError::WeightMismatch {
            category: category.label(),
            cap,
            actual,
        })
    }
}

fn expect_at_most(
    category: ScoreCategory,
    criteria: &CriteriaConfig,
    actual: u32,
) -> Result<(), CriteriaError> {
    let cap = criteria.weights.cap(category);
    if actual <= cap {
        Ok(())
    } else {
        Err(CriteriaError::WeightMismatch {
            category: category.label(),
            cap,
            actual,
        })
    }
}

use serde::{Deserialize, Serialize};

/// Points awarded when a metric reaches `min`. Tables are ordered from the highest
/// threshold down and the first tier reached wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorTier {
    pub min: f64,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Points awarded when a count stays strictly below `below`. Tables are ordered from
/// the smallest ceiling up and the first tier that fits wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CeilingTier {
    pub below: u32,
    pub points: u32,
}

pub(crate) fn highest_reached(tiers: &[FloorTier], value: f64) -> Option<&FloorTier> {
    tiers.iter().find(|tier| value >= tier.min)
}

pub(crate) fn first_under(tiers: &[CeilingTier], value: u32) -> Option<&CeilingTier> {
    tiers.iter().find(|tier| value < tier.below)
}

pub(crate) fn floors_descending(tiers: &[FloorTier]) -> bool {
    !tiers.is_empty()
        && tiers
            .windows(2)
            .all(|pair| pair[0].min > pair[1].min && pair[0].points >= pair[1].points)
}

pub(crate) fn ceilings_ascending(tiers: &[CeilingTier]) -> bool {
    !tiers.is_empty()
        && tiers
            .windows(2)
            .all(|pair| pair[0].below < pair[1].below && pair[0].points >= pair[1].points)
}

pub(crate) fn top_floor_points(tiers: &[FloorTier]) -> u32 {
    tiers.first().map(|tier| tier.points).unwrap_or(0)
}

pub(crate) fn top_ceiling_points(tiers: &[CeilingTier]) -> u32 {
    tiers.first().map(|tier| tier.points).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dscr_tiers() -> Vec<FloorTier> {
        vec![
            FloorTier {
                min: 1.5,
                points: 12,
                label: None,
            },
            FloorTier {
                min: 1.35,
                points: 7,
                label: None,
            },
            FloorTier {
                min: 1.25,
                points: 3,
                label: None,
            },
        ]
    }

    #[test]
    fn exact_boundary_reaches_the_tier() {
        let tiers = dscr_tiers();
        assert_eq!(highest_reached(&tiers, 1.5).map(|t| t.points), Some(12));
        assert_eq!(highest_reached(&tiers, 1.49).map(|t| t.points), Some(7));
        assert_eq!(highest_reached(&tiers, 1.25).map(|t| t.points), Some(3));
        assert!(highest_reached(&tiers, 1.24).is_none());
    }

    #[test]
    fn ceiling_is_exclusive() {
        let tiers = vec![
            CeilingTier {
                below: 20,
                points: 8,
            },
            CeilingTier {
                below: 50,
                points: 4,
            },
        ];
        assert_eq!(first_under(&tiers, 19).map(|t| t.points), Some(8));
        assert_eq!(first_under(&tiers, 20).map(|t| t.points), Some(4));
        assert!(first_under(&tiers, 50).is_none());
        assert!(ceilings_ascending(&tiers));
    }

    #[test]
    fn ordering_checks_reject_shuffled_tables() {
        let mut tiers = dscr_tiers();
        assert!(floors_descending(&tiers));
        tiers.swap(0, 2);
        assert!(!floors_descending(&tiers));
        assert!(!floors_descending(&[]));
    }
}

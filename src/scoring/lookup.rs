use super::table::{ThresholdTable, Tier};
use std::cmp::Ordering;

/// Which way a measurement improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Bigger is better (distance, repetitions)
    #[default]
    HigherIsBetter,
    /// Smaller is better (times)
    LowerIsBetter,
}

impl Direction {
    /// Whether `value` reaches the tier starting at `threshold`
    pub fn reaches(&self, value: f64, threshold: f64) -> bool {
        match self {
            Direction::HigherIsBetter => value >= threshold,
            Direction::LowerIsBetter => value <= threshold,
        }
    }

    /// Ordering that puts the best tier first
    fn best_first(&self, a: &Tier, b: &Tier) -> Ordering {
        match self {
            Direction::HigherIsBetter => b.threshold.total_cmp(&a.threshold),
            Direction::LowerIsBetter => a.threshold.total_cmp(&b.threshold),
        }
    }
}

/// Look up the score for a measurement.
///
/// Tiers are scanned best-first and the first one the value reaches wins.
/// A value that reaches no tier gets the worst tier's score. An empty table
/// scores 0. There is no interpolation between tiers.
pub fn lookup_score(value: f64, table: &ThresholdTable, direction: Direction) -> f64 {
    let mut tiers = table.tiers().to_vec();
    tiers.sort_by(|a, b| direction.best_first(a, b));

    tiers
        .iter()
        .find(|tier| direction.reaches(value, tier.threshold))
        .or_else(|| tiers.last())
        .map(|tier| tier.score)
        .unwrap_or(0.0)
}

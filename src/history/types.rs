use crate::scoring::{EvaluationResult, ScoreSet, Sex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub evaluations: Vec<StoredEvaluation>,
}

/// A saved evaluation. Concept is 0 and `final_with_concept` equals
/// `final_grade` when no concept was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub sex: Sex,
    pub scores: ScoreSet,
    pub mean: f64,
    pub final_grade: f64,
    pub concept: f64,
    pub final_with_concept: f64,
}

impl StoredEvaluation {
    pub fn from_result(result: &EvaluationResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            sex: result.sex(),
            scores: *result.scores(),
            mean: result.mean(),
            final_grade: result.final_grade(),
            concept: result.concept().unwrap_or(0.0),
            final_with_concept: result.effective_final(),
        }
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    /// Create a new empty history with the current version
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            evaluations: Vec::new(),
        }
    }

    /// Store an evaluation, stamped with the current time
    pub fn record(&mut self, result: &EvaluationResult) -> &StoredEvaluation {
        self.evaluations
            .push(StoredEvaluation::from_result(result, Utc::now()));
        &self.evaluations[self.evaluations.len() - 1]
    }

    /// Evaluations ordered newest first (the order they are listed in)
    pub fn newest_first(&self) -> Vec<&StoredEvaluation> {
        let mut list: Vec<_> = self.evaluations.iter().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Remove an evaluation by id
    /// Returns true if it was stored, false otherwise
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.evaluations.len();
        self.evaluations.retain(|e| e.id != id);
        self.evaluations.len() != before
    }

    /// Mean of the final grades (concept included) over all evaluations
    pub fn global_mean(&self) -> Option<f64> {
        if self.evaluations.is_empty() {
            return None;
        }
        let total: f64 = self.evaluations.iter().map(|e| e.final_with_concept).sum();
        Some(total / self.evaluations.len() as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{calculate_grades, RawMeasurement, ReferenceTable};
    use chrono::Duration;

    fn failed_result() -> EvaluationResult {
        calculate_grades(&ReferenceTable::default(), Sex::Male, &RawMeasurement::default())
    }

    fn stored(final_with_concept: f64, created_at: DateTime<Utc>) -> StoredEvaluation {
        StoredEvaluation {
            id: Uuid::new_v4(),
            created_at,
            sex: Sex::Female,
            scores: ScoreSet::default(),
            mean: 0.0,
            final_grade: final_with_concept,
            concept: 0.0,
            final_with_concept,
        }
    }

    #[test]
    fn test_new_state_empty() {
        let state = HistoryState::new();
        assert_eq!(state.version, 1);
        assert!(state.is_empty());
        assert!(state.global_mean().is_none());
    }

    #[test]
    fn test_record_without_concept() {
        let mut state = HistoryState::new();
        let result = failed_result();
        let entry = state.record(&result).clone();

        assert_eq!(entry.concept, 0.0);
        assert_eq!(entry.final_with_concept, entry.final_grade);
        assert_eq!(entry.sex, Sex::Male);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_record_with_concept() {
        let mut state = HistoryState::new();
        let result = failed_result().apply_concept(0.75);
        let entry = state.record(&result);

        assert_eq!(entry.concept, 0.75);
        assert_eq!(entry.final_with_concept, 0.75);
    }

    #[test]
    fn test_newest_first() {
        let mut state = HistoryState::new();
        let now = Utc::now();
        state.evaluations.push(stored(5.0, now - Duration::days(2)));
        state.evaluations.push(stored(7.0, now));
        state.evaluations.push(stored(6.0, now - Duration::days(1)));

        let finals: Vec<f64> = state
            .newest_first()
            .iter()
            .map(|e| e.final_with_concept)
            .collect();
        assert_eq!(finals, vec![7.0, 6.0, 5.0]);
    }

    #[test]
    fn test_remove() {
        let mut state = HistoryState::new();
        let id = state.record(&failed_result()).id;
        assert!(state.remove(id));
        assert!(!state.remove(id));
        assert!(state.is_empty());
    }

    #[test]
    fn test_global_mean_uses_concept() {
        let mut state = HistoryState::new();
        state.evaluations.push(stored(6.0, Utc::now()));
        state.evaluations.push(stored(8.0, Utc::now()));
        assert_eq!(state.global_mean(), Some(7.0));
    }
}

use super::lookup::{lookup_score, Direction};
use super::table::{ReferenceTable, Sex, TestEvent};
use super::time::parse_time;
use super::validation::{validate_score, AdvisoryKind, MAX_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Institutional weighting applied to the mean of the six tests
pub const FINAL_WEIGHT: f64 = 0.9;

/// Raw measurements for one candidate.
///
/// The two endurance runs are kept as text and go through the time parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub jump: f64,
    pub push_ups: f64,
    pub sprint: f64,
    pub run_1000m: String,
    pub swim: f64,
    pub run_6000m: String,
}

/// One score per test event, always all six.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<TestEvent, f64>", try_from = "BTreeMap<TestEvent, f64>")]
pub struct ScoreSet {
    scores: [f64; 6],
}

impl ScoreSet {
    pub fn get(&self, event: TestEvent) -> f64 {
        self.scores[event.index()]
    }

    pub fn set(&mut self, event: TestEvent, score: f64) {
        self.scores[event.index()] = score;
    }

    /// `(event, score)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (TestEvent, f64)> + '_ {
        TestEvent::ALL.into_iter().map(move |e| (e, self.get(e)))
    }

    /// Unweighted mean of the six scores
    pub fn mean(&self) -> f64 {
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }
}

impl From<ScoreSet> for BTreeMap<TestEvent, f64> {
    fn from(set: ScoreSet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<BTreeMap<TestEvent, f64>> for ScoreSet {
    type Error = String;

    /// Every event must be present; a partial map is not a score set.
    fn try_from(map: BTreeMap<TestEvent, f64>) -> Result<Self, Self::Error> {
        let mut set = ScoreSet::default();
        for event in TestEvent::ALL {
            match map.get(&event) {
                Some(score) => set.set(event, *score),
                None => return Err(format!("missing score for {}", event)),
            }
        }
        Ok(set)
    }
}

/// Message attached to a test whose score was capped or failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub test: TestEvent,
    pub text: String,
    pub kind: AdvisoryKind,
}

/// Outcome of grading one set of measurements.
///
/// `final_grade` is always `mean * 0.9`; the only way to change the result
/// afterwards is [`EvaluationResult::apply_concept`], which returns a copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    sex: Sex,
    scores: ScoreSet,
    mean: f64,
    final_grade: f64,
    messages: Vec<AdvisoryMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    concept: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_with_concept: Option<f64>,
}

impl EvaluationResult {
    fn new(sex: Sex, scores: ScoreSet, messages: Vec<AdvisoryMessage>) -> Self {
        let mean = scores.mean();
        Self {
            sex,
            scores,
            mean,
            final_grade: mean * FINAL_WEIGHT,
            messages,
            concept: None,
            final_with_concept: None,
        }
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn scores(&self) -> &ScoreSet {
        &self.scores
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn final_grade(&self) -> f64 {
        self.final_grade
    }

    pub fn messages(&self) -> &[AdvisoryMessage] {
        &self.messages
    }

    pub fn concept(&self) -> Option<f64> {
        self.concept
    }

    pub fn final_with_concept(&self) -> Option<f64> {
        self.final_with_concept
    }

    /// Final grade including the concept bonus when one was applied
    pub fn effective_final(&self) -> f64 {
        self.final_with_concept.unwrap_or(self.final_grade)
    }

    /// Add a concept bonus to the final grade.
    ///
    /// The concept is clamped to `[0, 1]` (NaN counts as 0) and the adjusted
    /// grade never exceeds 10. A previous adjustment is replaced, not
    /// stacked.
    pub fn apply_concept(&self, concept: f64) -> EvaluationResult {
        let concept = if concept.is_nan() {
            0.0
        } else {
            concept.clamp(0.0, 1.0)
        };

        EvaluationResult {
            concept: Some(concept),
            final_with_concept: Some((self.final_grade + concept).min(MAX_SCORE)),
            ..self.clone()
        }
    }
}

/// Direction in which each event improves
pub fn direction_for(event: TestEvent) -> Direction {
    match event {
        TestEvent::Jump | TestEvent::PushUps => Direction::HigherIsBetter,
        TestEvent::Sprint | TestEvent::Run1000 | TestEvent::Swim | TestEvent::Run6000 => {
            Direction::LowerIsBetter
        }
    }
}

fn time_in_minutes(event: TestEvent, input: &str) -> f64 {
    let parsed = parse_time(input);
    if parsed.is_defaulted() {
        tracing::warn!(test = %event, input = %input, "unreadable time, scoring it as 0 minutes");
    }
    parsed.value()
}

/// Grade all six tests for a candidate.
///
/// Each measurement is looked up in the candidate's reference table, then
/// validated. Missing tables never fail: they score 0 like any other miss.
pub fn calculate_grades(
    table: &ReferenceTable,
    sex: Sex,
    measurement: &RawMeasurement,
) -> EvaluationResult {
    let mut scores = ScoreSet::default();
    let mut messages = Vec::new();

    for event in TestEvent::ALL {
        let value = match event {
            TestEvent::Jump => measurement.jump,
            TestEvent::PushUps => measurement.push_ups,
            TestEvent::Sprint => measurement.sprint,
            TestEvent::Run1000 => time_in_minutes(event, &measurement.run_1000m),
            TestEvent::Swim => measurement.swim,
            TestEvent::Run6000 => time_in_minutes(event, &measurement.run_6000m),
        };

        let raw = lookup_score(value, table.table(sex, event), direction_for(event));
        let validated = validate_score(raw);
        tracing::debug!(test = %event, value, raw, score = validated.score, "scored test");

        scores.set(event, validated.score);
        if let Some(kind) = validated.kind {
            messages.push(AdvisoryMessage {
                test: event,
                text: kind.message().to_string(),
                kind,
            });
        }
    }

    EvaluationResult::new(sex, scores, messages)
}

pub mod engine;
pub mod lookup;
pub mod table;
pub mod time;
pub mod validation;

pub use engine::{
    calculate_grades, direction_for, AdvisoryMessage, EvaluationResult, RawMeasurement, ScoreSet,
};
pub use lookup::{lookup_score, Direction};
pub use table::{load_reference_table, ReferenceTable, Sex, TestEvent, ThresholdTable, Tier};
pub use time::{parse_measurement, parse_time, parse_time_to_minutes, ParsedValue};
pub use validation::{validate_score, AdvisoryKind, ValidatedScore};

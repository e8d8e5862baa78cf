use serde::{Deserialize, Serialize};

/// Highest grade a single test can award
pub const MAX_SCORE: f64 = 10.0;

/// Scores below this fail the test outright
pub const PASS_SCORE: f64 = 5.0;

pub const CAPPED_MESSAGE: &str = "Vale flipad@, deja algo para los demás.";

pub const FAIL_MESSAGE: &str =
    "Con esa marca estás suspens@, superarte es tu siguiente misión. ¡A por ello!";

/// Why a score was changed by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryKind {
    Capped,
    Fail,
}

impl AdvisoryKind {
    pub fn message(&self) -> &'static str {
        match self {
            AdvisoryKind::Capped => CAPPED_MESSAGE,
            AdvisoryKind::Fail => FAIL_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedScore {
    pub score: f64,
    pub kind: Option<AdvisoryKind>,
}

impl ValidatedScore {
    pub fn message(&self) -> Option<&'static str> {
        self.kind.map(|k| k.message())
    }
}

/// Apply the pass/cap policy to a looked-up score.
///
/// Above 10 is capped to 10, below 5 is a fail and scores 0, everything in
/// between is kept as is.
pub fn validate_score(score: f64) -> ValidatedScore {
    if score > MAX_SCORE {
        ValidatedScore {
            score: MAX_SCORE,
            kind: Some(AdvisoryKind::Capped),
        }
    } else if score < PASS_SCORE {
        ValidatedScore {
            score: 0.0,
            kind: Some(AdvisoryKind::Fail),
        }
    } else {
        ValidatedScore { score, kind: None }
    }
}

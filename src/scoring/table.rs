use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Sex category a reference table is defined for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum Sex {
    #[serde(rename = "hombre", alias = "male")]
    #[value(name = "hombre", alias = "male")]
    Male,
    #[serde(rename = "mujer", alias = "female")]
    #[value(name = "mujer", alias = "female")]
    Female,
}

impl Sex {
    pub fn key(&self) -> &'static str {
        match self {
            Sex::Male => "hombre",
            Sex::Female => "mujer",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "hombre" | "male" => Some(Sex::Male),
            "mujer" | "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The six fixed test events, named as in the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TestEvent {
    #[serde(rename = "Salto")]
    Jump,
    #[serde(rename = "Flexiones")]
    PushUps,
    #[serde(rename = "Velocidad")]
    Sprint,
    #[serde(rename = "1000m")]
    Run1000,
    #[serde(rename = "Natación", alias = "Natacion")]
    Swim,
    #[serde(rename = "6000m")]
    Run6000,
}

impl TestEvent {
    /// All events in display order
    pub const ALL: [TestEvent; 6] = [
        TestEvent::Jump,
        TestEvent::PushUps,
        TestEvent::Sprint,
        TestEvent::Run1000,
        TestEvent::Swim,
        TestEvent::Run6000,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TestEvent::Jump => "Salto",
            TestEvent::PushUps => "Flexiones",
            TestEvent::Sprint => "Velocidad",
            TestEvent::Run1000 => "1000m",
            TestEvent::Swim => "Natación",
            TestEvent::Run6000 => "6000m",
        }
    }

    /// Position of the event in [`TestEvent::ALL`]
    pub fn index(&self) -> usize {
        match self {
            TestEvent::Jump => 0,
            TestEvent::PushUps => 1,
            TestEvent::Sprint => 2,
            TestEvent::Run1000 => 3,
            TestEvent::Swim => 4,
            TestEvent::Run6000 => 5,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "Salto" => Some(TestEvent::Jump),
            "Flexiones" => Some(TestEvent::PushUps),
            "Velocidad" => Some(TestEvent::Sprint),
            "1000m" => Some(TestEvent::Run1000),
            "Natación" | "Natacion" => Some(TestEvent::Swim),
            "6000m" => Some(TestEvent::Run6000),
            _ => None,
        }
    }
}

impl fmt::Display for TestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One threshold tier: measurements past `threshold` earn `score`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub threshold: f64,
    pub score: f64,
}

/// Threshold tiers for a single test. Thresholds are finite and unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTable {
    tiers: Vec<Tier>,
}

impl ThresholdTable {
    /// Build a table from `(threshold, score)` pairs.
    ///
    /// Returns one error per non-finite value or repeated threshold.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, Vec<String>>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut errors = Vec::new();
        let mut tiers: Vec<Tier> = Vec::new();

        for (threshold, score) in pairs {
            if !threshold.is_finite() || !score.is_finite() {
                errors.push(format!("non-finite tier {} -> {}", threshold, score));
            } else if tiers.iter().any(|t| t.threshold == threshold) {
                errors.push(format!("duplicate threshold {}", threshold));
            } else {
                tiers.push(Tier { threshold, score });
            }
        }

        if errors.is_empty() {
            Ok(Self { tiers })
        } else {
            Err(errors)
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }
}

/// Literal found in the reference JSON. Tables in the wild use both
/// `"7.5"` and `7.5`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            Literal::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// On-disk shape: sex -> test -> threshold literal -> score literal
type RawReferenceTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, Literal>>>;

/// Reference tables (baremos) for every sex category and test event.
///
/// Immutable once built. Missing categories or events read as empty tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    tables: HashMap<(Sex, TestEvent), ThresholdTable>,
}

impl ReferenceTable {
    /// Threshold table for a sex and event, empty if absent
    pub fn table(&self, sex: Sex, event: TestEvent) -> &ThresholdTable {
        static EMPTY: ThresholdTable = ThresholdTable { tiers: Vec::new() };
        self.tables.get(&(sex, event)).unwrap_or(&EMPTY)
    }

    /// Insert or replace the table for one sex and event
    pub fn with_table(mut self, sex: Sex, event: TestEvent, table: ThresholdTable) -> Self {
        self.tables.insert((sex, event), table);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(ThresholdTable::is_empty)
    }

    /// Parse and validate reference tables from JSON.
    ///
    /// Unknown sex categories and test names are skipped with a warning.
    /// Every malformed literal or duplicate threshold is reported, not just
    /// the first one.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawReferenceTable =
            serde_json::from_str(json).context("Failed to parse reference tables as JSON")?;

        match Self::from_raw(raw) {
            Ok(table) => Ok(table),
            Err(errors) => anyhow::bail!("Invalid reference tables:\n  - {}", errors.join("\n  - ")),
        }
    }

    fn from_raw(raw: RawReferenceTable) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        let mut tables = HashMap::new();

        for (sex_key, events) in raw {
            let Some(sex) = Sex::from_key(&sex_key) else {
                tracing::warn!(category = %sex_key, "skipping unknown sex category in reference tables");
                continue;
            };

            for (event_key, tiers) in events {
                let Some(event) = TestEvent::from_key(&event_key) else {
                    tracing::warn!(category = %sex_key, test = %event_key, "skipping unknown test in reference tables");
                    continue;
                };

                let mut pairs = Vec::with_capacity(tiers.len());
                for (threshold_lit, score_lit) in &tiers {
                    let threshold = threshold_lit.trim().parse::<f64>().ok();
                    let score = score_lit.as_f64();
                    match (threshold, score) {
                        (Some(t), Some(s)) => pairs.push((t, s)),
                        (None, _) => errors.push(format!(
                            "{}.{}: invalid threshold {:?}",
                            sex_key, event_key, threshold_lit
                        )),
                        (_, None) => errors.push(format!(
                            "{}.{}[{:?}]: invalid score {}",
                            sex_key, event_key, threshold_lit, score_lit
                        )),
                    }
                }

                match ThresholdTable::from_pairs(pairs) {
                    Ok(table) => {
                        tables.insert((sex, event), table);
                    }
                    Err(table_errors) => errors.extend(
                        table_errors
                            .into_iter()
                            .map(|e| format!("{}.{}: {}", sex_key, event_key, e)),
                    ),
                }
            }
        }

        if errors.is_empty() {
            Ok(Self { tables })
        } else {
            Err(errors)
        }
    }
}

/// Load reference tables from a JSON file.
pub async fn load_reference_table(path: &Path) -> Result<ReferenceTable> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read reference tables at {}", path.display()))?;

    let table = ReferenceTable::from_json(&content)
        .with_context(|| format!("Failed to load reference tables from {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded reference tables");
    Ok(table)
}

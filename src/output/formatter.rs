use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::history::{HistoryState, StoredEvaluation};
use crate::scoring::{AdvisoryKind, AdvisoryMessage, EvaluationResult, ScoreSet};

/// Traffic-light band a score falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 8.5 {
            ScoreTier::High
        } else if score >= 6.5 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a grade with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

fn colored_score(score: f64, use_colors: bool) -> String {
    paint_score(score, format_score(score), use_colors)
}

/// Color already formatted (and padded) score text by its tier
fn paint_score(score: f64, text: String, use_colors: bool) -> String {
    if !use_colors {
        return text;
    }
    match ScoreTier::for_score(score) {
        ScoreTier::High => text.green().to_string(),
        ScoreTier::Mid => text.yellow().to_string(),
        ScoreTier::Low => text.red().to_string(),
    }
}

/// Format the per-test scores, one row per test in fixed order
pub fn format_scores_table(scores: &ScoreSet, use_colors: bool) -> String {
    let name_width = scores
        .iter()
        .map(|(event, _)| event.name().chars().count())
        .max()
        .unwrap_or(0);

    scores
        .iter()
        .map(|(event, score)| {
            // pad by chars so "Natación" lines up
            let padding = " ".repeat(name_width - event.name().chars().count());
            let name = if use_colors {
                event.name().bold().to_string()
            } else {
                event.name().to_string()
            };
            // pad before coloring, escape codes would count toward the width
            let padded = format!("{:>5}", format_score(score));
            format!("{}{}  {}", name, padding, paint_score(score, padded, use_colors))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format advisory messages as "{test}: {text}"
pub fn format_messages(messages: &[AdvisoryMessage], use_colors: bool) -> String {
    if messages.is_empty() {
        return "No special messages.".to_string();
    }

    messages
        .iter()
        .map(|m| {
            if use_colors {
                let test = format!("{}:", m.test);
                match m.kind {
                    AdvisoryKind::Capped => format!("{} {}", test.yellow().bold(), m.text),
                    AdvisoryKind::Fail => format!("{} {}", test.red().bold(), m.text),
                }
            } else {
                format!("{}: {}", m.test, m.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format mean, weighted final and concept lines for one evaluation
pub fn format_summary(result: &EvaluationResult, use_colors: bool) -> String {
    let mut lines = vec![
        format!("Mean:                {}", format_score(result.mean())),
        format!(
            "Final (x0.9):        {}",
            colored_score(result.final_grade(), use_colors)
        ),
    ];

    if let (Some(concept), Some(final_with_concept)) =
        (result.concept(), result.final_with_concept())
    {
        lines.push(format!("Concept:             {}", concept));
        lines.push(format!(
            "Final with concept:  {}",
            colored_score(final_with_concept, use_colors)
        ));
    }

    lines.join("\n")
}

/// Format a timestamp in the local timezone
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn format_history_line(idx: usize, eval: &StoredEvaluation, use_colors: bool) -> String {
    let index_str = format!("{:>2}.", idx + 1);
    let index_str = if use_colors {
        index_str.dimmed().to_string()
    } else {
        index_str
    };

    format!(
        "{} {}  {}  final {}  concept {}  final with concept {}",
        index_str,
        format_timestamp(eval.created_at),
        eval.sex,
        format_score(eval.final_grade),
        eval.concept,
        colored_score(eval.final_with_concept, use_colors)
    )
}

/// Format stored evaluations newest first, followed by the global mean.
/// Indices are 1-based and match what `delete` expects.
pub fn format_history(state: &HistoryState, use_colors: bool) -> String {
    if state.is_empty() {
        return "No saved evaluations.".to_string();
    }

    let mut lines: Vec<String> = state
        .newest_first()
        .into_iter()
        .enumerate()
        .map(|(idx, eval)| format_history_line(idx, eval, use_colors))
        .collect();

    if let Some(mean) = state.global_mean() {
        lines.push(String::new());
        lines.push(format!("Global mean: {}", colored_score(mean, use_colors)));
    }

    lines.join("\n")
}

/// Export stored evaluations as CSV, newest first.
/// Every field is quoted.
pub fn format_csv(state: &HistoryState) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(["Evaluación", "Nota final", "Concepto", "Final con concepto"])
        .context("Failed to write CSV header")?;

    for eval in state.newest_first() {
        writer
            .write_record([
                format_timestamp(eval.created_at),
                format_score(eval.final_grade),
                eval.concept.to_string(),
                format_score(eval.final_with_concept),
            ])
            .with_context(|| format!("Failed to write CSV row for evaluation {}", eval.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

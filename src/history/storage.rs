use super::types::{HistoryState, HISTORY_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Read the evaluation history. A missing file is an empty history; a file
/// written by another format version is rejected rather than overwritten.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HistoryState::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read history at {}", path.display()))
        }
    };

    let state: HistoryState = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history at {}", path.display()))?;

    if state.version != HISTORY_VERSION {
        anyhow::bail!(
            "History at {} has version {}, expected {}",
            path.display(),
            state.version,
            HISTORY_VERSION
        );
    }

    Ok(state)
}

pub fn save_history(path: &Path, state: &HistoryState) -> Result<()> {
    let json = serde_json::to_vec_pretty(state).context("Failed to serialize history")?;
    crate::config::write_atomic(path, &json)?;

    tracing::debug!(path = %path.display(), evaluations = state.len(), "saved history");
    Ok(())
}

/// Load the history, apply `change`, and save it back.
///
/// Nothing is written when `change` fails. Returns whatever `change`
/// returned.
pub fn update_history<T, F>(path: &Path, change: F) -> Result<T>
where
    F: FnOnce(&mut HistoryState) -> Result<T>,
{
    let mut state = load_history(path)?;
    let outcome = change(&mut state)?;
    save_history(path, &state)?;
    Ok(outcome)
}

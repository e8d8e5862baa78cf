pub mod formatter;

pub use formatter::{
    format_csv, format_history, format_messages, format_score, format_scores_table,
    format_summary, format_timestamp, should_use_colors, ScoreTier,
};

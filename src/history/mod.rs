pub mod storage;
pub mod types;

pub use storage::{load_history, save_history, update_history};
pub use types::{HistoryState, StoredEvaluation};

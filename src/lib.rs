//! Grade physical fitness tests against sex-specific reference tables
//! (baremos).
//!
//! [`scoring`] is the pure engine: it turns raw measurements into per-test
//! scores, a mean and a weighted final grade. The other modules are the
//! command line plumbing around it.

pub mod config;
pub mod history;
pub mod output;
pub mod scoring;

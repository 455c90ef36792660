//! Simple terminal timer for tracking how much time you spend coding.
//! Start and stop the timer from an interactive session, every finished session is saved into a
//! per-day ledger, and a dashboard shows your current and longest coding streaks.
//!

pub mod cli;
pub mod fs;
pub mod render;
pub mod storage;
pub mod tracker;
pub mod utils;

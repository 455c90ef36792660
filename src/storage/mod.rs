//!  Storage is organized through [state_store::StateStore].
//!  The basic idea is:
//!   - There is a single state file in the application directory holding a JSON object.
//!   - The ledger is kept under one key of that object, as an object keyed by `YYYY-MM-DD`.
//!   - Loading is lenient: broken days are skipped, everything else is kept.

pub mod ledger_store;
pub mod state_store;

/// Name of the state file inside the application directory.
pub const STATE_FILE_NAME: &str = "state.json";

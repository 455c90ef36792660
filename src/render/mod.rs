//! Dashboard rendering. [DashboardView] is the read-only input of both renderers, so they never
//! see the ledger itself.

pub mod html;
pub mod terminal;

use chrono::{Duration, NaiveDate};

use crate::tracker::{
    ledger::Ledger,
    streak::{analyze, StreakSnapshot},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDay {
    pub date: NaiveDate,
    pub session_count: usize,
    pub total_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub snapshot: StreakSnapshot,
    /// Newest first.
    pub recent: Vec<RecentDay>,
    pub total_recorded: Duration,
}

impl DashboardView {
    pub fn build(ledger: &Ledger, today: NaiveDate, recent_limit: usize) -> Self {
        Self {
            snapshot: analyze(ledger, today),
            recent: ledger
                .recent(recent_limit)
                .map(|record| RecentDay {
                    date: record.date,
                    session_count: record.sessions.len(),
                    total_time: record.total_time,
                })
                .collect(),
            total_recorded: ledger.total_time(),
        }
    }
}

pub(crate) fn sessions_label(count: usize) -> String {
    if count == 1 {
        "1 session".into()
    } else {
        format!("{count} sessions")
    }
}

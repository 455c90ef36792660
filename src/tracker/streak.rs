use chrono::{Duration, NaiveDate};

use super::ledger::Ledger;

/// Number of days shown in the activity grid.
pub const ACTIVITY_WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub coded: bool,
    pub time: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakSnapshot {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Always [ACTIVITY_WINDOW_DAYS] entries, oldest first, ending on `today`.
    pub last_7_days: Vec<DayActivity>,
}

/// Computes streaks of the ledger.
///
/// A streak is a run of coded days on consecutive calendar dates. A day missing from the ledger
/// breaks the run the same way an uncoded day does. The current streak is anchored at the latest
/// recorded day rather than at `today`, so a few days away don't reset it until something gets
/// recorded again.
pub fn analyze(ledger: &Ledger, today: NaiveDate) -> StreakSnapshot {
    StreakSnapshot {
        current_streak: current_streak(ledger),
        longest_streak: longest_streak(ledger),
        last_7_days: last_days(ledger, today),
    }
}

fn current_streak(ledger: &Ledger) -> u32 {
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for record in ledger.iter().rev() {
        if !record.is_coded() || expected.is_some_and(|d| d != record.date) {
            break;
        }
        streak += 1;
        expected = record.date.pred_opt();
    }
    streak
}

fn longest_streak(ledger: &Ledger) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for record in ledger.iter() {
        if !record.is_coded() {
            run = 0;
        } else if previous.and_then(|p| p.succ_opt()) == Some(record.date) && run > 0 {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
        previous = Some(record.date);
    }
    longest
}

fn last_days(ledger: &Ledger, today: NaiveDate) -> Vec<DayActivity> {
    (0..ACTIVITY_WINDOW_DAYS as i64)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            match ledger.get(date) {
                Some(record) => DayActivity {
                    date,
                    coded: record.is_coded(),
                    time: record.total_time,
                },
                None => DayActivity {
                    date,
                    coded: false,
                    time: Duration::zero(),
                },
            }
        })
        .collect()
}

use std::collections::{btree_map, BTreeMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous start-to-stop interval of tracked time. Never mutated after creation.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(with = "millis_ser")]
    pub duration: Duration,
}

impl Session {
    /// Negative spans (clock moved backwards) are clamped to zero.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration: (end - start).max(Duration::zero()),
        }
    }
}

/// All sessions of one calendar day.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(with = "millis_ser")]
    pub total_time: Duration,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl DailyRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_time: Duration::zero(),
            sessions: vec![],
        }
    }

    pub fn push(&mut self, session: Session) {
        self.total_time = self
            .total_time
            .checked_add(&session.duration)
            .unwrap_or(Duration::MAX);
        self.sessions.push(session);
    }

    /// Sum of session durations, `None` if it doesn't fit into a [Duration].
    pub fn sessions_total(&self) -> Option<Duration> {
        self.sessions
            .iter()
            .try_fold(Duration::zero(), |acc, s| acc.checked_add(&s.duration))
    }

    /// A day counts towards a streak once any time was recorded.
    pub fn is_coded(&self) -> bool {
        self.total_time > Duration::zero()
    }
}

/// Date keyed collection of [DailyRecord]. Serializes as a JSON object keyed by `YYYY-MM-DD`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct Ledger {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// Returns the record for `date`, creating an empty one if needed.
    pub fn record_mut(&mut self, date: NaiveDate) -> &mut DailyRecord {
        self.records
            .entry(date)
            .or_insert_with(|| DailyRecord::empty(date))
    }

    pub fn insert(&mut self, record: DailyRecord) {
        self.records.insert(record.date, record);
    }

    /// Records in chronological order.
    pub fn iter(&self) -> btree_map::Values<'_, NaiveDate, DailyRecord> {
        self.records.values()
    }

    /// Up to `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &DailyRecord> {
        self.records.values().rev().take(limit)
    }

    /// Saturates at [Duration::MAX].
    pub fn total_time(&self) -> Duration {
        self.records.values().fold(Duration::zero(), |acc, r| {
            acc.checked_add(&r.total_time).unwrap_or(Duration::MAX)
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<DailyRecord> for Ledger {
    fn from_iter<T: IntoIterator<Item = DailyRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.date, r)).collect(),
        }
    }
}

mod millis_ser {
    use chrono::Duration;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stored values come from JavaScript numbers, so whole floats are accepted too.
        let ms = f64::deserialize(deserializer)?;
        if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
            return Err(D::Error::custom(format!("duration {ms}ms is out of range")));
        }
        Duration::try_milliseconds(ms as i64)
            .ok_or_else(|| D::Error::custom(format!("duration {ms}ms is out of range")))
    }
}

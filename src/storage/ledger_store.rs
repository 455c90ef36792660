use anyhow::Result;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    tracker::ledger::{DailyRecord, Ledger},
    utils::time::record_name_to_date,
};

use super::state_store::StateStore;

/// Key the ledger is stored under.
pub const LEDGER_KEY: &str = "codingData";

/// Loads the ledger. Missing or unreadable data results in an empty ledger.
pub async fn load_ledger(store: &impl StateStore) -> Ledger {
    match store.get(LEDGER_KEY).await {
        Ok(Some(value)) => ledger_from_value(value),
        Ok(None) => {
            debug!("No stored ledger, starting empty");
            Ledger::new()
        }
        Err(e) => {
            error!("Failed to load ledger, starting empty {e:?}");
            Ledger::new()
        }
    }
}

pub async fn save_ledger(store: &impl StateStore, ledger: &Ledger) -> Result<()> {
    store.set(LEDGER_KEY, serde_json::to_value(ledger)?).await
}

/// Parses stored ledger entry by entry, so that a single broken day doesn't lose the rest.
pub fn ledger_from_value(value: Value) -> Ledger {
    let Value::Object(entries) = value else {
        warn!("Stored ledger is not an object, ignoring it");
        return Ledger::new();
    };

    let mut ledger = Ledger::new();
    for (key, entry) in entries {
        let Some(date) = record_name_to_date(&key) else {
            warn!("Skipping record with illegal date key {key}");
            continue;
        };
        let mut record = match serde_json::from_value::<DailyRecord>(entry) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping illegal record for {key}: {e}");
                continue;
            }
        };

        if record.date != date {
            warn!("Record {key} claims date {}, using the key", record.date);
            record.date = date;
        }

        let session_count = record.sessions.len();
        record.sessions.retain(|s| s.duration >= chrono::Duration::zero());
        if record.sessions.len() != session_count {
            warn!(
                "Dropped {} sessions with negative duration from {key}",
                session_count - record.sessions.len()
            );
        }

        let Some(sessions_total) = record.sessions_total() else {
            warn!("Skipping record {key}, its sessions add up beyond the duration range");
            continue;
        };
        if record.total_time != sessions_total {
            warn!(
                "Record {key} total {}ms doesn't match its sessions {}ms, recomputing",
                record.total_time.num_milliseconds(),
                sessions_total.num_milliseconds()
            );
            record.total_time = sessions_total;
        }

        ledger.insert(record);
    }
    ledger
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use anyhow::Result;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use serde_json::json;
    use tempfile::tempdir;

    use crate::{
        storage::state_store::{
            tests::{BrokenStore, InMemoryStore},
            JsonFileStore, StateStore,
        },
        tracker::ledger::{Ledger, Session},
    };

    use super::{ledger_from_value, load_ledger, save_ledger, LEDGER_KEY};

    const TEST_START_DATE: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    );

    fn sample_ledger() -> Ledger {
        let start = Utc.from_utc_datetime(&TEST_START_DATE);
        let mut ledger = Ledger::new();
        for day in 0..3 {
            let day_start = start + Duration::days(day);
            let record = ledger.record_mut(day_start.date_naive());
            record.push(Session::between(day_start, day_start + Duration::minutes(25)));
            record.push(Session::between(
                day_start + Duration::hours(2),
                day_start + Duration::hours(2) + Duration::seconds(42),
            ));
        }
        ledger.record_mut(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        ledger
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().join("state.json"))?;
        let ledger = sample_ledger();

        save_ledger(&store, &ledger).await?;
        let loaded = load_ledger(&store).await;

        assert_eq!(loaded, ledger);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_and_broken() {
        assert!(load_ledger(&InMemoryStore::default()).await.is_empty());
        assert!(load_ledger(&BrokenStore).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_writes_under_ledger_key() -> Result<()> {
        let store = InMemoryStore::default();
        save_ledger(&store, &sample_ledger()).await?;

        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert!(store.get(LEDGER_KEY).await?.is_some());
        Ok(())
    }

    #[test]
    fn test_lenient_parsing() {
        let value = json!({
            "2024-01-01": {
                "date": "2024-01-01",
                "totalTime": 600000,
                "sessions": [{
                    "start": "2024-01-01T09:00:00.000Z",
                    "end": "2024-01-01T09:10:00.000Z",
                    "duration": 600000
                }]
            },
            "not a date": {"date": "2024-01-02", "totalTime": 0, "sessions": []},
            "2024-01-03": {"date": "2024-01-03", "totalTime": "lots"},
            "2024-01-04": {
                "date": "2024-01-05",
                "totalTime": 99,
                "sessions": [{
                    "start": "2024-01-04T09:00:00Z",
                    "end": "2024-01-04T09:00:01Z",
                    "duration": 1000
                }]
            },
            "2024-01-06": {"date": "2024-01-06", "totalTime": -1e300, "sessions": []},
            "2024-01-07": {
                "date": "2024-01-07",
                "totalTime": 0,
                "sessions": [
                    {"start": "2024-01-07T09:00:00Z", "end": "2024-01-07T10:00:00Z", "duration": 9.0e18},
                    {"start": "2024-01-07T11:00:00Z", "end": "2024-01-07T12:00:00Z", "duration": 9.0e18}
                ]
            },
        });

        let ledger = ledger_from_value(value);

        assert_eq!(ledger.len(), 2);

        let first = ledger.get(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
        assert_eq!(first.total_time, Duration::minutes(10));
        assert_eq!(first.sessions.len(), 1);

        let fixed = ledger.get(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()).unwrap();
        assert_eq!(fixed.date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(fixed.total_time, Duration::seconds(1));
    }

    #[test]
    fn test_non_object_ledger() {
        assert!(ledger_from_value(json!([1, 2])).is_empty());
        assert!(ledger_from_value(json!(null)).is_empty());
    }
}

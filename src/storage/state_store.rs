use std::{future::Future, ops::Deref, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use serde_json::{Map, Value};
use tokio::fs::File;
use tracing::{debug, warn};

use crate::fs::operations::{overwrite, read_from_start};

/// Key-value storage that survives restarts.
pub trait StateStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>>;

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>>;

    /// Like [StateStore::get], substituting `default` for a missing key.
    fn get_or(&self, key: &str, default: Value) -> impl Future<Output = Result<Value>> {
        async move { Ok(self.get(key).await?.unwrap_or(default)) }
    }
}

impl<T: Deref> StateStore for T
where
    T::Target: StateStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> {
        self.deref().set(key, value)
    }
}

/// The main realization of [StateStore]. All keys are kept in a single JSON object file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    fn parse_state(&self, contents: &str) -> Map<String, Value> {
        if contents.trim().is_empty() {
            return Map::new();
        }
        match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("State file {:?} doesn't hold an object: {other}", self.path);
                Map::new()
            }
            Err(e) => {
                // Might happen if the process got killed mid write
                warn!("State file {:?} is corrupted: {e}", self.path);
                Map::new()
            }
        }
    }

    async fn read_state(&self) -> Result<Map<String, Value>, std::io::Error> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {:?}", self.path);
                return Ok(Map::new());
            }
            Err(e) => return Err(e),
        };
        file.lock_shared()?;
        let contents = read_from_start(&mut file).await;
        file.unlock_async().await?;
        Ok(self.parse_state(&contents?))
    }

    async fn write_state(file: &mut File, state: Map<String, Value>) -> Result<()> {
        let buffer = serde_json::to_vec_pretty(&Value::Object(state))?;
        overwrite(file, &buffer).await?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut state = self.read_state().await?;
        Ok(state.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result: Result<()> = async {
            let mut state = self.parse_state(&read_from_start(&mut file).await?);
            state.insert(key.to_string(), value);
            Self::write_state(&mut file, state).await
        }
        .await;
        file.unlock_async().await?;
        debug!("Stored {key} in {:?}", self.path);
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use anyhow::{anyhow, Result};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    use super::{JsonFileStore, StateStore};

    /// Store kept in memory. Counts writes so tests can check when saving happens.
    #[derive(Default)]
    pub struct InMemoryStore {
        pub values: Mutex<HashMap<String, Value>>,
        pub writes: AtomicUsize,
    }

    impl StateStore for InMemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Value>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: Value) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Store whose every operation fails.
    pub struct BrokenStore;

    impl StateStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(anyhow!("storage is unavailable"))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<()> {
            Err(anyhow!("storage is unavailable"))
        }
    }

    #[tokio::test]
    async fn test_file_store_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().join("state.json"))?;

        assert_eq!(store.get("codingData").await?, None);
        assert_eq!(store.get_or("codingData", json!({})).await?, json!({}));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_keeps_other_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().join("nested").join("state.json"))?;

        store.set("first", json!({"a": 1})).await?;
        store.set("second", json!([1, 2, 3])).await?;
        store.set("first", json!({"a": 2})).await?;

        assert_eq!(store.get("first").await?, Some(json!({"a": 2})));
        assert_eq!(store.get("second").await?, Some(json!([1, 2, 3])));

        // A new store over the same file sees the same data
        let reopened = JsonFileStore::new(dir.path().join("nested").join("state.json"))?;
        assert_eq!(reopened.get("second").await?, Some(json!([1, 2, 3])));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_corrupted_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{\"codingData\": {\"2024-01")?;
        let store = JsonFileStore::new(path.clone())?;

        assert_eq!(store.get("codingData").await?, None);

        store.set("codingData", json!({})).await?;
        assert_eq!(store.get("codingData").await?, Some(json!({})));
        Ok(())
    }

    #[tokio::test]
    async fn test_store_through_reference() -> Result<()> {
        let store = std::sync::Arc::new(InMemoryStore::default());
        store.set("key", json!(1)).await?;
        assert_eq!(store.get("key").await?, Some(json!(1)));
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        Ok(())
    }
}

//! State store: the key-value namespace holding settings and career memory.
//!
//! All read-modify-write sequences go through `StateStore::update`, which is a
//! single atomic call at this boundary. Backends: `InMemoryStore` (tests,
//! local runs) and `RedisStore`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub const SETTINGS_KEY: &str = "settings";
pub const MEMORY_KEY: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Transformation applied by `update`; receives the current value, if any.
pub type UpdateFn = Box<dyn FnOnce(Option<Value>) -> Result<Value, StoreError> + Send>;

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically replaces the value under `key` with `f(current)` and returns it.
    async fn update(&self, key: &str, f: UpdateFn) -> Result<Value, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Typed helpers
// ────────────────────────────────────────────────────────────────────────────

/// Loads a typed record, falling back to `T::default()` when the key is absent.
pub async fn load<T>(store: &dyn StateStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Typed read-modify-write. `f` may fail; nothing is written in that case.
pub async fn modify<T, R, F>(store: &dyn StateStore, key: &str, f: F) -> Result<(T, R), StoreError>
where
    T: DeserializeOwned + Serialize + Default + Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut T) -> R + Send + 'static,
{
    let out: std::sync::Arc<Mutex<Option<R>>> = std::sync::Arc::new(Mutex::new(None));
    let slot = out.clone();

    let updated = store
        .update(
            key,
            Box::new(move |current: Option<Value>| -> Result<Value, StoreError> {
                let mut record: T = match current {
                    Some(value) => serde_json::from_value(value)?,
                    None => T::default(),
                };
                let result = f(&mut record);
                *slot.lock().map_err(|_| StoreError::Poisoned)? = Some(result);
                Ok(serde_json::to_value(&record)?)
            }),
        )
        .await?;

    let result = out
        .lock()
        .map_err(|_| StoreError::Poisoned)?
        .take()
        .ok_or(StoreError::Poisoned)?;
    Ok((serde_json::from_value(updated)?, result))
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    async fn update(&self, key: &str, f: UpdateFn) -> Result<Value, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let next = f(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next.clone());
        Ok(next)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

/// Values are stored as JSON strings under `<prefix>:<key>`.
///
/// `update` holds an in-process write lock across its GET and SET. This
/// assumes one API process writes a given namespace at a time.
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    prefix: String,
    write_lock: tokio::sync::Mutex<()>,
}

impl RedisStore {
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis store connected (prefix '{prefix}')");
        Ok(Self {
            conn,
            prefix: prefix.to_string(),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.namespaced(key)).await?;
        raw.map(|s| serde_json::from_str(&s)).transpose().map_err(StoreError::from)
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.namespaced(key), serde_json::to_string(value)?)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(key, &value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.namespaced(key)).await?;
        Ok(())
    }

    async fn update(&self, key: &str, f: UpdateFn) -> Result<Value, StoreError> {
        let _guard = self.write_lock.lock().await;
        let next = f(self.read(key).await?)?;
        self.write(key, &next).await?;
        Ok(next)
    }
}

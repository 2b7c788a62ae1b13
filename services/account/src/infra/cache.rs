//! Key-value cache adapters: Redis for deployments, in-memory for tests and
//! Redis-less development.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};
use tokio::sync::Mutex;

use crate::domain::repository::KvCache;
use crate::error::AccountServiceError;

fn internal<E: std::error::Error + Send + Sync + 'static>(e: E) -> AccountServiceError {
    AccountServiceError::Internal(e.into())
}

// ── Redis ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisKvCache {
    pub pool: Pool,
}

impl KvCache for RedisKvCache {
    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        let mut conn = self.pool.get().await.map_err(internal)?;
        let (): () = conn.set_ex(key, value, ttl_secs).await.map_err(internal)?;
        Ok(())
    }

    async fn set_many_ex(
        &self,
        entries: &[(String, String)],
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        let mut conn = self.pool.get().await.map_err(internal)?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set_ex(key, value, ttl_secs);
        }
        let (): () = pipe.query_async(&mut conn).await.map_err(internal)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountServiceError> {
        let mut conn = self.pool.get().await.map_err(internal)?;
        let value: Option<String> = conn.get(key).await.map_err(internal)?;
        Ok(value)
    }

    async fn del_many(&self, keys: &[String]) -> Result<usize, AccountServiceError> {
        let mut conn = self.pool.get().await.map_err(internal)?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in keys {
            pipe.del(key);
        }
        let counts: Vec<usize> = pipe.query_async(&mut conn).await.map_err(internal)?;
        Ok(counts.into_iter().sum())
    }

    async fn find_key(&self, pattern: &str) -> Result<Option<String>, AccountServiceError> {
        let mut conn = self.pool.get().await.map_err(internal)?;
        let mut iter: redis::AsyncIter<'_, String> =
            conn.scan_match(pattern).await.map_err(internal)?;
        Ok(iter.next_item().await)
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

/// TTL map with lazy eviction: expired entries disappear on the next lookup
/// that touches them. Single-process only.
#[derive(Clone, Default)]
pub struct MemoryKvCache {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryKvCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn live(entry: &(String, Instant)) -> bool {
    entry.1 > Instant::now()
}

/// Match `pattern` with a single-`*` glob against `key`.
fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            key.len() >= prefix.len() + suffix.len()
                && key.starts_with(prefix)
                && key.ends_with(suffix)
        }
        None => pattern == key,
    }
}

impl KvCache for MemoryKvCache {
    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        let expires = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), (value.to_owned(), expires));
        Ok(())
    }

    async fn set_many_ex(
        &self,
        entries: &[(String, String)],
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        let expires = Instant::now() + Duration::from_secs(ttl_secs);
        // One lock spans every write: all-or-nothing as observed by readers.
        let mut map = self.entries.lock().await;
        for (key, value) in entries {
            map.insert(key.clone(), (value.clone(), expires));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountServiceError> {
        let mut map = self.entries.lock().await;
        match map.get(key) {
            Some(entry) if live(entry) => Ok(Some(entry.0.clone())),
            Some(_) => {
                map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn del_many(&self, keys: &[String]) -> Result<usize, AccountServiceError> {
        let mut map = self.entries.lock().await;
        let mut removed = 0;
        for key in keys {
            if let Some(entry) = map.remove(key) {
                if live(&entry) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn find_key(&self, pattern: &str) -> Result<Option<String>, AccountServiceError> {
        let mut map = self.entries.lock().await;
        map.retain(|_, entry| live(entry));
        Ok(map.keys().find(|key| glob_match(pattern, key)).cloned())
    }
}

// ── Backend selection ─────────────────────────────────────────────────────────

/// Concrete cache picked at startup: Redis when a URL is configured,
/// in-memory otherwise.
#[derive(Clone)]
pub enum CacheBackend {
    Redis(RedisKvCache),
    Memory(MemoryKvCache),
}

impl KvCache for CacheBackend {
    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        match self {
            Self::Redis(cache) => cache.set_ex(key, value, ttl_secs).await,
            Self::Memory(cache) => cache.set_ex(key, value, ttl_secs).await,
        }
    }

    async fn set_many_ex(
        &self,
        entries: &[(String, String)],
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError> {
        match self {
            Self::Redis(cache) => cache.set_many_ex(entries, ttl_secs).await,
            Self::Memory(cache) => cache.set_many_ex(entries, ttl_secs).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountServiceError> {
        match self {
            Self::Redis(cache) => cache.get(key).await,
            Self::Memory(cache) => cache.get(key).await,
        }
    }

    async fn del_many(&self, keys: &[String]) -> Result<usize, AccountServiceError> {
        match self {
            Self::Redis(cache) => cache.del_many(keys).await,
            Self::Memory(cache) => cache.del_many(keys).await,
        }
    }

    async fn find_key(&self, pattern: &str) -> Result<Option<String>, AccountServiceError> {
        match self {
            Self::Redis(cache) => cache.find_key(pattern).await,
            Self::Memory(cache) => cache.find_key(pattern).await,
        }
    }
}

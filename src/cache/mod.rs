// src/cache/mod.rs

pub mod storage;

pub use storage::{DirStorage, MemoryStorage, SessionStorage};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::sheet::RawPayload;

pub const STORAGE_KEY: &str = "codeyou_job_data";
pub const TIMESTAMP_KEY: &str = "codeyou_job_data_timestamp";

/// Thirty seconds.
pub const DEFAULT_TTL_MS: i64 = 30 * 1000;

/// Single-slot, time-boxed payload cache over session storage.
///
/// Storage failures never escape: a failed write means the payload is
/// simply not cached, and an unreadable entry reads as a miss.
pub struct SessionCache<S: SessionStorage> {
    storage: S,
    ttl: Duration,
}

impl<S: SessionStorage> SessionCache<S> {
    pub fn new(storage: S) -> Self {
        Self::with_ttl(storage, Duration::milliseconds(DEFAULT_TTL_MS))
    }

    pub fn with_ttl(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self, payload: &RawPayload) {
        self.store_at(payload, Utc::now())
    }

    pub fn store_at(&self, payload: &RawPayload, now: DateTime<Utc>) {
        match self.try_store(payload, now) {
            Ok(()) => info!("job data cached"),
            Err(e) => error!(error = %format!("{:#}", e), "could not cache job data"),
        }
    }

    fn try_store(&self, payload: &RawPayload, now: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(payload).context("serializing payload")?;
        self.storage.set_item(STORAGE_KEY, &json)?;
        self.storage
            .set_item(TIMESTAMP_KEY, &now.timestamp_millis().to_string())?;
        Ok(())
    }

    pub fn get(&self) -> Option<RawPayload> {
        self.get_at(Utc::now())
    }

    /// Cached payload if it is no older than the TTL. Expired entries are
    /// cleared as part of the read.
    pub fn get_at(&self, now: DateTime<Utc>) -> Option<RawPayload> {
        let (stamp, data) = match self.read_slot() {
            Ok(Some(slot)) => slot,
            Ok(None) => return None,
            Err(e) => {
                error!(error = %format!("{:#}", e), "error retrieving cached data");
                return None;
            }
        };

        let stored_at = match stamp.trim().parse::<i64>() {
            Ok(ms) => ms,
            Err(_) => {
                warn!(timestamp = %stamp, "cache timestamp unreadable; treating as miss");
                return None;
            }
        };

        let Some(age_ms) = now.timestamp_millis().checked_sub(stored_at) else {
            warn!(timestamp = %stamp, "cache timestamp out of range; treating as miss");
            return None;
        };
        if age_ms > self.ttl.num_milliseconds() {
            info!(age_ms, "cache expired");
            self.clear();
            return None;
        }

        match serde_json::from_str::<RawPayload>(&data) {
            Ok(payload) => {
                info!(age_secs = (age_ms as f64 / 1000.0).round(), "using cached data");
                Some(payload)
            }
            Err(e) => {
                warn!(error = %e, "cached payload is corrupt; treating as miss");
                None
            }
        }
    }

    fn read_slot(&self) -> Result<Option<(String, String)>> {
        let stamp = self.storage.get_item(TIMESTAMP_KEY)?;
        let data = self.storage.get_item(STORAGE_KEY)?;
        Ok(match (stamp, data) {
            (Some(s), Some(d)) if !s.is_empty() && !d.is_empty() => Some((s, d)),
            _ => None,
        })
    }

    pub fn clear(&self) {
        for key in [STORAGE_KEY, TIMESTAMP_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                error!(key, error = %format!("{:#}", e), "could not clear cache entry");
            }
        }
        debug!("cache cleared");
    }
}

// src/config.rs

use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

use crate::cache::DEFAULT_TTL_MS;
use crate::process::{DEFAULT_DEACTIVATE_AFTER_DAYS, DEFAULT_PAGE_SIZE};

pub const DEFAULT_SHEET_URL: &str = "http://localhost:3000/api/sheet";
pub const DEFAULT_FALLBACK_PATH: &str = "data.json";

/// Runtime settings; every field can be overridden from a `JOBBOARD_*`
/// environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub sheet_url: String,
    pub fallback_path: Option<PathBuf>,
    pub page_size: usize,
    pub deactivate_after_days: i64,
    pub cache_ttl_ms: i64,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            fallback_path: Some(PathBuf::from(DEFAULT_FALLBACK_PATH)),
            page_size: DEFAULT_PAGE_SIZE,
            deactivate_after_days: DEFAULT_DEACTIVATE_AFTER_DAYS,
            cache_ttl_ms: DEFAULT_TTL_MS,
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let fallback_path = match lookup("JOBBOARD_FALLBACK_PATH") {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(PathBuf::from(p)),
            None => d.fallback_path,
        };
        let cache_ttl_ms = match lookup("JOBBOARD_CACHE_TTL_SECS") {
            Some(raw) => parse_or("JOBBOARD_CACHE_TTL_SECS", &raw, d.cache_ttl_ms / 1000)
                .checked_mul(1000)
                .unwrap_or_else(|| {
                    warn!(value = %raw, "JOBBOARD_CACHE_TTL_SECS out of range; using default");
                    d.cache_ttl_ms
                }),
            None => d.cache_ttl_ms,
        };

        Self {
            sheet_url: lookup("JOBBOARD_SHEET_URL").unwrap_or(d.sheet_url),
            fallback_path,
            page_size: read(&lookup, "JOBBOARD_PAGE_SIZE", d.page_size).max(1),
            deactivate_after_days: read(
                &lookup,
                "JOBBOARD_DEACTIVATE_DAYS",
                d.deactivate_after_days,
            ),
            cache_ttl_ms,
            http_timeout_secs: read(&lookup, "JOBBOARD_HTTP_TIMEOUT_SECS", d.http_timeout_secs),
        }
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.cache_ttl_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn read<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + Copy,
{
    match lookup(key) {
        Some(raw) => parse_or(key, &raw, default),
        None => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(key, value = raw, %default, "unparseable setting; using default");
        default
    })
}

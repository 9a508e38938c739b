// src/board/mod.rs

pub mod listing;

pub use listing::{active_job_count, Listing, ListingView};

use chrono::{Local, NaiveDate};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{info, instrument, warn};

use crate::cache::{SessionCache, SessionStorage};
use crate::config::Config;
use crate::fetch::{DataSource, FetchOutcome};
use crate::sheet::RawPayload;

/// Why a load produced no listing.
#[derive(Debug)]
pub enum LoadError {
    /// Neither the sheet nor the fallback produced data. Terminal; the
    /// caller should show an error state and offer a manual refresh.
    NoData {
        source_error: anyhow::Error,
        fallback_error: Option<anyhow::Error>,
    },
    /// A newer load started while this one was fetching; its result was dropped.
    Superseded { generation: u64, latest: u64 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoData {
                source_error,
                fallback_error: None,
            } => write!(f, "unable to load job listings: {:#}", source_error),
            LoadError::NoData {
                source_error,
                fallback_error: Some(fallback_error),
            } => write!(
                f,
                "unable to load job listings: {:#}; fallback: {:#}",
                source_error, fallback_error
            ),
            LoadError::Superseded { generation, latest } => write!(
                f,
                "load #{} superseded by load #{}",
                generation, latest
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::NoData { source_error, .. } => {
                let source: &(dyn std::error::Error + 'static) = source_error.as_ref();
                Some(source)
            }
            LoadError::Superseded { .. } => None,
        }
    }
}

/// Cache-fronted loader tying a data source to the listing pipeline.
///
/// Every load takes a generation number; a fetch that finishes after a
/// newer load has started is discarded rather than overwriting the cache.
pub struct JobBoard<D: DataSource, S: SessionStorage> {
    source: D,
    cache: SessionCache<S>,
    config: Config,
    generation: AtomicU64,
}

impl<D: DataSource, S: SessionStorage> JobBoard<D, S> {
    pub fn new(source: D, storage: S, config: Config) -> Self {
        let cache = SessionCache::with_ttl(storage, config.cache_ttl());
        Self {
            source,
            cache,
            config,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &SessionCache<S> {
        &self.cache
    }

    pub async fn load(&self) -> Result<Listing, LoadError> {
        self.load_on(Local::now().date_naive()).await
    }

    /// Load the listing, treating `today` as the reference day for
    /// auto-deactivation.
    #[instrument(skip(self))]
    pub async fn load_on(&self, today: NaiveDate) -> Result<Listing, LoadError> {
        let payload = self.cached_or_fetch().await?;
        let listing = Listing::from_payload(&payload, self.config.deactivate_after_days, today);
        info!(active = listing.len(), "listing ready");
        Ok(listing)
    }

    /// Homepage path: warm the cache and return the badge count.
    pub async fn preload(&self) -> Result<usize, LoadError> {
        if let Some(payload) = self.cache.get() {
            info!("valid cache found, skipping fetch");
            return Ok(active_job_count(&payload));
        }
        let payload = self.fetch_fresh().await?;
        Ok(active_job_count(&payload))
    }

    /// Drop the cached payload and load again from the source.
    pub async fn refresh(&self) -> Result<Listing, LoadError> {
        info!("manually refreshing job data");
        self.cache.clear();
        self.load().await
    }

    async fn cached_or_fetch(&self) -> Result<RawPayload, LoadError> {
        match self.cache.get() {
            Some(payload) => Ok(payload),
            None => {
                info!("no cached data found, fetching fresh data");
                self.fetch_fresh().await
            }
        }
    }

    async fn fetch_fresh(&self) -> Result<RawPayload, LoadError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.source.fetch().await;

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            warn!(generation, latest, "discarding stale fetch result");
            return Err(LoadError::Superseded { generation, latest });
        }

        match outcome {
            FetchOutcome::Success { payload, origin } => {
                info!(origin = origin.as_str(), generation, "fetched job data");
                self.cache.store(&payload);
                Ok(payload)
            }
            FetchOutcome::SourceFailed { error } => Err(LoadError::NoData {
                source_error: error,
                fallback_error: None,
            }),
            FetchOutcome::FallbackFailed {
                source_error,
                fallback_error,
            } => Err(LoadError::NoData {
                source_error,
                fallback_error: Some(fallback_error),
            }),
        }
    }
}

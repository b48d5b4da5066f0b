use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use log::trace;
use once_cell::sync::OnceCell;

use crate::{
    uname::ReleaseSource,
    version::{VersionError, VersionInfo},
};

/// How long a [`TtlCache`] entry stays fresh unless overridden.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Caches the first successfully acquired kernel version for the lifetime of
/// the cache. The kernel does not change under a running process, so there is
/// no invalidation.
///
/// Failed acquisitions are never cached; the next call tries again.
pub struct FetchOnce<S> {
    source: S,
    cell: OnceCell<VersionInfo>,
}

impl<S: ReleaseSource> FetchOnce<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached kernel version, acquiring it on the first call.
    pub fn version(&self) -> Result<VersionInfo, VersionError> {
        self.cell
            .get_or_try_init(|| self.source.version())
            .cloned()
    }
}

/// Caches the kernel version and re-acquires it once the entry is older than
/// the TTL.
pub struct TtlCache<S> {
    source: S,
    ttl: Duration,
    slot: Mutex<Option<Entry>>,
}

struct Entry {
    version: VersionInfo,
    refreshed_at: Instant,
}

impl<S: ReleaseSource> TtlCache<S> {
    /// Creates a cache with the default TTL of 60 seconds.
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached kernel version, re-acquiring it when the entry is
    /// missing or has outlived the TTL. A failed refresh returns the error
    /// and leaves the previous entry in place.
    pub fn version(&self) -> Result<VersionInfo, VersionError> {
        self.version_at(Instant::now())
    }

    fn version_at(&self, now: Instant) -> Result<VersionInfo, VersionError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref() {
            if now.duration_since(entry.refreshed_at) <= self.ttl {
                return Ok(entry.version.clone());
            }
            trace!("Cached kernel version older than {:?}, refreshing", self.ttl);
        }
        let version = self.source.version()?;
        *slot = Some(Entry {
            version: version.clone(),
            refreshed_at: now,
        });
        Ok(version)
    }
}

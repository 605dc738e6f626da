//! Per-source cache cell.
//!
//! # Responsibilities
//! - Own one source's cached record list and watermark
//! - Reload on demand, gated by the source's modification time
//! - Serve filtered and conditional reads without touching the filesystem
//!
//! # Design Decisions
//! - The record list and its watermark live in one `Arc<Snapshot>`, swapped
//!   atomically; a reader never observes a watermark that does not belong to
//!   the list it received
//! - Reads are lock-free and may overlap a refresh, observing either the
//!   pre- or post-refresh snapshot, never a mixture
//! - The watermark is monotonically non-decreasing for the lister's lifetime,
//!   even under clock skew or a source file replaced by an older copy

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::discovery::decoder::{self, DecodeError, DecodeFn};
use crate::discovery::filter::CompiledFilters;
use crate::discovery::types::{Filter, ListResponse, QueryError, Resource};

/// Errors produced while (re)loading a source. Non-fatal after the initial
/// load: the previous snapshot keeps serving.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// One immutable cache generation: a record list together with the watermark
/// it was loaded at. Replaced wholesale, never mutated in place.
struct Snapshot {
    resources: Vec<Resource>,
    last_modified: i64,
}

/// Refresh-side state. Guarded by a mutex so at most one refresh runs per
/// lister; readers never take it.
struct RefreshState {
    file_mtime: Option<SystemTime>,
}

/// Cache and refresh unit for a single source file.
pub struct Lister {
    path: PathBuf,
    decode: DecodeFn,
    disable_modified_time_check: bool,
    snapshot: ArcSwap<Snapshot>,
    refresh_state: Mutex<RefreshState>,
}

impl Lister {
    /// Create a lister and perform its initial load.
    ///
    /// There is no valid empty-cache state, so a failed first load fails
    /// construction.
    pub fn new(
        path: impl Into<PathBuf>,
        disable_modified_time_check: bool,
    ) -> Result<Self, RefreshError> {
        let path = path.into();
        let decode = decoder::for_path(&path).map_err(|source| RefreshError::Decode {
            path: path.clone(),
            source,
        })?;

        let lister = Self {
            decode,
            disable_modified_time_check,
            snapshot: ArcSwap::from_pointee(Snapshot {
                resources: Vec::new(),
                last_modified: 0,
            }),
            refresh_state: Mutex::new(RefreshState { file_mtime: None }),
            path,
        };
        lister.refresh()?;
        Ok(lister)
    }

    /// Reload the source if needed. Returns whether the cache was replaced.
    ///
    /// With modification-time gating enabled (the default), an unchanged
    /// mtime makes this a stat-only no-op, the common case on every poll
    /// cycle. On failure the previous snapshot and watermark stay untouched
    /// and the next cycle retries.
    pub fn refresh(&self) -> Result<bool, RefreshError> {
        let mut state = match self.refresh_state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let metadata = fs::metadata(&self.path).map_err(|source| RefreshError::Io {
            path: self.path.clone(),
            source,
        })?;
        let file_mtime = metadata.modified().map_err(|source| RefreshError::Io {
            path: self.path.clone(),
            source,
        })?;

        if !self.disable_modified_time_check && state.file_mtime == Some(file_mtime) {
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| RefreshError::Io {
            path: self.path.clone(),
            source,
        })?;
        let resources = (self.decode)(&content).map_err(|source| RefreshError::Decode {
            path: self.path.clone(),
            source,
        })?;

        let previous = self.snapshot.load().last_modified;
        let last_modified = if self.disable_modified_time_check {
            // Wall clock, clamped strictly past the previous watermark so
            // every forced reload advances it even under clock skew.
            unix_now().max(previous + 1)
        } else {
            unix_seconds(file_mtime).max(previous)
        };

        state.file_mtime = Some(file_mtime);
        self.snapshot.store(Arc::new(Snapshot {
            resources,
            last_modified,
        }));

        tracing::debug!(
            path = %self.path.display(),
            last_modified,
            "Source reloaded"
        );
        Ok(true)
    }

    /// Serve the cached snapshot.
    ///
    /// An `if_modified_since` at or past the current watermark means the
    /// caller's copy is still valid: the record list is omitted and only the
    /// watermark is returned. Pure read; never triggers a refresh.
    pub fn list_resources(
        &self,
        filters: &[Filter],
        if_modified_since: Option<i64>,
    ) -> Result<ListResponse, QueryError> {
        let snapshot = self.snapshot.load_full();

        if let Some(since) = if_modified_since {
            if since != 0 && since >= snapshot.last_modified {
                return Ok(ListResponse {
                    resources: Vec::new(),
                    last_modified: snapshot.last_modified,
                });
            }
        }

        let compiled = CompiledFilters::compile(filters)?;
        let resources = snapshot
            .resources
            .iter()
            .filter(|r| compiled.matches(r))
            .cloned()
            .collect();
        Ok(ListResponse {
            resources,
            last_modified: snapshot.last_modified,
        })
    }

    /// Matching records from the current snapshot, for callers that have
    /// already compiled the filter list.
    pub(crate) fn matching_resources(&self, filters: &CompiledFilters) -> Vec<Resource> {
        self.snapshot
            .load()
            .resources
            .iter()
            .filter(|r| filters.matches(r))
            .cloned()
            .collect()
    }

    /// Current watermark.
    pub fn last_modified(&self) -> i64 {
        self.snapshot.load().last_modified
    }

    /// Number of cached records.
    pub fn resource_count(&self) -> usize {
        self.snapshot.load().resources.len()
    }

    /// Configured source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn force_last_modified(&self, last_modified: i64) {
        let resources = self.snapshot.load().resources.clone();
        self.snapshot.store(Arc::new(Snapshot {
            resources,
            last_modified,
        }));
    }
}

fn unix_now() -> i64 {
    unix_seconds(SystemTime::now())
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

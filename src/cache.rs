use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scan::{ContributionRecord, WalkState};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode cache: {0}")]
    Encode(serde_json::Error),

    #[error("no cache found at {0}; run with --scan first")]
    Missing(PathBuf),
}

/// On-disk shape of the per-organization cache: the record map keyed by full
/// name (ordered, which gives the report its sort), plus the persisted walk
/// position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheData {
    pub repositories: BTreeMap<String, ContributionRecord>,
    #[serde(flatten)]
    pub walk: WalkState,
}

/// Handle to the per-organization cache file. Opened explicitly and flushed
/// explicitly; injected into the scan and report paths rather than reached
/// for as ambient state. One process owns the file for the duration of a
/// run; concurrent writers are not supported.
pub struct CacheStore {
    path: PathBuf,
    data: CacheData,
}

impl CacheStore {
    pub fn cache_path(org: &str) -> PathBuf {
        PathBuf::from(format!(".cache-{org}.json"))
    }

    /// Open the cache for an organization, starting empty if none exists.
    pub fn open(org: &str) -> Result<Self, CacheError> {
        Self::open_at(Self::cache_path(org))
    }

    /// Open an existing cache; report mode refuses to invent an empty one.
    pub fn open_existing(org: &str) -> Result<Self, CacheError> {
        let path = Self::cache_path(org);
        if !path.exists() {
            return Err(CacheError::Missing(path));
        }
        Self::open_at(path)
    }

    pub fn open_at(path: PathBuf) -> Result<Self, CacheError> {
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| CacheError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => CacheData::default(),
            Err(source) => return Err(CacheError::Read { path, source }),
        };
        Ok(Self { path, data })
    }

    pub fn data(&self) -> &CacheData {
        &self.data
    }

    pub fn repositories(&self) -> &BTreeMap<String, ContributionRecord> {
        &self.data.repositories
    }

    pub fn walk_state(&self) -> WalkState {
        self.data.walk.clone()
    }

    pub fn set_walk_state(&mut self, state: WalkState) {
        self.data.walk = state;
    }

    /// Add or overwrite a record; entries are never removed automatically.
    pub fn insert(&mut self, record: ContributionRecord) {
        self.data
            .repositories
            .insert(record.full_name.clone(), record);
    }

    /// Write the current state back to disk.
    pub fn flush(&self) -> Result<(), CacheError> {
        let text = serde_json::to_string_pretty(&self.data).map_err(CacheError::Encode)?;
        fs::write(&self.path, text).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            repositories = self.data.repositories.len(),
            "cache flushed"
        );
        Ok(())
    }
}

//! Single-entry report cache on disk.
//!
//! The file holds a [`CachedReport`] record. Files written by older versions hold a
//! bare JSON string; those are still honoured, with the file mtime standing in for
//! the capture time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedReport {
    pub report: String,
    pub captured_at: DateTime<Utc>,
    /// See [`crate::ReportConfig::query_fingerprint`].
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CacheFile {
    Record(CachedReport),
    Legacy(String),
}

#[derive(Debug, Clone)]
pub struct ReportCache {
    path: PathBuf,
    ttl: Duration,
}

impl ReportCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached report if it is fresh and was built for `query`.
    pub fn load(&self, query: &str) -> Option<String> {
        self.load_at(query, Utc::now())
    }

    /// Any problem reading the file counts as a miss.
    pub fn load_at(&self, query: &str, now: DateTime<Utc>) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable cache file");
                return None;
            }
        };

        let entry: CacheFile = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring malformed cache file");
                return None;
            }
        };

        let (report, captured_at) = match entry {
            CacheFile::Record(record) => {
                if record.query != query {
                    debug!(cached = %record.query, current = %query, "cache built for other settings");
                    return None;
                }
                (record.report, record.captured_at)
            }
            CacheFile::Legacy(report) => match self.modified() {
                Ok(modified) => (report, modified),
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "cannot read cache mtime");
                    return None;
                }
            },
        };

        if self.is_fresh(captured_at, now) {
            debug!(path = %self.path.display(), %captured_at, "cache hit");
            Some(report)
        } else {
            debug!(path = %self.path.display(), %captured_at, "cache expired");
            None
        }
    }

    /// Overwrite the cache file, creating parent directories as needed.
    pub fn store(&self, query: &str, report: &str) -> Result<(), ReportError> {
        self.store_at(query, report, Utc::now())
    }

    pub fn store_at(
        &self,
        query: &str,
        report: &str,
        captured_at: DateTime<Utc>,
    ) -> Result<(), ReportError> {
        let record = CachedReport {
            report: report.to_string(),
            captured_at,
            query: query.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ReportError::Cache(format!(
                    "Failed to create cache directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string(&record)
            .map_err(|err| ReportError::Cache(format!("Failed to encode cache record: {err}")))?;

        fs::write(&self.path, json).map_err(|err| {
            ReportError::Cache(format!(
                "Failed to write cache file {}: {err}",
                self.path.display()
            ))
        })
    }

    /// A capture time in the future is never fresh.
    fn is_fresh(&self, captured_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(captured_at)
            .to_std()
            .map(|age| age < self.ttl)
            .unwrap_or(false)
    }

    fn modified(&self) -> io::Result<DateTime<Utc>> {
        let modified = fs::metadata(&self.path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

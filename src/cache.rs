use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::error::CacheError;
use crate::project::Project;
use crate::task::Task;

/// The snapshot collections kept in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Tasks,
    Projects,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Projects => "projects",
        }
    }

    fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// On-disk document for one collection. The timestamp and the items share a
/// file so replacing one always replaces the other.
#[derive(Serialize)]
struct SnapshotOut<'a, T> {
    updated_at: String,
    items: &'a [T],
}

#[derive(Deserialize)]
struct SnapshotIn<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct SnapshotMeta {
    #[serde(default)]
    updated_at: Option<String>,
}

/// Last-known task and project snapshots plus their freshness timestamps.
///
/// The gateway only answers freshness questions and moves snapshots in and
/// out of disk. It never talks to the remote service.
#[derive(Debug, Clone)]
pub struct CacheGateway {
    dir: PathBuf,
}

impl CacheGateway {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Time of the last successful save, if one is recorded and parsable.
    pub fn last_updated(&self, collection: Collection) -> Option<DateTime<Utc>> {
        let contents = std::fs::read_to_string(self.path(collection)).ok()?;
        let meta: SnapshotMeta = match serde_json::from_str(&contents) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "unreadable cache metadata");
                return None;
            }
        };
        let stamp = meta.updated_at?;
        match DateTime::parse_from_rfc3339(&stamp) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(collection = %collection, value = %stamp, error = %e, "unparsable cache timestamp");
                None
            }
        }
    }

    pub fn is_stale(&self, collection: Collection, max_age: Duration) -> bool {
        self.is_stale_at(collection, max_age, Utc::now())
    }

    /// A collection is stale when it has no usable timestamp or the
    /// timestamp is older than `max_age` at `now`.
    pub fn is_stale_at(&self, collection: Collection, max_age: Duration, now: DateTime<Utc>) -> bool {
        let Some(updated) = self.last_updated(collection) else {
            return true;
        };
        let max_age = match chrono::Duration::from_std(max_age) {
            Ok(d) => d,
            Err(_) => return false,
        };
        now.signed_duration_since(updated) > max_age
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>, CacheError> {
        self.load(Collection::Tasks)
    }

    pub fn load_projects(&self) -> Result<Vec<Project>, CacheError> {
        self.load(Collection::Projects)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), CacheError> {
        self.save_at(Collection::Tasks, tasks, Utc::now())
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<(), CacheError> {
        self.save_at(Collection::Projects, projects, Utc::now())
    }

    /// Read a snapshot. A collection that was never saved loads as empty.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, CacheError> {
        let path = self.path(collection);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let snapshot: SnapshotIn<T> = serde_json::from_str(&contents)
            .map_err(|source| CacheError::Parse { path: path.clone(), source })?;

        tracing::debug!(collection = %collection, count = snapshot.items.len(), "loaded cache snapshot");
        Ok(snapshot.items)
    }

    /// Replace a snapshot and its timestamp in one atomic rename.
    pub fn save_at<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
        updated_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let doc = SnapshotOut {
            updated_at: updated_at.to_rfc3339(),
            items,
        };
        let body = serde_json::to_vec(&doc).map_err(|source| CacheError::Serialize {
            collection: collection.name(),
            source,
        })?;

        let path = self.path(collection);
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp.write_all(&body).map_err(io_err)?;
        temp.flush().map_err(io_err)?;
        temp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(collection = %collection, count = items.len(), "saved cache snapshot");
        Ok(())
    }
}

//! Association map persistence.
//!
//! Persists a `uuid -> [int]` map to a single JSON file. Every write replaces
//! the whole file: the new content goes to `<file>.tmp` first and is renamed
//! over the target, so readers only ever see a complete document. Writers in
//! this process are serialized by `write_lock`; separate processes sharing the
//! file still race, last rename wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Caller-defined bookkeeping keyed by task uuid.
pub type AssociationMap = BTreeMap<String, Vec<i64>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize association map: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AssociationStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AssociationStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted map. A missing file is an empty map.
    pub async fn read(&self) -> Result<AssociationMap, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AssociationMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the persisted map with `map`.
    pub async fn write(&self, map: &AssociationMap) -> Result<(), StoreError> {
        let data = serde_json::to_vec(map)?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(parent, source))?;
        }
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, data)
            .await
            .map_err(|source| self.io_error(&tmp_path, source))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| self.io_error(&self.path, source))?;
        tracing::debug!("Saved {} associations to {}", map.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample() -> AssociationMap {
        let mut map = AssociationMap::new();
        map.insert("abc-uuid".to_string(), vec![1, 2, 3]);
        map.insert("def-uuid".to_string(), vec![]);
        map
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = AssociationStore::new(temp.path().join("task_data.json"));
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_then_read_returns_same_map() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = AssociationStore::new(temp.path().join("task_data.json"));
        store.write(&sample()).await.unwrap();
        assert_eq!(store.read().await.unwrap(), sample());
        assert!(!temp.path().join("task_data.json.tmp").exists());
    }

    #[tokio::test]
    async fn write_replaces_instead_of_merging() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = AssociationStore::new(temp.path().join("task_data.json"));
        store.write(&sample()).await.unwrap();

        let mut replacement = AssociationMap::new();
        replacement.insert("other".to_string(), vec![-7]);
        store.write(&replacement).await.unwrap();

        assert_eq!(store.read().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn writes_plain_json_object() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("task_data.json");
        let store = AssociationStore::new(path.clone());
        store.write(&sample()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"abc-uuid": [1, 2, 3], "def-uuid": []})
        );
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = AssociationStore::new(temp.path().join("nested/dir/map.json"));
        store.write(&sample()).await.unwrap();
        assert_eq!(store.read().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("task_data.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = AssociationStore::new(path);
        assert!(matches!(store.read().await, Err(StoreError::Parse { .. })));

        std::fs::write(store.path(), r#"{"abc": "not a list"}"#).unwrap();
        assert!(matches!(store.read().await, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn concurrent_writers_leave_one_complete_map() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(AssociationStore::new(temp.path().join("task_data.json")));

        let mut handles = Vec::new();
        for i in 0..16i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut map = AssociationMap::new();
                map.insert(format!("writer-{}", i), vec![i; 50]);
                store.write(&map).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let map = store.read().await.unwrap();
        assert_eq!(map.len(), 1);
        let (key, values) = map.into_iter().next().unwrap();
        let i: i64 = key.trim_start_matches("writer-").parse().unwrap();
        assert_eq!(values, vec![i; 50]);
    }
}

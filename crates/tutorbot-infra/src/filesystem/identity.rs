//! JSON file identity store.
//!
//! The mapping lives in one flat JSON object, `{ "<display name>": "<uuid>" }`.
//! Every registration rewrites the whole file: read, insert, write to a
//! sibling temp file, rename over the original. Writes within this process
//! are serialized by a mutex; concurrent writers in other processes can still
//! lose each other's updates.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use tutorbot_core::identity::store::IdentityStore;
use tutorbot_types::error::IdentityWarning;
use tutorbot_types::session::SessionId;

type NameMap = BTreeMap<String, String>;

/// `IdentityStore` backed by a JSON file on disk.
#[derive(Clone)]
pub struct JsonIdentityStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current map. An absent file is an empty map.
    async fn read_map(&self) -> Result<NameMap, IdentityWarning> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(NameMap::new()),
            Err(e) => return Err(IdentityWarning::Read(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(NameMap::new());
        }

        serde_json::from_str(&content).map_err(|e| IdentityWarning::Parse(e.to_string()))
    }

    async fn write_map(&self, map: &NameMap) -> Result<(), IdentityWarning> {
        let json =
            serde_json::to_string_pretty(map).map_err(|e| IdentityWarning::Write(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IdentityWarning::Write(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| IdentityWarning::Write(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| IdentityWarning::Write(e.to_string()))
    }
}

impl IdentityStore for JsonIdentityStore {
    async fn register(&self, name: &str, session_id: &SessionId) -> Result<(), IdentityWarning> {
        let _guard = self.write_lock.lock().await;

        // A file we cannot parse is left untouched rather than replaced.
        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Identity file unreadable, name not registered");
                return Err(e);
            }
        };

        map.insert(name.to_string(), session_id.to_string());

        if let Err(e) = self.write_map(&map).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write identity file");
            return Err(e);
        }

        debug!(session_id = %session_id, entries = map.len(), "Name registered");
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Option<SessionId> {
        let map = match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Identity file unreadable, treating name as absent");
                return None;
            }
        };

        let raw = map.get(name)?;
        match raw.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Identity entry holds an invalid session id");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonIdentityStore {
        JsonIdentityStore::new(dir.path().join("user_data.json"))
    }

    /// Number of names in the file on disk.
    fn entry_count(store: &JsonIdentityStore) -> usize {
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value.as_object().unwrap().len()
    }

    #[tokio::test]
    async fn test_absent_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.lookup("alice").await, None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_register_then_lookup() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let id = SessionId::new();

        store.register("alice", &id).await.unwrap();
        assert_eq!(store.lookup("alice").await, Some(id));

        // A second store over the same file sees the mapping.
        let reopened = JsonIdentityStore::new(store.path());
        assert_eq!(reopened.lookup("alice").await, Some(id));
    }

    #[tokio::test]
    async fn test_register_preserves_other_entries() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let alice = SessionId::new();
        let bob = SessionId::new();

        store.register("alice", &alice).await.unwrap();
        store.register("bob", &bob).await.unwrap();

        assert_eq!(store.lookup("alice").await, Some(alice));
        assert_eq!(store.lookup("bob").await, Some(bob));
        assert_eq!(entry_count(&store), 2);
    }

    #[tokio::test]
    async fn test_register_overwrites_same_name() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let first = SessionId::new();
        let second = SessionId::new();

        store.register("alice", &first).await.unwrap();
        store.register("alice", &second).await.unwrap();

        assert_eq!(store.lookup("alice").await, Some(second));
        assert_eq!(entry_count(&store), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.register("Alice", &SessionId::new()).await.unwrap();
        assert_eq!(store.lookup("alice").await, None);
    }

    #[tokio::test]
    async fn test_file_is_flat_json_object() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let id = SessionId::new();
        store.register("carol", &id).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["carol"], id.to_string());
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_absent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.lookup("alice").await, None);

        let result = store.register("alice", &SessionId::new()).await;
        assert!(matches!(result, Err(IdentityWarning::Parse(_))));

        // The unreadable file is not replaced.
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[tokio::test]
    async fn test_register_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonIdentityStore::new(dir.path().join("nested").join("user_data.json"));
        let id = SessionId::new();
        store.register("dave", &id).await.unwrap();
        assert_eq!(store.lookup("dave").await, Some(id));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.register(&format!("user{i}"), &SessionId::new()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(entry_count(&store), 8);
    }
}

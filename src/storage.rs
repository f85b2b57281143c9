//! Session storage: a small key-value slot store for draft persistence.
//!
//! Each session keeps its slots in its own directory under the storage root:
//!
//! ```text
//! <root>/<session>/
//!   casebot-case-draft-v2.json   # One file per key
//! ```
//!
//! Callers treat the store as a capability: any operation may fail, and
//! the draft layer on top decides what a failure means.

pub mod draft;

use std::cell::RefCell;
use std::collections::HashMap;
use std::{fs, io, path::PathBuf};

pub use draft::DraftStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A key-value store whose operations are allowed to fail.
pub trait SessionStore {
    /// Reads a slot. A missing slot is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a slot. Idempotent.
    fn delete(&self, key: &str) -> Result<()>;
}

/// File-backed store: one `<key>.json` per slot in a session directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given session directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn slot(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot(key)?) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.slot(key)?, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.slot(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store. Lives exactly as long as the session that owns it.
#[derive(Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("sessions").join("default")).unwrap();
        (dir, store)
    }

    #[test]
    fn set_and_get_slot() {
        let (_dir, store) = test_store();

        store.set("draft", r#"{"a":1}"#).unwrap();

        assert_eq!(store.get("draft").unwrap().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn get_missing_slot_is_none() {
        let (_dir, store) = test_store();
        assert!(store.get("draft").unwrap().is_none());
    }

    #[test]
    fn set_overwrites() {
        let (_dir, store) = test_store();

        store.set("draft", "first").unwrap();
        store.set("draft", "second").unwrap();

        assert_eq!(store.get("draft").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn delete_removes_file() {
        let (dir, store) = test_store();

        store.set("draft", "x").unwrap();
        store.delete("draft").unwrap();

        let path = dir
            .path()
            .join("sessions")
            .join("default")
            .join("draft.json");
        assert!(!path.exists());
        assert!(store.get("draft").unwrap().is_none());
    }

    #[test]
    fn delete_idempotent() {
        let (_dir, store) = test_store();

        // Delete with no file should not error.
        store.delete("draft").unwrap();
    }

    #[test]
    fn rejects_path_like_keys() {
        let (_dir, store) = test_store();

        for key in ["../escape", "a/b", "", "dot.ted"] {
            let err = store.set(key, "x").unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key: {key:?}");
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();

        store.set("draft", "x").unwrap();
        assert_eq!(store.get("draft").unwrap().as_deref(), Some("x"));

        store.delete("draft").unwrap();
        store.delete("draft").unwrap();
        assert!(store.get("draft").unwrap().is_none());
    }
}

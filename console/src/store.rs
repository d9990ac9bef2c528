//! Session slots persisted as a JSON object in the state directory.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use payroll_core::{Storage, StorageError};

const FILE_NAME: &str = "session.json";

pub struct FileStorage {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or lazily create) the slot file under `dir`.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(FILE_NAME);
        let slots = match fs::read_to_string(&path) {
            Ok(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(e.to_string()))?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, slots })
    }

    /// Discard whatever is stored under `dir` and start empty.
    pub fn reset(dir: &Path) -> Result<Self, StorageError> {
        let storage = Self {
            path: dir.join(FILE_NAME),
            slots: BTreeMap::new(),
        };
        storage.flush()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if self.slots.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let raw = serde_json::to_string_pretty(&self.slots)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.slots.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("nested");

        let mut storage = FileStorage::open(&state).unwrap();
        storage.set("token", "abc").unwrap();
        storage.set("user", r#"{"username":"hr","role":"HR"}"#).unwrap();

        let reopened = FileStorage::open(&state).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert!(reopened.get("missing").unwrap().is_none());
    }

    #[test]
    fn removing_the_last_slot_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "abc").unwrap();
        assert!(storage.path().exists());

        storage.remove("token").unwrap();
        assert!(!storage.path().exists());
        storage.remove("token").unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "not json").unwrap();
        assert!(matches!(
            FileStorage::open(dir.path()),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn reset_discards_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "not json").unwrap();

        let storage = FileStorage::reset(dir.path()).unwrap();
        assert!(!storage.path().exists());
        assert!(storage.get("token").unwrap().is_none());
        assert!(FileStorage::open(dir.path()).is_ok());
    }
}

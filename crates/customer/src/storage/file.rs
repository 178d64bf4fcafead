//! File-backed storage backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{DurableStorage, StorageError, StorageOp, apply_ops};

/// Storage kept in a single JSON object file.
///
/// Every batch is a read-modify-write that ends in a temp-file-then-rename,
/// so readers see either the old or the new set of keys. The file holds
/// credentials and is created readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// File name used inside the client state directory.
    pub const FILE_NAME: &'static str = "storage.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        atomic_write(&self.path, &content).map_err(|e| self.io_error(e))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        apply_ops(&mut entries, ops);
        self.store(&entries)?;
        tracing::debug!(path = %self.path.display(), ops = ops.len(), "Storage batch applied");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store(&BTreeMap::new())?;
        tracing::debug!(path = %self.path.display(), "Storage cleared");
        Ok(())
    }
}

fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("storage.json");
    let tmp_path = dir.join(format!(
        ".{file_name}.tmp.{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));

    let result = (|| -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        if let Ok(parent) = fs::File::open(dir) {
            let _ = parent.sync_all();
        }
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());

        assert_eq!(storage.get("token").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_survive_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::in_dir(dir.path())
            .apply(&[StorageOp::set("token", "tok-abc"), StorageOp::set("apiKey", "key-xyz")])
            .unwrap();

        let reopened = FileStorage::in_dir(dir.path());
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("tok-abc"));
        assert_eq!(reopened.get("apiKey").unwrap().as_deref(), Some("key-xyz"));
    }

    #[test]
    fn test_creates_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().join("nested").join("state"));

        storage.set("token", "tok").unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "[1, 2").unwrap();

        assert!(matches!(
            storage.get("token"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_clear_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "[1, 2").unwrap();

        storage.clear().unwrap();
        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "tok-abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("tok-abc"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(FileStorage::FILE_NAME)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        storage.set("token", "tok").unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

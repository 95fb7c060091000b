//! File-backed persistence for the simulator.
//!
//! Each key is one file in a directory: `<key>.int` holds a little-endian
//! `i32`, `<key>.bin` holds a raw blob. Writing one kind removes the other so
//! a key never holds both.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use watchface_common::storage::{MAX_VALUE_BYTES, PersistentStorage, StorageError};

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn int_path(
        &self,
        key: u32,
    ) -> PathBuf {
        self.dir.join(format!("{key}.int"))
    }

    fn data_path(
        &self,
        key: u32,
    ) -> PathBuf {
        self.dir.join(format!("{key}.bin"))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::Io,
    })
}

fn remove_file(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::Io),
        _ => Ok(()),
    }
}

impl PersistentStorage for FileStorage {
    fn exists(
        &self,
        key: u32,
    ) -> bool {
        self.int_path(key).is_file() || self.data_path(key).is_file()
    }

    fn read_int(
        &self,
        key: u32,
    ) -> Result<i32, StorageError> {
        let bytes = read_file(&self.int_path(key))?;
        let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| StorageError::Io)?;
        Ok(i32::from_le_bytes(raw))
    }

    fn write_int(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), StorageError> {
        remove_file(&self.data_path(key))?;
        fs::write(self.int_path(key), value.to_le_bytes()).map_err(|_| StorageError::Io)
    }

    fn read_data(
        &self,
        key: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let bytes = read_file(&self.data_path(key))?;
        let dst = buf.get_mut(..bytes.len()).ok_or(StorageError::BufferTooSmall)?;
        dst.copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    fn write_data(
        &mut self,
        key: u32,
        data: &[u8],
    ) -> Result<usize, StorageError> {
        if data.len() > MAX_VALUE_BYTES {
            return Err(StorageError::ValueTooLarge);
        }
        remove_file(&self.int_path(key))?;
        fs::write(self.data_path(key), data).map_err(|_| StorageError::Io)?;
        Ok(data.len())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use watchface_common::config::{PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION};
    use watchface_common::{Dictionary, PrefKey, PrefsStore};

    /// Fresh directory unique to this process and test.
    fn scratch(name: &str) -> FileStorage {
        let dir = std::env::temp_dir().join(format!("urchin-sim-test-{}-{name}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        FileStorage::open(dir).unwrap()
    }

    #[test]
    fn test_int_and_data_round_trip() {
        let mut storage = scratch("round-trip");
        assert!(!storage.exists(0));
        assert_eq!(storage.read_int(0), Err(StorageError::NotFound));

        storage.write_int(0, -42).unwrap();
        assert_eq!(storage.read_int(0), Ok(-42));

        storage.write_data(1, &[9, 8, 7]).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(storage.read_data(1, &mut buf), Ok(3));
        assert_eq!(&buf[..3], &[9, 8, 7]);

        let mut small = [0u8; 2];
        assert_eq!(storage.read_data(1, &mut small), Err(StorageError::BufferTooSmall));
        fs::remove_dir_all(storage.dir()).ok();
    }

    #[test]
    fn test_write_replaces_other_kind() {
        let mut storage = scratch("replace");
        storage.write_int(3, 1).unwrap();
        storage.write_data(3, &[1]).unwrap();
        assert_eq!(storage.read_int(3), Err(StorageError::NotFound));
        assert!(storage.exists(3));
        fs::remove_dir_all(storage.dir()).ok();
    }

    #[test]
    fn test_value_too_large() {
        let mut storage = scratch("too-large");
        let big = vec![0u8; MAX_VALUE_BYTES + 1];
        assert_eq!(storage.write_data(1, &big), Err(StorageError::ValueTooLarge));
        fs::remove_dir_all(storage.dir()).ok();
    }

    #[test]
    fn test_prefs_survive_reopen() {
        let storage = scratch("prefs");
        let dir = storage.dir().to_path_buf();

        let mut store = PrefsStore::init(storage);
        store.set(&Dictionary::new().with_uint(PrefKey::TopOfGraph, 300).unwrap());
        drop(store.deinit());

        let reopened = FileStorage::open(&dir).unwrap();
        assert_eq!(reopened.read_int(PERSIST_KEY_VERSION), Ok(PREFERENCES_SCHEMA_VERSION));
        let store = PrefsStore::init(reopened);
        assert_eq!(store.get().top_of_graph, 300);
        fs::remove_dir_all(&dir).ok();
    }
}

//! Owner of the live [`Preferences`] and their persisted copy.
//!
//! # Lifecycle
//!
//! 1. [`PrefsStore::init`] at startup: load the stored blob if its schema
//!    version matches, otherwise fall back to defaults.
//! 2. [`PrefsStore::set`] whenever the companion app sends new settings.
//! 3. [`PrefsStore::deinit`] at shutdown: write everything back.
//!
//! Loading and saving never surface errors to the caller; failures are
//! logged and the watch keeps running with what it has.

use super::Preferences;
use super::message::Dictionary;
use crate::config::{PERSIST_KEY_PREFERENCES_OBJECT, PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION};
use crate::storage::{MAX_VALUE_BYTES, PersistentStorage, StorageError};

/// The live preferences plus the storage they persist to.
pub struct PrefsStore<S: PersistentStorage> {
    storage: S,
    prefs: Preferences,
}

impl<S: PersistentStorage> PrefsStore<S> {
    /// Load preferences from `storage`, or use defaults.
    pub fn init(storage: S) -> Self {
        let prefs = load(&storage).unwrap_or_default();
        Self { storage, prefs }
    }

    /// Persist the current preferences and release the storage.
    pub fn deinit(mut self) -> S {
        if let Err(e) = self.save() {
            warn!("failed to persist preferences: {}", e);
        }
        self.storage
    }

    /// The live preferences.
    #[inline]
    pub const fn get(&self) -> &Preferences { &self.prefs }

    /// Apply an inbound "set preferences" message.
    pub fn set(
        &mut self,
        message: &Dictionary,
    ) {
        self.prefs.apply_message(message);
        info!("preferences updated ({} keys)", message.len());
    }

    /// Write the schema version and blob.
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.storage.write_int(PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION)?;
        self.storage
            .write_data(PERSIST_KEY_PREFERENCES_OBJECT, &self.prefs.to_bytes())?;
        debug!("preferences saved (schema {})", PREFERENCES_SCHEMA_VERSION);
        Ok(())
    }

    /// Storage backend, e.g. for inspection.
    #[inline]
    pub const fn storage(&self) -> &S { &self.storage }
}

/// Stored preferences, if present and written by the current schema.
fn load<S: PersistentStorage>(storage: &S) -> Option<Preferences> {
    if !storage.exists(PERSIST_KEY_VERSION) {
        info!("no stored preferences, using defaults");
        return None;
    }

    let version = storage.read_int(PERSIST_KEY_VERSION).ok()?;
    if version != PREFERENCES_SCHEMA_VERSION {
        info!(
            "stored preferences schema {} != {}, using defaults",
            version, PREFERENCES_SCHEMA_VERSION
        );
        return None;
    }

    let mut buf = [0u8; MAX_VALUE_BYTES];
    let len = match storage.read_data(PERSIST_KEY_PREFERENCES_OBJECT, &mut buf) {
        Ok(len) => len,
        Err(e) => {
            warn!("failed to read preferences: {}", e);
            return None;
        }
    };

    match Preferences::from_bytes(&buf[..len]) {
        Ok(prefs) => {
            info!("loaded preferences (schema {})", version);
            Some(prefs)
        }
        Err(e) => {
            warn!("stored preferences unreadable: {}", e);
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::GREEN;
    use crate::prefs::{Bits, PrefKey, RecencyStyle, TimeAlign};
    use crate::storage::MemoryStorage;

    fn customized() -> Preferences {
        let mut prefs = Preferences::default();
        prefs.mmol = true;
        prefs.top_of_graph = 360;
        prefs.point_margin = -1;
        prefs.basal_height = Bits::wrapping(30);
        prefs.time_align = TimeAlign::Left.into();
        prefs.recency_style = RecencyStyle::LargeRing.into();
        prefs.colors[3] = GREEN;
        prefs.set_num_elements(2);
        prefs
    }

    fn store_with(prefs: Preferences) -> PrefsStore<MemoryStorage> {
        PrefsStore {
            storage: MemoryStorage::new(),
            prefs,
        }
    }

    /// Storage that rejects every write.
    struct ReadOnly(MemoryStorage);

    impl PersistentStorage for ReadOnly {
        fn exists(
            &self,
            key: u32,
        ) -> bool {
            self.0.exists(key)
        }

        fn read_int(
            &self,
            key: u32,
        ) -> Result<i32, StorageError> {
            self.0.read_int(key)
        }

        fn write_int(
            &mut self,
            _key: u32,
            _value: i32,
        ) -> Result<(), StorageError> {
            Err(StorageError::Io)
        }

        fn read_data(
            &self,
            key: u32,
            buf: &mut [u8],
        ) -> Result<usize, StorageError> {
            self.0.read_data(key, buf)
        }

        fn write_data(
            &mut self,
            _key: u32,
            _data: &[u8],
        ) -> Result<usize, StorageError> {
            Err(StorageError::Io)
        }
    }

    #[test]
    fn test_init_empty_storage_uses_defaults() {
        let store = PrefsStore::init(MemoryStorage::new());
        assert_eq!(store.get(), &Preferences::default());
    }

    #[test]
    fn test_save_then_init_round_trip() {
        let storage = store_with(customized()).deinit();
        assert_eq!(storage.read_int(PERSIST_KEY_VERSION), Ok(PREFERENCES_SCHEMA_VERSION));

        let store = PrefsStore::init(storage);
        assert_eq!(store.get(), &customized());
    }

    #[test]
    fn test_version_mismatch_uses_defaults() {
        let mut storage = store_with(customized()).deinit();
        storage.write_int(PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION - 1).unwrap();

        let store = PrefsStore::init(storage);
        assert_eq!(store.get(), &Preferences::default());
    }

    #[test]
    #[cfg(not(feature = "defmt"))]
    fn test_version_mismatch_is_logged() {
        use crate::log::{Level, capture};

        let mut storage = store_with(customized()).deinit();
        storage.write_int(PERSIST_KEY_VERSION, 12).unwrap();
        capture::take();

        PrefsStore::init(storage);
        assert!(capture::logged(Level::Info, "schema 12 != 13, using defaults"));
    }

    #[test]
    fn test_future_version_uses_defaults() {
        let mut storage = store_with(customized()).deinit();
        storage.write_int(PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION + 1).unwrap();
        assert_eq!(PrefsStore::init(storage).get(), &Preferences::default());
    }

    #[test]
    fn test_missing_blob_uses_defaults() {
        let mut storage = store_with(customized()).deinit();
        storage.remove(PERSIST_KEY_PREFERENCES_OBJECT);
        assert_eq!(PrefsStore::init(storage).get(), &Preferences::default());
    }

    #[test]
    fn test_truncated_blob_uses_defaults() {
        let mut storage = MemoryStorage::new();
        storage.write_int(PERSIST_KEY_VERSION, PREFERENCES_SCHEMA_VERSION).unwrap();
        let blob = customized().to_bytes();
        storage
            .write_data(PERSIST_KEY_PREFERENCES_OBJECT, &blob[..blob.len() - 4])
            .unwrap();
        assert_eq!(PrefsStore::init(storage).get(), &Preferences::default());
    }

    #[test]
    fn test_set_then_persist() {
        let mut store = PrefsStore::init(MemoryStorage::new());
        let msg = Dictionary::new()
            .with_uint(PrefKey::TopOfGraph, 280)
            .and_then(|d| d.with_uint(PrefKey::BasalHeight, 40))
            .unwrap();
        store.set(&msg);
        assert_eq!(store.get().top_of_graph, 280);
        assert_eq!(store.get().basal_height.get(), 40 % 32);

        let reloaded = PrefsStore::init(store.deinit());
        assert_eq!(reloaded.get().top_of_graph, 280);
        assert_eq!(reloaded.get().basal_height.get(), 8);
    }

    #[test]
    fn test_set_does_not_write_until_saved() {
        let mut store = PrefsStore::init(MemoryStorage::new());
        store.set(&Dictionary::new().with_uint(PrefKey::Mmol, 1).unwrap());
        assert!(store.storage().is_empty());

        store.save().unwrap();
        assert_eq!(store.storage().len(), 2);
    }

    #[test]
    fn test_deinit_write_failure_is_swallowed() {
        let store = PrefsStore {
            storage: ReadOnly(MemoryStorage::new()),
            prefs: customized(),
        };
        let storage = store.deinit();
        assert!(!storage.exists(PERSIST_KEY_VERSION));
        #[cfg(not(feature = "defmt"))]
        assert!(crate::log::capture::logged(
            crate::log::Level::Warn,
            "failed to persist preferences: storage I/O error"
        ));
    }

    #[test]
    fn test_save_reports_error() {
        let mut store = PrefsStore::init(ReadOnly(MemoryStorage::new()));
        assert_eq!(store.save(), Err(StorageError::Io));
    }

    #[test]
    fn test_borrowed_storage() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = PrefsStore::init(&mut storage);
            store.set(&Dictionary::new().with_uint(PrefKey::HGridlines, 25).unwrap());
            store.deinit();
        }
        assert_eq!(PrefsStore::init(storage).get().h_gridlines, 25);
    }
}

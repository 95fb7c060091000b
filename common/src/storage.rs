//! Key-value persistence.
//!
//! [`PersistentStorage`] mirrors the watch's persist API: small integers and
//! short byte blobs under `u32` keys. The watch provides the real backend;
//! [`MemoryStorage`] is a fixed-capacity in-memory one for tests and tools.

use core::fmt;

use heapless::{LinearMap, Vec};

/// Longest blob a single key can hold.
pub const MAX_VALUE_BYTES: usize = 256;

/// Keys a [`MemoryStorage`] can hold.
pub const MEMORY_STORAGE_KEYS: usize = 16;

// =============================================================================
// Errors
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No value of the requested kind under this key.
    NotFound,
    /// The stored blob is longer than the caller's buffer.
    BufferTooSmall,
    /// The blob exceeds [`MAX_VALUE_BYTES`].
    ValueTooLarge,
    /// No room for another key.
    Full,
    /// The backend failed to read or write.
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let msg = match self {
            Self::NotFound => "key not found",
            Self::BufferTooSmall => "stored value larger than buffer",
            Self::ValueTooLarge => "value exceeds storage limit",
            Self::Full => "storage full",
            Self::Io => "storage I/O error",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for StorageError {}

// =============================================================================
// Storage Trait
// =============================================================================

/// Durable key-value storage.
pub trait PersistentStorage {
    /// Whether any value is stored under `key`.
    fn exists(
        &self,
        key: u32,
    ) -> bool;

    fn read_int(
        &self,
        key: u32,
    ) -> Result<i32, StorageError>;

    fn write_int(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), StorageError>;

    /// Copy the blob under `key` into `buf`, returning its length.
    fn read_data(
        &self,
        key: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;

    /// Store `data` under `key`, returning the number of bytes written.
    fn write_data(
        &mut self,
        key: u32,
        data: &[u8],
    ) -> Result<usize, StorageError>;
}

impl<S: PersistentStorage + ?Sized> PersistentStorage for &mut S {
    fn exists(
        &self,
        key: u32,
    ) -> bool {
        (**self).exists(key)
    }

    fn read_int(
        &self,
        key: u32,
    ) -> Result<i32, StorageError> {
        (**self).read_int(key)
    }

    fn write_int(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), StorageError> {
        (**self).write_int(key, value)
    }

    fn read_data(
        &self,
        key: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        (**self).read_data(key, buf)
    }

    fn write_data(
        &mut self,
        key: u32,
        data: &[u8],
    ) -> Result<usize, StorageError> {
        (**self).write_data(key, data)
    }
}

// =============================================================================
// In-Memory Backend
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Value {
    Int(i32),
    Data(Vec<u8, MAX_VALUE_BYTES>),
}

/// Fixed-capacity storage held in RAM.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: LinearMap<u32, Value, MEMORY_STORAGE_KEYS>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self { values: LinearMap::new() } }

    /// Remove `key`, returning whether it existed.
    pub fn remove(
        &mut self,
        key: u32,
    ) -> bool {
        self.values.remove(&key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize { self.values.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    fn put(
        &mut self,
        key: u32,
        value: Value,
    ) -> Result<(), StorageError> {
        self.values.insert(key, value).map(|_| ()).map_err(|_| StorageError::Full)
    }
}

impl PersistentStorage for MemoryStorage {
    fn exists(
        &self,
        key: u32,
    ) -> bool {
        self.values.contains_key(&key)
    }

    fn read_int(
        &self,
        key: u32,
    ) -> Result<i32, StorageError> {
        match self.values.get(&key) {
            Some(Value::Int(v)) => Ok(*v),
            _ => Err(StorageError::NotFound),
        }
    }

    fn write_int(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), StorageError> {
        self.put(key, Value::Int(value))
    }

    fn read_data(
        &self,
        key: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        match self.values.get(&key) {
            Some(Value::Data(data)) if data.len() > buf.len() => Err(StorageError::BufferTooSmall),
            Some(Value::Data(data)) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            _ => Err(StorageError::NotFound),
        }
    }

    fn write_data(
        &mut self,
        key: u32,
        data: &[u8],
    ) -> Result<usize, StorageError> {
        let blob = Vec::from_slice(data).map_err(|_| StorageError::ValueTooLarge)?;
        self.put(key, Value::Data(blob))?;
        Ok(data.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

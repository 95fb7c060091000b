//! Compile-time configuration for the watchface.
//!
//! All values are `const` with compile-time assertions where ordering or
//! bounds matter. If a constant is changed to something inconsistent
//! (e.g. a layout that no longer fits the element bitfield), compilation
//! fails instead of corrupting persisted preferences.

// =============================================================================
// Persistent Storage
// =============================================================================

/// Storage key holding the schema version of the persisted preferences.
pub const PERSIST_KEY_VERSION: u32 = 0;

/// Storage key holding the bit-packed preferences blob.
pub const PERSIST_KEY_PREFERENCES_OBJECT: u32 = 1;

/// Current preferences schema version.
///
/// Bump whenever a field is added, removed, reordered or resized. A stored
/// blob written under any other version is ignored and defaults are used.
pub const PREFERENCES_SCHEMA_VERSION: i32 = 13;

const _: () = assert!(PERSIST_KEY_VERSION != PERSIST_KEY_PREFERENCES_OBJECT);

// =============================================================================
// Layout Schema Bounds
// =============================================================================

/// Number of distinct layout elements (graph, sidebar, status bar, time area, BG row).
pub const MAX_LAYOUT_ELEMENTS: usize = 5;

/// Bytes per element in the inbound layout byte array.
pub const NUM_ELEMENT_PROPERTIES: usize = 7;

/// Number of configurable colors.
pub const NUM_COLOR_KEYS: usize = 6;

/// Width of the `num_elements` bitfield.
pub const NUM_ELEMENTS_BITS: u32 = 3;

/// Width of the per-element kind bitfield.
pub const ELEMENT_KIND_BITS: u32 = 3;

// The element count and kind must both fit their bitfields
const _: () = assert!(MAX_LAYOUT_ELEMENTS <= 1 << NUM_ELEMENTS_BITS);
const _: () = assert!(MAX_LAYOUT_ELEMENTS <= 1 << ELEMENT_KIND_BITS);

// =============================================================================
// Persisted Blob Size
// =============================================================================

/// Packed size of one `ElementConfig`: kind + w + h + three flags.
pub const ELEMENT_CONFIG_BITS: usize = ELEMENT_KIND_BITS as usize + 8 + 8 + 3;

/// Packed size of the whole preferences record, in bits.
pub const PREFS_BITS: usize = 113 // scalar fields up to and including num_elements
    + MAX_LAYOUT_ELEMENTS * ELEMENT_CONFIG_BITS
    + NUM_COLOR_KEYS * 8
    + 8 + 16 + 3; // status thresholds and recency format

/// Size of the persisted preferences blob in bytes.
pub const PREFS_BLOB_LEN: usize = PREFS_BITS.div_ceil(8);

// Host key-value persistence caps a single value at 256 bytes
const _: () = assert!(PREFS_BLOB_LEN <= 256);

// =============================================================================
// Display
// =============================================================================

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 144;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 168;

/// Trend arrow icons are square.
pub const TREND_ARROW_WIDTH: u32 = 25;

const _: () = assert!(TREND_ARROW_WIDTH < SCREEN_WIDTH);

// =============================================================================
// Unit Tests
// =============================================================================

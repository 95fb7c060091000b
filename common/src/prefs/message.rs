//! Inbound "set preferences" message.
//!
//! The companion app sends one dictionary with a key per preference
//! property. Keys are positional: [`PrefKey`] must list properties in the
//! same order as the companion app's property constants.
//!
//! Decoding never fails. Each field is truncated to its width (see
//! [`super::bits`]); missing keys leave the field untouched; short byte
//! arrays read their missing bytes as zero.

use heapless::{LinearMap, Vec};

use super::bits::{Bits, truncate};
use super::options::{BitEnum, ElementProperty, EnumBits};
use super::{ElementConfig, Preferences};
use crate::colors::GColor;
use crate::config::{MAX_LAYOUT_ELEMENTS, NUM_COLOR_KEYS, NUM_ELEMENT_PROPERTIES};

/// Largest byte array a single tuple can carry.
pub const MAX_TUPLE_BYTES: usize = 64;

/// Most keys a dictionary can hold.
pub const MAX_DICT_ENTRIES: usize = 32;

const _: () = assert!(MAX_TUPLE_BYTES >= MAX_LAYOUT_ELEMENTS * NUM_ELEMENT_PROPERTIES);
const _: () = assert!(MAX_DICT_ENTRIES >= PrefKey::COUNT);

// =============================================================================
// Keys
// =============================================================================

/// Message key for each preference property, in wire order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum PrefKey {
    Mmol = 0,
    TopOfGraph = 1,
    TopOfRange = 2,
    BottomOfRange = 3,
    BottomOfGraph = 4,
    HGridlines = 5,
    BatteryAsNumber = 6,
    BasalGraph = 7,
    BasalHeight = 8,
    UpdateEveryMinute = 9,
    TimeAlign = 10,
    BatteryLoc = 11,
    ConnStatusLoc = 12,
    RecencyLoc = 13,
    RecencyStyle = 14,
    PointShape = 15,
    PointRectHeight = 16,
    PointWidth = 17,
    PointMargin = 18,
    PointRightMargin = 19,
    PlotLine = 20,
    PlotLineWidth = 21,
    PlotLineIsCustomColor = 22,
    NumElements = 23,
    Elements = 24,
    Colors = 25,
    StatusMinRecencyToShowMinutes = 26,
    StatusMaxAgeMinutes = 27,
    StatusRecencyFormat = 28,
}

impl PrefKey {
    pub const COUNT: usize = 29;

    #[inline]
    pub const fn key(self) -> u32 { self as u32 }
}

impl From<PrefKey> for u32 {
    fn from(key: PrefKey) -> Self { key.key() }
}

// =============================================================================
// Tuples and Dictionary
// =============================================================================

/// A typed message value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Tuple {
    Uint(u32),
    Int(i32),
    Bytes(Vec<u8, MAX_TUPLE_BYTES>),
}

impl Tuple {
    /// Byte array tuple; `None` if `data` is longer than [`MAX_TUPLE_BYTES`].
    pub fn bytes(data: &[u8]) -> Option<Self> { Vec::from_slice(data).ok().map(Self::Bytes) }

    /// Value as an unsigned integer. Signed values are reinterpreted; byte
    /// arrays read their first four bytes little-endian.
    pub fn as_u32(&self) -> u32 {
        match self {
            Self::Uint(v) => *v,
            Self::Int(v) => *v as u32,
            Self::Bytes(data) => {
                let mut raw = [0u8; 4];
                for (dst, src) in raw.iter_mut().zip(data.iter()) {
                    *dst = *src;
                }
                u32::from_le_bytes(raw)
            }
        }
    }

    /// Value as a signed integer, reinterpreting unsigned values.
    #[inline]
    pub fn as_i32(&self) -> i32 { self.as_u32() as i32 }

    /// Byte payload; integers carry none.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(data) => data.as_slice(),
            Self::Uint(_) | Self::Int(_) => &[],
        }
    }
}

/// Returned when a dictionary has no room for another key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DictionaryFull;

/// An inbound message: integer keys mapped to typed tuples.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    entries: LinearMap<u32, Tuple, MAX_DICT_ENTRIES>,
}

impl Dictionary {
    pub fn new() -> Self { Self { entries: LinearMap::new() } }

    /// Insert or replace a tuple.
    pub fn insert(
        &mut self,
        key: impl Into<u32>,
        value: Tuple,
    ) -> Result<(), DictionaryFull> {
        self.entries.insert(key.into(), value).map(|_| ()).map_err(|_| DictionaryFull)
    }

    /// Builder-style insert of an unsigned value.
    pub fn with_uint(
        mut self,
        key: impl Into<u32>,
        value: u32,
    ) -> Result<Self, DictionaryFull> {
        self.insert(key, Tuple::Uint(value))?;
        Ok(self)
    }

    /// Builder-style insert of a signed value.
    pub fn with_int(
        mut self,
        key: impl Into<u32>,
        value: i32,
    ) -> Result<Self, DictionaryFull> {
        self.insert(key, Tuple::Int(value))?;
        Ok(self)
    }

    /// Builder-style insert of a byte array. Data past [`MAX_TUPLE_BYTES`] is dropped.
    pub fn with_bytes(
        mut self,
        key: impl Into<u32>,
        data: &[u8],
    ) -> Result<Self, DictionaryFull> {
        let len = data.len().min(MAX_TUPLE_BYTES);
        let tuple = Tuple::bytes(&data[..len]).unwrap_or(Tuple::Bytes(Vec::new()));
        self.insert(key, tuple)?;
        Ok(self)
    }

    pub fn get(
        &self,
        key: impl Into<u32>,
    ) -> Option<&Tuple> {
        let key: u32 = key.into();
        self.entries.get(&key)
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn uint(
        &self,
        key: PrefKey,
    ) -> Option<u32> {
        self.get(key).map(Tuple::as_u32)
    }
}

// =============================================================================
// Decoding into Preferences
// =============================================================================

fn assign_bool(
    field: &mut bool,
    value: Option<u32>,
) {
    if let Some(v) = value {
        *field = v != 0;
    }
}

fn assign_u8(
    field: &mut u8,
    value: Option<u32>,
) {
    if let Some(v) = value {
        *field = truncate(v, 8) as u8;
    }
}

fn assign_u16(
    field: &mut u16,
    value: Option<u32>,
) {
    if let Some(v) = value {
        *field = truncate(v, 16) as u16;
    }
}

fn assign_bits<const N: u32>(
    field: &mut Bits<N>,
    value: Option<u32>,
) {
    if let Some(v) = value {
        *field = Bits::wrapping(v);
    }
}

fn assign_enum<E: BitEnum>(
    field: &mut EnumBits<E>,
    value: Option<u32>,
    key: PrefKey,
) {
    if let Some(v) = value {
        *field = EnumBits::wrapping(v);
        if field.get().is_none() {
            warn!("pref key {} stores unknown option {}", key.key(), field.raw());
        }
    }
}

/// Decode one element from its `NUM_ELEMENT_PROPERTIES`-byte record.
fn decode_element(record: &[u8]) -> ElementConfig {
    let byte = |prop: ElementProperty| record.get(prop as usize).copied().unwrap_or(0);
    ElementConfig {
        el: EnumBits::wrapping(u32::from(byte(ElementProperty::Type))),
        w: byte(ElementProperty::Width),
        h: byte(ElementProperty::Height),
        black: byte(ElementProperty::Black) != 0,
        bottom: byte(ElementProperty::Bottom) != 0,
        right: byte(ElementProperty::Right) != 0,
    }
}

impl Preferences {
    /// Overwrite fields from an inbound message.
    ///
    /// Every present key replaces its field after width truncation. Nothing
    /// is validated beyond that and nothing is reported.
    pub fn apply_message(
        &mut self,
        msg: &Dictionary,
    ) {
        assign_bool(&mut self.mmol, msg.uint(PrefKey::Mmol));
        assign_u16(&mut self.top_of_graph, msg.uint(PrefKey::TopOfGraph));
        assign_u16(&mut self.top_of_range, msg.uint(PrefKey::TopOfRange));
        assign_u8(&mut self.bottom_of_range, msg.uint(PrefKey::BottomOfRange));
        assign_u8(&mut self.bottom_of_graph, msg.uint(PrefKey::BottomOfGraph));
        assign_u8(&mut self.h_gridlines, msg.uint(PrefKey::HGridlines));
        assign_bool(&mut self.battery_as_number, msg.uint(PrefKey::BatteryAsNumber));
        assign_bool(&mut self.basal_graph, msg.uint(PrefKey::BasalGraph));
        assign_bits(&mut self.basal_height, msg.uint(PrefKey::BasalHeight));
        assign_bool(&mut self.update_every_minute, msg.uint(PrefKey::UpdateEveryMinute));
        assign_enum(&mut self.time_align, msg.uint(PrefKey::TimeAlign), PrefKey::TimeAlign);
        assign_enum(&mut self.battery_loc, msg.uint(PrefKey::BatteryLoc), PrefKey::BatteryLoc);
        assign_enum(&mut self.conn_status_loc, msg.uint(PrefKey::ConnStatusLoc), PrefKey::ConnStatusLoc);
        assign_enum(&mut self.recency_loc, msg.uint(PrefKey::RecencyLoc), PrefKey::RecencyLoc);
        assign_enum(&mut self.recency_style, msg.uint(PrefKey::RecencyStyle), PrefKey::RecencyStyle);
        assign_enum(&mut self.point_shape, msg.uint(PrefKey::PointShape), PrefKey::PointShape);
        assign_bits(&mut self.point_rect_height, msg.uint(PrefKey::PointRectHeight));
        assign_bits(&mut self.point_width, msg.uint(PrefKey::PointWidth));
        if let Some(t) = msg.get(PrefKey::PointMargin) {
            self.point_margin = t.as_i32() as i8;
        }
        assign_bits(&mut self.point_right_margin, msg.uint(PrefKey::PointRightMargin));
        assign_bool(&mut self.plot_line, msg.uint(PrefKey::PlotLine));
        assign_bits(&mut self.plot_line_width, msg.uint(PrefKey::PlotLineWidth));
        assign_bool(&mut self.plot_line_is_custom_color, msg.uint(PrefKey::PlotLineIsCustomColor));
        if let Some(count) = msg.uint(PrefKey::NumElements) {
            self.set_num_elements(count);
        }
        if let Some(t) = msg.get(PrefKey::Elements) {
            self.apply_elements(t.as_bytes());
        }
        if let Some(t) = msg.get(PrefKey::Colors) {
            let data = t.as_bytes();
            for (i, color) in self.colors.iter_mut().enumerate() {
                *color = GColor(data.get(i).copied().unwrap_or(0));
            }
        }
        assign_u8(
            &mut self.status_min_recency_to_show_minutes,
            msg.uint(PrefKey::StatusMinRecencyToShowMinutes),
        );
        assign_u16(&mut self.status_max_age_minutes, msg.uint(PrefKey::StatusMaxAgeMinutes));
        assign_enum(
            &mut self.status_recency_format,
            msg.uint(PrefKey::StatusRecencyFormat),
            PrefKey::StatusRecencyFormat,
        );
    }

    fn apply_elements(
        &mut self,
        data: &[u8],
    ) {
        let count = self.num_elements();
        for (i, element) in self.elements.iter_mut().enumerate() {
            *element = if i < count {
                let start = (i * NUM_ELEMENT_PROPERTIES).min(data.len());
                let end = (start + NUM_ELEMENT_PROPERTIES).min(data.len());
                decode_element(&data[start..end])
            } else {
                ElementConfig::default()
            };
        }
        debug!("applied {} layout elements from {} bytes", count, data.len());
    }
}

const _: () = assert!(NUM_COLOR_KEYS <= MAX_TUPLE_BYTES);

// =============================================================================
// Unit Tests
// =============================================================================

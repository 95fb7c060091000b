//! Bit-packed persisted form of [`Preferences`].
//!
//! Fields are packed LSB-first in declaration order, each at exactly its
//! declared width, so the blob is [`PREFS_BLOB_LEN`] bytes. The layout is
//! tied to [`PREFERENCES_SCHEMA_VERSION`]: any change here needs a bump.
//!
//! [`PREFERENCES_SCHEMA_VERSION`]: crate::config::PREFERENCES_SCHEMA_VERSION

use core::fmt;

use super::bits::{BitReader, BitWriter, Bits};
use super::options::{BitEnum, EnumBits};
use super::{ElementConfig, Preferences};
use crate::colors::GColor;
use crate::config::{MAX_LAYOUT_ELEMENTS, PREFS_BITS, PREFS_BLOB_LEN};

/// Why a persisted blob could not be decoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Blob length differs from [`PREFS_BLOB_LEN`].
    WrongLength { expected: usize, found: usize },
    /// A field holds a value the record cannot represent.
    InvalidField(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::WrongLength { expected, found } => {
                write!(f, "preferences blob is {found} bytes, expected {expected}")
            }
            Self::InvalidField(name) => write!(f, "invalid value in preferences field `{name}`"),
        }
    }
}

impl core::error::Error for DecodeError {}

// =============================================================================
// Encoding
// =============================================================================

fn write_enum<E: BitEnum>(
    w: &mut BitWriter<'_>,
    value: EnumBits<E>,
) {
    w.write(u32::from(value.raw()), E::BITS);
}

fn write_bits<const N: u32>(
    w: &mut BitWriter<'_>,
    value: Bits<N>,
) {
    w.write(u32::from(value.get()), Bits::<N>::width());
}

fn write_element(
    w: &mut BitWriter<'_>,
    element: &ElementConfig,
) {
    write_enum(w, element.el);
    w.write(u32::from(element.w), 8);
    w.write(u32::from(element.h), 8);
    w.write_bool(element.black);
    w.write_bool(element.bottom);
    w.write_bool(element.right);
}

impl Preferences {
    /// Pack into the persisted blob.
    pub fn to_bytes(&self) -> [u8; PREFS_BLOB_LEN] {
        let mut buf = [0u8; PREFS_BLOB_LEN];
        let mut w = BitWriter::new(&mut buf);

        w.write_bool(self.mmol);
        w.write(u32::from(self.top_of_graph), 16);
        w.write(u32::from(self.top_of_range), 16);
        w.write(u32::from(self.bottom_of_range), 8);
        w.write(u32::from(self.bottom_of_graph), 8);
        w.write(u32::from(self.h_gridlines), 8);
        w.write_bool(self.battery_as_number);
        w.write_bool(self.basal_graph);
        write_bits(&mut w, self.basal_height);
        w.write_bool(self.update_every_minute);
        write_enum(&mut w, self.time_align);
        write_enum(&mut w, self.battery_loc);
        write_enum(&mut w, self.conn_status_loc);
        write_enum(&mut w, self.recency_loc);
        write_enum(&mut w, self.recency_style);
        write_enum(&mut w, self.point_shape);
        write_bits(&mut w, self.point_rect_height);
        write_bits(&mut w, self.point_width);
        w.write(u32::from(self.point_margin as u8), 8);
        write_bits(&mut w, self.point_right_margin);
        w.write_bool(self.plot_line);
        write_bits(&mut w, self.plot_line_width);
        w.write_bool(self.plot_line_is_custom_color);
        write_bits(&mut w, self.num_elements);
        for element in &self.elements {
            write_element(&mut w, element);
        }
        for color in &self.colors {
            w.write(u32::from(color.argb()), 8);
        }
        w.write(u32::from(self.status_min_recency_to_show_minutes), 8);
        w.write(u32::from(self.status_max_age_minutes), 16);
        write_enum(&mut w, self.status_recency_format);

        debug_assert_eq!(w.position(), PREFS_BITS);
        buf
    }

    /// Unpack a blob produced by [`Preferences::to_bytes`].
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != PREFS_BLOB_LEN {
            return Err(DecodeError::WrongLength {
                expected: PREFS_BLOB_LEN,
                found: buf.len(),
            });
        }
        let mut r = BitReader::new(buf);

        let mmol = r.read_bool();
        let top_of_graph = r.read(16) as u16;
        let top_of_range = r.read(16) as u16;
        let bottom_of_range = r.read(8) as u8;
        let bottom_of_graph = r.read(8) as u8;
        let h_gridlines = r.read(8) as u8;
        let battery_as_number = r.read_bool();
        let basal_graph = r.read_bool();
        let basal_height = read_bits(&mut r);
        let update_every_minute = r.read_bool();
        let time_align = read_enum(&mut r);
        let battery_loc = read_enum(&mut r);
        let conn_status_loc = read_enum(&mut r);
        let recency_loc = read_enum(&mut r);
        let recency_style = read_enum(&mut r);
        let point_shape = read_enum(&mut r);
        let point_rect_height = read_bits(&mut r);
        let point_width = read_bits(&mut r);
        let point_margin = r.read(8) as u8 as i8;
        let point_right_margin = read_bits(&mut r);
        let plot_line = r.read_bool();
        let plot_line_width = read_bits(&mut r);
        let plot_line_is_custom_color = r.read_bool();
        let num_elements: Bits<3> = read_bits(&mut r);
        if num_elements.get() as usize > MAX_LAYOUT_ELEMENTS {
            return Err(DecodeError::InvalidField("num_elements"));
        }

        let mut elements = [ElementConfig::default(); MAX_LAYOUT_ELEMENTS];
        for element in &mut elements {
            *element = read_element(&mut r);
        }

        let mut colors = [GColor(0); crate::config::NUM_COLOR_KEYS];
        for color in &mut colors {
            *color = GColor(r.read(8) as u8);
        }

        let status_min_recency_to_show_minutes = r.read(8) as u8;
        let status_max_age_minutes = r.read(16) as u16;
        let status_recency_format = read_enum(&mut r);

        Ok(Self {
            mmol,
            top_of_graph,
            top_of_range,
            bottom_of_range,
            bottom_of_graph,
            h_gridlines,
            battery_as_number,
            basal_graph,
            basal_height,
            update_every_minute,
            time_align,
            battery_loc,
            conn_status_loc,
            recency_loc,
            recency_style,
            point_shape,
            point_rect_height,
            point_width,
            point_margin,
            point_right_margin,
            plot_line,
            plot_line_width,
            plot_line_is_custom_color,
            num_elements,
            elements,
            colors,
            status_min_recency_to_show_minutes,
            status_max_age_minutes,
            status_recency_format,
        })
    }
}

// =============================================================================
// Decoding Helpers
// =============================================================================

fn read_enum<E: BitEnum>(r: &mut BitReader<'_>) -> EnumBits<E> { EnumBits::wrapping(r.read(E::BITS)) }

fn read_bits<const N: u32>(r: &mut BitReader<'_>) -> Bits<N> { Bits::wrapping(r.read(Bits::<N>::width())) }

fn read_element(r: &mut BitReader<'_>) -> ElementConfig {
    ElementConfig {
        el: read_enum(r),
        w: r.read(8) as u8,
        h: r.read(8) as u8,
        black: r.read_bool(),
        bottom: r.read_bool(),
        right: r.read_bool(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, GREEN};
    use crate::prefs::{ElementKind, PointShape, RecencyLoc, RecencyStyle, StatusRecencyFormat, TimeAlign};

    fn customized() -> Preferences {
        let mut prefs = Preferences::default();
        prefs.mmol = true;
        prefs.top_of_graph = 400;
        prefs.top_of_range = 180;
        prefs.bottom_of_range = 80;
        prefs.bottom_of_graph = 39;
        prefs.h_gridlines = 0;
        prefs.battery_as_number = true;
        prefs.basal_graph = true;
        prefs.basal_height = Bits::wrapping(31);
        prefs.update_every_minute = true;
        prefs.time_align = TimeAlign::Right.into();
        prefs.recency_loc = RecencyLoc::TimeBottomRight.into();
        prefs.recency_style = RecencyStyle::LargeNoCircle.into();
        prefs.point_shape = PointShape::Circle.into();
        prefs.point_width = Bits::wrapping(5);
        prefs.point_margin = -2;
        prefs.plot_line = true;
        prefs.plot_line_width = Bits::wrapping(15);
        prefs.set_num_elements(5);
        prefs.elements[4] = ElementConfig::new(ElementKind::BgRow, 255, 17).black().bottom().right();
        prefs.colors[0] = GREEN;
        prefs.colors[5] = BLUE;
        prefs.status_min_recency_to_show_minutes = 255;
        prefs.status_max_age_minutes = 65535;
        prefs.status_recency_format = StatusRecencyFormat::BracketRight.into();
        prefs
    }

    #[test]
    fn test_blob_is_exact_size() {
        let blob = Preferences::default().to_bytes();
        assert_eq!(blob.len(), PREFS_BLOB_LEN);
    }

    #[test]
    fn test_default_round_trip() {
        let prefs = Preferences::default();
        assert_eq!(Preferences::from_bytes(&prefs.to_bytes()), Ok(prefs));
    }

    #[test]
    fn test_customized_round_trip() {
        let prefs = customized();
        let decoded = Preferences::from_bytes(&prefs.to_bytes()).unwrap();
        assert_eq!(decoded, prefs);
        assert_eq!(decoded.point_margin, -2);
        assert_eq!(decoded.elements().len(), 5);
    }

    #[test]
    fn test_different_prefs_different_blobs() {
        assert_ne!(Preferences::default().to_bytes(), customized().to_bytes());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let blob = Preferences::default().to_bytes();
        assert_eq!(
            Preferences::from_bytes(&blob[..PREFS_BLOB_LEN - 1]),
            Err(DecodeError::WrongLength {
                expected: PREFS_BLOB_LEN,
                found: PREFS_BLOB_LEN - 1,
            })
        );
        assert!(Preferences::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_unknown_enum_bits_survive_reload() {
        // time_align occupies bits 65..=66, right after update_every_minute
        let mut blob = Preferences::default().to_bytes();
        blob[8] |= 0b0000_0110;
        let decoded = Preferences::from_bytes(&blob).unwrap();
        assert_eq!(decoded.time_align.raw(), 3);
        assert_eq!(decoded.time_align.get(), None);
        // The rest of the record is intact
        assert_eq!(decoded.top_of_graph, Preferences::default().top_of_graph);
        assert_eq!(decoded.to_bytes(), blob);
    }

    #[test]
    fn test_unknown_values_round_trip() {
        let mut prefs = customized();
        prefs.time_align = EnumBits::wrapping(7);
        prefs.recency_style = EnumBits::wrapping(15);
        prefs.elements[0].el = EnumBits::wrapping(6);

        let decoded = Preferences::from_bytes(&prefs.to_bytes()).unwrap();
        assert_eq!(decoded, prefs);
        assert_eq!(decoded.time_align.raw(), 3);
        assert_eq!(decoded.recency_style.raw(), 7);
        assert_eq!(decoded.elements[0].el.raw(), 6);
        assert_ne!(decoded.elements[0].el, ElementKind::Graph);
    }

    #[test]
    fn test_num_elements_past_table_rejected() {
        let blob = [0xFFu8; PREFS_BLOB_LEN];
        assert_eq!(Preferences::from_bytes(&blob), Err(DecodeError::InvalidField("num_elements")));
    }
}

//! User preferences: schema, persistence and inbound configuration.
//!
//! - `bits`: fixed-width fields and the bit-level reader/writer
//! - `options`: enumerated option sets and their field widths
//! - `codec`: the bit-packed persisted blob
//! - `message`: the inbound "set preferences" dictionary
//! - `store`: load/save against the watch's key-value storage
//!
//! # Field Widths
//!
//! Every field has a declared width (see [`config::PREFS_BITS`]). Values that
//! arrive wider than their field are truncated, never rejected. See
//! [`bits`] for the policy. Enum fields keep their truncated raw bits in an
//! [`EnumBits`] even when those bits name no option.
//!
//! [`config::PREFS_BITS`]: crate::config::PREFS_BITS

pub mod bits;
mod codec;
pub mod message;
pub mod options;
mod store;

pub use bits::Bits;
pub use codec::DecodeError;
pub use message::{Dictionary, PrefKey, Tuple};
pub use options::{
    BatteryLoc,
    BitEnum,
    ColorKey,
    ConnStatusLoc,
    ElementKind,
    ElementProperty,
    EnumBits,
    PointShape,
    RecencyLoc,
    RecencyStyle,
    StatusRecencyFormat,
    TimeAlign,
};
pub use store::PrefsStore;

use crate::colors::{BLACK, GColor, ORANGE, RED};
use crate::config::{MAX_LAYOUT_ELEMENTS, NUM_COLOR_KEYS};

// =============================================================================
// Element Config
// =============================================================================

/// Placement and style of one layout element.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementConfig {
    /// Element kind (3-bit field).
    pub el: EnumBits<ElementKind>,
    /// Width in pixels.
    pub w: u8,
    /// Height in pixels.
    pub h: u8,
    /// Draw with inverted colors (white on black).
    pub black: bool,
    /// Draw a border along the bottom edge.
    pub bottom: bool,
    /// Draw a border along the right edge.
    pub right: bool,
}

impl ElementConfig {
    pub fn new(
        el: ElementKind,
        w: u8,
        h: u8,
    ) -> Self {
        Self {
            el: el.into(),
            w,
            h,
            black: false,
            bottom: false,
            right: false,
        }
    }

    pub const fn black(mut self) -> Self {
        self.black = true;
        self
    }

    pub const fn bottom(mut self) -> Self {
        self.bottom = true;
        self
    }

    pub const fn right(mut self) -> Self {
        self.right = true;
        self
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// Everything the user can configure, in persisted field order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Preferences {
    /// Display glucose in mmol/L instead of mg/dL.
    pub mmol: bool,
    pub top_of_graph: u16,
    pub top_of_range: u16,
    pub bottom_of_range: u8,
    pub bottom_of_graph: u8,
    /// Spacing between horizontal gridlines, in mg/dL. 0 disables them.
    pub h_gridlines: u8,
    pub battery_as_number: bool,
    pub basal_graph: bool,
    pub basal_height: Bits<5>,
    pub update_every_minute: bool,
    pub time_align: EnumBits<TimeAlign>,
    pub battery_loc: EnumBits<BatteryLoc>,
    pub conn_status_loc: EnumBits<ConnStatusLoc>,
    pub recency_loc: EnumBits<RecencyLoc>,
    pub recency_style: EnumBits<RecencyStyle>,
    pub point_shape: EnumBits<PointShape>,
    pub point_rect_height: Bits<5>,
    pub point_width: Bits<5>,
    /// Gap between points; negative values overlap them.
    pub point_margin: i8,
    pub point_right_margin: Bits<5>,
    pub plot_line: bool,
    pub plot_line_width: Bits<4>,
    pub plot_line_is_custom_color: bool,
    num_elements: Bits<3>,
    pub elements: [ElementConfig; MAX_LAYOUT_ELEMENTS],
    pub colors: [GColor; NUM_COLOR_KEYS],
    pub status_min_recency_to_show_minutes: u8,
    pub status_max_age_minutes: u16,
    pub status_recency_format: EnumBits<StatusRecencyFormat>,
}

impl Preferences {
    /// Number of meaningful entries in `elements`.
    #[inline]
    pub const fn num_elements(&self) -> usize { self.num_elements.get() as usize }

    /// Set the element count, truncating to the 3-bit field and then clamping
    /// to [`MAX_LAYOUT_ELEMENTS`].
    ///
    /// Returns the count actually stored.
    pub fn set_num_elements(
        &mut self,
        value: u32,
    ) -> usize {
        let truncated = Bits::<3>::wrapping(value);
        let count = (truncated.get() as usize).min(MAX_LAYOUT_ELEMENTS);
        if count != truncated.get() as usize {
            warn!("num_elements {} clamped to {}", truncated.get(), count);
        }
        self.num_elements = Bits::wrapping(count as u32);
        count
    }

    /// The meaningful prefix of `elements`.
    #[inline]
    pub fn elements(&self) -> &[ElementConfig] { &self.elements[..self.num_elements()] }

    /// First enabled element of the given kind. Elements whose kind bits
    /// name no kind never match.
    pub fn element(
        &self,
        kind: ElementKind,
    ) -> Option<&ElementConfig> {
        self.elements().iter().find(|e| e.el == kind)
    }

    #[inline]
    pub const fn color(
        &self,
        key: ColorKey,
    ) -> GColor {
        self.colors[key.index()]
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mmol: false,
            top_of_graph: 250,
            top_of_range: 200,
            bottom_of_range: 70,
            bottom_of_graph: 40,
            h_gridlines: 50,
            battery_as_number: false,
            basal_graph: false,
            basal_height: Bits::wrapping(12),
            update_every_minute: false,
            time_align: EnumBits::default(),
            battery_loc: EnumBits::default(),
            conn_status_loc: EnumBits::default(),
            recency_loc: EnumBits::default(),
            recency_style: EnumBits::default(),
            point_shape: EnumBits::default(),
            point_rect_height: Bits::wrapping(3),
            point_width: Bits::wrapping(3),
            point_margin: 1,
            point_right_margin: Bits::wrapping(10),
            plot_line: false,
            plot_line_width: Bits::wrapping(2),
            plot_line_is_custom_color: false,
            num_elements: Bits::wrapping(4),
            elements: [
                ElementConfig::new(ElementKind::StatusBar, 144, 40).bottom(),
                ElementConfig::new(ElementKind::Graph, 119, 72),
                ElementConfig::new(ElementKind::Sidebar, 25, 72),
                ElementConfig::new(ElementKind::TimeArea, 144, 56).black(),
                ElementConfig::default(),
            ],
            colors: [BLACK, ORANGE, RED, BLACK, BLACK, BLACK],
            status_min_recency_to_show_minutes: 0,
            status_max_age_minutes: 60,
            status_recency_format: EnumBits::default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_element_count() {
        let prefs = Preferences::default();
        assert_eq!(prefs.num_elements(), 4);
        assert_eq!(prefs.elements().len(), 4);
        assert_eq!(prefs.elements()[0].el, ElementKind::StatusBar);
    }

    #[test]
    fn test_default_sidebar_fits_trend_arrow() {
        let prefs = Preferences::default();
        let sidebar = prefs.element(ElementKind::Sidebar).unwrap();
        assert!(u32::from(sidebar.w) >= crate::config::TREND_ARROW_WIDTH);
    }

    #[test]
    fn test_element_lookup_ignores_unused_slots() {
        let mut prefs = Preferences::default();
        prefs.elements[4] = ElementConfig::new(ElementKind::BgRow, 144, 20);
        assert!(prefs.element(ElementKind::BgRow).is_none());

        prefs.set_num_elements(5);
        assert!(prefs.element(ElementKind::BgRow).is_some());
    }

    #[test]
    fn test_set_num_elements_truncates_then_clamps() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.set_num_elements(3), 3);
        // 3-bit field: 9 mod 8 = 1
        assert_eq!(prefs.set_num_elements(9), 1);
        // 7 fits the field but exceeds the element table
        assert_eq!(prefs.set_num_elements(7), MAX_LAYOUT_ELEMENTS);
        assert_eq!(prefs.elements().len(), MAX_LAYOUT_ELEMENTS);
        assert_eq!(prefs.set_num_elements(0), 0);
        assert!(prefs.elements().is_empty());
    }

    #[test]
    fn test_color_lookup() {
        let prefs = Preferences::default();
        assert_eq!(prefs.color(ColorKey::PointHigh), ORANGE);
        assert_eq!(prefs.color(ColorKey::PointLow), RED);
        assert_eq!(prefs.color(ColorKey::RecencyText), BLACK);
    }

    #[test]
    fn test_element_builders() {
        let e = ElementConfig::new(ElementKind::Graph, 10, 20).black().right();
        assert!(e.black);
        assert!(e.right);
        assert!(!e.bottom);
    }
}

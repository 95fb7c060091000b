//! Watch color model.
//!
//! The watch stores colors as a single byte, 2 bits per channel:
//!
//! ```text
//!   bit  7 6 | 5 4 | 3 2 | 1 0
//!        A   | R   | G   | B
//! ```
//!
//! That is the format preferences carry over the wire and in storage.
//! Drawing goes through `embedded_graphics` in `Rgb565`, so each 2-bit
//! channel is scaled up to 5/6/5 bits on conversion.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// An 8-bit ARGB color (`0bAARRGGBB`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GColor(pub u8);

impl GColor {
    /// Build an opaque color from 2-bit channels. Channel values are masked to 2 bits.
    pub const fn from_rgb(
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self(0b1100_0000 | (r & 0b11) << 4 | (g & 0b11) << 2 | (b & 0b11))
    }

    /// Raw `0bAARRGGBB` byte.
    #[inline]
    pub const fn argb(self) -> u8 { self.0 }

    #[inline]
    pub const fn alpha(self) -> u8 { self.0 >> 6 }

    #[inline]
    pub const fn red(self) -> u8 { (self.0 >> 4) & 0b11 }

    #[inline]
    pub const fn green(self) -> u8 { (self.0 >> 2) & 0b11 }

    #[inline]
    pub const fn blue(self) -> u8 { self.0 & 0b11 }

    /// Fully transparent colors are skipped when drawing.
    #[inline]
    pub const fn is_clear(self) -> bool { self.alpha() == 0 }

    /// Convert to the display's `Rgb565`, scaling each channel to full range.
    pub const fn to_rgb565(self) -> Rgb565 {
        Rgb565::new(
            scale_channel(self.red(), Rgb565::MAX_R),
            scale_channel(self.green(), Rgb565::MAX_G),
            scale_channel(self.blue(), Rgb565::MAX_B),
        )
    }
}

impl From<GColor> for Rgb565 {
    fn from(color: GColor) -> Self { color.to_rgb565() }
}

/// Scale a 2-bit channel (0..=3) to `0..=max`.
#[inline]
const fn scale_channel(
    value: u8,
    max: u8,
) -> u8 {
    ((value as u16 * max as u16) / 3) as u8
}

/// Invert an `Rgb565` color channel by channel.
#[inline]
pub fn invert_rgb565(color: Rgb565) -> Rgb565 {
    Rgb565::new(
        Rgb565::MAX_R - color.r(),
        Rgb565::MAX_G - color.g(),
        Rgb565::MAX_B - color.b(),
    )
}

// =============================================================================
// Named Colors
// =============================================================================

pub const CLEAR: GColor = GColor(0x00);
pub const BLACK: GColor = GColor::from_rgb(0, 0, 0);
pub const WHITE: GColor = GColor::from_rgb(3, 3, 3);
pub const RED: GColor = GColor::from_rgb(3, 0, 0);
pub const ORANGE: GColor = GColor::from_rgb(3, 2, 0);
pub const YELLOW: GColor = GColor::from_rgb(3, 3, 0);
pub const GREEN: GColor = GColor::from_rgb(0, 3, 0);
pub const BLUE: GColor = GColor::from_rgb(0, 0, 3);
pub const DARK_GRAY: GColor = GColor::from_rgb(1, 1, 1);
pub const LIGHT_GRAY: GColor = GColor::from_rgb(2, 2, 2);

// =============================================================================
// Unit Tests
// =============================================================================

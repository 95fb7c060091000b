//! A positioned, hideable bitmap slot.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::image::{Image, ImageDrawable};
use embedded_graphics::primitives::Rectangle;

use crate::colors::invert_rgb565;
use crate::prefs::ElementConfig;

/// How a layer's bitmap is composited onto the screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompOp {
    /// Pixels are copied as-is.
    #[default]
    Assign,
    /// Pixels are inverted, for elements drawn white-on-black.
    AssignInverted,
}

impl CompOp {
    /// Compositing that matches the enclosing element's color scheme.
    pub const fn for_element(element: &ElementConfig) -> Self {
        if element.black { Self::AssignInverted } else { Self::Assign }
    }
}

// =============================================================================
// Bitmap Layer
// =============================================================================

/// Owns at most one bitmap and draws it inside `frame`.
#[derive(Debug)]
pub struct BitmapLayer<B> {
    frame: Rectangle,
    hidden: bool,
    comp_op: CompOp,
    bitmap: Option<B>,
}

impl<B> BitmapLayer<B> {
    pub const fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            hidden: false,
            comp_op: CompOp::Assign,
            bitmap: None,
        }
    }

    #[inline]
    pub const fn frame(&self) -> Rectangle { self.frame }

    pub fn set_frame(
        &mut self,
        frame: Rectangle,
    ) {
        self.frame = frame;
    }

    #[inline]
    pub const fn hidden(&self) -> bool { self.hidden }

    pub fn set_hidden(
        &mut self,
        hidden: bool,
    ) {
        self.hidden = hidden;
    }

    #[inline]
    pub const fn comp_op(&self) -> CompOp { self.comp_op }

    pub fn set_comp_op(
        &mut self,
        comp_op: CompOp,
    ) {
        self.comp_op = comp_op;
    }

    #[inline]
    pub const fn bitmap(&self) -> Option<&B> { self.bitmap.as_ref() }

    /// Drop the current bitmap, if any.
    pub fn release_bitmap(&mut self) { self.bitmap = None; }

    /// Attach `bitmap`. Any previous bitmap must already be released.
    pub fn set_bitmap(
        &mut self,
        bitmap: B,
    ) {
        debug_assert!(self.bitmap.is_none());
        self.bitmap = Some(bitmap);
    }
}

impl<B> BitmapLayer<B>
where
    B: ImageDrawable<Color = Rgb565>,
{
    /// Draw the bitmap at the frame origin, clipped to the frame.
    pub fn draw<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(bitmap) = self.bitmap.as_ref().filter(|_| !self.hidden) else {
            return Ok(());
        };
        let image = Image::new(bitmap, self.frame.top_left);
        let mut clipped = target.clipped(&self.frame);
        match self.comp_op {
            CompOp::Assign => image.draw(&mut clipped),
            CompOp::AssignInverted => image.draw(&mut Inverted(&mut clipped)),
        }
    }
}

// =============================================================================
// Inverting Draw Target
// =============================================================================

/// Forwards pixels to the wrapped target with their colors inverted.
struct Inverted<'a, D>(&'a mut D);

impl<D> Dimensions for Inverted<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn bounding_box(&self) -> Rectangle { self.0.bounding_box() }
}

impl<D> DrawTarget for Inverted<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.draw_iter(
            pixels
                .into_iter()
                .map(|Pixel(point, color)| Pixel(point, invert_rgb565(color))),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

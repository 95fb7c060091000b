//! Stand-in arrow bitmaps for the simulator.
//!
//! The watch loads PNG resources; here each resource id is drawn as a vector
//! arrow so no image files are needed.

use embedded_graphics::image::ImageDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use watchface_common::ResourceBundle;
use watchface_common::config::TREND_ARROW_WIDTH;
use watchface_common::trend::{
    RESOURCE_ID_ARROW_DOUBLE_DOWN,
    RESOURCE_ID_ARROW_DOUBLE_UP,
    RESOURCE_ID_ARROW_FLAT,
    RESOURCE_ID_ARROW_FORTY_FIVE_DOWN,
    RESOURCE_ID_ARROW_FORTY_FIVE_UP,
    RESOURCE_ID_ARROW_SINGLE_DOWN,
    RESOURCE_ID_ARROW_SINGLE_UP,
    ResourceId,
};

/// Half the shaft length.
const SHAFT: i32 = 10;

/// Arrowhead barb length along each axis.
const BARB: i32 = 5;

/// Gap between the two shafts of a double arrow, either side of center.
const DOUBLE_OFFSET: i32 = 4;

const ARROW_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(Rgb565::BLACK, 2);

/// A 25x25 arrow icon.
#[derive(Clone, Copy, Debug)]
pub struct ArrowBitmap {
    id: ResourceId,
    /// Unit-ish direction of travel; `None` for unknown resources.
    dir: Option<Point>,
    double: bool,
}

impl ArrowBitmap {
    pub fn for_resource(id: ResourceId) -> Self {
        let (dir, double) = match id {
            RESOURCE_ID_ARROW_DOUBLE_UP => (Some(Point::new(0, -1)), true),
            RESOURCE_ID_ARROW_SINGLE_UP => (Some(Point::new(0, -1)), false),
            RESOURCE_ID_ARROW_FORTY_FIVE_UP => (Some(Point::new(1, -1)), false),
            RESOURCE_ID_ARROW_FLAT => (Some(Point::new(1, 0)), false),
            RESOURCE_ID_ARROW_FORTY_FIVE_DOWN => (Some(Point::new(1, 1)), false),
            RESOURCE_ID_ARROW_SINGLE_DOWN => (Some(Point::new(0, 1)), false),
            RESOURCE_ID_ARROW_DOUBLE_DOWN => (Some(Point::new(0, 1)), true),
            _ => (None, false),
        };
        Self { id, dir, double }
    }

    #[allow(dead_code)]
    pub const fn id(&self) -> ResourceId { self.id }

    fn draw_arrow<D>(
        target: &mut D,
        center: Point,
        dir: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let tip = center + dir * SHAFT;
        let tail = center - dir * SHAFT;
        let perp = Point::new(-dir.y, dir.x);

        Line::new(tail, tip).into_styled(ARROW_STYLE).draw(target)?;
        Line::new(tip, tip - dir * BARB + perp * BARB)
            .into_styled(ARROW_STYLE)
            .draw(target)?;
        Line::new(tip, tip - dir * BARB - perp * BARB)
            .into_styled(ARROW_STYLE)
            .draw(target)
    }
}

impl OriginDimensions for ArrowBitmap {
    fn size(&self) -> Size { Size::new(TREND_ARROW_WIDTH, TREND_ARROW_WIDTH) }
}

impl ImageDrawable for ArrowBitmap {
    type Color = Rgb565;

    fn draw<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(dir) = self.dir else {
            return Ok(());
        };
        let center = self.bounding_box().center();
        if self.double {
            let perp = Point::new(-dir.y, dir.x);
            Self::draw_arrow(target, center + perp * DOUBLE_OFFSET, dir)?;
            Self::draw_arrow(target, center - perp * DOUBLE_OFFSET, dir)
        } else {
            Self::draw_arrow(target, center, dir)
        }
    }

    fn draw_sub_image<D>(
        &self,
        target: &mut D,
        area: &Rectangle,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut translated = target.translated(-area.top_left);
        self.draw(&mut translated.clipped(area))
    }
}

// =============================================================================
// Resource Bundle
// =============================================================================

/// Hands out [`ArrowBitmap`]s and counts how many were loaded.
#[derive(Default)]
pub struct ArrowBundle {
    loads: u32,
}

impl ArrowBundle {
    pub const fn new() -> Self { Self { loads: 0 } }

    #[inline]
    pub const fn loads(&self) -> u32 { self.loads }
}

impl ResourceBundle for ArrowBundle {
    type Bitmap = ArrowBitmap;

    fn load_bitmap(
        &mut self,
        id: ResourceId,
    ) -> ArrowBitmap {
        self.loads += 1;
        ArrowBitmap::for_resource(id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::image::Image;
    use embedded_graphics_simulator::SimulatorDisplay;

    fn drawn_pixels(bitmap: &ArrowBitmap) -> usize {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(TREND_ARROW_WIDTH, TREND_ARROW_WIDTH));
        display.clear(Rgb565::WHITE).unwrap();
        Image::new(bitmap, Point::zero()).draw(&mut display).unwrap();
        display
            .bounding_box()
            .points()
            .filter(|p| display.get_pixel(*p) == Rgb565::BLACK)
            .count()
    }

    #[test]
    fn test_every_arrow_draws_inside_its_box() {
        for raw in 1..=7 {
            let bitmap = ArrowBitmap::for_resource(ResourceId(raw));
            assert!(drawn_pixels(&bitmap) > 0, "resource {raw}");
        }
    }

    #[test]
    fn test_unknown_resource_is_blank() {
        assert_eq!(drawn_pixels(&ArrowBitmap::for_resource(ResourceId(99))), 0);
    }

    #[test]
    fn test_bundle_counts_loads() {
        let mut bundle = ArrowBundle::new();
        let bitmap = bundle.load_bitmap(RESOURCE_ID_ARROW_FLAT);
        assert_eq!(bitmap.id(), RESOURCE_ID_ARROW_FLAT);
        bundle.load_bitmap(RESOURCE_ID_ARROW_DOUBLE_UP);
        assert_eq!(bundle.loads(), 2);
    }
}

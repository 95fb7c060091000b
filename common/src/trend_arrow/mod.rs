//! Trend arrow display.
//!
//! Shows the icon for the latest trend in a square [`BitmapLayer`]. The
//! bitmap is re-resolved only when the trend changes, and stale data always
//! hides the arrow.
//!
//! # Bitmap Ownership
//!
//! The component owns at most one bitmap. On a trend change the old bitmap
//! is dropped before the new one is loaded, so the two are never live at the
//! same time. Dropping the component drops its bitmap.

mod layer;

pub use layer::{BitmapLayer, CompOp};

use embedded_graphics::image::ImageDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::TREND_ARROW_WIDTH;
use crate::trend::{ResourceId, TrendIcon, trend_icon};

/// Source of bitmap resources.
pub trait ResourceBundle {
    type Bitmap;

    fn load_bitmap(
        &mut self,
        id: ResourceId,
    ) -> Self::Bitmap;
}

/// Observable state of the arrow.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrendArrowState {
    /// Data is stale, or nothing has been shown yet.
    HiddenStale,
    /// The current trend has no icon.
    HiddenNoIcon,
    Visible(ResourceId),
}

/// Trend arrow widget backed by bitmaps of type `B`.
pub struct TrendArrowComponent<B> {
    layer: BitmapLayer<B>,
    last_trend: Option<u8>,
    state: TrendArrowState,
}

impl<B> TrendArrowComponent<B> {
    /// Hidden arrow with its top-left corner at `(x, y)`.
    pub fn create(
        x: i32,
        y: i32,
        comp_op: CompOp,
    ) -> Self {
        let mut layer = BitmapLayer::new(frame_at(x, y));
        layer.set_hidden(true);
        layer.set_comp_op(comp_op);
        Self {
            layer,
            last_trend: None,
            state: TrendArrowState::HiddenStale,
        }
    }

    /// Show the icon for `trend`, or hide when `staleness_padding` is non-zero.
    pub fn update<R>(
        &mut self,
        resources: &mut R,
        trend: u8,
        staleness_padding: u32,
    ) where
        R: ResourceBundle<Bitmap = B>,
    {
        if staleness_padding > 0 {
            self.layer.set_hidden(true);
            self.last_trend = None;
            self.state = TrendArrowState::HiddenStale;
            return;
        }

        if self.last_trend == Some(trend) {
            return;
        }
        self.last_trend = Some(trend);

        match trend_icon(trend) {
            TrendIcon::NoIcon => {
                self.layer.set_hidden(true);
                self.state = TrendArrowState::HiddenNoIcon;
            }
            TrendIcon::Icon(id) => {
                self.layer.set_hidden(false);
                self.layer.release_bitmap();
                self.layer.set_bitmap(resources.load_bitmap(id));
                self.state = TrendArrowState::Visible(id);
                debug!("trend arrow bitmap -> {}", id.0);
            }
        }
    }

    /// Move the arrow, keeping its size.
    pub fn reposition(
        &mut self,
        x: i32,
        y: i32,
    ) {
        self.layer.set_frame(frame_at(x, y));
    }

    #[inline]
    pub const fn hidden(&self) -> bool { self.layer.hidden() }

    #[inline]
    pub const fn state(&self) -> TrendArrowState { self.state }

    #[inline]
    pub const fn width(&self) -> u32 { self.layer.frame().size.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.layer.frame().size.height }

    #[inline]
    pub const fn frame(&self) -> Rectangle { self.layer.frame() }

    #[inline]
    pub const fn comp_op(&self) -> CompOp { self.layer.comp_op() }

    pub fn set_comp_op(
        &mut self,
        comp_op: CompOp,
    ) {
        self.layer.set_comp_op(comp_op);
    }
}

impl<B> TrendArrowComponent<B>
where
    B: ImageDrawable<Color = Rgb565>,
{
    pub fn draw<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.layer.draw(target)
    }
}

fn frame_at(
    x: i32,
    y: i32,
) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(TREND_ARROW_WIDTH, TREND_ARROW_WIDTH))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::layer::tests::{Recorder, Solid};
    use super::*;
    use crate::trend::{RESOURCE_ID_ARROW_FLAT, RESOURCE_ID_ARROW_SINGLE_UP, TREND_ICONS};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        loads: Cell<usize>,
        live: Cell<usize>,
        max_live: Cell<usize>,
    }

    /// Bitmap that tracks how many instances are alive.
    struct Tracked {
        id: ResourceId,
        counters: Rc<Counters>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) { self.counters.live.set(self.counters.live.get() - 1); }
    }

    struct Bundle {
        counters: Rc<Counters>,
    }

    impl Bundle {
        fn new() -> Self {
            Self {
                counters: Rc::new(Counters::default()),
            }
        }

        fn loads(&self) -> usize { self.counters.loads.get() }

        fn live(&self) -> usize { self.counters.live.get() }
    }

    impl ResourceBundle for Bundle {
        type Bitmap = Tracked;

        fn load_bitmap(
            &mut self,
            id: ResourceId,
        ) -> Tracked {
            let c = &self.counters;
            c.loads.set(c.loads.get() + 1);
            c.live.set(c.live.get() + 1);
            c.max_live.set(c.max_live.get().max(c.live.get()));
            Tracked {
                id,
                counters: Rc::clone(c),
            }
        }
    }

    fn arrow() -> TrendArrowComponent<Tracked> { TrendArrowComponent::create(119, 40, CompOp::Assign) }

    #[test]
    fn test_create_hidden_and_square() {
        let arrow = arrow();
        assert!(arrow.hidden());
        assert_eq!(arrow.state(), TrendArrowState::HiddenStale);
        assert_eq!(arrow.width(), TREND_ARROW_WIDTH);
        assert_eq!(arrow.height(), TREND_ARROW_WIDTH);
        assert_eq!(arrow.frame().top_left, Point::new(119, 40));
    }

    #[test]
    fn test_state_matches_icon_table() {
        for (index, icon) in TREND_ICONS.iter().enumerate() {
            let mut bundle = Bundle::new();
            let mut arrow = arrow();
            arrow.update(&mut bundle, index as u8, 0);
            match icon {
                TrendIcon::NoIcon => {
                    assert!(arrow.hidden(), "trend {index}");
                    assert_eq!(arrow.state(), TrendArrowState::HiddenNoIcon);
                    assert_eq!(bundle.loads(), 0);
                }
                TrendIcon::Icon(id) => {
                    assert!(!arrow.hidden(), "trend {index}");
                    assert_eq!(arrow.state(), TrendArrowState::Visible(*id));
                    assert_eq!(arrow.layer.bitmap().map(|b| b.id), Some(*id));
                }
            }
        }
    }

    #[test]
    fn test_out_of_table_trend_hidden() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        for trend in [10, 42, u8::MAX] {
            arrow.update(&mut bundle, trend, 0);
            assert!(arrow.hidden());
            assert_eq!(arrow.state(), TrendArrowState::HiddenNoIcon);
        }
        assert_eq!(bundle.loads(), 0);
    }

    #[test]
    fn test_unchanged_trend_loads_once() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        for _ in 0..5 {
            arrow.update(&mut bundle, 4, 0);
        }
        assert_eq!(bundle.loads(), 1);
        assert_eq!(bundle.live(), 1);
        assert_eq!(arrow.state(), TrendArrowState::Visible(RESOURCE_ID_ARROW_FLAT));
    }

    #[test]
    fn test_stale_hides_regardless_of_trend() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        arrow.update(&mut bundle, 2, 0);
        assert!(!arrow.hidden());

        for trend in [2, 4, 0, 200] {
            arrow.update(&mut bundle, trend, 1);
            assert!(arrow.hidden());
            assert_eq!(arrow.state(), TrendArrowState::HiddenStale);
        }
        assert_eq!(bundle.loads(), 1);
    }

    #[test]
    fn test_clearing_staleness_rerenders_same_trend() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        arrow.update(&mut bundle, 2, 0);
        arrow.update(&mut bundle, 2, 5);
        arrow.update(&mut bundle, 2, 0);

        assert!(!arrow.hidden());
        assert_eq!(arrow.state(), TrendArrowState::Visible(RESOURCE_ID_ARROW_SINGLE_UP));
        assert_eq!(bundle.loads(), 2);
        assert_eq!(bundle.live(), 1);
    }

    #[test]
    fn test_at_most_one_bitmap_live() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        for trend in [1, 2, 3, 0, 4, 5, 9, 6, 7, 1, 12, 7] {
            arrow.update(&mut bundle, trend, 0);
            assert!(bundle.live() <= 1);
        }
        assert_eq!(bundle.counters.max_live.get(), 1);
        assert_eq!(bundle.loads(), 9);
    }

    #[test]
    fn test_no_icon_after_icon_hides() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        arrow.update(&mut bundle, 6, 0);
        arrow.update(&mut bundle, 8, 0);
        assert!(arrow.hidden());
        assert_eq!(arrow.state(), TrendArrowState::HiddenNoIcon);
    }

    #[test]
    fn test_drop_releases_bitmap() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        arrow.update(&mut bundle, 1, 0);
        assert_eq!(bundle.live(), 1);
        drop(arrow);
        assert_eq!(bundle.live(), 0);
    }

    #[test]
    fn test_reposition_keeps_size_and_state() {
        let mut bundle = Bundle::new();
        let mut arrow = arrow();
        arrow.update(&mut bundle, 3, 0);
        arrow.reposition(5, 7);
        assert_eq!(arrow.frame().top_left, Point::new(5, 7));
        assert_eq!(arrow.width(), TREND_ARROW_WIDTH);
        assert!(!arrow.hidden());
        assert_eq!(bundle.loads(), 1);
    }

    struct SolidBundle;

    impl ResourceBundle for SolidBundle {
        type Bitmap = Solid;

        fn load_bitmap(
            &mut self,
            _id: ResourceId,
        ) -> Solid {
            Solid {
                size: Size::new(TREND_ARROW_WIDTH, TREND_ARROW_WIDTH),
                color: Rgb565::BLACK,
            }
        }
    }

    #[test]
    fn test_draw_only_when_visible() {
        let mut arrow = TrendArrowComponent::create(0, 0, CompOp::AssignInverted);
        let mut target = Recorder::new();
        arrow.draw(&mut target).unwrap();
        assert!(target.pixels.is_empty());

        arrow.update(&mut SolidBundle, 4, 0);
        arrow.draw(&mut target).unwrap();
        assert_eq!(target.pixels.len(), (TREND_ARROW_WIDTH * TREND_ARROW_WIDTH) as usize);
        assert!(target.pixels.iter().all(|Pixel(_, c)| *c == Rgb565::WHITE));
    }
}

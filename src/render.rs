//! Drawing the simulated watch screen.
//!
//! The default layout is approximated with fixed bands: status bar on top,
//! graph and sidebar in the middle, time area at the bottom. Only the
//! sidebar reacts to preferences, since it hosts the trend arrow.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use heapless::String;
use profont::{PROFONT_7_POINT, PROFONT_9_POINT};
use watchface_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH, TREND_ARROW_WIDTH};
use watchface_common::{CompOp, Trend, TrendArrowComponent, TrendArrowState};

use crate::bitmaps::ArrowBitmap;
use crate::config::{GRAPH_ROW_HEIGHT, LOG_LINE_HEIGHT, LOG_TOP, STATUS_BAR_HEIGHT};
use crate::event_log::EventLog;

const STATUS_TEXT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_9_POINT, Rgb565::BLACK);
const LOG_TEXT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_7_POINT, Rgb565::WHITE);
const LOG_REPEAT_TEXT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_7_POINT, Rgb565::YELLOW);
const TOP_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();
const DIVIDER: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(Rgb565::BLACK, 1);

/// Everything the status bar reports.
pub struct StatusView {
    pub trend: u8,
    pub stale: bool,
    pub loads: u32,
}

/// Status bar: trend index and name, staleness, arrow state and load count.
pub fn draw_status<D>(
    display: &mut D,
    view: &StatusView,
    arrow: &TrendArrowComponent<ArrowBitmap>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let name = Trend::from_index(view.trend).map_or("UNKNOWN", Trend::label);
    let mut line: String<32> = String::new();
    write!(line, "TREND {} {}", view.trend, name).ok();
    Text::with_baseline(&line, Point::new(2, 2), STATUS_TEXT, Baseline::Top)
        .draw(display)
        .ok();

    let state = match arrow.state() {
        TrendArrowState::HiddenStale => "HIDDEN (STALE)",
        TrendArrowState::HiddenNoIcon => "HIDDEN (NO ICON)",
        TrendArrowState::Visible(_) => "VISIBLE",
    };
    Text::with_baseline(state, Point::new(2, 14), STATUS_TEXT, Baseline::Top)
        .draw(display)
        .ok();

    line.clear();
    write!(line, "LOADS {}{}", view.loads, if view.stale { " STALE" } else { "" }).ok();
    Text::with_baseline(&line, Point::new(2, 26), STATUS_TEXT, Baseline::Top)
        .draw(display)
        .ok();

    Line::new(
        Point::new(0, STATUS_BAR_HEIGHT as i32 - 1),
        Point::new(SCREEN_WIDTH as i32 - 1, STATUS_BAR_HEIGHT as i32 - 1),
    )
    .into_styled(DIVIDER)
    .draw(display)
    .ok();
}

/// Sidebar background, matching the arrow's compositing.
pub fn draw_sidebar<D>(
    display: &mut D,
    comp_op: CompOp,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let bg = match comp_op {
        CompOp::Assign => Rgb565::WHITE,
        CompOp::AssignInverted => Rgb565::BLACK,
    };
    let x = (SCREEN_WIDTH - TREND_ARROW_WIDTH) as i32;
    Rectangle::new(
        Point::new(x, STATUS_BAR_HEIGHT as i32),
        Size::new(TREND_ARROW_WIDTH, GRAPH_ROW_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_fill(bg))
    .draw(display)
    .ok();
}

/// Time area, repurposed as the event log terminal.
pub fn draw_event_log<D>(
    display: &mut D,
    log: &EventLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(
        Point::new(0, LOG_TOP),
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT - LOG_TOP as u32),
    )
    .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
    .draw(display)
    .ok();

    let mut y = LOG_TOP + 1;
    for entry in log.entries() {
        Text::with_baseline(entry.text(), Point::new(1, y), LOG_TEXT, Baseline::Top)
            .draw(display)
            .ok();
        if entry.count() > 1 {
            let mut repeats: String<8> = String::new();
            write!(repeats, "x{}", entry.count()).ok();
            Text::with_text_style(&repeats, Point::new(SCREEN_WIDTH as i32 - 1, y), LOG_REPEAT_TEXT, TOP_RIGHT)
                .draw(display)
                .ok();
        }
        y += LOG_LINE_HEIGHT;
    }
}

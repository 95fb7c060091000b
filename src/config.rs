//! Simulator configuration constants.

use std::time::Duration;

use embedded_graphics::prelude::Point;
use watchface_common::config::{SCREEN_WIDTH, TREND_ARROW_WIDTH};

// =============================================================================
// Window
// =============================================================================

/// Window pixels per watch pixel. The watch screen is tiny on a desktop.
pub const WINDOW_SCALE: u32 = 3;

/// Target frame time (~30 FPS). The main loop sleeps if the frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(33);

// =============================================================================
// Persistence
// =============================================================================

/// Directory name (under the system temp dir) holding the persisted keys.
pub const STORAGE_DIR_NAME: &str = "urchin-simulator";

// =============================================================================
// Layout
// =============================================================================

/// Height of the status bar strip at the top of the default layout.
pub const STATUS_BAR_HEIGHT: u32 = 40;

/// Height of the graph/sidebar row.
pub const GRAPH_ROW_HEIGHT: u32 = 72;

/// Arrow position inside the sidebar, right of the graph.
pub const ARROW_HOME: Point = Point::new(
    (SCREEN_WIDTH - TREND_ARROW_WIDTH) as i32,
    STATUS_BAR_HEIGHT as i32,
);

/// Alternate arrow position used by the reposition key (bottom of the sidebar).
pub const ARROW_ALT: Point = Point::new(
    (SCREEN_WIDTH - TREND_ARROW_WIDTH) as i32,
    (STATUS_BAR_HEIGHT + GRAPH_ROW_HEIGHT - TREND_ARROW_WIDTH) as i32,
);

const _: () = assert!(TREND_ARROW_WIDTH <= GRAPH_ROW_HEIGHT);

/// Top of the event log area (the time area in the default layout).
pub const LOG_TOP: i32 = (STATUS_BAR_HEIGHT + GRAPH_ROW_HEIGHT) as i32;

/// Event log line height for the 7pt font.
pub const LOG_LINE_HEIGHT: i32 = 9;

/// Staleness padding reported while staleness is toggled on.
pub const STALE_PADDING: u32 = 1;

/// Highest trend index the Up key reaches, past the end of the icon table.
pub const MAX_SIM_TREND: u8 = 11;

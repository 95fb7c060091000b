// Crate-level lints: allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

//! Desktop simulator for the CGM watchface.
//!
//! Renders a 144x168 watch screen with the trend arrow in the sidebar and
//! drives it from the keyboard instead of sensor data. Preferences are
//! loaded from a file-backed store at startup and written back on quit.
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `Up` / `Down` | Next / previous trend index (runs past the icon table) |
//! | `S` | Toggle stale data |
//! | `P` | Apply a sample "set preferences" message (flips the sidebar color) |
//! | `I` | Toggle the arrow's inverted compositing directly |
//! | `R` | Move the arrow between the top and bottom of the sidebar |
//!
//! Key repeat is ignored to prevent toggle spam when holding keys.

mod bitmaps;
mod companion;
mod config;
mod event_log;
mod render;
mod storage;

use std::thread;
use std::time::Instant;

use bitmaps::{ArrowBitmap, ArrowBundle};
use config::{ARROW_ALT, ARROW_HOME, FRAME_TIME, MAX_SIM_TREND, STALE_PADDING, STORAGE_DIR_NAME, WINDOW_SCALE};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use event_log::EventLog;
use render::{StatusView, draw_event_log, draw_sidebar, draw_status};
use storage::FileStorage;
use watchface_common::config::{PERSIST_KEY_PREFERENCES_OBJECT, SCREEN_HEIGHT, SCREEN_WIDTH};
use watchface_common::prefs::ElementKind;
use watchface_common::{CompOp, PersistentStorage, Preferences, PrefsStore, TrendArrowComponent};

fn main() {
    let mut log = EventLog::new();

    let storage_dir = std::env::temp_dir().join(STORAGE_DIR_NAME);
    let storage = match FileStorage::open(&storage_dir) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("cannot open storage at {}: {e}", storage_dir.display());
            return;
        }
    };
    let mut prefs = PrefsStore::init(storage);
    log.push_fmt(format_args!("prefs: {} elements", prefs.get().num_elements()));
    if prefs.get() == &Preferences::default() {
        log.push("prefs: defaults");
    }

    // Initialize display and window
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Urchin CGM Sim", &output_settings);

    // The window opens on first update, before any events can be polled
    display.clear(Rgb565::WHITE).ok();
    window.update(&display);

    // ==========================================================================
    // Main Loop State
    // ==========================================================================

    let mut bundle = ArrowBundle::new();
    let mut arrow: TrendArrowComponent<ArrowBitmap> =
        TrendArrowComponent::create(ARROW_HOME.x, ARROW_HOME.y, sidebar_comp_op(prefs.get()));

    // Flat, so something is visible on start
    let mut trend = 4u8;
    let mut stale = false;
    let mut at_home = true;
    let mut last_loads = 0u32;

    // ==========================================================================
    // Main Render Loop
    // ==========================================================================

    'running: loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Up => {
                            trend = if trend >= MAX_SIM_TREND { 0 } else { trend + 1 };
                            log.push_fmt(format_args!("trend -> {trend}"));
                        }
                        Keycode::Down => {
                            trend = if trend == 0 { MAX_SIM_TREND } else { trend - 1 };
                            log.push_fmt(format_args!("trend -> {trend}"));
                        }
                        Keycode::S => {
                            stale = !stale;
                            log.push(if stale { "data: STALE" } else { "data: FRESH" });
                        }
                        Keycode::P => match companion::toggle_sidebar_message(prefs.get()) {
                            Ok(message) => {
                                prefs.set(&message);
                                arrow.set_comp_op(sidebar_comp_op(prefs.get()));
                                log.push_fmt(format_args!("prefs: applied {} keys", message.len()));
                            }
                            Err(_) => log.push("prefs: message too large"),
                        },
                        Keycode::I => {
                            let op = match arrow.comp_op() {
                                CompOp::Assign => CompOp::AssignInverted,
                                CompOp::AssignInverted => CompOp::Assign,
                            };
                            arrow.set_comp_op(op);
                            log.push_fmt(format_args!("comp op: {op:?}"));
                        }
                        Keycode::R => {
                            at_home = !at_home;
                            let pos = if at_home { ARROW_HOME } else { ARROW_ALT };
                            arrow.reposition(pos.x, pos.y);
                            log.push_fmt(format_args!("arrow at {},{}", pos.x, pos.y));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // New data every frame; the arrow only reloads when the trend changes
        let padding = if stale { STALE_PADDING } else { 0 };
        arrow.update(&mut bundle, trend, padding);
        if bundle.loads() != last_loads {
            last_loads = bundle.loads();
            log.push_fmt(format_args!("bitmap load #{last_loads}"));
        }

        // ======================================================================
        // Draw
        // ======================================================================

        display.clear(Rgb565::WHITE).ok();
        draw_status(
            &mut display,
            &StatusView {
                trend,
                stale,
                loads: bundle.loads(),
            },
            &arrow,
        );
        draw_sidebar(&mut display, arrow.comp_op());
        arrow.draw(&mut display).ok();
        draw_event_log(&mut display, &log);

        window.update(&display);

        // Sleep to maintain target frame rate
        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }

    let storage = prefs.deinit();
    if storage.exists(PERSIST_KEY_PREFERENCES_OBJECT) {
        println!("[sim] prefs persisted to {}", storage.dir().display());
    } else {
        eprintln!("[sim] prefs were not persisted");
    }
}

/// Compositing for the arrow, from the sidebar element's color scheme.
fn sidebar_comp_op(prefs: &Preferences) -> CompOp {
    prefs
        .element(ElementKind::Sidebar)
        .map_or(CompOp::Assign, CompOp::for_element)
}

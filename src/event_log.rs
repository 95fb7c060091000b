//! On-screen event log.
//!
//! The bottom strip of the simulated watch shows the last few events. A
//! message that repeats the previous one bumps its counter instead of taking
//! another line, so holding a key down does not flush the history. Every
//! push is echoed to stdout.

use core::fmt::{self, Write};

use heapless::{Deque, String};

/// Six 9px lines fill the 56px time area.
const VISIBLE_LINES: usize = 6;

/// 144px at 5px per 7pt glyph.
const LINE_BYTES: usize = 28;

/// Scratch space for formatted messages before they are cut to a line.
const FORMAT_BYTES: usize = 64;

type Line = String<LINE_BYTES>;

/// One line of the log and how many times in a row it was pushed.
pub struct Entry {
    text: Line,
    count: u16,
}

impl Entry {
    #[inline]
    pub fn text(&self) -> &str { &self.text }

    #[inline]
    pub const fn count(&self) -> u16 { self.count }
}

#[derive(Default)]
pub struct EventLog {
    entries: Deque<Entry, VISIBLE_LINES>,
}

impl EventLog {
    pub const fn new() -> Self { Self { entries: Deque::new() } }

    pub fn push(
        &mut self,
        msg: &str,
    ) {
        println!("[sim] {msg}");

        let text = fit_line(msg);
        if let Some(last) = self.entries.back_mut() {
            if last.text == text {
                last.count = last.count.saturating_add(1);
                return;
            }
        }

        if self.entries.is_full() {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry { text, count: 1 }).ok();
    }

    pub fn push_fmt(
        &mut self,
        args: fmt::Arguments<'_>,
    ) {
        let mut msg: String<FORMAT_BYTES> = String::new();
        msg.write_fmt(args).ok();
        self.push(&msg);
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> { self.entries.iter() }
}

/// Longest prefix of `msg` that fits a line without splitting a character.
fn fit_line(msg: &str) -> Line {
    let mut end = msg.len().min(LINE_BYTES);
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    let mut line = Line::new();
    line.push_str(&msg[..end]).ok();
    line
}

// =============================================================================
// Tests
// =============================================================================

//! Application state types
//!
//! This module contains the UI-side state for the uploader window.

use gtk4 as gtk;
use std::collections::VecDeque;

/// Number of upload entries kept in the visible log
pub const MAX_LOG_ENTRIES: usize = 10;

/// Starting value of the cosmetic countdown, in seconds
pub const COUNTDOWN_START: i32 = 30;

/// A single row in the recent uploads list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub timestamp: String,
}

/// Bounded list of recent entries, most recent first
#[derive(Debug, Default)]
pub struct LogView {
    entries: VecDeque<LogEntry>,
}

impl LogView {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry and drop the oldest ones past the limit
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display-only countdown to the next screenshot.
///
/// Not tied to the scheduler's timing; it free-runs once per second and
/// wraps back to the start value.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    remaining: i32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            remaining: COUNTDOWN_START,
        }
    }
}

impl Countdown {
    pub fn reset(&mut self) {
        self.remaining = COUNTDOWN_START;
    }

    /// Return the value to show now and advance to the next one
    pub fn tick(&mut self) -> i32 {
        let shown = self.remaining;
        self.remaining -= 1;
        if self.remaining < 0 {
            self.remaining = COUNTDOWN_START;
        }
        shown
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    /// Whether the user has capturing switched on
    pub is_capturing: bool,
    pub countdown: Countdown,
    pub log: LogView,
    /// Source id of the running countdown timer, if any
    pub countdown_source: Option<gtk::glib::SourceId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the capture toggle and return the new value
    pub fn toggle_capturing(&mut self) -> bool {
        self.is_capturing = !self.is_capturing;
        if self.is_capturing {
            self.countdown.reset();
        }
        self.is_capturing
    }

    pub fn add_log_entry(&mut self, message: &str, timestamp: &str) {
        self.log.push(LogEntry {
            message: message.to_string(),
            timestamp: timestamp.to_string(),
        });
    }
}

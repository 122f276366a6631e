use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Characters per "word" in the words-per-minute convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Below this many minutes of typing the wpm figure is too noisy to show.
pub const MIN_WPM_MINUTES: f64 = 0.05;

/// Snapshot of a finished (or in-progress) attempt, handed to score sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub snippet_id: u32,
    pub wpm: u32,
    pub accuracy: u32,
}

/// Whole-session words per minute.
///
/// `elapsed` is `None` before the first keystroke.
pub fn wpm(chars_typed: usize, elapsed: Option<Duration>) -> u32 {
    let Some(elapsed) = elapsed else {
        return 0;
    };

    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes < MIN_WPM_MINUTES {
        return 0;
    }

    ((chars_typed as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Whole-session accuracy as a percentage of characters typed correctly.
pub fn accuracy(cursor_pos: usize, total_mistakes: usize) -> u32 {
    if cursor_pos == 0 {
        return 100;
    }

    if cursor_pos < total_mistakes {
        return 0;
    }

    let raw = (cursor_pos - total_mistakes) as f64 / cursor_pos as f64;
    (raw * 100.0).round() as u32
}

use std::time::{Duration, Instant};

use tracing::debug;

use crate::runtime::FixedTicker;
use crate::snippet::Snippet;
use crate::stats::{self, Score};
use crate::timer::SessionTimer;
use crate::typing_policy::{auto_indent_width, backspace_steps, decide, Decision};

pub const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Shown at the cursor in place of an (invisible) newline.
pub const RETURN_MARKER: &str = "\u{21b5}";

/// What a keystroke did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    /// The session was already finished.
    Ignored,
    Advanced,
    Mistake,
    /// This keystroke completed the snippet. Reported once per session.
    Finished,
}

/// One attempt at typing a snippet.
#[derive(Debug)]
pub struct TypingSession {
    snippet: Snippet,
    cursor_pos: usize,
    mistakes: Vec<char>,
    total_mistakes: usize,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    ticker: FixedTicker,
    timer: Option<SessionTimer>,
    finished: bool,
}

impl TypingSession {
    pub fn new(snippet: Snippet) -> Self {
        Self::with_ticker(
            snippet,
            FixedTicker::new(Duration::from_millis(DEFAULT_TICK_RATE_MS)),
        )
    }

    pub fn with_ticker(snippet: Snippet, ticker: FixedTicker) -> Self {
        // nothing to type means nothing to time
        let finished = snippet.is_empty();
        Self {
            snippet,
            cursor_pos: 0,
            mistakes: vec![],
            total_mistakes: 0,
            started_at: None,
            finished_at: None,
            ticker,
            timer: None,
            finished,
        }
    }

    pub fn type_on(&mut self, c: char) -> Keystroke {
        if self.finished {
            return Keystroke::Ignored;
        }

        if self.started_at.is_none() {
            self.start();
        }

        match decide(self.expected_char(), c, self.has_mistakes()) {
            Decision::Mistake => {
                self.mistakes.push(c);
                self.total_mistakes += 1;
                Keystroke::Mistake
            }
            Decision::Advance => {
                self.cursor_pos += 1;
                if self.cursor_pos == self.snippet.len() {
                    self.finish();
                    Keystroke::Finished
                } else if c == '\n' && self.auto_indent() {
                    Keystroke::Finished
                } else {
                    Keystroke::Advanced
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.finished || (self.cursor_pos == 0 && !self.has_mistakes()) {
            return;
        }

        let visual = self.before_cursor() + &self.at_cursor();
        for _ in 0..backspace_steps(&visual, self.snippet.tab_size()) {
            self.back_up_one();
        }
    }

    pub fn tab_pressed(&mut self) -> Keystroke {
        let mut outcome = Keystroke::Ignored;
        for _ in 0..self.snippet.tab_width() {
            match self.type_on(' ') {
                Keystroke::Finished => return Keystroke::Finished,
                Keystroke::Ignored => {}
                other => outcome = other,
            }
        }
        outcome
    }

    /// Stop the timer of a session that will never be finished.
    pub fn abandon(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            if timer.stop() {
                debug!(snippet_id = self.snippet.id, "session abandoned");
            }
        }
    }

    fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.timer = Some(SessionTimer::start(&self.ticker));
        debug!(snippet_id = self.snippet.id, "session started");
    }

    fn finish(&mut self) {
        self.finished = true;
        self.finished_at = Some(Instant::now());
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
        debug!(
            snippet_id = self.snippet.id,
            total_mistakes = self.total_mistakes,
            "session finished"
        );
    }

    /// Returns true if one of the inserted spaces finished the session.
    fn auto_indent(&mut self) -> bool {
        let width = auto_indent_width(&self.before_cursor());
        (0..width).any(|_| self.type_on(' ') == Keystroke::Finished)
    }

    fn back_up_one(&mut self) {
        if self.mistakes.pop().is_none() {
            self.cursor_pos = self.cursor_pos.saturating_sub(1);
        }
    }

    fn expected_char(&self) -> Option<char> {
        self.snippet.chars().get(self.cursor_pos).copied()
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn mistakes(&self) -> &[char] {
        &self.mistakes
    }

    pub fn total_mistakes(&self) -> usize {
        self.total_mistakes
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_mistakes(&self) -> bool {
        !self.mistakes.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.timer.as_ref().map_or(0, SessionTimer::ticks)
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(SessionTimer::is_running)
    }

    pub fn before_cursor(&self) -> String {
        self.snippet.chars()[..self.cursor_pos].iter().collect()
    }

    /// Pending mistakes if there are any, otherwise the character to type next.
    pub fn at_cursor(&self) -> String {
        if self.has_mistakes() {
            return self.mistakes.iter().collect();
        }

        match self.expected_char() {
            Some('\n') => RETURN_MARKER.to_string(),
            Some(c) => c.to_string(),
            None => String::new(),
        }
    }

    /// The rest of the text after what [`Self::at_cursor`] displays.
    ///
    /// Mistakes visually cover as many target characters as they are long,
    /// but never a newline: that always stays in this part.
    pub fn after_cursor(&self) -> String {
        let chars = self.snippet.chars();
        let len = chars.len();

        let covered_end = (self.cursor_pos + self.mistakes.len()).min(len);
        let covered = &chars[self.cursor_pos..covered_end];
        let mut offset = match covered.iter().position(|&c| c == '\n') {
            Some(idx) => self.cursor_pos + idx,
            None => self.cursor_pos + self.mistakes.len(),
        };

        if self.mistakes.is_empty() && self.expected_char() != Some('\n') {
            offset += 1;
        }

        chars[offset.min(len)..].iter().collect()
    }

    /// Live while typing, frozen once the session finishes.
    pub fn wpm(&self) -> u32 {
        self.wpm_at(self.finished_at.unwrap_or_else(Instant::now))
    }

    pub fn wpm_at(&self, now: Instant) -> u32 {
        let elapsed = self
            .started_at
            .map(|started| now.saturating_duration_since(started));
        stats::wpm(self.cursor_pos, elapsed)
    }

    pub fn accuracy(&self) -> u32 {
        stats::accuracy(self.cursor_pos, self.total_mistakes)
    }

    pub fn score(&self) -> Score {
        Score {
            snippet_id: self.snippet.id,
            wpm: self.wpm(),
            accuracy: self.accuracy(),
        }
    }
}

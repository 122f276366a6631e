use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::library::SnippetLibrary;
use crate::runtime::{FixedTicker, Input};
use crate::scores::{ScoreBoard, ScoreLog, ScoreSink};
use crate::session::{Keystroke, TypingSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Owns the running session and everything around it: where the next snippet
/// comes from and where finished scores go.
#[derive(Debug)]
pub struct App {
    pub library: SnippetLibrary,
    pub session: TypingSession,
    pub board: ScoreBoard,
    score_log: Option<ScoreLog>,
    ticker: FixedTicker,
    rng: StdRng,
    live_wpm: u32,
    seen_ticks: u64,
}

impl App {
    pub fn new(
        library: SnippetLibrary,
        requested: Option<u32>,
        ticker: FixedTicker,
        score_log: Option<ScoreLog>,
    ) -> Result<Self> {
        Self::with_rng(library, requested, ticker, score_log, StdRng::from_entropy())
    }

    pub fn with_rng(
        library: SnippetLibrary,
        requested: Option<u32>,
        ticker: FixedTicker,
        score_log: Option<ScoreLog>,
        mut rng: StdRng,
    ) -> Result<Self> {
        let snippet = library.next_snippet(requested, None, &mut rng)?;
        Ok(Self {
            library,
            session: TypingSession::with_ticker(snippet, ticker),
            board: ScoreBoard::default(),
            score_log,
            ticker,
            rng,
            live_wpm: 0,
            seen_ticks: 0,
        })
    }

    pub fn handle(&mut self, input: Input) -> Result<Control> {
        debug!(%input, cursor = self.session.cursor_pos(), "input");
        match input {
            Input::Quit => {
                self.session.abandon();
                return Ok(Control::Quit);
            }
            Input::Char(c) => {
                let outcome = self.session.type_on(c);
                self.after_keystroke(outcome);
            }
            Input::Tab => {
                let outcome = self.session.tab_pressed();
                self.after_keystroke(outcome);
            }
            Input::Backspace => self.session.backspace(),
            Input::Skip => {
                self.session.abandon();
                self.replace_snippet();
            }
        }
        Ok(Control::Continue)
    }

    /// Apply new category preferences, replacing the current snippet if its
    /// category is no longer wanted.
    pub fn apply_preferences(&mut self, enabled_ids: &[u32]) -> Result<()> {
        self.library.apply_enabled_ids(enabled_ids)?;
        if self
            .library
            .needs_new_snippet(self.session.snippet().category_id)
        {
            self.session.abandon();
            self.replace_snippet();
        }
        Ok(())
    }

    /// Wpm as of the last session timer tick.
    pub fn live_wpm(&self) -> u32 {
        if self.session.is_finished() {
            self.session.wpm()
        } else {
            self.live_wpm
        }
    }

    /// Recompute the live wpm if the session timer ticked since the last
    /// call. Returns true when there is something new to draw.
    pub fn refresh_wpm(&mut self) -> bool {
        self.refresh_wpm_at(Instant::now())
    }

    pub fn refresh_wpm_at(&mut self, now: Instant) -> bool {
        let ticks = self.session.tick_count();
        if ticks == self.seen_ticks {
            return false;
        }
        self.seen_ticks = ticks;
        self.live_wpm = self.session.wpm_at(now);
        true
    }

    /// Swap in a random snippet, different from the current one if possible.
    pub fn next_snippet(&mut self) -> Result<()> {
        let last_seen = Some(self.session.snippet().id);
        let snippet = self.library.next_snippet(None, last_seen, &mut self.rng)?;
        self.session = TypingSession::with_ticker(snippet, self.ticker);
        self.live_wpm = 0;
        self.seen_ticks = 0;
        Ok(())
    }

    /// Like [`Self::next_snippet`], but keeps the current session when
    /// nothing else can be offered.
    fn replace_snippet(&mut self) {
        if let Err(e) = self.next_snippet() {
            warn!(
                snippet_id = self.session.snippet().id,
                "keeping current snippet: {e}"
            );
        }
    }

    fn after_keystroke(&mut self, outcome: Keystroke) {
        if outcome == Keystroke::Finished {
            self.submit_score();
            self.replace_snippet();
        }
    }

    fn submit_score(&mut self) {
        let score = self.session.score();
        info!(
            snippet_id = score.snippet_id,
            wpm = score.wpm,
            accuracy = score.accuracy,
            "snippet finished"
        );

        if let Err(e) = self.board.record(&score) {
            warn!("failed to record score: {e}");
        }
        if let Some(log) = self.score_log.as_mut() {
            if let Err(e) = log.record(&score) {
                warn!(path = %log.path().display(), "failed to log score: {e}");
            }
        }
    }
}

use chrono::Local;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::stats::Score;

/// Anything that accepts finished scores.
pub trait ScoreSink {
    fn record(&mut self, score: &Score) -> Result<()>;
}

pub const DEFAULT_SCORE_BOARD_LEN: usize = 10;

/// Recent scores of this run, oldest first.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    scores: VecDeque<Score>,
    capacity: usize,
}

impl ScoreBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn last(&self) -> Option<&Score> {
        self.scores.back()
    }

    /// Mean wpm over the board, rounded.
    pub fn average_wpm(&self) -> Option<u32> {
        if self.scores.is_empty() {
            return None;
        }
        let total: u32 = self.scores.iter().map(|s| s.wpm).sum();
        Some((total as f64 / self.scores.len() as f64).round() as u32)
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_BOARD_LEN)
    }
}

impl ScoreSink for ScoreBoard {
    fn record(&mut self, score: &Score) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(*score);
        Ok(())
    }
}

#[derive(Serialize)]
struct ScoreRow {
    date: String,
    snippet_id: u32,
    wpm: u32,
    accuracy: u32,
}

/// Appends scores to a CSV file, writing the header when the file is new.
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSink for ScoreLog {
    fn record(&mut self, score: &Score) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        writer.serialize(ScoreRow {
            date: Local::now().format("%c").to_string(),
            snippet_id: score.snippet_id,
            wpm: score.wpm,
            accuracy: score.accuracy,
        })?;
        writer.flush()?;

        info!(
            snippet_id = score.snippet_id,
            wpm = score.wpm,
            accuracy = score.accuracy,
            "score logged"
        );
        Ok(())
    }
}

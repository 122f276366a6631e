use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::util::{chomp, is_blank, leading_whitespace_count};

/// A snippet as supplied by a snippet source, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub id: u32,
    pub full_text: String,
    pub category_id: u32,
}

/// Canonical text plus the inferred indentation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub tab_size: Option<usize>,
}

/// Canonicalize snippet text.
///
/// Expects input that has already been through [`chomp`]. A whitespace-only
/// line becomes as many spaces as the previous (normalized) line is indented,
/// so auto-indent after a newline lands on matching characters.
pub fn normalize(raw: &str) -> Normalized {
    let mut prev_indent = 0;
    let text = raw
        .split('\n')
        .map(|line| {
            let normalized = if is_blank(line) {
                " ".repeat(prev_indent)
            } else {
                line.trim_end().to_string()
            };
            prev_indent = leading_whitespace_count(&normalized);
            normalized
        })
        .join("\n");

    let tab_size = infer_tab_size(&text);
    Normalized { text, tab_size }
}

/// The indent of the first indented line, if any line is indented.
pub fn infer_tab_size(text: &str) -> Option<usize> {
    text.split('\n')
        .map(leading_whitespace_count)
        .find(|&indent| indent > 0)
}

/// The immutable target text of one practice round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: u32,
    pub category_id: u32,
    text: Vec<char>,
    tab_size: Option<usize>,
}

impl Snippet {
    /// Build a snippet from raw source text.
    ///
    /// Carriage returns and trailing blank lines are stripped before the text
    /// is normalized, so callers may hand over text exactly as fetched.
    pub fn new(id: u32, category_id: u32, raw: &str) -> Self {
        let Normalized { text, tab_size } = normalize(&chomp(raw));
        Self {
            id,
            category_id,
            text: text.chars().collect(),
            tab_size,
        }
    }

    pub fn from_record(record: &SnippetRecord) -> Self {
        Self::new(record.id, record.category_id, &record.full_text)
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tab_size(&self) -> Option<usize> {
        self.tab_size
    }

    /// Repeat count for indentation operations; zero when nothing is indented.
    pub fn tab_width(&self) -> usize {
        self.tab_size.unwrap_or(0)
    }
}

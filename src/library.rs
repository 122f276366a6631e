use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TortoiseError};
use crate::snippet::{Snippet, SnippetRecord};
use crate::util::chomp;

static ASSET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

const BUNDLED_LIBRARY: &str = "snippets.json";

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Snippets and their categories, bundled or loaded from a JSON file.
///
/// Category `enabled` flags are the practice preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetLibrary {
    #[serde(default)]
    pub categories: Vec<Category>,
    pub snippets: Vec<SnippetRecord>,
}

impl SnippetLibrary {
    pub fn bundled() -> Result<Self> {
        let file = ASSET_DIR.get_file(BUNDLED_LIBRARY).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("bundled {BUNDLED_LIBRARY} missing"),
            )
        })?;
        Self::from_json(file.contents())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let library = Self::from_json(&fs::read(path.as_ref())?)?;
        info!(
            path = %path.as_ref().display(),
            snippets = library.snippets.len(),
            categories = library.categories.len(),
            "loaded snippet library"
        );
        Ok(library)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn snippet(&self, id: u32) -> Result<&SnippetRecord> {
        self.snippets
            .iter()
            .find(|s| s.id == id)
            .ok_or(TortoiseError::SnippetNotFound(id))
    }

    pub fn category(&self, id: u32) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or(TortoiseError::CategoryNotFound(id))
    }

    pub fn set_category_enabled(&mut self, id: u32, enabled: bool) -> Result<()> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TortoiseError::CategoryNotFound(id))?;
        category.enabled = enabled;
        Ok(())
    }

    pub fn disable_all(&mut self) {
        self.categories.iter_mut().for_each(|c| c.enabled = false);
    }

    pub fn enabled_category_ids(&self) -> Vec<u32> {
        self.categories
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.id)
            .collect()
    }

    /// Restore saved preferences. An empty list leaves every category enabled.
    ///
    /// Fails on the first id the library doesn't know, leaving earlier ids
    /// applied.
    pub fn apply_enabled_ids(&mut self, ids: &[u32]) -> Result<()> {
        if ids.is_empty() {
            self.categories.iter_mut().for_each(|c| c.enabled = true);
            return Ok(());
        }

        self.disable_all();
        for &id in ids {
            self.set_category_enabled(id, true)?;
        }
        Ok(())
    }

    /// Snippets in categories the library doesn't list are always offered.
    pub fn is_category_enabled(&self, id: u32) -> bool {
        self.category(id).map_or(true, |c| c.enabled)
    }

    /// Whether a snippet from `category_id` should be swapped out after a
    /// preferences change.
    pub fn needs_new_snippet(&self, category_id: u32) -> bool {
        !self.is_category_enabled(category_id)
    }

    /// Pick a snippet from the enabled categories, avoiding `last_seen` when
    /// there is anything else to offer. Snippets with nothing to type are
    /// never picked.
    pub fn random<R: Rng + ?Sized>(
        &self,
        last_seen: Option<u32>,
        rng: &mut R,
    ) -> Option<&SnippetRecord> {
        let candidates: Vec<&SnippetRecord> = self
            .snippets
            .iter()
            .filter(|s| self.is_category_enabled(s.category_id))
            .filter(|s| !chomp(&s.full_text).is_empty())
            .collect();

        let fresh: Vec<&SnippetRecord> = candidates
            .iter()
            .copied()
            .filter(|s| Some(s.id) != last_seen)
            .collect();

        if fresh.is_empty() {
            candidates.choose(rng).copied()
        } else {
            fresh.choose(rng).copied()
        }
    }

    /// Build the next practice snippet, either a specific one or a random pick.
    pub fn next_snippet<R: Rng + ?Sized>(
        &self,
        requested: Option<u32>,
        last_seen: Option<u32>,
        rng: &mut R,
    ) -> Result<Snippet> {
        let record = match requested {
            Some(id) => self.snippet(id)?,
            None => self
                .random(last_seen, rng)
                .ok_or(TortoiseError::EmptyLibrary)?,
        };

        // a blank session would be finished before the first keystroke
        let snippet = Snippet::from_record(record);
        if snippet.is_empty() {
            return Err(TortoiseError::BlankSnippet(record.id));
        }
        Ok(snippet)
    }
}

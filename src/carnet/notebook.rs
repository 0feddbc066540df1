//! The notebook aggregate: notes keyed by unique title.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CarnetError, Result};
use crate::store::{self, LoadOutcome};

/// Body of a note. A note starts as plain text and is upgraded in place to
/// the tagged shape the first time a tag is attached; both shapes persist
/// as-is (a plain string or an object with a `tags` list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteBody {
    Plain(String),
    Tagged { content: String, tags: Vec<String> },
}

impl NoteBody {
    pub fn content(&self) -> &str {
        match self {
            Self::Plain(content) => content,
            Self::Tagged { content, .. } => content,
        }
    }

    /// The tag list; empty for a plain body.
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Plain(_) => &[],
            Self::Tagged { tags, .. } => tags,
        }
    }

    /// Appends a tag, upgrading a plain body to the tagged shape. Tags are
    /// not deduplicated.
    pub(crate) fn push_tag(&mut self, tag: String) {
        match self {
            Self::Plain(content) => {
                *self = Self::Tagged {
                    content: std::mem::take(content),
                    tags: vec![tag],
                };
            }
            Self::Tagged { tags, .. } => tags.push(tag),
        }
    }

    /// Replaces the textual content, keeping any tag list.
    pub(crate) fn set_content(&mut self, new_content: String) {
        match self {
            Self::Plain(content) => *content = new_content,
            Self::Tagged { content, .. } => *content = new_content,
        }
    }
}

#[derive(Debug, Default)]
pub struct Notebook {
    notes: BTreeMap<String, NoteBody>,
}

#[derive(Serialize, Deserialize)]
struct NotesSnapshot {
    notes: BTreeMap<String, NoteBody>,
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.notes.contains_key(title)
    }

    pub fn get(&self, title: &str) -> Option<&NoteBody> {
        self.notes.get(title)
    }

    pub(crate) fn get_mut(&mut self, title: &str) -> Option<&mut NoteBody> {
        self.notes.get_mut(title)
    }

    /// Stores the note, silently overwriting any note with that title.
    pub fn add(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.notes
            .insert(title.into(), NoteBody::Plain(content.into()));
    }

    /// Replaces the textual content of an existing note, keeping its tags.
    pub fn modify(&mut self, title: &str, new_content: impl Into<String>) -> Result<()> {
        match self.notes.get_mut(title) {
            Some(body) => {
                body.set_content(new_content.into());
                Ok(())
            }
            None => Err(CarnetError::NoteNotFound(title.to_string())),
        }
    }

    pub fn delete(&mut self, title: &str) -> Result<()> {
        if self.notes.remove(title).is_none() {
            return Err(CarnetError::NoteNotFound(title.to_string()));
        }
        Ok(())
    }

    /// All notes in ascending title order.
    pub fn list(&self) -> Vec<(&str, &NoteBody)> {
        self.notes
            .iter()
            .map(|(title, body)| (title.as_str(), body))
            .collect()
    }

    /// Writes the whole notebook to `path` (write-temp-then-rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = NotesSnapshot {
            notes: self.notes.clone(),
        };
        store::write_snapshot(path, &snapshot)?;
        info!("saved {} notes to {}", self.notes.len(), path.display());
        Ok(())
    }

    /// Replaces the in-memory notes with the file's contents. A missing
    /// file is benign; a corrupt one fails and leaves the notebook
    /// untouched.
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        let Some(snapshot) = store::read_snapshot::<NotesSnapshot>(path)? else {
            info!("no notebook at {}", path.display());
            return Ok(LoadOutcome::MissingFile);
        };
        self.notes = snapshot.notes;
        info!("loaded {} notes from {}", self.notes.len(), path.display());
        Ok(LoadOutcome::Loaded)
    }
}

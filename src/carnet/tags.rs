//! Tag operations over a notebook.

use crate::error::{CarnetError, Result};
use crate::notebook::{NoteBody, Notebook};

/// Attaches `tag` to the note titled `title`. A plain body is upgraded in
/// place to the tagged shape; an existing list gets the tag appended, with
/// no deduplication.
pub fn tag_note(notebook: &mut Notebook, title: &str, tag: impl Into<String>) -> Result<()> {
    match notebook.get_mut(title) {
        Some(body) => {
            body.push_tag(tag.into());
            Ok(())
        }
        None => Err(CarnetError::NoteNotFound(title.to_string())),
    }
}

/// Notes whose tag list contains `tag` exactly, each at most once.
pub fn find_by_tag<'a>(notebook: &'a Notebook, tag: &str) -> Vec<(&'a str, &'a NoteBody)> {
    notebook
        .list()
        .into_iter()
        .filter(|(_, body)| body.tags().iter().any(|t| t == tag))
        .collect()
}

/// All notes, stably sorted by their tag sequence. Untagged notes compare
/// as the empty sequence and so sort first.
pub fn sort_by_tags(notebook: &Notebook) -> Vec<(&str, &NoteBody)> {
    let mut notes = notebook.list();
    notes.sort_by(|(_, a), (_, b)| a.tags().cmp(b.tags()));
    notes
}

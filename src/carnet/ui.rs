//! # UI Boundary
//!
//! The core never prints. Everything a driver wants to show goes through
//! the [`UserInterface`] trait: contacts, notes, and the command menu.
//! [`ConsoleUi`] is the built-in implementation, rendering one item per
//! line to any `Write` sink (stdout in production, a buffer in tests).

use std::io::{self, Write};

use chrono::Local;
use unicode_width::UnicodeWidthChar;

use crate::notebook::NoteBody;
use crate::record::Record;

const LINE_WIDTH: usize = 100;

/// The capability set a driver needs for presentation.
pub trait UserInterface {
    fn show_contacts(&mut self, contacts: &[&Record]);
    fn show_notes(&mut self, notes: &[(&str, &NoteBody)]);
    fn show_commands(&mut self);
}

pub struct ConsoleUi<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleUi<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> UserInterface for ConsoleUi<W> {
    fn show_contacts(&mut self, contacts: &[&Record]) {
        if contacts.is_empty() {
            let _ = writeln!(self.out, "No contacts.");
            return;
        }
        let today = Local::now().date_naive();
        for record in contacts {
            let _ = writeln!(self.out, "{}", record.render_on(today));
        }
    }

    fn show_notes(&mut self, notes: &[(&str, &NoteBody)]) {
        if notes.is_empty() {
            let _ = writeln!(self.out, "No notes.");
            return;
        }
        for (title, body) in notes {
            let preview: String = body
                .content()
                .chars()
                .map(|c| if c == '\n' { ' ' } else { c })
                .collect();
            let tags = body.tags();
            let line = if tags.is_empty() {
                format!("{title}: {preview}")
            } else {
                format!("{title}: {preview} [{}]", tags.join(", "))
            };
            let _ = writeln!(self.out, "{}", truncate_to_width(&line, LINE_WIDTH));
        }
    }

    fn show_commands(&mut self) {
        let _ = writeln!(self.out, "Available commands:");
        let _ = writeln!(self.out, " 1. Add contact");
        let _ = writeln!(self.out, " 2. Find contact");
        let _ = writeln!(self.out, " 3. Delete contact");
        let _ = writeln!(self.out, " 4. Edit contact");
        let _ = writeln!(self.out, " 5. List all contacts");
        let _ = writeln!(self.out, " 6. List contacts with upcoming birthdays");
        let _ = writeln!(self.out, " 7. Add note");
        let _ = writeln!(self.out, " 8. List notes");
        let _ = writeln!(self.out, " 9. Edit note");
        let _ = writeln!(self.out, "10. Delete note");
        let _ = writeln!(self.out, "11. Save notes");
        let _ = writeln!(self.out, "12. Load notes");
        let _ = writeln!(self.out, "13. Tag note");
        let _ = writeln!(self.out, "14. Find notes by tag");
        let _ = writeln!(self.out, "15. Sort notes by tags");
        let _ = writeln!(self.out, "16. Quit");
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

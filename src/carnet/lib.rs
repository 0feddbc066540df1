//! # Carnet Architecture
//!
//! Carnet is a **UI-agnostic personal assistant library**: an address book
//! of contacts and a notebook of titled notes, both persisted to local
//! files. The interactive menu binary is a client of this library, not the
//! other way around.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Driver (main.rs + args.rs)                                 │
//! │  - Menu loop, prompts, message strings, exit codes          │
//! │  - The ONLY place that reads stdin or touches the terminal  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Aggregates (book, notebook, tags)                          │
//! │  - Id allocation, search, birthday queries, tagging         │
//! │  - Operate on Rust types, return Rust types, never print    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Values and storage (field, record, store)                  │
//! │  - Validated field newtypes, the Record entity              │
//! │  - Versioned JSON snapshots, atomic whole-file writes       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Presentation goes through the [`ui::UserInterface`] trait so the same
//! core can serve a different front end.
//!
//! ## Module Overview
//!
//! - [`field`]: Validated field value types (name, phone, email, birth
//!   date, address)
//! - [`record`]: The contact entity and birthday arithmetic
//! - [`book`]: The address book aggregate with id allocation and search
//! - [`notebook`]: The notebook aggregate and note bodies
//! - [`tags`]: Tag operations over a notebook
//! - [`store`]: Snapshot persistence shared by both aggregates
//! - [`ui`]: The presentation trait and console implementation
//! - [`logging`]: File logging bootstrap for the binary
//! - [`error`]: Error types

pub mod book;
pub mod error;
pub mod field;
pub mod logging;
pub mod notebook;
pub mod record;
pub mod store;
pub mod tags;
pub mod ui;

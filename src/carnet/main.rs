use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use carnet::book::AddressBook;
use carnet::error::{CarnetError, Result};
use carnet::field::{Address, BirthDate, EmailAddress, Name, PhoneNumber};
use carnet::logging;
use carnet::notebook::Notebook;
use carnet::record::Record;
use carnet::store::LoadOutcome;
use carnet::tags;
use carnet::ui::{ConsoleUi, UserInterface};

mod args;
use args::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext<U: UserInterface> {
    book: AddressBook,
    notebook: Notebook,
    ui: U,
    book_path: PathBuf,
    notes_path: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        ctx.ui.show_commands();
        let choice = match prompt(&mut input, "Choose an action: ")? {
            Some(choice) => choice,
            // stdin closed; nothing more can be asked.
            None => break,
        };

        let outcome = match choice.as_str() {
            "1" => handle_add_contact(&mut ctx, &mut input),
            "2" => handle_find_contact(&mut ctx, &mut input),
            "3" => handle_delete_contact(&mut ctx, &mut input),
            "4" => handle_edit_contact(&mut ctx, &mut input),
            "5" => handle_list_contacts(&mut ctx),
            "6" => handle_upcoming_birthdays(&mut ctx),
            "7" => handle_add_note(&mut ctx, &mut input),
            "8" => handle_list_notes(&mut ctx),
            "9" => handle_edit_note(&mut ctx, &mut input),
            "10" => handle_delete_note(&mut ctx, &mut input),
            "11" => handle_save_notes(&mut ctx),
            "12" => handle_load_notes(&mut ctx),
            "13" => handle_tag_note(&mut ctx, &mut input),
            "14" => handle_find_notes_by_tag(&mut ctx, &mut input),
            "15" => handle_sort_notes_by_tags(&mut ctx),
            "16" => {
                handle_quit(&mut ctx)?;
                break;
            }
            other => {
                println!("{}", format!("Unknown command: {other}").red());
                Ok(())
            }
        };

        if let Err(err) = outcome {
            report(&err);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Option<flexi_logger::LoggerHandle> {
    let proj_dirs = ProjectDirs::from("com", "carnet", "carnet")?;
    let log_dir = proj_dirs.data_dir().join("logs");
    match logging::init(&log_dir, verbose) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {}", err);
            None
        }
    }
}

fn init_context(cli: &Cli) -> Result<AppContext<ConsoleUi>> {
    let mut book = AddressBook::new();
    if book.load(&cli.book)? == LoadOutcome::MissingFile {
        println!("{}", "No address book file found, starting fresh.".dimmed());
    }

    let mut notebook = Notebook::new();
    if notebook.load(&cli.notes)? == LoadOutcome::MissingFile {
        println!("{}", "No notes file found, starting fresh.".dimmed());
    }

    Ok(AppContext {
        book,
        notebook,
        ui: ConsoleUi::new(),
        book_path: cli.book.clone(),
        notes_path: cli.notes.clone(),
    })
}

fn handle_add_contact<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let name: Name = ask(input, "Name: ")?.parse()?;
    let mut record = Record::new(name);

    let birthdate = ask(input, "Birth date (YYYY-MM-DD, optional): ")?;
    if !birthdate.is_empty() {
        match birthdate.parse::<BirthDate>() {
            Ok(birth) => record.set_birthdate(birth),
            Err(err) => report(&err),
        }
    }

    for value in split_list(&ask(input, "Phone numbers (comma separated): ")?) {
        match value.parse::<PhoneNumber>() {
            Ok(phone) => record.add_phone(phone),
            Err(err) => report(&err),
        }
    }

    for value in split_list(&ask(input, "Email addresses (comma separated): ")?) {
        match value.parse::<EmailAddress>() {
            Ok(email) => record.add_email(email),
            Err(err) => report(&err),
        }
    }

    let street = ask(input, "Street: ")?;
    let city = ask(input, "City: ")?;
    let postal_code = ask(input, "Postal code: ")?;
    let country = ask(input, "Country: ")?;
    if !(street.is_empty() && city.is_empty() && postal_code.is_empty() && country.is_empty()) {
        record.set_address(Address::new(street, city, postal_code, country));
    }

    let id = ctx.book.add_record(record)?;
    println!("{}", format!("Contact added with ID: {id}.").green());
    Ok(())
}

fn handle_find_contact<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let term = ask(input, "Search term: ")?;
    let found = ctx.book.find(&term);
    ctx.ui.show_contacts(&found);
    Ok(())
}

fn handle_delete_contact<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let raw = ask(input, "Contact ID to delete: ")?;
    let id = parse_record_id(&raw)?;
    ctx.book.delete_record(id)?;
    println!("{}", format!("Deleted contact with ID: {id}.").green());
    Ok(())
}

fn handle_edit_contact<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let raw = ask(input, "Contact ID to edit: ")?;
    let id = parse_record_id(&raw)?;
    match ctx.book.record(id) {
        Some(record) => println!("Current data:\n{record}"),
        None => return Err(CarnetError::RecordNotFound(id)),
    }

    let name = ask(input, "New name (blank to keep): ")?;
    let birthdate = ask(input, "New birth date, YYYY-MM-DD (blank to keep): ")?;
    let phones_raw = ask(input, "New phone numbers, comma separated (blank to keep): ")?;
    let emails_raw = ask(input, "New email addresses, comma separated (blank to keep): ")?;
    let street = ask(input, "New street (blank to keep): ")?;
    let city = ask(input, "New city (blank to keep): ")?;
    let postal_code = ask(input, "New postal code (blank to keep): ")?;
    let country = ask(input, "New country (blank to keep): ")?;

    let Some(record) = ctx.book.record_mut(id) else {
        return Err(CarnetError::RecordNotFound(id));
    };

    if !name.is_empty() {
        match name.parse::<Name>() {
            Ok(name) => record.set_name(name),
            Err(err) => report(&err),
        }
    }

    if !birthdate.is_empty() {
        match birthdate.parse::<BirthDate>() {
            Ok(birth) => record.set_birthdate(birth),
            Err(err) => report(&err),
        }
    }

    if !phones_raw.is_empty() {
        let mut phones = Vec::new();
        for value in split_list(&phones_raw) {
            match value.parse::<PhoneNumber>() {
                Ok(phone) => phones.push(phone),
                Err(err) => report(&err),
            }
        }
        record.set_phones(phones);
    }

    if !emails_raw.is_empty() {
        let mut emails = Vec::new();
        for value in split_list(&emails_raw) {
            match value.parse::<EmailAddress>() {
                Ok(email) => emails.push(email),
                Err(err) => report(&err),
            }
        }
        record.set_emails(emails);
    }

    // All four blank keeps the current address; anything else replaces it
    // from the four inputs as given.
    if !(street.is_empty() && city.is_empty() && postal_code.is_empty() && country.is_empty()) {
        record.set_address(Address::new(street, city, postal_code, country));
    }

    println!("{}", "Contact updated.".green());
    Ok(())
}

fn handle_list_contacts<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    let all: Vec<&Record> = ctx.book.records().collect();
    ctx.ui.show_contacts(&all);
    Ok(())
}

const BIRTHDAY_WINDOW_DAYS: i64 = 7;

fn handle_upcoming_birthdays<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    let upcoming = ctx.book.with_upcoming_birthdays(BIRTHDAY_WINDOW_DAYS);
    ctx.ui.show_contacts(&upcoming);
    Ok(())
}

fn handle_add_note<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let title = ask(input, "Note title: ")?;
    let content = ask(input, "Note content: ")?;
    ctx.notebook.add(title, content);
    println!("{}", "Note added.".green());
    Ok(())
}

fn handle_list_notes<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    let notes = ctx.notebook.list();
    ctx.ui.show_notes(&notes);
    Ok(())
}

fn handle_edit_note<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let title = ask(input, "Note title to edit: ")?;
    if !ctx.notebook.contains(&title) {
        return Err(CarnetError::NoteNotFound(title));
    }
    let content = ask(input, "New content: ")?;
    ctx.notebook.modify(&title, content)?;
    println!("{}", "Note updated.".green());
    Ok(())
}

fn handle_delete_note<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let title = ask(input, "Note title to delete: ")?;
    ctx.notebook.delete(&title)?;
    println!("{}", "Note deleted.".green());
    Ok(())
}

fn handle_save_notes<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    ctx.notebook.save(&ctx.notes_path)?;
    println!("{}", "Notes saved.".green());
    Ok(())
}

fn handle_load_notes<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    match ctx.notebook.load(&ctx.notes_path)? {
        LoadOutcome::Loaded => println!("{}", "Notes loaded.".green()),
        LoadOutcome::MissingFile => println!("{}", "No notes file found.".dimmed()),
    }
    Ok(())
}

fn handle_tag_note<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let title = ask(input, "Note title to tag: ")?;
    let tag = ask(input, "Tag: ")?;
    tags::tag_note(&mut ctx.notebook, &title, tag)?;
    println!("{}", "Tag added.".green());
    Ok(())
}

fn handle_find_notes_by_tag<U: UserInterface, R: BufRead>(
    ctx: &mut AppContext<U>,
    input: &mut R,
) -> Result<()> {
    let tag = ask(input, "Tag to search for: ")?;
    let found = tags::find_by_tag(&ctx.notebook, &tag);
    ctx.ui.show_notes(&found);
    Ok(())
}

fn handle_sort_notes_by_tags<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    let sorted = tags::sort_by_tags(&ctx.notebook);
    ctx.ui.show_notes(&sorted);
    Ok(())
}

fn handle_quit<U: UserInterface>(ctx: &mut AppContext<U>) -> Result<()> {
    ctx.book.save(&ctx.book_path)?;
    ctx.notebook.save(&ctx.notes_path)?;
    println!("{}", "Saved. Bye!".dimmed());
    Ok(())
}

/// Prints `label`, reads one line, trims it. `None` when stdin is closed.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like [`prompt`], but mid-operation, where a closed stdin is an error.
fn ask<R: BufRead>(input: &mut R, label: &str) -> Result<String> {
    prompt(input, label)?.ok_or_else(|| {
        CarnetError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed",
        ))
    })
}

/// Accepts a bare number or an `ID: 3` fragment pasted from a listing.
fn parse_record_id(raw: &str) -> Result<u64> {
    let cleaned = raw.strip_prefix("ID:").unwrap_or(raw).trim();
    cleaned
        .parse()
        .map_err(|_| CarnetError::Input(format!("`{raw}` is not a contact ID")))
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn report(err: &CarnetError) {
    println!("{}", err.to_string().red());
}

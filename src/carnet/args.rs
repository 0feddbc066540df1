use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carnet")]
#[command(about = "Interactive console assistant for contacts and notes", long_about = None)]
pub struct Cli {
    /// Address book data file
    #[arg(long, default_value = "address_book.pickle")]
    pub book: PathBuf,

    /// Notebook data file
    #[arg(long, default_value = "notes.pickle")]
    pub notes: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

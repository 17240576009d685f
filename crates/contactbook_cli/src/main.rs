//! Contact book REPL entry point.
//!
//! # Responsibility
//! - Parse flags, start logging, open the contact book file.
//! - Hand stdin/stdout to the REPL.
//!
//! # Invariants
//! - A contact book that cannot be opened or loaded never stops the session;
//!   it starts empty on an in-memory database and the file is left untouched.

mod args;
mod dispatch;
mod repl;

use anyhow::Context;
use args::Args;
use clap::Parser;
use contactbook_core::db::{open_db, open_db_in_memory};
use contactbook_core::{
    default_log_level, init_logging, ContactService, ContactStore, Directory, SqliteContactStore,
    StoreResult,
};
use log::{info, warn};
use rusqlite::Connection;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("contactbook: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if !args.no_log {
        start_logging(args);
    }

    let (conn, directory) = open_contact_book(args)?;
    let store = SqliteContactStore::try_new(&conn).context("contact book is not initialized")?;
    let mut service = ContactService::with_directory(store, directory);
    info!(
        "event=session_start module=cli status=ok contacts={}",
        service.directory().len()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    repl::run(&mut service, stdin.lock(), &mut stdout, || {
        chrono::Local::now().date_naive()
    })
    .context("terminal i/o failed")
}

fn start_logging(args: &Args) {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let result = args
        .resolved_log_dir()
        .map_err(|err| err.to_string())
        .and_then(|dir| {
            init_logging(&level, &dir.to_string_lossy()).map_err(|err| err.to_string())
        });
    if let Err(err) = result {
        eprintln!("contactbook: logging disabled: {err}");
    }
}

/// Opens the contact book file and loads it.
///
/// Either failure switches to an empty in-memory book, so later saves can
/// never overwrite a file whose contents were not loaded.
fn open_contact_book(args: &Args) -> anyhow::Result<(Connection, Directory)> {
    match open_db(&args.db) {
        Ok(conn) => match load_directory(&conn) {
            Ok(directory) => return Ok((conn, directory)),
            Err(err) => warn!(
                "event=contact_book_load module=cli status=fallback_memory error={}",
                err
            ),
        },
        Err(err) => warn!(
            "event=contact_book_open module=cli status=fallback_memory error_code={} error={}",
            err.code(),
            err
        ),
    }
    let conn = open_db_in_memory().context("failed to open in-memory contact book")?;
    Ok((conn, Directory::new()))
}

fn load_directory(conn: &Connection) -> StoreResult<Directory> {
    SqliteContactStore::try_new(conn)?.load()
}

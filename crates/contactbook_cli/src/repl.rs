//! Read-eval-print loop over any line source.

use crate::dispatch::{dispatch, Reply};
use chrono::NaiveDate;
use contactbook_core::{ContactService, ContactStore};
use log::{info, warn};
use std::io::{BufRead, Write};

const PROMPT: &str = "Enter command: ";

/// Runs until `close`/`exit` or end of input, then saves once more.
pub fn run<S, R, W>(
    service: &mut ContactService<S>,
    input: R,
    output: &mut W,
    today: impl Fn() -> NaiveDate,
) -> std::io::Result<()>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Welcome to the assistant bot!")?;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            info!("event=repl_end module=cli status=ok reason=eof");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match dispatch(service, &line, today()) {
            Reply::Continue(text) => writeln!(output, "{text}")?,
            Reply::Exit(text) => {
                writeln!(output, "{text}")?;
                info!("event=repl_end module=cli status=ok reason=exit");
                break;
            }
        }
    }

    if let Err(err) = service.save() {
        warn!("event=exit_save module=cli status=error error={err}");
        writeln!(output, "Warning: contacts could not be saved: {err}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_core::db::open_db_in_memory;
    use contactbook_core::SqliteContactStore;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn session_prints_replies_and_stops_at_exit() {
        let conn = open_db_in_memory().unwrap();
        let mut service = ContactService::open(SqliteContactStore::try_new(&conn).unwrap())
            .unwrap();
        let input = Cursor::new("hello\n\nadd Ann 0123456789\nexit\nall\n");
        let mut output = Vec::new();

        run(&mut service, input, &mut output, today).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Welcome to the assistant bot!\n"));
        assert!(text.contains("How can I help you?"));
        assert!(text.contains("Contact Ann added with phone 0123456789."));
        assert!(text.ends_with("Good bye!\n"));
        assert!(!text.contains("Contact name: Ann"));
    }

    #[test]
    fn end_of_input_saves_the_directory() {
        let conn = open_db_in_memory().unwrap();
        {
            let mut service = ContactService::open(SqliteContactStore::try_new(&conn).unwrap())
                .unwrap();
            let mut output = Vec::new();
            run(
                &mut service,
                Cursor::new("add Ann 0123456789\n"),
                &mut output,
                today,
            )
            .unwrap();
        }

        let reloaded = ContactService::open(SqliteContactStore::try_new(&conn).unwrap())
            .unwrap();
        assert_eq!(reloaded.directory().len(), 1);
    }
}

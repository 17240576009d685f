//! Command dispatch and user-facing messages.
//!
//! # Responsibility
//! - Route a parsed `Command` to the matching `ContactService` call.
//! - Turn every typed result or error into exactly one printable reply.
//!
//! # Invariants
//! - No error escapes `dispatch`; every failure becomes a message.

use chrono::NaiveDate;
use contactbook_core::{
    parse_command, AddOutcome, Command, CommandError, ContactError, ContactService, ContactStore,
    FieldError, DATE_FORMAT_HINT,
};

/// What the REPL should do after one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Exit(String),
}

/// Parses and executes one input line against `service`.
pub fn dispatch<S: ContactStore>(
    service: &mut ContactService<S>,
    line: &str,
    today: NaiveDate,
) -> Reply {
    match parse_command(line) {
        Ok(Command::Exit) => Reply::Exit("Good bye!".to_string()),
        Ok(command) => Reply::Continue(execute(service, command, today)),
        Err(err) => Reply::Continue(render_command_error(&err)),
    }
}

fn execute<S: ContactStore>(
    service: &mut ContactService<S>,
    command: Command,
    today: NaiveDate,
) -> String {
    match command {
        Command::Hello => "How can I help you?".to_string(),
        Command::Help => render_help(),
        Command::Add { name, phone } => match service.add_contact(&name, &phone) {
            Ok(AddOutcome::Created(_)) => format!("Contact {name} added with phone {phone}."),
            Ok(AddOutcome::Appended(_)) => {
                format!("Phone {phone} added to existing contact {name}.")
            }
            Err(err) => render_contact_error(&err),
        },
        Command::Change { name, old, new } => match service.change_phone(&name, &old, &new) {
            Ok(()) => format!(
                "Old phone {old} was replaced by new phone {new} for contact {name}."
            ),
            Err(err) => render_contact_error(&err),
        },
        Command::RemovePhone { name, phone } => match service.remove_phone(&name, &phone) {
            Ok(0) => format!("Phone {phone} was not listed for contact {name}."),
            Ok(_) => format!("Phone {phone} successfully removed from contact {name}."),
            Err(err) => render_contact_error(&err),
        },
        Command::Phone { name } => match service.contact(&name) {
            Ok(record) => format!(
                "Phone numbers for contact {name}: {}",
                record.render_phones()
            ),
            Err(err) => render_contact_error(&err),
        },
        Command::All => {
            let records = service.all();
            if records.is_empty() {
                return "There are no contacts in the list.".to_string();
            }
            records
                .iter()
                .map(|record| record.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::AddBirthday { name, date } => match service.add_birthday(&name, &date) {
            Ok(birthday) => format!("Birthday {birthday} successfully added to contact {name}."),
            Err(err) => render_contact_error(&err),
        },
        Command::ShowBirthday { name } => match service.birthday(&name) {
            Ok(Some(birthday)) => format!("{name}'s birthday is {birthday}"),
            Ok(None) => format!("{name}'s birthday is not set"),
            Err(err) => render_contact_error(&err),
        },
        Command::Birthdays => {
            let upcoming = service.upcoming_birthdays(today);
            if upcoming.is_empty() {
                return "No contacts with upcoming birthdays".to_string();
            }
            upcoming
                .iter()
                .map(|item| {
                    format!(
                        "name {}, congratulation date: {}",
                        item.name, item.congratulation_date
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::Delete { name } => match service.delete_contact(&name) {
            Ok(_) => format!("Record {name} successfully deleted."),
            Err(ContactError::ContactNotFound(_)) => {
                format!("Record with name {name} not found in contacts.")
            }
            Err(err) => render_contact_error(&err),
        },
        Command::Exit => "Good bye!".to_string(),
    }
}

fn render_command_error(err: &CommandError) -> String {
    match err {
        CommandError::Empty | CommandError::Unknown(_) => "Invalid command.".to_string(),
        CommandError::Arity { command, usage } => {
            format!("Give me the command and arguments: {command} {usage}")
        }
    }
}

fn render_contact_error(err: &ContactError) -> String {
    match err {
        ContactError::ContactNotFound(name) => format!("Contact with name {name} does not exist."),
        ContactError::PhoneNotFound(phone) => format!("Phone {phone} not found for this contact."),
        ContactError::DuplicatePhone(phone) => {
            format!("Phone {phone} already exists for this contact.")
        }
        ContactError::Validation(FieldError::EmptyName) => "Please enter contact name.".to_string(),
        ContactError::Validation(FieldError::InvalidPhone(phone)) => {
            format!("Phone {phone} must be a number of length 10.")
        }
        ContactError::Validation(FieldError::InvalidDateFormat(date)) => {
            format!("Birthdate {date} must match format {DATE_FORMAT_HINT}.")
        }
    }
}

fn render_help() -> String {
    contactbook_core::command::USAGE
        .iter()
        .map(|(command, usage)| {
            if usage.is_empty() {
                (*command).to_string()
            } else {
                format!("{command} {usage}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

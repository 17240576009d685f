//! Line-oriented command parsing.
//!
//! # Responsibility
//! - Split one input line into a command word and arguments.
//! - Check arity per command and return a typed `Command`.
//!
//! # Invariants
//! - The command word is matched case-insensitively; arguments keep case.
//! - Missing arguments are an `Arity` error, never a panic.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hello,
    Help,
    Add { name: String, phone: String },
    Change { name: String, old: String, new: String },
    RemovePhone { name: String, phone: String },
    Phone { name: String },
    All,
    AddBirthday { name: String, date: String },
    ShowBirthday { name: String },
    Birthdays,
    Delete { name: String },
    Exit,
}

/// Failure to turn a line into a `Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Arity {
        command: &'static str,
        usage: &'static str,
    },
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command `{word}`"),
            Self::Arity { command, usage } => write!(f, "usage: {command} {usage}"),
        }
    }
}

impl Error for CommandError {}

/// Usage lines printed by `help`, in table order.
pub const USAGE: &[(&str, &str)] = &[
    ("hello", ""),
    ("add", "<name> <phone>"),
    ("change", "<name> <old_phone> <new_phone>"),
    ("remove-phone", "<name> <phone>"),
    ("phone", "<name>"),
    ("all", ""),
    ("add-birthday", "<name> <YYYY.MM.DD>"),
    ("show-birthday", "<name>"),
    ("birthdays", ""),
    ("delete", "<name>"),
    ("close | exit", ""),
];

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let word = words.next().ok_or(CommandError::Empty)?.to_lowercase();
    let args: Vec<String> = words.map(str::to_string).collect();

    let command = match word.as_str() {
        "hello" => Command::Hello,
        "help" => Command::Help,
        "close" | "exit" => Command::Exit,
        "all" => Command::All,
        "birthdays" => Command::Birthdays,
        "add" => {
            let [name, phone] = take_at_least::<2>(args, "add", "<name> <phone>")?;
            Command::Add { name, phone }
        }
        "change" => {
            let [name, old, new] =
                take_exact::<3>(args, "change", "<name> <old_phone> <new_phone>")?;
            Command::Change { name, old, new }
        }
        "remove-phone" => {
            let [name, phone] = take_exact::<2>(args, "remove-phone", "<name> <phone>")?;
            Command::RemovePhone { name, phone }
        }
        "phone" => {
            let [name] = take_at_least::<1>(args, "phone", "<name>")?;
            Command::Phone { name }
        }
        "add-birthday" => {
            let [name, date] =
                take_exact::<2>(args, "add-birthday", "<name> <YYYY.MM.DD>")?;
            Command::AddBirthday { name, date }
        }
        "show-birthday" => {
            let [name] = take_at_least::<1>(args, "show-birthday", "<name>")?;
            Command::ShowBirthday { name }
        }
        "delete" => {
            let [name] = take_exact::<1>(args, "delete", "<name>")?;
            Command::Delete { name }
        }
        _ => return Err(CommandError::Unknown(word)),
    };
    Ok(command)
}

/// First `N` arguments; trailing extras are ignored.
fn take_at_least<const N: usize>(
    mut args: Vec<String>,
    command: &'static str,
    usage: &'static str,
) -> Result<[String; N], CommandError> {
    if args.len() < N {
        return Err(CommandError::Arity { command, usage });
    }
    args.truncate(N);
    take_exact(args, command, usage)
}

fn take_exact<const N: usize>(
    args: Vec<String>,
    command: &'static str,
    usage: &'static str,
) -> Result<[String; N], CommandError> {
    <[String; N]>::try_from(args).map_err(|_| CommandError::Arity { command, usage })
}

//! Line commands typed at the terminal.
//!
//! ```text
//! join <room>                  switch to a room
//! add <text> [@YYYY-MM-DD]     add a task, optionally with a due date
//! done <id>                    toggle a task's completion
//! rm <id>                      remove a task
//! edit <id>                    start editing a task
//! save <text> [@YYYY-MM-DD|@none]  confirm the edit
//! cancel                       discard the edit
//! rooms | help | quit
//! ```
//!
//! A trailing `@` word is a due date only when it parses as one; otherwise
//! it stays part of the text.

use chrono::NaiveDate;
use taskroom_core::session::Intent;
use taskroom_core::{DueChange, RoomError, RoomName, RoomResult, TaskId};

pub const USAGE: &str = "\
Commands:
  join <room>                  switch to a room
  add <text> [@YYYY-MM-DD]     add a task, optionally with a due date
  done <id>                    toggle a task's completion
  rm <id>                      remove a task
  edit <id>                    start editing a task
  save <text> [@YYYY-MM-DD]    confirm the edit (no date keeps the current
                               one, @none clears it)
  cancel                       discard the edit
  rooms                        list your rooms
  help                         show this help
  quit                         leave";

/// A parsed terminal command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(RoomName),
    Add {
        text: String,
        due_date: Option<NaiveDate>,
    },
    Toggle(TaskId),
    Remove(TaskId),
    Edit(TaskId),
    Save {
        text: String,
        due: DueChange,
    },
    Cancel,
    Rooms,
    Help,
    Quit,
}

impl Command {
    /// Intents this command feeds to the view, in order
    ///
    /// Local commands (rooms, help, quit) produce none.
    pub fn into_intents(self) -> Vec<Intent> {
        match self {
            Command::Join(room) => vec![Intent::Join(room)],
            // Typing the line counts as input in the entry form, then Enter submits it
            Command::Add { text, due_date } => {
                vec![Intent::Input { text, due_date }, Intent::SubmitDraft]
            }
            Command::Toggle(id) => vec![Intent::Toggle(id)],
            Command::Remove(id) => vec![Intent::Remove(id)],
            Command::Edit(id) => vec![Intent::BeginEdit(id)],
            Command::Save { text, due } => vec![Intent::ConfirmEdit { text, due }],
            Command::Cancel => vec![Intent::CancelEdit],
            Command::Rooms | Command::Help | Command::Quit => Vec::new(),
        }
    }
}

/// Parse one line of input; blank lines yield `None`
pub fn parse(line: &str) -> RoomResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "join" => Command::Join(RoomName::new(require(rest, "join <room>")?)),
        "add" => {
            let (text, due_date) = match split_tag(rest) {
                (head, Some(tag)) => match parse_date(tag) {
                    Some(due) => (head, Some(due)),
                    None => (rest, None),
                },
                (_, None) => (rest, None),
            };
            Command::Add {
                text: require(text, "add <text> [@YYYY-MM-DD]")?.to_string(),
                due_date,
            }
        }
        "done" | "toggle" => Command::Toggle(task_id(rest, "done <id>")?),
        "rm" | "remove" => Command::Remove(task_id(rest, "rm <id>")?),
        "edit" => Command::Edit(task_id(rest, "edit <id>")?),
        "save" => {
            let (text, due) = match split_tag(rest) {
                (head, Some("none")) => (head, DueChange::Clear),
                (head, Some(tag)) => match parse_date(tag) {
                    Some(due) => (head, DueChange::Set(due)),
                    None => (rest, DueChange::Keep),
                },
                (_, None) => (rest, DueChange::Keep),
            };
            Command::Save {
                text: text.to_string(),
                due,
            }
        }
        "cancel" => Command::Cancel,
        "rooms" => Command::Rooms,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(RoomError::InvalidCommand(format!(
                "unknown command '{}' (try 'help')",
                other
            )))
        }
    };

    Ok(Some(command))
}

fn require<'a>(arg: &'a str, usage: &str) -> RoomResult<&'a str> {
    if arg.is_empty() {
        Err(RoomError::InvalidCommand(format!("usage: {}", usage)))
    } else {
        Ok(arg)
    }
}

fn task_id(arg: &str, usage: &str) -> RoomResult<TaskId> {
    let arg = require(arg, usage)?;
    if arg.contains(char::is_whitespace) {
        return Err(RoomError::InvalidCommand(format!("usage: {}", usage)));
    }
    Ok(TaskId::from(arg))
}

/// Split a trailing `@word` off the text, returning the word without `@`
fn split_tag(rest: &str) -> (&str, Option<&str>) {
    let (head, last) = match rest.rsplit_once(char::is_whitespace) {
        Some((head, last)) => (head.trim_end(), last),
        None => ("", rest),
    };
    match last.strip_prefix('@') {
        Some(tag) => (head, Some(tag)),
        None => (rest, None),
    }
}

fn parse_date(tag: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(tag, "%Y-%m-%d").ok()
}

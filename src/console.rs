use thiserror::Error;

use crate::domain::{FilterMode, Toggle};

pub const HELP: &str = "\
commands:
  filter all|promoted|normal   choose which cards to show
  toggle unviewed|hidden|applied
  add <phrase>                 block cards containing <phrase>
  remove <phrase>              unblock <phrase>
  phrases                      list blocked phrases
  block <job-id>               block the title of a card
  dismiss <job-id>             host dismissed a card
  next                         open the first visible card
  status                       show current settings
  help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Filter(FilterMode),
    Toggle(Toggle),
    Add(String),
    Remove(String),
    Phrases,
    /// Job id as shown on the card.
    Block(String),
    Dismiss(String),
    Next,
    Status,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{command}` does not understand `{value}`")]
    InvalidArgument { command: &'static str, value: String },
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "filter" => {
            let value = required("filter", rest)?;
            FilterMode::parse(value).map(Command::Filter).ok_or_else(|| {
                CommandError::InvalidArgument {
                    command: "filter",
                    value: value.to_string(),
                }
            })?
        }
        "toggle" => {
            let value = required("toggle", rest)?;
            Toggle::parse(value)
                .map(Command::Toggle)
                .ok_or_else(|| CommandError::InvalidArgument {
                    command: "toggle",
                    value: value.to_string(),
                })?
        }
        "add" => Command::Add(required("add", rest)?.to_string()),
        "remove" => Command::Remove(required("remove", rest)?.to_string()),
        "phrases" => Command::Phrases,
        "block" => Command::Block(required("block", rest)?.to_string()),
        "dismiss" => Command::Dismiss(required("dismiss", rest)?.to_string()),
        "next" => Command::Next,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

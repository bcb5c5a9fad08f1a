// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Input commands
//
// A line of user input is parsed into a `Command` (a key press, a click on a
// target, or a client-level request). `dispatch` turns a command plus the
// current state into the `Action` the app loop performs, or `None` when the
// command does nothing in that state.

use crate::error::CatcherError;
use crate::mailbox::{Direction, Mailbox, TabStep};
use crate::models::{Format, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
}

/// Things that can be clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Row(MessageId),
    FormatTab(Format),
    ClearButton,
    QuitButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Key { key: Key, ctrl: bool },
    Click(Target),
    Search(String),
    Height(u32),
    Open,
    List,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Select(MessageId),
    Move { direction: Direction, extreme: bool },
    CycleTab(TabStep),
    ShowFormat(Format),
    DeleteSelected(MessageId),
    RequestClear,
    RequestQuit,
    Search(String),
    SaveHeight(u32),
    OpenBody(String),
    Render,
    Help,
    Exit,
}

pub const HELP: &str = "\
Commands:
  up | k, down | j        move the selection one visible row
  top, bottom             jump to the first or last visible row
  left | h, right | l     previous or next format tab (also: tab prev|next)
  select <id>             select a message
  delete | d              delete the selected message
  search <query> | /<q>   filter rows; an empty query shows everything
  format <name>           show html, plain or source
  open                    print the address of the selected body
  height <n>              list rows to show (saved)
  list                    redraw
  clear                   delete all messages
  quit                    quit the server
  help                    this text
  exit                    leave the client";

fn key(key: Key) -> Command {
    Command::Key { key, ctrl: false }
}

fn ctrl(key: Key) -> Command {
    Command::Key { key, ctrl: true }
}

/// Parse one input line. Blank lines redraw.
pub fn parse(line: &str) -> Result<Command, CatcherError> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Command::Search(query.trim().to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" | "list" | "ls" => Command::List,
        "up" | "k" => key(Key::ArrowUp),
        "down" | "j" => key(Key::ArrowDown),
        "top" => ctrl(Key::ArrowUp),
        "bottom" => ctrl(Key::ArrowDown),
        "left" | "h" => key(Key::ArrowLeft),
        "right" | "l" => key(Key::ArrowRight),
        "tab" => match rest {
            "next" | "" => key(Key::ArrowRight),
            "prev" | "previous" => key(Key::ArrowLeft),
            other => {
                return Err(CatcherError::InvalidCommand(format!(
                    "tab expects next or prev, got '{}'",
                    other
                )))
            }
        },
        "delete" | "d" | "del" => key(Key::Delete),
        "backspace" => key(Key::Backspace),
        "select" | "s" if !rest.is_empty() => Command::Click(Target::Row(MessageId::new(rest))),
        "search" => Command::Search(rest.to_string()),
        "format" | "f" if !rest.is_empty() => {
            Command::Click(Target::FormatTab(Format::from(rest.to_lowercase())))
        }
        "clear" => Command::Click(Target::ClearButton),
        "quit" => Command::Click(Target::QuitButton),
        "height" => {
            let height = rest.parse::<u32>().map_err(|_| {
                CatcherError::InvalidCommand(format!("height expects a number, got '{}'", rest))
            })?;
            Command::Height(height)
        }
        "open" => Command::Open,
        "help" | "?" => Command::Help,
        "exit" | "q" => Command::Exit,
        "select" | "s" | "format" | "f" => {
            return Err(CatcherError::InvalidCommand(format!("{} needs an argument", word)))
        }
        _ => {
            return Err(CatcherError::InvalidCommand(format!(
                "Unknown command '{}', try 'help'",
                word
            )))
        }
    };
    Ok(command)
}

/// Decide what `command` does given `mailbox`. Does not mutate anything.
pub fn dispatch(command: Command, mailbox: &Mailbox) -> Option<Action> {
    match command {
        Command::Key { key, ctrl } => match key {
            Key::ArrowUp => Some(Action::Move { direction: Direction::Up, extreme: ctrl }),
            Key::ArrowDown => Some(Action::Move { direction: Direction::Down, extreme: ctrl }),
            Key::ArrowLeft => Some(Action::CycleTab(TabStep::Previous)),
            Key::ArrowRight => Some(Action::CycleTab(TabStep::Next)),
            Key::Backspace | Key::Delete => {
                mailbox.selected_id().cloned().map(Action::DeleteSelected)
            }
        },
        Command::Click(Target::Row(id)) => {
            mailbox.list().contains(&id).then_some(Action::Select(id))
        }
        Command::Click(Target::FormatTab(format)) => {
            mailbox.tabs().is_enabled(&format).then_some(Action::ShowFormat(format))
        }
        Command::Click(Target::ClearButton) => Some(Action::RequestClear),
        Command::Click(Target::QuitButton) => Some(Action::RequestQuit),
        Command::Search(query) => Some(Action::Search(query)),
        Command::Height(height) => Some(Action::SaveHeight(height)),
        Command::Open => mailbox.body_path().map(Action::OpenBody),
        Command::List => Some(Action::Render),
        Command::Help => Some(Action::Help),
        Command::Exit => Some(Action::Exit),
    }
}

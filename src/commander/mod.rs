// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line input logic and state management.
//!
//! This module implements a command-line component, handling a text input
//! component, and dispatching the corresponding application event or task
//! when typing is finished and the line is submitted.
//!
//! The line is opened with `:` to enter a command or with `/` to enter a
//! search query.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use thiserror::Error;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    MainView,
    controller::{ControlEvent, UserCommand},
    events::AppEvent,
    tasks::AppTask,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommanderMode {
    Command,
    Search,
}

impl CommanderMode {
    pub(crate) fn prompt(self) -> char {
        match self {
            CommanderMode::Command => ':',
            CommanderMode::Search => '/',
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(String),

    #[error("Invalid argument for {command}: {value}")]
    InvalidArgument { command: String, value: String },
}

#[derive(Debug, PartialEq)]
enum Command {
    Quit,
    Control(UserCommand),
    Search(String),
    View(MainView),
}

pub(crate) struct Commander {
    mode: Option<CommanderMode>,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            mode: None,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.mode.is_some()
    }

    pub(crate) fn mode(&self) -> Option<CommanderMode> {
        self.mode
    }

    /// Offers an input event to the command line.
    ///
    /// Returns `true` if the event was consumed.
    pub(crate) fn handle_event(
        &mut self,
        event: &Event,
        task_tx: &Sender<AppTask>,
        event_tx: &Sender<AppEvent>,
    ) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        let Some(mode) = self.mode else {
            self.mode = match key_event.code {
                KeyCode::Char(':') => Some(CommanderMode::Command),
                KeyCode::Char('/') => Some(CommanderMode::Search),
                _ => return Ok(false),
            };
            return Ok(true);
        };

        match key_event.code {
            KeyCode::Esc => self.close(),

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.close();

                if !buffer.is_empty() {
                    self.submit(mode, &buffer, task_tx, event_tx)?;
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }

    fn close(&mut self) {
        self.mode = None;
        self.input.reset();
    }

    fn submit(
        &self,
        mode: CommanderMode,
        buffer: &str,
        task_tx: &Sender<AppTask>,
        event_tx: &Sender<AppEvent>,
    ) -> Result<()> {
        let command = match mode {
            CommanderMode::Search => Ok(Command::Search(buffer.to_string())),
            CommanderMode::Command => parse_command(buffer),
        };

        log::debug!("Command line '{}' parsed as {:?}", buffer, command);

        match command {
            Ok(Command::Quit) => event_tx.send(AppEvent::QuitRequested)?,
            Ok(Command::Control(command)) => {
                event_tx.send(AppEvent::Control(ControlEvent::User(command)))?
            }
            Ok(Command::Search(query)) => task_tx.send(AppTask::Search(query))?,
            Ok(Command::View(view)) => event_tx.send(AppEvent::SetMainView(view))?,
            Err(e) => event_tx.send(AppEvent::Error(e.to_string()))?,
        }

        Ok(())
    }
}

fn parse_command(buffer: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let command = match parts.as_slice() {
        ["q"] | ["quit"] => Command::Quit,

        ["p"] => Command::Control(UserCommand::TogglePlayPause),
        ["play"] => Command::Control(UserCommand::Play),
        ["pause"] => Command::Control(UserCommand::Pause),
        ["n"] | ["next"] => Command::Control(UserCommand::Next),
        ["prev"] => Command::Control(UserCommand::Previous),

        ["shuffle"] => Command::Control(UserCommand::ToggleShuffle),
        ["repeat"] => Command::Control(UserCommand::CycleRepeat),
        ["video"] => Command::Control(UserCommand::ToggleVideo),

        ["vol", level] => Command::Control(UserCommand::SetVolume(parse_arg("vol", level)?)),
        ["seek", percent] => {
            let percent: f64 = parse_arg("seek", percent)?;
            Command::Control(UserCommand::Seek(percent / 100.0))
        }

        ["s" | "search", query_parts @ ..] if !query_parts.is_empty() => {
            Command::Search(query_parts.join(" "))
        }

        ["1"] => Command::View(MainView::History),
        ["2"] => Command::View(MainView::Search),

        [cmd @ ("vol" | "seek" | "s" | "search")] => {
            return Err(CommandError::MissingArgument(cmd.to_string()));
        }
        [cmd, ..] => return Err(CommandError::Unknown(cmd.to_string())),
        [] => return Err(CommandError::Unknown(String::new())),
    };

    Ok(command)
}

fn parse_arg<T: std::str::FromStr>(command: &str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command: command.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(commander: &mut Commander, line: &str, tx: &Sender<AppTask>, ev: &Sender<AppEvent>) {
        for c in line.chars() {
            assert!(commander.handle_event(&key(KeyCode::Char(c)), tx, ev).unwrap());
        }
        assert!(commander.handle_event(&key(KeyCode::Enter), tx, ev).unwrap());
    }

    #[test]
    fn parses_playback_commands() {
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("n"), Ok(Command::Control(UserCommand::Next)));
        assert_eq!(parse_command("prev"), Ok(Command::Control(UserCommand::Previous)));
        assert_eq!(
            parse_command("vol 30"),
            Ok(Command::Control(UserCommand::SetVolume(30)))
        );
        assert_eq!(
            parse_command("seek 50"),
            Ok(Command::Control(UserCommand::Seek(0.5)))
        );
    }

    #[test]
    fn search_command_joins_query() {
        assert_eq!(
            parse_command("s lofi hip hop"),
            Ok(Command::Search("lofi hip hop".to_string()))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(
            parse_command("vol"),
            Err(CommandError::MissingArgument("vol".to_string()))
        );
        assert_eq!(
            parse_command("vol loud"),
            Err(CommandError::InvalidArgument {
                command: "vol".to_string(),
                value: "loud".to_string()
            })
        );
    }

    #[test]
    fn slash_submits_search_task() {
        let (task_tx, task_rx) = mpsc::channel();
        let (event_tx, _event_rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(commander.handle_event(&key(KeyCode::Char('/')), &task_tx, &event_tx).unwrap());
        assert_eq!(commander.mode(), Some(CommanderMode::Search));

        type_line(&mut commander, "lofi", &task_tx, &event_tx);

        assert!(!commander.active());
        assert_eq!(task_rx.try_recv().unwrap(), AppTask::Search("lofi".to_string()));
    }

    #[test]
    fn colon_submits_command_event() {
        let (task_tx, _task_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &task_tx, &event_tx).unwrap();
        type_line(&mut commander, "shuffle", &task_tx, &event_tx);

        assert!(matches!(
            event_rx.try_recv().unwrap(),
            AppEvent::Control(ControlEvent::User(UserCommand::ToggleShuffle))
        ));
    }

    #[test]
    fn escape_closes_without_submitting() {
        let (task_tx, task_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &task_tx, &event_tx).unwrap();
        commander.handle_event(&key(KeyCode::Char('q')), &task_tx, &event_tx).unwrap();
        commander.handle_event(&key(KeyCode::Esc), &task_tx, &event_tx).unwrap();

        assert!(!commander.active());
        assert!(event_rx.try_recv().is_err());
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn inactive_commander_ignores_other_keys() {
        let (task_tx, _task_rx) = mpsc::channel();
        let (event_tx, _event_rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('n')), &task_tx, &event_tx).unwrap());
    }
}

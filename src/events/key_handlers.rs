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

//! Keyboard input routing.
//!
//! A key press is offered, in order, to the quit confirmation prompt, the
//! command line, the list in the active view, and finally the global
//! bindings.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MediaKeyCode};

use crate::{
    App, MainView,
    components::TrackListAction,
    controller::{ControlEvent, MediaAction, UserCommand},
    events::AppEvent,
};

#[derive(Debug, PartialEq)]
enum KeyAction {
    Control(UserCommand),
    View(MainView),
    ToggleView,
    Quit,
}

/// Maps keyboard input to application actions and playback commands.
///
/// # Errors
///
/// Returns an error if an event cannot be posted or the controller cannot
/// reach the engine.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    app.status = None;

    if app.confirm_quit {
        return process_confirm_key(app, key);
    }

    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.task_tx, &app.event_tx)? {
        return Ok(());
    }

    let view = match app.main_view {
        MainView::History => &mut app.history_view,
        MainView::Search => &mut app.search_view,
    };
    if let Some(TrackListAction::Activate(index)) = view.process_event(&event) {
        return activate_track(app, index);
    }

    match map_global_key(key, app.config.seek_step, app.config.volume_step) {
        Some(KeyAction::Control(command)) => app.controller.dispatch(ControlEvent::User(command))?,
        Some(KeyAction::View(view)) => app.event_tx.send(AppEvent::SetMainView(view))?,
        Some(KeyAction::ToggleView) => {
            let view = match app.main_view {
                MainView::History => MainView::Search,
                MainView::Search => MainView::History,
            };
            app.event_tx.send(AppEvent::SetMainView(view))?
        }
        Some(KeyAction::Quit) => app.event_tx.send(AppEvent::QuitRequested)?,
        None => {}
    }

    Ok(())
}

fn process_confirm_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.event_tx.send(AppEvent::ExitApplication)?,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_quit = false,
        _ => {}
    }

    Ok(())
}

fn activate_track(app: &mut App, index: usize) -> Result<()> {
    let command = match app.main_view {
        MainView::History => UserCommand::SelectHistory(index),
        MainView::Search => match app.search_view.track(index) {
            Some(track) => UserCommand::PlayTrack(track.clone()),
            None => return Ok(()),
        },
    };

    app.controller.dispatch(ControlEvent::User(command))
}

fn map_global_key(key: KeyEvent, seek_step: f64, volume_step: i32) -> Option<KeyAction> {
    let action = match key.code {
        KeyCode::Char('q') => KeyAction::Quit,

        KeyCode::Char('1') => KeyAction::View(MainView::History),
        KeyCode::Char('2') => KeyAction::View(MainView::Search),
        KeyCode::Tab => KeyAction::ToggleView,

        KeyCode::Char(' ') => KeyAction::Control(UserCommand::TogglePlayPause),
        KeyCode::Char('n') => KeyAction::Control(UserCommand::Next),
        KeyCode::Char('p') => KeyAction::Control(UserCommand::Previous),
        KeyCode::Char('s') => KeyAction::Control(UserCommand::ToggleShuffle),
        KeyCode::Char('r') => KeyAction::Control(UserCommand::CycleRepeat),
        KeyCode::Char('v') => KeyAction::Control(UserCommand::ToggleVideo),

        KeyCode::Char(',') | KeyCode::Left => KeyAction::Control(UserCommand::SeekBy(-seek_step)),
        KeyCode::Char('.') | KeyCode::Right => KeyAction::Control(UserCommand::SeekBy(seek_step)),
        KeyCode::Char('-') => KeyAction::Control(UserCommand::AdjustVolume(-volume_step)),
        KeyCode::Char('=') | KeyCode::Char('+') => {
            KeyAction::Control(UserCommand::AdjustVolume(volume_step))
        }

        KeyCode::Media(media_key) => KeyAction::Control(map_media_key(media_key)?),

        _ => return None,
    };

    Some(action)
}

fn map_media_key(media_key: MediaKeyCode) -> Option<UserCommand> {
    let command = match media_key {
        MediaKeyCode::PlayPause => UserCommand::TogglePlayPause,
        MediaKeyCode::Play => MediaAction::Play.into(),
        MediaKeyCode::Pause | MediaKeyCode::Stop => MediaAction::Pause.into(),
        MediaKeyCode::TrackNext => MediaAction::NextTrack.into(),
        MediaKeyCode::TrackPrevious => MediaAction::PreviousTrack.into(),
        _ => return None,
    };

    Some(command)
}

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

//! Application event loop.
//!
//! Every input to the application arrives on a single channel as an
//! [`AppEvent`]: key presses from the input thread, lifecycle events from the
//! engine worker, transport ticks, notifications published by the
//! controller, and results from the task worker. [`process_events`] handles
//! them one at a time and redraws after each.

mod handlers;
mod key_handlers;

use handlers::*;
use key_handlers::process_key_event;

use std::{io::Stdout, sync::mpsc::Sender};

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App, MainView,
    controller::{ControlEvent, Notification, Notifier},
    model::Track,
    player::EngineEvent,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    Control(ControlEvent),
    Engine(EngineEvent),
    Notify(Notification),

    SearchResultsReady(String, Vec<Track>),

    SetMainView(MainView),

    Redraw,

    QuitRequested,
    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Controller notifications are posted to the event loop and applied to the
/// view state there.
impl Notifier for Sender<AppEvent> {
    fn notify(&mut self, notification: Notification) {
        if self.send(AppEvent::Notify(notification)).is_err() {
            log::debug!("Event channel closed, notification dropped");
        }
    }
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until an exit event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            log::info!("Exiting");
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Control(control_event) => app.controller.dispatch(control_event)?,
            AppEvent::Engine(engine_event) => {
                app.controller.dispatch(ControlEvent::Engine(engine_event))?
            }
            AppEvent::Notify(notification) => handle_notification(app, notification),
            AppEvent::SearchResultsReady(query, tracks) => {
                handle_search_results_ready(app, query, tracks)?
            }
            AppEvent::SetMainView(view) => handle_set_main_view(app, view),
            AppEvent::QuitRequested => handle_quit_requested(app)?,
            AppEvent::Error(message) => handle_error(app, message),
            AppEvent::FatalError(message) => return Err(anyhow!(message)),
            AppEvent::Redraw | AppEvent::ExitApplication => {}
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

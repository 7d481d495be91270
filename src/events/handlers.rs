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

use anyhow::Result;

use crate::{
    App, MainView,
    controller::Notification,
    events::AppEvent,
    model::Track,
};

pub(super) fn handle_notification(app: &mut App, notification: Notification) {
    match notification {
        Notification::HistoryChanged { tracks, index } => {
            app.history_view.set_tracks(tracks, index)
        }
        Notification::NowPlaying(now_playing) => app.now_playing = Some(now_playing),
        Notification::Transport(progress) => app.progress = progress,
        Notification::Controls(controls) => app.controls = controls,
    }
}

pub(super) fn handle_search_results_ready(
    app: &mut App,
    query: String,
    tracks: Vec<Track>,
) -> Result<()> {
    if query.trim().is_empty() {
        return Ok(());
    }

    app.status = Some(if tracks.is_empty() {
        format!("No results for '{}'", query)
    } else {
        format!("{} results for '{}'", tracks.len(), query)
    });

    app.search_view.set_tracks(tracks, None);
    app.search_view.reset_selection();
    app.event_tx.send(AppEvent::SetMainView(MainView::Search))?;

    Ok(())
}

pub(super) fn handle_set_main_view(app: &mut App, main_view: MainView) {
    app.main_view = main_view;
}

pub(super) fn handle_quit_requested(app: &mut App) -> Result<()> {
    if app.controller.requires_quit_confirmation() {
        log::info!("Quit requested during playback, asking for confirmation");
        app.confirm_quit = true;
    } else {
        app.event_tx.send(AppEvent::ExitApplication)?;
    }

    Ok(())
}

pub(super) fn handle_error(app: &mut App, message: String) {
    log::warn!("{}", message);
    app.status = Some(message);
}

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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every event handled by the event loop.

mod commander;
pub(crate) mod icons;
mod player;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::{
    App, MainView,
    render::{commander::draw_commander, player::draw_player},
    theme::Theme,
};

const CONFIRM_WIDTH: u16 = 48;
const CONFIRM_HEIGHT: u16 = 5;

pub(crate) trait Render {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the active list view, the player panel and the
/// command line. The quit confirmation, when pending, is drawn over
/// everything else.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let [main, player, command_line] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .areas(area);

    match app.main_view {
        MainView::History => app.history_view.draw(f, main, &app.theme),
        MainView::Search => app.search_view.draw(f, main, &app.theme),
    }

    draw_player(f, player, app);

    draw_commander(f, command_line, app);

    if app.confirm_quit {
        draw_confirm_quit(f, area, &app.theme);
    }
}

fn draw_confirm_quit(f: &mut Frame, area: Rect, theme: &Theme) {
    let [row] = Layout::vertical([Constraint::Length(CONFIRM_HEIGHT)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(CONFIRM_WIDTH)])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::default()
        .title(" Quit ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_colour))
        .style(Style::default().bg(theme.background_colour))
        .padding(Padding::horizontal(1));

    let text = vec![
        Line::from("Playback is in progress."),
        Line::from("Quit anyway? (y/n)").style(Style::default().fg(theme.accent_colour)),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        popup,
    );
}

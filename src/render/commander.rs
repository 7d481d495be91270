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

//! Render the command-line interface.
//!
//! This module renders the command line: the prompt and current text with
//! the cursor while it is open, otherwise the latest status message or a
//! key hint.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::App;

const KEY_HINT: &str =
    "/ search  : command  space play/pause  n/p next/prev  s shuffle  r repeat  v video  q quit";

pub(crate) fn draw_commander(f: &mut Frame, area: Rect, app: &App) {
    let commander = &app.commander;
    let theme = &app.theme;

    let [container] = Layout::horizontal([Constraint::Min(1)])
        .horizontal_margin(1)
        .areas(area);

    if let Some(mode) = commander.mode() {
        let text = format!("{}{}", mode.prompt(), commander.input.value());
        f.render_widget(
            Paragraph::new(text).style(
                Style::default()
                    .fg(theme.commander_colour)
                    .bg(theme.gauge_track_colour),
            ),
            container,
        );

        let cursor_x = container.x + 1 + commander.input.visual_cursor() as u16;
        f.set_cursor_position((cursor_x, container.y));
        return;
    }

    let paragraph = match &app.status {
        Some(status) => Paragraph::new(status.as_str()).style(Style::default().fg(theme.status_colour)),
        None => Paragraph::new(KEY_HINT).style(Style::default().fg(theme.muted_colour)),
    };
    f.render_widget(paragraph, container);
}

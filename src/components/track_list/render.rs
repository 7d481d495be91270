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

//! UI rendering logic for the track list.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::{
    components::TrackList,
    render::{Render, icons::ICON_PLAY},
    theme::Theme,
};

impl Render for TrackList {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let rows = self.tracks.iter().enumerate().map(|(i, track)| {
            let is_current = self.current == Some(i);

            let marker = if is_current { ICON_PLAY } else { "" };
            let title_style = if is_current {
                Style::default()
                    .fg(theme.list_current_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.list_title_fg)
            };

            Row::new(vec![
                Cell::from(Line::from(marker).style(Style::default().fg(theme.accent_colour))),
                Cell::from(
                    Line::from(format!("{}", i + 1))
                        .style(Style::default().fg(theme.list_index_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(""),
                Cell::from(Line::from(track.title()).style(title_style)),
                Cell::from(Line::from(track.video_id()).style(Style::default().fg(theme.list_id_fg))),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(12),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("#").alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from("Title"),
                Cell::from("Video"),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.highlight_bg).fg(theme.highlight_fg))
        .block(
            Block::default()
                .title(format!(" {} ({}) ", self.title, self.tracks.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_colour)),
        );

        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}

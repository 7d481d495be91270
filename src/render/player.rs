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

//! Render the player interface.
//!
//! This module renders the visual representation of the current track, the
//! playback mode, the volume and the transport position.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    controller::OrchestratorState,
    model::RepeatMode,
    render::icons::{
        ICON_LOADING, ICON_PAUSE, ICON_PLAY, ICON_REPEAT, ICON_REPEAT_ONE, ICON_SHUFFLE, ICON_STOP, ICON_VIDEO,
        ICON_VOLUME,
    },
    theme::Theme,
};

/// Renders the main player widget including track info and controls.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let [info, artwork, controls, _, position] =
        Layout::vertical([Constraint::Length(1); 5]).areas(inner_area);

    let [title_area, time_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).areas(info);

    let icon = match (&app.now_playing, app.controller.state()) {
        (None, _) => ICON_STOP,
        (Some(_), OrchestratorState::Loading) => ICON_LOADING,
        (Some(_), _) if app.controls.playing => ICON_PLAY,
        (Some(_), _) => ICON_PAUSE,
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let title_line = match &app.now_playing {
        Some(now_playing) => Line::from(vec![
            Span::styled(format!(" {} ", icon), bold).fg(Color::White),
            Span::styled(now_playing.title.as_str(), bold).fg(theme.accent_colour),
            Span::raw(" on "),
            Span::styled(now_playing.media.artist.as_str(), bold).fg(theme.accent_colour),
        ]),
        None => Line::from(vec![
            Span::styled(format!(" {} ", icon), bold).fg(Color::White),
            Span::raw("Nothing playing, press / to search").fg(theme.muted_colour),
        ]),
    };
    f.render_widget(Paragraph::new(title_line), title_area);

    if app.now_playing.is_some() {
        let time_line = Line::from(vec![
            Span::styled(app.progress.elapsed.as_str(), bold).fg(theme.accent_colour),
            Span::styled(" / ", bold).fg(Color::White),
            Span::styled(app.progress.total.as_str(), bold).fg(theme.accent_colour),
        ]);
        f.render_widget(Paragraph::new(time_line).alignment(Alignment::Right), time_area);
    }

    if let Some(now_playing) = &app.now_playing {
        f.render_widget(
            Paragraph::new(now_playing.artwork_url.as_str()).fg(theme.muted_colour),
            artwork,
        );
    }

    let [mode_area, volume_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(26)]).areas(controls);

    f.render_widget(Paragraph::new(mode_line(app, theme)), mode_area);

    let [volume_icon, volume_gauge, volume_label] = Layout::horizontal([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(5),
    ])
    .areas(volume_area);

    let volume = app.controls.volume.min(100);
    f.render_widget(Paragraph::new(ICON_VOLUME).fg(Color::White), volume_icon);
    f.render_widget(gauge(f64::from(volume) / 100.0, theme), volume_gauge);
    f.render_widget(
        Paragraph::new(format!(" {}%", volume))
            .alignment(Alignment::Right)
            .fg(Color::White),
        volume_label,
    );

    f.render_widget(gauge(app.progress.fraction, theme), position);
}

fn mode_line<'a>(app: &App, theme: &Theme) -> Line<'a> {
    let on = Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD);
    let off = Style::default().fg(theme.muted_colour);

    let (repeat_icon, repeat_label) = match app.controls.repeat {
        RepeatMode::Off => (ICON_REPEAT, "repeat off"),
        RepeatMode::All => (ICON_REPEAT, "repeat all"),
        RepeatMode::One => (ICON_REPEAT_ONE, "repeat one"),
    };
    let repeat_style = if app.controls.repeat == RepeatMode::Off { off } else { on };

    let shuffle_style = if app.controls.shuffle { on } else { off };
    let video_style = if app.controls.video { on } else { off };

    Line::from(vec![
        Span::styled(format!("{} shuffle", ICON_SHUFFLE), shuffle_style),
        Span::raw("   "),
        Span::styled(format!("{} {}", repeat_icon, repeat_label), repeat_style),
        Span::raw("   "),
        Span::styled(format!("{} video", ICON_VIDEO), video_style),
    ])
}

fn gauge(ratio: f64, theme: &Theme) -> Gauge<'static> {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };

    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(ratio)
        .label("")
        .use_unicode(true)
}

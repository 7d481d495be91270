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

//! Interactive track list widget and state management.
//!
//! This module provides a reusable list component for displaying tracks and
//! choosing one of them. It backs both the play history and the search
//! results views. The list may mark one entry as the current track, which is
//! independent of the highlighted row the user moves with the keyboard.

mod event;
mod render;

use ratatui::widgets::TableState;

use crate::model::Track;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TrackListAction {
    /// The user chose the track at this position.
    Activate(usize),
}

pub(crate) struct TrackList {
    title: &'static str,
    tracks: Vec<Track>,
    current: Option<usize>,
    table_state: TableState,
}

impl TrackList {
    pub(crate) fn new(title: &'static str) -> Self {
        Self {
            title,
            tracks: vec![],
            current: None,
            table_state: TableState::new(),
        }
    }

    /// Replaces the listed tracks.
    ///
    /// The highlighted row follows `current` when there is one, otherwise it
    /// is kept in range.
    pub(crate) fn set_tracks(&mut self, tracks: Vec<Track>, current: Option<usize>) {
        self.tracks = tracks;
        self.current = current.filter(|&i| i < self.tracks.len());

        let selected = match (self.current, self.table_state.selected()) {
            (Some(current), _) => Some(current),
            (None, _) if self.tracks.is_empty() => None,
            (None, Some(selected)) => Some(selected.min(self.tracks.len() - 1)),
            (None, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    pub(crate) fn reset_selection(&mut self) {
        let selected = if self.tracks.is_empty() { None } else { Some(0) };
        self.table_state.select(selected);
        *self.table_state.offset_mut() = 0;
    }

    pub(crate) fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.tracks.len())
    }

    fn goto_next(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.tracks.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if let Some(last) = self.tracks.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }
}

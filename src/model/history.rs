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

//! Play history management.
//!
//! This module provides the ordered record of tracks selected for playback
//! and the pointer to the one currently loaded. Forward and backward
//! traversal only move the pointer; new entries are appended exclusively by
//! [`History::record_and_select`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Track;

/// Selects which entry a newly chosen track is compared against before it
/// is appended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DedupPolicy {
    /// Compare against the entry at the current position.
    #[default]
    Current,
    /// Compare against the last entry, wherever the position is.
    Tail,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum HistoryError {
    #[error("history is empty")]
    Empty,
    #[error("index {index} is out of bounds for a history of {len} tracks")]
    OutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Default)]
pub(crate) struct History {
    tracks: Vec<Track>,
    index: Option<usize>,
    dedup: DedupPolicy,
}

impl History {
    pub(crate) fn new(dedup: DedupPolicy) -> Self {
        Self {
            tracks: Vec::new(),
            index: None,
            dedup,
        }
    }

    /// Appends `track` and points at it, unless it matches the dedup
    /// comparison entry, in which case that entry is selected instead.
    ///
    /// Returns the selected position.
    pub(crate) fn record_and_select(&mut self, track: Track) -> usize {
        let existing = match self.dedup {
            DedupPolicy::Current => self.index,
            DedupPolicy::Tail => self.tracks.len().checked_sub(1),
        }
        .filter(|&i| self.tracks[i] == track);

        let selected = match existing {
            Some(i) => i,
            None => {
                self.tracks.push(track);
                self.tracks.len() - 1
            }
        };

        self.index = Some(selected);
        selected
    }

    /// Moves the position to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the history is empty or `index` is out of
    /// bounds; the position is left unchanged.
    pub(crate) fn select_at(&mut self, index: usize) -> Result<&Track, HistoryError> {
        if self.tracks.is_empty() {
            return Err(HistoryError::Empty);
        }

        if index >= self.tracks.len() {
            return Err(HistoryError::OutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }

        self.index = Some(index);
        Ok(&self.tracks[index])
    }

    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.tracks.get(i))
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc(dedup: DedupPolicy) -> History {
        let mut history = History::new(dedup);
        history.record_and_select(Track::new("a", "A"));
        history.record_and_select(Track::new("b", "B"));
        history.record_and_select(Track::new("c", "C"));
        history
    }

    #[test]
    fn new_history_has_no_position() {
        let history = History::new(DedupPolicy::Current);
        assert!(history.is_empty());
        assert_eq!(history.current_index(), None);
        assert_eq!(history.current_track(), None);
    }

    #[test]
    fn record_appends_and_selects_tail() {
        let history = abc(DedupPolicy::Current);
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), Some(2));
        assert_eq!(history.current_track().map(Track::video_id), Some("c"));
    }

    #[test]
    fn recording_same_track_twice_adds_one_entry() {
        let mut history = History::new(DedupPolicy::Current);
        history.record_and_select(Track::new("abc123", "Lofi Beats"));
        history.record_and_select(Track::new("abc123", "Lofi Beats"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn select_then_current_returns_original_entry() {
        let mut history = abc(DedupPolicy::Current);
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            history.select_at(i).unwrap();
            assert_eq!(history.current_track().map(Track::video_id), Some(*id));
        }
    }

    #[test]
    fn select_out_of_bounds_leaves_position() {
        let mut history = abc(DedupPolicy::Current);
        history.select_at(1).unwrap();

        assert_eq!(
            history.select_at(3),
            Err(HistoryError::OutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(history.current_index(), Some(1));
    }

    #[test]
    fn select_on_empty_history_fails() {
        let mut history = History::new(DedupPolicy::Current);
        assert_eq!(history.select_at(0), Err(HistoryError::Empty));
        assert_eq!(history.current_index(), None);
    }

    #[test]
    fn current_policy_compares_against_selected_entry() {
        let mut history = abc(DedupPolicy::Current);
        history.select_at(0).unwrap();

        // Same as the selected entry: no append.
        assert_eq!(history.record_and_select(Track::new("a", "A")), 0);
        assert_eq!(history.len(), 3);

        // Same as the tail but not the selected entry: appended.
        assert_eq!(history.record_and_select(Track::new("c", "C")), 3);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn tail_policy_compares_against_last_entry() {
        let mut history = abc(DedupPolicy::Tail);
        history.select_at(0).unwrap();

        assert_eq!(history.record_and_select(Track::new("c", "C")), 2);
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), Some(2));

        history.select_at(0).unwrap();
        assert_eq!(history.record_and_select(Track::new("a", "A")), 3);
        assert_eq!(history.len(), 4);
    }
}

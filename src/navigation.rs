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

//! Forward and backward navigation through the play history.
//!
//! Navigation is a pure decision over the history length, the current
//! position and the playback mode. It never touches the history itself; the
//! caller applies the returned index.
//!
//! Shuffle only governs forward navigation. Going back always walks the
//! history in order, so "previous" returns to what was actually played
//! before.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::model::{PlaybackMode, RepeatMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Next,
    Previous,
}

/// When sequential navigation may wrap around the ends of the history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum WrapPolicy {
    /// Wrap only under [`RepeatMode::All`]; otherwise stop at the ends.
    #[default]
    RepeatAllOnly,
    /// Always loop, whatever the repeat mode.
    Always,
}

/// Source of the random choice made by shuffle.
pub(crate) trait IndexPicker {
    /// Picks one of `candidates`, which is never empty.
    fn pick(&mut self, candidates: &[usize]) -> Option<usize>;
}

/// Uniform choice from the thread-local random number generator.
#[derive(Debug, Default)]
pub(crate) struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        candidates.choose(&mut rand::rng()).copied()
    }
}

/// Computes the position to move to, or `None` when navigation is a no-op.
///
/// # Arguments
///
/// * `len` - The number of entries in the history.
/// * `index` - The current position, if any.
/// * `mode` - The shuffle flag and repeat mode.
/// * `wrap` - Whether the ends of the history loop outside of repeat-all.
/// * `direction` - Which way to move.
/// * `picker` - The random source used by shuffle.
pub(crate) fn navigate(
    len: usize,
    index: Option<usize>,
    mode: PlaybackMode,
    wrap: WrapPolicy,
    direction: Direction,
    picker: &mut dyn IndexPicker,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let Some(current) = index.filter(|&i| i < len) else {
        return Some(0);
    };

    let wraps = mode.repeat == RepeatMode::All || wrap == WrapPolicy::Always;

    match direction {
        Direction::Next if mode.shuffle => {
            let candidates: Vec<usize> = (0..len).filter(|&i| len == 1 || i != current).collect();
            picker.pick(&candidates)
        }
        Direction::Next => {
            if current + 1 < len {
                Some(current + 1)
            } else if wraps {
                Some(0)
            } else {
                None
            }
        }
        Direction::Previous => {
            if current > 0 {
                Some(current - 1)
            } else if wraps {
                Some(len - 1)
            } else {
                None
            }
        }
    }
}

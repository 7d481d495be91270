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

//! Session gate and quit guard.
//!
//! The engine must not be asked to start playback on its own initiative
//! until the user has pressed play at least once. The [`SessionGate`] latch
//! records that interaction. The [`UnloadGuard`] decides whether quitting
//! needs confirmation.

use serde::{Deserialize, Serialize};

use crate::player::EngineState;

#[derive(Debug, Default)]
pub(crate) struct SessionGate {
    user_has_interacted: bool,
}

impl SessionGate {
    /// Latches the gate open.
    ///
    /// Returns `true` only for the first interaction.
    pub(crate) fn mark_interacted(&mut self) -> bool {
        let first = !self.user_has_interacted;
        self.user_has_interacted = true;
        first
    }

    pub(crate) fn is_open(&self) -> bool {
        self.user_has_interacted
    }
}

/// When a quit request needs confirmation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum UnloadPolicy {
    #[default]
    WhilePlaying,
    HistoryNonEmpty,
    Never,
}

#[derive(Debug, Default)]
pub(crate) struct UnloadGuard {
    policy: UnloadPolicy,
}

impl UnloadGuard {
    pub(crate) fn new(policy: UnloadPolicy) -> Self {
        Self { policy }
    }

    pub(crate) fn requires_confirmation(&self, engine_state: EngineState, history_len: usize) -> bool {
        match self.policy {
            UnloadPolicy::WhilePlaying => engine_state == EngineState::Playing,
            UnloadPolicy::HistoryNonEmpty => history_len > 0,
            UnloadPolicy::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_opens_once() {
        let mut gate = SessionGate::default();
        assert!(!gate.is_open());

        assert!(gate.mark_interacted());
        assert!(gate.is_open());

        assert!(!gate.mark_interacted());
        assert!(gate.is_open());
    }

    #[test]
    fn while_playing_guards_only_playing() {
        let guard = UnloadGuard::new(UnloadPolicy::WhilePlaying);

        assert!(guard.requires_confirmation(EngineState::Playing, 0));
        for state in [
            EngineState::Unstarted,
            EngineState::Paused,
            EngineState::Ended,
            EngineState::Error,
        ] {
            assert!(!guard.requires_confirmation(state, 3));
        }
    }

    #[test]
    fn history_policy_guards_any_history() {
        let guard = UnloadGuard::new(UnloadPolicy::HistoryNonEmpty);

        assert!(!guard.requires_confirmation(EngineState::Playing, 0));
        assert!(guard.requires_confirmation(EngineState::Paused, 1));
    }

    #[test]
    fn never_policy_never_guards() {
        let guard = UnloadGuard::new(UnloadPolicy::Never);
        assert!(!guard.requires_confirmation(EngineState::Playing, 5));
    }
}

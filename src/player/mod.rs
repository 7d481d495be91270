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

//! Playback engine contract and the MPV-backed implementation.
//!
//! The controller drives playback exclusively through the [`PlaybackEngine`]
//! trait and learns about the engine's lifecycle through [`EngineEvent`]s
//! posted to the event loop.
//!
//! [`MpvEngine`] is a handle to a background worker thread that owns the
//! `libmpv` context, so that loading and buffering network media never blocks
//! the main application thread. Commands are sent over a channel; queries are
//! answered from an [`EngineSnapshot`] that the worker keeps current.

mod commands;

use std::sync::{Arc, Mutex, mpsc};

use anyhow::{Context, Result};

use crate::{events::AppEvent, model::Track, player::commands::EngineCommand};

/// Lifecycle state reported by the playback engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum EngineState {
    #[default]
    Unstarted,
    Playing,
    Paused,
    Ended,
    Error,
}

/// Events delivered by the engine to the controller.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EngineEvent {
    Ready,
    StateChanged(EngineState),
    Error(String),
}

/// Options the engine is initialised with.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EngineOptions {
    /// Show the engine's own on-screen transport controls.
    pub(crate) native_controls: bool,
    /// Let the engine handle its own keyboard shortcuts.
    pub(crate) keyboard_shortcuts: bool,
    /// Start playing as soon as media is loaded.
    pub(crate) autoplay_on_load: bool,
    /// Origin presented to the media host.
    pub(crate) origin: String,
    /// Open a video window rather than playing audio only.
    pub(crate) video: bool,
}

/// Commands and queries the controller needs from a playback engine.
pub(crate) trait PlaybackEngine {
    fn load(&mut self, track: &Track) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek_to(&mut self, seconds: f64) -> Result<()>;
    fn set_volume(&mut self, level: u32) -> Result<()>;
    fn set_video(&mut self, enabled: bool) -> Result<()>;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Duration of the loaded media in seconds, `0.0` when unknown.
    fn duration(&self) -> f64;

    fn state(&self) -> EngineState;
}

/// Engine values observed by the worker, readable from the main thread.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct EngineSnapshot {
    pub(crate) state: EngineState,
    pub(crate) time_pos: f64,
    pub(crate) duration: f64,
}

impl EngineSnapshot {
    /// Forgets the position and duration of media that is no longer loaded.
    pub(crate) fn clear_position(&mut self) {
        self.time_pos = 0.0;
        self.duration = 0.0;
    }
}

/// A handle to the MPV playback engine.
///
/// This struct acts as a command proxy; it does not perform any media
/// processing itself but instead sends instructions to a background worker
/// thread.
pub(crate) struct MpvEngine {
    command_tx: mpsc::Sender<EngineCommand>,
    snapshot: Arc<Mutex<EngineSnapshot>>,
}

impl MpvEngine {
    /// Spawns the engine worker thread and returns a new engine handle.
    ///
    /// # Arguments
    ///
    /// * `options` - How the engine is initialised.
    /// * `event_tx` - A channel to send engine events (state changes, errors)
    ///   back to the main event loop.
    pub(crate) fn new(options: EngineOptions, event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<EngineCommand>();
        let snapshot = Arc::new(Mutex::new(EngineSnapshot::default()));

        commands::spawn_engine_worker(options, command_rx, event_tx, Arc::clone(&snapshot));

        Ok(Self {
            command_tx,
            snapshot,
        })
    }

    fn send(&self, command: EngineCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .context("Engine worker is not running")
    }

    fn read_snapshot(&self) -> EngineSnapshot {
        match self.snapshot.lock() {
            Ok(snapshot) => *snapshot,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl PlaybackEngine for MpvEngine {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.send(EngineCommand::Load(track.watch_url()))
    }

    fn play(&mut self) -> Result<()> {
        self.send(EngineCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(EngineCommand::Pause)
    }

    fn seek_to(&mut self, seconds: f64) -> Result<()> {
        self.send(EngineCommand::SeekTo(seconds))
    }

    fn set_volume(&mut self, level: u32) -> Result<()> {
        self.send(EngineCommand::SetVolume(level))
    }

    fn set_video(&mut self, enabled: bool) -> Result<()> {
        self.send(EngineCommand::SetVideo(enabled))
    }

    fn current_time(&self) -> f64 {
        self.read_snapshot().time_pos
    }

    fn duration(&self) -> f64 {
        self.read_snapshot().duration
    }

    fn state(&self) -> EngineState {
        self.read_snapshot().state
    }
}

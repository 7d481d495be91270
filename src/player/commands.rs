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

//! MPV worker thread and event processing.
//!
//! The worker owns the `libmpv` context. It operates using a dual-channel
//! communication pattern:
//!
//! 1. **Command Channel**: Receives [`EngineCommand`]s from the controller
//!    (load, play, pause, seek and so on).
//! 2. **Event Channel**: Posts [`EngineEvent`]s back to the event loop when
//!    the lifecycle state changes or media fails to play.
//!
//! Position, duration and state are also written to the shared
//! [`EngineSnapshot`] so the controller can poll them synchronously.

use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender, TryRecvError},
};
use std::thread;

use anyhow::{Context, Result};
use mpv::Format;

use crate::{
    events::AppEvent,
    player::{EngineEvent, EngineOptions, EngineSnapshot, EngineState},
};

#[derive(Debug)]
pub(crate) enum EngineCommand {
    Load(String),
    Play,
    Pause,
    SeekTo(f64),
    SetVolume(u32),
    SetVideo(bool),
}

/// Spawns the engine worker thread.
///
/// If the worker fails, the failure is broadcast as a fatal application
/// event.
///
/// # Arguments
///
/// * `options` - How the MPV context is configured.
/// * `command_rx` - The receiving end of the engine command channel.
/// * `event_tx` - The channel used to broadcast engine events and errors.
/// * `snapshot` - Values shared with the [`super::MpvEngine`] handle.
pub(crate) fn spawn_engine_worker(
    options: EngineOptions,
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<AppEvent>,
    snapshot: Arc<Mutex<EngineSnapshot>>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = engine_worker(options, command_rx, event_tx, snapshot) {
            log::error!("MPV worker failure: {:?}", e);
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// Flags tracked by the worker to derive the [`EngineState`].
#[derive(Debug, Default)]
struct WorkerState {
    is_paused: bool,
    is_idle: bool,
    /// How the last file finished, until the next one is loaded.
    finished: Option<EngineState>,
    state: EngineState,
    last_url: Option<String>,
}

impl WorkerState {
    fn new() -> Self {
        Self {
            is_idle: true,
            ..Self::default()
        }
    }

    fn derive_state(&self) -> EngineState {
        if self.is_idle {
            self.finished.unwrap_or(EngineState::Unstarted)
        } else if self.is_paused {
            EngineState::Paused
        } else {
            EngineState::Playing
        }
    }
}

fn build_handler(options: &EngineOptions) -> Result<mpv::MpvHandler> {
    let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;

    builder
        .set_option("osc", options.native_controls)
        .context("Failed to set on-screen controller")?;
    builder
        .set_option("input-default-bindings", options.keyboard_shortcuts)
        .context("Failed to set default key bindings")?;
    builder
        .set_option("input-vo-keyboard", options.keyboard_shortcuts)
        .context("Failed to set window keyboard input")?;
    builder
        .set_option("pause", !options.autoplay_on_load)
        .context("Failed to set initial pause")?;
    builder
        .set_option("referrer", options.origin.as_str())
        .context("Failed to set referrer")?;
    builder
        .set_option("ytdl", true)
        .context("Failed to enable ytdl hook")?;
    builder
        .set_option("vid", if options.video { "auto" } else { "no" })
        .context("Failed to set video track")?;

    builder.build().context("Failed to build MPV handler")
}

/// The primary execution loop for the engine worker.
///
/// Initializes the `libmpv` context, announces readiness, then alternates
/// between draining commands and waiting briefly for MPV events until the
/// command channel is closed.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or the event
/// channel is closed.
fn engine_worker(
    options: EngineOptions,
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<AppEvent>,
    snapshot: Arc<Mutex<EngineSnapshot>>,
) -> Result<()> {
    let mut handler = build_handler(&options)?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    event_tx
        .send(AppEvent::Engine(EngineEvent::Ready))
        .context("Failed to send engine ready event")?;

    let mut worker = WorkerState::new();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut worker, &snapshot, &event_tx)? {
            log::debug!("Engine command channel closed, stopping worker");
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut worker, &snapshot, &event_tx)?;
    }
}

fn update_snapshot(snapshot: &Mutex<EngineSnapshot>, update: impl FnOnce(&mut EngineSnapshot)) {
    if let Ok(mut snapshot) = snapshot.lock() {
        update(&mut snapshot);
    }
}

/// Drains and executes all pending commands.
///
/// A command MPV rejects is logged and skipped. A media load that fails is
/// also reported as an engine error.
///
/// Returns `false` once the controller has dropped its end of the channel.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<EngineCommand>,
    worker: &mut WorkerState,
    snapshot: &Mutex<EngineSnapshot>,
    event_tx: &Sender<AppEvent>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        log::debug!("Engine command: {:?}", command);

        let is_load = matches!(command, EngineCommand::Load(_));
        if let Err(e) = execute_command(handler, worker, snapshot, command) {
            log::warn!("Engine command failed: {:#}", e);
            if is_load {
                event_tx
                    .send(AppEvent::Engine(EngineEvent::Error(format!("{:#}", e))))
                    .context("Failed to send engine error event")?;
            }
        }
    }
}

fn execute_command(
    handler: &mut mpv::MpvHandler,
    worker: &mut WorkerState,
    snapshot: &Mutex<EngineSnapshot>,
    command: EngineCommand,
) -> Result<()> {
    match command {
        EngineCommand::Load(url) => {
            worker.finished = None;
            update_snapshot(snapshot, EngineSnapshot::clear_position);

            // Loaded media stays cued until an explicit play.
            handler.set_property("pause", true)?;
            handler
                .command(&["loadfile", &url, "replace"])
                .context(format!("Failed to load: {}", &url))?;
            worker.last_url = Some(url);
        }
        EngineCommand::Play => {
            if worker.is_idle {
                if let Some(url) = worker.last_url.as_deref() {
                    worker.finished = None;
                    handler
                        .command(&["loadfile", url, "replace"])
                        .context(format!("Failed to reload: {}", url))?;
                }
            }
            handler.set_property("pause", false)?;
        }
        EngineCommand::Pause => {
            handler.set_property("pause", true)?;
        }
        EngineCommand::SeekTo(seconds) => {
            handler
                .command(&["seek", &seconds.to_string(), "absolute"])
                .context("Failed to seek")?;
        }
        EngineCommand::SetVolume(level) => {
            handler
                .command(&["set", "volume", &level.to_string()])
                .context("Failed to set volume")?;
        }
        EngineCommand::SetVideo(enabled) => {
            handler
                .command(&["set", "vid", if enabled { "auto" } else { "no" }])
                .context("Failed to set video track")?;
        }
    }

    Ok(())
}

/// Records how the loaded file finished. Position and duration no longer
/// apply once nothing is loaded.
fn finish_file(worker: &mut WorkerState, snapshot: &Mutex<EngineSnapshot>, how: EngineState) {
    worker.finished = Some(how);
    update_snapshot(snapshot, EngineSnapshot::clear_position);
}

/// Polls for MPV events and synchronizes the engine state.
///
/// This function waits for up to 50ms for an event from the MPV context. If
/// the derived [`EngineState`] changes, a state change event is posted.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    worker: &mut WorkerState,
    snapshot: &Mutex<EngineSnapshot>,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) => {
                update_snapshot(snapshot, |s| s.duration = duration);
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                update_snapshot(snapshot, |s| s.time_pos = seconds);
            }
            ("pause", Format::Flag(pause)) => worker.is_paused = pause,
            ("idle-active", Format::Flag(idle_active)) => {
                worker.is_idle = idle_active;
                if idle_active {
                    update_snapshot(snapshot, EngineSnapshot::clear_position);
                }
            }
            _ => {}
        },
        mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => {
            finish_file(worker, snapshot, EngineState::Ended);
        }
        mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR)) => {
            finish_file(worker, snapshot, EngineState::Error);
            event_tx
                .send(AppEvent::Engine(EngineEvent::Error("playback failed".to_string())))
                .context("Failed to send engine error event")?;
        }
        mpv::Event::EndFile(Err(e)) => {
            finish_file(worker, snapshot, EngineState::Error);
            event_tx
                .send(AppEvent::Engine(EngineEvent::Error(format!("{:?}", e))))
                .context("Failed to send engine error event")?;
        }
        _ => {}
    }

    let new_state = worker.derive_state();
    if new_state != worker.state {
        worker.state = new_state;
        update_snapshot(snapshot, |s| s.state = new_state);
        event_tx
            .send(AppEvent::Engine(EngineEvent::StateChanged(new_state)))
            .context("Failed to send engine state event")?;
    }

    Ok(())
}

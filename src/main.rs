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

//! # tubedeck
//!
//! A terminal remote control for streaming video tracks through `mpv`.
//!
//! The user searches for tracks, plays them, and moves back and forth through
//! the play history with shuffle and repeat, while the player panel follows
//! the playback position.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and the
//!   playback [`Controller`].
//! * **Background Workers** run the `mpv` engine, network searches and the
//!   transport timer.
//! * **Event Loops** capture user input and worker output to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod commander;
mod components;
mod config;
mod controller;
mod events;
mod model;
mod navigation;
mod player;
mod render;
mod search;
mod tasks;
mod theme;
mod util;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Env, Target};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    commander::Commander,
    components::TrackList,
    config::AppConfig,
    controller::{
        ControlState, Controller, NowPlaying,
        transport::{IntervalTimer, TransportProgress},
    },
    events::{AppEvent, process_events},
    player::{EngineOptions, MpvEngine},
    tasks::AppTask,
    theme::Theme,
};

const LOG_FILE: &str = "tubedeck.log";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainView {
    History,
    Search,
}

type AppController = Controller<MpvEngine, Sender<AppEvent>, IntervalTimer>;

/// Application state.
pub(crate) struct App {
    pub(crate) config: AppConfig,

    pub(crate) theme: Theme,
    pub(crate) main_view: MainView,

    pub(crate) event_tx: Sender<AppEvent>,
    pub(crate) event_rx: Receiver<AppEvent>,

    pub(crate) task_tx: Sender<AppTask>,

    pub(crate) controller: AppController,

    pub(crate) commander: Commander,
    pub(crate) history_view: TrackList,
    pub(crate) search_view: TrackList,

    pub(crate) now_playing: Option<NowPlaying>,
    pub(crate) progress: TransportProgress,
    pub(crate) controls: ControlState,

    pub(crate) confirm_quit: bool,
    pub(crate) status: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    ///
    /// This starts the engine worker, which announces itself on the event
    /// channel once ready.
    pub(crate) fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let engine_options = EngineOptions {
            native_controls: false,
            keyboard_shortcuts: false,
            autoplay_on_load: false,
            origin: config.origin.clone(),
            video: config.video,
        };
        let engine = MpvEngine::new(engine_options, event_tx.clone())
            .context("Failed to start playback engine")?;

        let ticker = IntervalTimer::new(
            Duration::from_millis(config.transport_interval_ms.max(1)),
            event_tx.clone(),
        );

        let controller = Controller::new(
            engine,
            event_tx.clone(),
            ticker,
            config.controller_settings(),
        );

        Ok(Self {
            controls: ControlState {
                volume: config.initial_volume.min(100),
                video: config.video,
                ..ControlState::default()
            },
            config,
            theme: Theme::default(),
            main_view: MainView::History,
            event_tx,
            event_rx,
            task_tx,
            controller,
            commander: Commander::new(),
            history_view: TrackList::new("History"),
            search_view: TrackList::new("Search"),
            now_playing: None,
            progress: TransportProgress::default(),
            confirm_quit: false,
            status: None,
        })
    }
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, manages the terminal lifecycle, and returns an error if
/// any part of the execution fails.
fn main() -> Result<()> {
    init_logging();

    let config = config::load_config();
    log::info!("Starting with {:?}", config);

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx).context("Failed to initialise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    if let Err(e) = &res {
        log::error!("Application error: {:#}", e);
    }

    res.context("Application error occurred")
}

/// Routes log output to a file next to the configuration file.
///
/// The terminal belongs to the UI, so when no log file can be opened logging
/// is discarded.
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    let log_file = config::config_dir().and_then(|dir| {
        fs::create_dir_all(&dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });

    match log_file {
        Some(file) => builder.target(Target::Pipe(Box::new(file))),
        None => builder.target(Target::Pipe(Box::new(io::sink()))),
    };

    builder.init();
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(background) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&background).context("Failed to set terminal background")?;
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is "best-effort" and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns:
/// * A task worker to run searches off the UI thread.
/// * An input thread to poll for terminal keyboard events.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if a worker cannot be started or the event processing
/// loop encounters an unrecoverable application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    tasks::spawn_task_worker(&app.config, task_rx, app.event_tx.clone())
        .context("Failed to start task worker")?;

    // Spawn a thread to translate raw terminal events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(event::Event::Resize(..)) => {
                    if tx_keys.send(AppEvent::Redraw).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to read terminal input: {}", e);
                    break;
                }
            }
        }
    });

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}

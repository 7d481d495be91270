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

//! Playback and navigation control.
//!
//! The [`Controller`] is the single owner of the play history and playback
//! mode. Everything that can change what is playing reaches it as a
//! [`ControlEvent`] passed to [`Controller::dispatch`]:
//!
//! * [`ControlEvent::User`]: commands from keys, the command line and media
//!   keys.
//! * [`ControlEvent::Engine`]: lifecycle events reported by the playback
//!   engine.
//! * [`ControlEvent::TimerTick`]: ticks from the transport timer.
//!
//! Work that follows from an event, such as moving to the next track when
//! one ends, is queued and run by the same `dispatch` call once the current
//! event has been handled, so handlers never nest.
//!
//! The controller reports back to the UI through a [`Notifier`], and drives
//! playback through a [`PlaybackEngine`] and the transport timer through a
//! [`TickSource`]. All three are traits so the state machine can be
//! exercised without a live engine or terminal.

pub(crate) mod session;
pub(crate) mod transport;

use std::collections::VecDeque;

use anyhow::Result;

use crate::{
    controller::{
        session::{SessionGate, UnloadGuard, UnloadPolicy},
        transport::{TickSource, TransportProgress},
    },
    model::{
        ArtworkSize, PlaybackMode, RepeatMode, Track,
        history::{DedupPolicy, History},
    },
    navigation::{self, Direction, IndexPicker, RandomPicker, WrapPolicy},
    player::{EngineEvent, EngineState, PlaybackEngine},
};

const MAX_VOLUME: u32 = 100;

const MEDIA_ARTIST: &str = "YouTube";
const MEDIA_ARTWORK_SIZES: &str = "480x360";

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ControlEvent {
    User(UserCommand),
    Engine(EngineEvent),
    TimerTick(u64),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UserCommand {
    /// Play a freshly chosen track, recording it in the history.
    PlayTrack(Track),
    /// Jump to an existing history entry.
    SelectHistory(usize),
    Next,
    Previous,
    TogglePlayPause,
    Play,
    Pause,
    /// Seek to a fraction of the duration.
    Seek(f64),
    /// Seek relative to the current position, as a fraction of the duration.
    SeekBy(f64),
    SetVolume(u32),
    AdjustVolume(i32),
    ToggleShuffle,
    CycleRepeat,
    ToggleVideo,
}

/// Actions exposed to the platform's media controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MediaAction {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
}

impl From<MediaAction> for UserCommand {
    fn from(action: MediaAction) -> Self {
        match action {
            MediaAction::Play => UserCommand::Play,
            MediaAction::Pause => UserCommand::Pause,
            MediaAction::NextTrack => UserCommand::Next,
            MediaAction::PreviousTrack => UserCommand::Previous,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OrchestratorState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

/// Metadata handed to the platform's media session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MediaMetadata {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) artwork_url: String,
    pub(crate) artwork_sizes: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NowPlaying {
    pub(crate) title: String,
    pub(crate) artwork_url: String,
    pub(crate) media: MediaMetadata,
}

impl NowPlaying {
    fn for_track(track: &Track) -> Self {
        Self {
            title: track.title().to_string(),
            artwork_url: track.artwork_url(ArtworkSize::Medium),
            media: MediaMetadata {
                title: track.title().to_string(),
                artist: MEDIA_ARTIST.to_string(),
                artwork_url: track.artwork_url(ArtworkSize::High),
                artwork_sizes: MEDIA_ARTWORK_SIZES.to_string(),
            },
        }
    }
}

/// State of the transport buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlState {
    pub(crate) playing: bool,
    pub(crate) shuffle: bool,
    pub(crate) repeat: RepeatMode,
    pub(crate) volume: u32,
    pub(crate) video: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Notification {
    HistoryChanged {
        tracks: Vec<Track>,
        index: Option<usize>,
    },
    NowPlaying(NowPlaying),
    Transport(TransportProgress),
    Controls(ControlState),
}

/// Receives notifications for the rendering layer.
pub(crate) trait Notifier {
    fn notify(&mut self, notification: Notification);
}

#[derive(Clone, Debug)]
pub(crate) struct ControllerSettings {
    pub(crate) dedup: DedupPolicy,
    pub(crate) wrap: WrapPolicy,
    pub(crate) unload: UnloadPolicy,
    pub(crate) initial_volume: u32,
    pub(crate) video: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dedup: DedupPolicy::default(),
            wrap: WrapPolicy::default(),
            unload: UnloadPolicy::default(),
            initial_volume: 50,
            video: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    User,
    Automatic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    Finished,
    Failed,
}

#[derive(Debug)]
enum Step {
    Event(ControlEvent),
    Advance(Continuation),
}

pub(crate) struct Controller<E, N, T> {
    engine: E,
    notifier: N,
    ticker: T,
    picker: Box<dyn IndexPicker>,

    history: History,
    mode: PlaybackMode,
    wrap: WrapPolicy,

    gate: SessionGate,
    unload_guard: UnloadGuard,

    state: OrchestratorState,
    active_tick: Option<u64>,
    progress: TransportProgress,
    volume: u32,
    video: bool,
    consecutive_failures: usize,

    pending: VecDeque<Step>,
}

impl<E, N, T> Controller<E, N, T>
where
    E: PlaybackEngine,
    N: Notifier,
    T: TickSource,
{
    pub(crate) fn new(engine: E, notifier: N, ticker: T, settings: ControllerSettings) -> Self {
        Self {
            engine,
            notifier,
            ticker,
            picker: Box::new(RandomPicker),
            history: History::new(settings.dedup),
            mode: PlaybackMode::default(),
            wrap: settings.wrap,
            gate: SessionGate::default(),
            unload_guard: UnloadGuard::new(settings.unload),
            state: OrchestratorState::Idle,
            active_tick: None,
            progress: TransportProgress::default(),
            volume: settings.initial_volume.min(MAX_VOLUME),
            video: settings.video,
            consecutive_failures: 0,
            pending: VecDeque::new(),
        }
    }

    /// Replaces the random source used by shuffle.
    #[cfg(test)]
    pub(crate) fn with_picker(mut self, picker: Box<dyn IndexPicker>) -> Self {
        self.picker = picker;
        self
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &History {
        &self.history
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub(crate) fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Whether quitting now should ask the user first.
    pub(crate) fn requires_quit_confirmation(&self) -> bool {
        self.unload_guard
            .requires_confirmation(self.engine.state(), self.history.len())
    }

    /// Handles an event and any follow-up work it queues.
    ///
    /// # Errors
    ///
    /// Returns an error if a command could not be delivered to the engine.
    /// Pending follow-up work is discarded in that case.
    pub(crate) fn dispatch(&mut self, event: ControlEvent) -> Result<()> {
        self.pending.push_back(Step::Event(event));

        while let Some(step) = self.pending.pop_front() {
            let result = match step {
                Step::Event(ControlEvent::User(command)) => self.handle_user_command(command),
                Step::Event(ControlEvent::Engine(event)) => self.handle_engine_event(event),
                Step::Event(ControlEvent::TimerTick(generation)) => {
                    self.handle_timer_tick(generation);
                    Ok(())
                }
                Step::Advance(continuation) => self.advance(continuation),
            };

            if let Err(e) = result {
                self.pending.clear();
                return Err(e);
            }
        }

        Ok(())
    }

    fn handle_user_command(&mut self, command: UserCommand) -> Result<()> {
        match command {
            UserCommand::PlayTrack(track) => self.play_selected(track, true, Origin::User),
            UserCommand::SelectHistory(index) => match self.history.select_at(index) {
                Ok(track) => {
                    let track = track.clone();
                    self.play_selected(track, false, Origin::User)
                }
                Err(e) => {
                    log::debug!("Ignoring history selection: {}", e);
                    Ok(())
                }
            },
            UserCommand::Next => self.navigate(Direction::Next, Origin::User).map(|_| ()),
            UserCommand::Previous => self.navigate(Direction::Previous, Origin::User).map(|_| ()),
            UserCommand::TogglePlayPause => {
                if self.engine.state() == EngineState::Playing {
                    self.engine.pause()
                } else {
                    self.open_gate();
                    self.engine.play()
                }
            }
            UserCommand::Play => {
                self.open_gate();
                self.engine.play()
            }
            UserCommand::Pause => self.engine.pause(),
            UserCommand::Seek(fraction) => self.seek(fraction),
            UserCommand::SeekBy(delta) => self.seek(self.progress.fraction + delta),
            UserCommand::SetVolume(level) => self.set_volume(level),
            UserCommand::AdjustVolume(delta) => {
                let level = (i64::from(self.volume) + i64::from(delta)).clamp(0, i64::from(MAX_VOLUME));
                self.set_volume(level as u32)
            }
            UserCommand::ToggleShuffle => {
                self.mode.shuffle = !self.mode.shuffle;
                log::info!("Shuffle {}", if self.mode.shuffle { "on" } else { "off" });
                self.publish_controls();
                Ok(())
            }
            UserCommand::CycleRepeat => {
                self.mode.repeat = self.mode.repeat.cycle();
                log::info!("Repeat {:?}", self.mode.repeat);
                self.publish_controls();
                Ok(())
            }
            UserCommand::ToggleVideo => {
                self.video = !self.video;
                self.engine.set_video(self.video)?;
                self.publish_controls();
                Ok(())
            }
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) -> Result<()> {
        match event {
            EngineEvent::Ready => {
                log::info!("Engine ready, volume {}", self.volume);
                self.engine.set_volume(self.volume)?;
                self.publish_controls();
            }
            EngineEvent::StateChanged(engine_state) => {
                log::debug!(
                    "Engine state {:?} for {:?}",
                    engine_state,
                    self.history.current_track().map(Track::title)
                );

                self.state = match engine_state {
                    EngineState::Playing => OrchestratorState::Playing,
                    EngineState::Paused => OrchestratorState::Paused,
                    EngineState::Ended | EngineState::Error => OrchestratorState::Ended,
                    EngineState::Unstarted if self.state == OrchestratorState::Loading => {
                        OrchestratorState::Loading
                    }
                    EngineState::Unstarted => OrchestratorState::Idle,
                };

                if engine_state == EngineState::Playing {
                    self.consecutive_failures = 0;
                    self.start_transport();
                } else {
                    self.stop_transport();
                }

                self.publish_controls();

                if engine_state == EngineState::Ended {
                    self.pending.push_back(Step::Advance(Continuation::Finished));
                }
            }
            EngineEvent::Error(code) => {
                log::warn!("Track rejected by engine ({}), skipping", code);
                self.stop_transport();
                self.pending.push_back(Step::Advance(Continuation::Failed));
            }
        }

        Ok(())
    }

    fn handle_timer_tick(&mut self, generation: u64) {
        if self.active_tick != Some(generation) || self.state != OrchestratorState::Playing {
            log::trace!("Dropping stale transport tick {}", generation);
            return;
        }

        let progress = TransportProgress::new(self.engine.current_time(), self.engine.duration());
        self.progress = progress.clone();
        self.notifier.notify(Notification::Transport(progress));
    }

    /// Continues playback after the loaded track finished or failed.
    fn advance(&mut self, continuation: Continuation) -> Result<()> {
        match continuation {
            Continuation::Finished if self.mode.repeat == RepeatMode::One => {
                if self.gate.is_open() {
                    log::info!("Repeating current track");
                    self.engine.play()?;
                } else {
                    log::warn!("Replay deferred until the first play interaction");
                }
                return Ok(());
            }
            Continuation::Failed => {
                self.consecutive_failures += 1;
                if self.history.is_empty() || self.consecutive_failures >= self.history.len() {
                    log::warn!(
                        "{} consecutive tracks failed to play, stopping",
                        self.consecutive_failures
                    );
                    self.state = OrchestratorState::Ended;
                    self.publish_controls();
                    return Ok(());
                }
            }
            Continuation::Finished => {}
        }

        if !self.navigate(Direction::Next, Origin::Automatic)? {
            log::info!("End of history reached, playback stopped");
            self.state = OrchestratorState::Ended;
            self.publish_controls();
        }

        Ok(())
    }

    /// Moves through the history and plays the entry arrived at.
    ///
    /// Returns `false` when navigation was a no-op.
    fn navigate(&mut self, direction: Direction, origin: Origin) -> Result<bool> {
        let target = navigation::navigate(
            self.history.len(),
            self.history.current_index(),
            self.mode,
            self.wrap,
            direction,
            self.picker.as_mut(),
        );

        let Some(index) = target else {
            log::debug!(
                "No {:?} track from index {:?}",
                direction,
                self.history.current_index()
            );
            return Ok(false);
        };

        log::debug!("Navigating {:?} to index {}", direction, index);

        let track = self.history.select_at(index)?.clone();
        self.play_selected(track, false, origin)?;

        Ok(true)
    }

    /// Loads `track` into the engine, the single place the loaded track
    /// changes.
    ///
    /// Navigation repositions the history itself and passes
    /// `add_to_history = false`.
    fn play_selected(&mut self, track: Track, add_to_history: bool, origin: Origin) -> Result<()> {
        if add_to_history {
            self.history.record_and_select(track.clone());
        }

        log::info!("Loading '{}' ({})", track.title(), track.video_id());

        self.stop_transport();
        self.state = OrchestratorState::Loading;
        self.engine.load(&track)?;

        if origin == Origin::User || self.gate.is_open() {
            self.engine.play()?;
        } else {
            log::warn!(
                "Autoplay of '{}' deferred until the first play interaction",
                track.title()
            );
        }

        self.progress = TransportProgress::default();
        self.notifier
            .notify(Notification::Transport(self.progress.clone()));
        self.notifier
            .notify(Notification::NowPlaying(NowPlaying::for_track(&track)));
        self.publish_history();

        Ok(())
    }

    fn open_gate(&mut self) {
        if self.gate.mark_interacted() {
            log::info!("First play interaction, automatic playback enabled");
        }
    }

    fn seek(&mut self, fraction: f64) -> Result<()> {
        let duration = self.engine.duration();
        if !duration.is_finite() || duration <= 0.0 || !fraction.is_finite() {
            log::debug!("Ignoring seek, duration is unknown");
            return Ok(());
        }

        let position = fraction.clamp(0.0, 1.0) * duration;
        self.engine.seek_to(position)?;

        self.progress = TransportProgress::new(position, duration);
        self.notifier
            .notify(Notification::Transport(self.progress.clone()));

        Ok(())
    }

    fn set_volume(&mut self, level: u32) -> Result<()> {
        self.volume = level.min(MAX_VOLUME);
        self.engine.set_volume(self.volume)?;
        self.publish_controls();

        Ok(())
    }

    fn start_transport(&mut self) {
        self.stop_transport();
        self.active_tick = Some(self.ticker.start());
    }

    fn stop_transport(&mut self) {
        if self.active_tick.take().is_some() {
            self.ticker.stop();
        }
    }

    fn publish_history(&mut self) {
        self.notifier.notify(Notification::HistoryChanged {
            tracks: self.history.tracks().to_vec(),
            index: self.history.current_index(),
        });
    }

    fn publish_controls(&mut self) {
        self.notifier.notify(Notification::Controls(ControlState {
            playing: self.state == OrchestratorState::Playing,
            shuffle: self.mode.shuffle,
            repeat: self.mode.repeat,
            volume: self.volume,
            video: self.video,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{navigation::tests::FirstPicker, search::parse_results};

    #[derive(Clone, Debug, PartialEq)]
    enum EngineCall {
        Load(String),
        Play,
        Pause,
        SeekTo(f64),
        SetVolume(u32),
        SetVideo(bool),
    }

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<EngineCall>,
        state: EngineState,
        time: f64,
        duration: f64,
    }

    impl PlaybackEngine for FakeEngine {
        fn load(&mut self, track: &Track) -> Result<()> {
            self.calls.push(EngineCall::Load(track.video_id().to_string()));
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            self.calls.push(EngineCall::Play);
            Ok(())
        }

        fn pause(&mut self) -> Result<()> {
            self.calls.push(EngineCall::Pause);
            Ok(())
        }

        fn seek_to(&mut self, seconds: f64) -> Result<()> {
            self.calls.push(EngineCall::SeekTo(seconds));
            Ok(())
        }

        fn set_volume(&mut self, level: u32) -> Result<()> {
            self.calls.push(EngineCall::SetVolume(level));
            Ok(())
        }

        fn set_video(&mut self, enabled: bool) -> Result<()> {
            self.calls.push(EngineCall::SetVideo(enabled));
            Ok(())
        }

        fn current_time(&self) -> f64 {
            self.time
        }

        fn duration(&self) -> f64 {
            self.duration
        }

        fn state(&self) -> EngineState {
            self.state
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notifications: Vec<Notification>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, notification: Notification) {
            self.notifications.push(notification);
        }
    }

    #[derive(Default)]
    struct FakeTicker {
        generation: u64,
        running: bool,
        starts: usize,
        stops: usize,
    }

    impl TickSource for FakeTicker {
        fn start(&mut self) -> u64 {
            assert!(!self.running, "timer started while another was running");
            self.generation += 1;
            self.running = true;
            self.starts += 1;
            self.generation
        }

        fn stop(&mut self) {
            self.running = false;
            self.stops += 1;
        }
    }

    type TestController = Controller<FakeEngine, RecordingNotifier, FakeTicker>;

    fn controller() -> TestController {
        Controller::new(
            FakeEngine::default(),
            RecordingNotifier::default(),
            FakeTicker::default(),
            ControllerSettings::default(),
        )
    }

    fn user(controller: &mut TestController, command: UserCommand) {
        controller.dispatch(ControlEvent::User(command)).unwrap();
    }

    fn engine(controller: &mut TestController, event: EngineEvent) {
        controller.dispatch(ControlEvent::Engine(event)).unwrap();
    }

    /// History `[A, B, C]` positioned on `C`, gate open, engine calls cleared.
    fn abc() -> TestController {
        let mut c = controller();
        for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
            user(&mut c, UserCommand::PlayTrack(Track::new(id, title)));
        }
        user(&mut c, UserCommand::TogglePlayPause);
        c.engine.calls.clear();
        c.notifier.notifications.clear();
        c
    }

    fn loads(controller: &TestController) -> Vec<String> {
        controller
            .engine
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Load(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn play_track_records_loads_and_plays() {
        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(Track::new("a", "A")));

        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history().current_index(), Some(0));
        assert_eq!(
            c.engine.calls,
            vec![EngineCall::Load("a".to_string()), EngineCall::Play]
        );
        assert_eq!(c.state(), OrchestratorState::Loading);
    }

    #[test]
    fn play_track_publishes_now_playing_and_history() {
        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(Track::new("abc123", "Lofi Beats")));

        let now_playing = c.notifier.notifications.iter().find_map(|n| match n {
            Notification::NowPlaying(now) => Some(now.clone()),
            _ => None,
        });
        let now_playing = now_playing.expect("now playing published");
        assert_eq!(now_playing.title, "Lofi Beats");
        assert_eq!(
            now_playing.artwork_url,
            "https://img.youtube.com/vi/abc123/mqdefault.jpg"
        );
        assert_eq!(
            now_playing.media.artwork_url,
            "https://img.youtube.com/vi/abc123/hqdefault.jpg"
        );

        assert!(c.notifier.notifications.contains(&Notification::HistoryChanged {
            tracks: vec![Track::new("abc123", "Lofi Beats")],
            index: Some(0),
        }));
    }

    #[test]
    fn playing_same_track_twice_keeps_one_entry() {
        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(Track::new("a", "A")));
        user(&mut c, UserCommand::PlayTrack(Track::new("a", "A")));

        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn next_at_end_without_repeat_is_a_no_op() {
        let mut c = abc();
        user(&mut c, UserCommand::Next);

        assert_eq!(c.history().current_index(), Some(2));
        assert!(c.engine.calls.is_empty());
    }

    #[test]
    fn next_at_end_with_repeat_all_wraps_to_first() {
        let mut c = abc();
        user(&mut c, UserCommand::CycleRepeat);
        assert_eq!(c.mode().repeat, RepeatMode::All);

        user(&mut c, UserCommand::Next);

        assert_eq!(c.history().current_index(), Some(0));
        assert_eq!(loads(&c), vec!["a".to_string()]);
    }

    #[test]
    fn previous_from_first_with_repeat_all_wraps_to_last() {
        let mut c = abc();
        user(&mut c, UserCommand::SelectHistory(0));
        user(&mut c, UserCommand::CycleRepeat);
        c.engine.calls.clear();

        user(&mut c, UserCommand::Previous);

        assert_eq!(c.history().current_index(), Some(2));
        assert_eq!(loads(&c), vec!["c".to_string()]);
    }

    #[test]
    fn navigation_never_appends() {
        let mut c = abc();
        user(&mut c, UserCommand::Previous);
        user(&mut c, UserCommand::Previous);
        user(&mut c, UserCommand::Next);

        assert_eq!(c.history().len(), 3);
        assert_eq!(c.history().current_index(), Some(1));
    }

    #[test]
    fn empty_history_navigation_is_a_no_op() {
        let mut c = controller();
        user(&mut c, UserCommand::Next);
        user(&mut c, UserCommand::Previous);
        user(&mut c, UserCommand::SelectHistory(0));
        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));
        engine(&mut c, EngineEvent::Error("150".to_string()));

        assert!(c.history().is_empty());
        assert!(loads(&c).is_empty());
    }

    #[test]
    fn invalid_history_selection_is_ignored() {
        let mut c = abc();
        user(&mut c, UserCommand::SelectHistory(7));

        assert_eq!(c.history().current_index(), Some(2));
        assert!(c.engine.calls.is_empty());
    }

    #[test]
    fn shuffle_next_uses_picker_and_skips_current() {
        let mut c = abc().with_picker(Box::new(FirstPicker::default()));
        user(&mut c, UserCommand::ToggleShuffle);
        user(&mut c, UserCommand::Next);

        assert_eq!(c.history().current_index(), Some(0));
        assert_eq!(loads(&c), vec!["a".to_string()]);
    }

    #[test]
    fn shuffle_next_never_repeats_current() {
        let mut c = abc();
        user(&mut c, UserCommand::ToggleShuffle);

        let mut previous = c.history().current_index();
        for _ in 0..100 {
            user(&mut c, UserCommand::Next);
            let current = c.history().current_index();
            assert_ne!(current, previous);
            previous = current;
        }
    }

    #[test]
    fn ended_with_repeat_one_replays_in_place() {
        let mut c = abc();
        user(&mut c, UserCommand::SelectHistory(1));
        user(&mut c, UserCommand::CycleRepeat);
        user(&mut c, UserCommand::CycleRepeat);
        assert_eq!(c.mode().repeat, RepeatMode::One);
        c.engine.calls.clear();

        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));

        assert_eq!(c.engine.calls, vec![EngineCall::Play]);
        assert_eq!(c.history().current_index(), Some(1));
    }

    #[test]
    fn ended_advances_to_next_track() {
        let mut c = abc();
        user(&mut c, UserCommand::SelectHistory(0));
        c.engine.calls.clear();

        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));

        assert_eq!(c.history().current_index(), Some(1));
        assert_eq!(
            c.engine.calls,
            vec![EngineCall::Load("b".to_string()), EngineCall::Play]
        );
    }

    #[test]
    fn ended_at_last_track_stops() {
        let mut c = abc();
        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));

        assert_eq!(c.history().current_index(), Some(2));
        assert!(c.engine.calls.is_empty());
        assert_eq!(c.state(), OrchestratorState::Ended);
        assert!(c.notifier.notifications.iter().any(|n| matches!(
            n,
            Notification::Controls(ControlState { playing: false, .. })
        )));
    }

    #[test]
    fn error_never_replays_under_repeat_one() {
        let mut c = abc();
        user(&mut c, UserCommand::SelectHistory(0));
        user(&mut c, UserCommand::CycleRepeat);
        user(&mut c, UserCommand::CycleRepeat);
        c.engine.calls.clear();

        engine(&mut c, EngineEvent::Error("150".to_string()));

        assert_eq!(c.history().current_index(), Some(1));
        assert_eq!(
            c.engine.calls,
            vec![EngineCall::Load("b".to_string()), EngineCall::Play]
        );
    }

    #[test]
    fn consecutive_errors_stop_instead_of_looping() {
        let mut c = abc();
        user(&mut c, UserCommand::CycleRepeat);
        assert_eq!(c.mode().repeat, RepeatMode::All);

        for _ in 0..10 {
            engine(&mut c, EngineEvent::Error("150".to_string()));
        }

        // Two skips, then the third failure in a row stops playback.
        assert_eq!(loads(&c), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(c.state(), OrchestratorState::Ended);
    }

    #[test]
    fn playing_resets_failure_count() {
        let mut c = abc();
        user(&mut c, UserCommand::CycleRepeat);

        engine(&mut c, EngineEvent::Error("150".to_string()));
        engine(&mut c, EngineEvent::Error("150".to_string()));
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        engine(&mut c, EngineEvent::Error("150".to_string()));

        assert_eq!(loads(&c).len(), 3);
    }

    #[test]
    fn automatic_continuation_waits_for_first_interaction() {
        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(Track::new("a", "A")));
        user(&mut c, UserCommand::PlayTrack(Track::new("b", "B")));
        user(&mut c, UserCommand::SelectHistory(0));
        c.engine.calls.clear();

        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));

        // Cued but not played.
        assert_eq!(c.engine.calls, vec![EngineCall::Load("b".to_string())]);
        assert_eq!(c.history().current_index(), Some(1));
    }

    #[test]
    fn repeat_one_replay_waits_for_first_interaction() {
        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(Track::new("a", "A")));
        user(&mut c, UserCommand::CycleRepeat);
        user(&mut c, UserCommand::CycleRepeat);
        c.engine.calls.clear();

        engine(&mut c, EngineEvent::StateChanged(EngineState::Ended));

        assert!(c.engine.calls.is_empty());
    }

    #[test]
    fn toggle_pauses_when_playing_and_plays_otherwise() {
        let mut c = controller();
        c.engine.state = EngineState::Playing;
        user(&mut c, UserCommand::TogglePlayPause);
        assert_eq!(c.engine.calls, vec![EngineCall::Pause]);
        assert!(!c.gate.is_open());

        c.engine.calls.clear();
        c.engine.state = EngineState::Paused;
        user(&mut c, UserCommand::TogglePlayPause);
        assert_eq!(c.engine.calls, vec![EngineCall::Play]);
        assert!(c.gate.is_open());
    }

    #[test]
    fn media_actions_route_like_buttons() {
        let mut c = abc();
        user(&mut c, UserCommand::from(MediaAction::PreviousTrack));
        assert_eq!(c.history().current_index(), Some(1));

        user(&mut c, UserCommand::from(MediaAction::NextTrack));
        assert_eq!(c.history().current_index(), Some(2));

        c.engine.calls.clear();
        user(&mut c, UserCommand::from(MediaAction::Pause));
        user(&mut c, UserCommand::from(MediaAction::Play));
        assert_eq!(c.engine.calls, vec![EngineCall::Pause, EngineCall::Play]);
    }

    #[test]
    fn seek_uses_fraction_of_duration() {
        let mut c = controller();
        c.engine.duration = 200.0;

        user(&mut c, UserCommand::Seek(0.25));
        user(&mut c, UserCommand::Seek(1.5));

        assert_eq!(
            c.engine.calls,
            vec![EngineCall::SeekTo(50.0), EngineCall::SeekTo(200.0)]
        );
    }

    #[test]
    fn seek_by_is_relative_to_last_progress() {
        let mut c = controller();
        c.engine.duration = 200.0;

        user(&mut c, UserCommand::Seek(0.5));
        user(&mut c, UserCommand::SeekBy(-0.25));

        assert_eq!(
            c.engine.calls,
            vec![EngineCall::SeekTo(100.0), EngineCall::SeekTo(50.0)]
        );
    }

    #[test]
    fn seek_with_unknown_duration_is_a_no_op() {
        let mut c = controller();
        user(&mut c, UserCommand::Seek(0.5));

        c.engine.duration = f64::NAN;
        user(&mut c, UserCommand::Seek(0.5));

        assert!(c.engine.calls.is_empty());
    }

    #[test]
    fn volume_is_clamped_and_forwarded() {
        let mut c = controller();
        user(&mut c, UserCommand::SetVolume(150));
        user(&mut c, UserCommand::AdjustVolume(-30));
        user(&mut c, UserCommand::AdjustVolume(-500));

        assert_eq!(
            c.engine.calls,
            vec![
                EngineCall::SetVolume(100),
                EngineCall::SetVolume(70),
                EngineCall::SetVolume(0),
            ]
        );
    }

    #[test]
    fn ready_applies_initial_volume() {
        let mut c = controller();
        engine(&mut c, EngineEvent::Ready);

        assert_eq!(c.engine.calls, vec![EngineCall::SetVolume(50)]);
    }

    #[test]
    fn toggle_video_switches_engine_output() {
        let mut c = controller();
        user(&mut c, UserCommand::ToggleVideo);
        user(&mut c, UserCommand::ToggleVideo);

        assert_eq!(
            c.engine.calls,
            vec![EngineCall::SetVideo(true), EngineCall::SetVideo(false)]
        );
    }

    #[test]
    fn transport_runs_only_while_playing() {
        let mut c = abc();

        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        assert!(c.ticker.running);

        engine(&mut c, EngineEvent::StateChanged(EngineState::Paused));
        assert!(!c.ticker.running);

        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        assert!(c.ticker.running);
        assert_eq!(c.ticker.starts, 3);
        assert_eq!(c.ticker.stops, 2);
    }

    #[test]
    fn ticks_publish_progress() {
        let mut c = abc();
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        c.engine.time = 30.0;
        c.engine.duration = 120.0;
        c.notifier.notifications.clear();

        let generation = c.ticker.generation;
        c.dispatch(ControlEvent::TimerTick(generation)).unwrap();

        assert_eq!(
            c.notifier.notifications,
            vec![Notification::Transport(TransportProgress::new(30.0, 120.0))]
        );
    }

    #[test]
    fn stale_ticks_are_dropped() {
        let mut c = abc();
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        let stale = c.ticker.generation;
        engine(&mut c, EngineEvent::StateChanged(EngineState::Paused));
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));
        c.notifier.notifications.clear();

        c.dispatch(ControlEvent::TimerTick(stale)).unwrap();

        assert!(c.notifier.notifications.is_empty());
    }

    #[test]
    fn loading_a_track_stops_transport() {
        let mut c = abc();
        engine(&mut c, EngineEvent::StateChanged(EngineState::Playing));

        user(&mut c, UserCommand::SelectHistory(0));

        assert!(!c.ticker.running);
        assert_eq!(c.state(), OrchestratorState::Loading);
    }

    #[test]
    fn quit_confirmation_follows_engine_state() {
        let mut c = abc();
        assert!(!c.requires_quit_confirmation());

        c.engine.state = EngineState::Playing;
        assert!(c.requires_quit_confirmation());
    }

    #[test]
    fn search_result_selection_records_track() {
        let results = parse_results(r#"[{"videoId":"abc123","title":"Lofi Beats"}]"#, 10).unwrap();
        assert_eq!(results.len(), 1);

        let mut c = controller();
        user(&mut c, UserCommand::PlayTrack(results[0].clone()));

        assert_eq!(c.history().len(), 1);
        assert_eq!(
            c.history().current_track(),
            Some(&Track::new("abc123", "Lofi Beats"))
        );
        assert_eq!(c.history().current_track().map(Track::title), Some("Lofi Beats"));
    }
}

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

//! Transport position polling.
//!
//! While the engine is playing, a recurring timer posts ticks to the event
//! loop. On each tick the controller reads the engine position and duration
//! and republishes them as [`TransportProgress`].
//!
//! Every started timer gets a new generation number. Ticks carry their
//! generation so that a tick already queued when its timer was stopped can
//! be recognised as stale and dropped.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread,
    time::Duration,
};

use crate::{controller::ControlEvent, events::AppEvent, util::format::format_time};

/// A source of periodic transport ticks.
pub(crate) trait TickSource {
    /// Stops any running timer, starts a new one and returns its generation.
    fn start(&mut self) -> u64;

    /// Stops the running timer, if any.
    fn stop(&mut self);
}

/// Thread-backed timer posting [`ControlEvent::TimerTick`] to the event loop.
pub(crate) struct IntervalTimer {
    interval: Duration,
    event_tx: Sender<AppEvent>,
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl IntervalTimer {
    pub(crate) fn new(interval: Duration, event_tx: Sender<AppEvent>) -> Self {
        Self {
            interval,
            event_tx,
            generation: 0,
            cancel: None,
        }
    }
}

impl TickSource for IntervalTimer {
    fn start(&mut self) -> u64 {
        self.stop();

        self.generation += 1;
        let generation = self.generation;

        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel));

        let interval = self.interval;
        let event_tx = self.event_tx.clone();

        thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if cancel.load(Ordering::Relaxed) {
                    break;
                }

                let tick = AppEvent::Control(ControlEvent::TimerTick(generation));
                if event_tx.send(tick).is_err() {
                    break;
                }
            }
        });

        generation
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Playback position as shown by the transport bar.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TransportProgress {
    pub(crate) elapsed: String,
    pub(crate) total: String,
    /// Position within the track, `0.0..=1.0`.
    pub(crate) fraction: f64,
}

impl TransportProgress {
    pub(crate) fn new(current: f64, duration: f64) -> Self {
        let fraction = if duration.is_finite() && duration > 0.0 && current.is_finite() {
            (current / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            elapsed: format_time(current),
            total: format_time(duration),
            fraction,
        }
    }
}

impl Default for TransportProgress {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn progress_normalises_position() {
        let progress = TransportProgress::new(65.0, 260.0);

        assert_eq!(progress.elapsed, "1:05");
        assert_eq!(progress.total, "4:20");
        assert!((progress.fraction - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_duration_renders_defaults() {
        let progress = TransportProgress::new(12.0, 0.0);

        assert_eq!(progress.elapsed, "0:12");
        assert_eq!(progress.total, "0:00");
        assert_eq!(progress.fraction, 0.0);

        let progress = TransportProgress::new(f64::NAN, f64::NAN);
        assert_eq!(progress, TransportProgress::default());
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(TransportProgress::new(300.0, 200.0).fraction, 1.0);
    }

    #[test]
    fn restarting_advances_generation() {
        let (event_tx, _event_rx) = mpsc::channel();
        let mut timer = IntervalTimer::new(Duration::from_secs(60), event_tx);

        let first = timer.start();
        let second = timer.start();

        assert_ne!(first, second);
        timer.stop();
    }

    #[test]
    fn ticks_carry_generation() {
        let (event_tx, event_rx) = mpsc::channel();
        let mut timer = IntervalTimer::new(Duration::from_millis(5), event_tx);

        let generation = timer.start();
        let event = event_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("timer should tick");
        timer.stop();

        assert!(matches!(
            event,
            AppEvent::Control(ControlEvent::TimerTick(g)) if g == generation
        ));
    }
}

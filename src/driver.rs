//! Fixed-cadence driving utilities
//!
//! Engines are tick-driven: the presentation layer owns a repeating loop that
//! calls `Session::update` at a fixed interval while a run is live. This
//! module supplies the pieces of that loop: a monotonic clock capability for
//! engines that keep wall-clock timers, a frame-time accumulator that turns
//! variable frame deltas into whole simulation steps, and a cancellable
//! blocking loop for headless drivers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::sim::{GamePhase, Session};

/// Default simulation cadence (~60 Hz)
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Monotonic time source injected into engines with wall-clock-derived
/// timers. The runner's decisecond counter reads the clock each tick, so a
/// paused driver does not pause the run timer.
pub trait Clock {
    /// Elapsed time since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// `Clock` backed by `std::time::Instant`.
#[derive(Debug)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-advanced clock for tests and deterministic replays. Clones share the
/// same timeline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the timeline forward.
    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(by.as_micros() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Relaxed))
    }
}

/// Frame-time accumulator converting variable frame deltas into a whole
/// number of fixed simulation steps, clamped to avoid the spiral of death.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Feed one frame delta; returns how many simulation steps to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Long stalls (tab switch, debugger) are capped, not replayed.
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Drop any accumulated backlog (call on focus regain or unpause).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Cooperative cancellation flag for a driver loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Drive `session` at `interval` until the run terminates or `token` fires.
///
/// Cancellation is checked immediately before each tick, so a cancelled loop
/// never mutates state again — there is no partial tick.
pub fn run_session(session: &mut dyn Session, interval: Duration, token: &CancelToken) {
    while session.phase() == GamePhase::Playing && !token.is_cancelled() {
        std::thread::sleep(interval);
        if token.is_cancelled() {
            break;
        }
        session.update(interval.as_secs_f32());
    }
}

//! Runner engine: gravity jump over an endless horizontal obstacle stream
//!
//! The player sits at a fixed column while a two-obstacle pool scrolls past
//! and is recycled in place. The run timer derives from an injected monotonic
//! clock rather than the tick count, so a stalled driver does not stop the
//! score from advancing.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{GamePhase, Session};
use crate::driver::Clock;
use crate::scores::{RUNNER_KEY, ScoreStore};
use crate::tuning::RunnerTuning;

/// Horizontal window around the player column that counts as a hit
const COLLISION_WINDOW: f32 = 35.0;
/// Offsets above this are close enough to the ground to be hit
const NEAR_GROUND: f32 = -15.0;
/// Trailing boundary past which an obstacle is recycled
const RECYCLE_X: f32 = -350.0;
/// Leading screen edge; recycled obstacles respawn beyond it
const SCREEN_EDGE: f32 = 350.0;
/// Extra randomness added to every recycle gap
const BUFFER_RANGE: std::ops::RangeInclusive<f32> = 50.0..=250.0;
/// Pool layout seeded on restart: (x position, cluster count)
const STARTING_LAYOUT: [(f32, u8); 2] = [(350.0, 1), (650.0, 2)];

/// One obstacle cluster scrolling toward the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Stable identity for rendering correlation; ids survive recycling but
    /// are never reused across distinct spawns
    pub id: u32,
    pub x_pos: f32,
    /// Cluster size drawn for this obstacle (1-3)
    pub count: u8,
}

/// Gravity/jump engine over a recycled obstacle pair.
pub struct RunnerEngine {
    pub phase: GamePhase,
    /// Vertical offset, 0 = ground, negative = airborne
    pub y_offset: f32,
    pub velocity: f32,
    pub obstacles: Vec<Obstacle>,
    /// Elapsed run time in tenths of a second; doubles as the score
    pub deci_seconds: u32,
    pub high_score: u32,
    tuning: RunnerTuning,
    clock: Box<dyn Clock>,
    store: Box<dyn ScoreStore>,
    started: Option<Duration>,
    rng: Pcg32,
    next_id: u32,
}

impl RunnerEngine {
    pub fn new(seed: u64, clock: Box<dyn Clock>, store: Box<dyn ScoreStore>) -> Self {
        Self::with_tuning(RunnerTuning::default(), seed, clock, store)
    }

    pub fn with_tuning(
        tuning: RunnerTuning,
        seed: u64,
        clock: Box<dyn Clock>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let high_score = store.read(RUNNER_KEY) as u32;
        Self {
            phase: GamePhase::Idle,
            y_offset: 0.0,
            velocity: 0.0,
            obstacles: Vec::with_capacity(STARTING_LAYOUT.len()),
            deci_seconds: 0,
            high_score,
            tuning,
            clock,
            store,
            started: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Difficulty steps up every 10 whole seconds of run time; the value is
    /// a step function of elapsed seconds, not a continuous ramp.
    pub fn speed_multiplier(&self) -> f32 {
        let seconds = self.deci_seconds / 10;
        1.0 + (seconds / 10) as f32 * 0.2
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn jump(&mut self) {
        // Airborne taps are ignored.
        if self.y_offset == 0.0 {
            self.velocity = self.tuning.jump_strength;
        }
    }

    /// Reposition a recycled obstacle past its pool partner. The gap widens
    /// with the speed multiplier so reaction time stays roughly constant.
    fn recycle(&mut self, index: usize) {
        let other_x = self.obstacles[1 - index].x_pos;
        let dynamic_gap = self.tuning.min_gap * self.speed_multiplier();
        let buffer = self.rng.random_range(BUFFER_RANGE);

        self.obstacles[index].x_pos = other_x.max(SCREEN_EDGE) + dynamic_gap + buffer;
        self.obstacles[index].count = self.rng.random_range(1..=3);
    }

    fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if self.deci_seconds > self.high_score {
            self.high_score = self.deci_seconds;
            self.store.write(RUNNER_KEY, f64::from(self.high_score));
            log::info!("runner: new high score {} ds", self.high_score);
        }
    }
}

impl Session for RunnerEngine {
    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn restart(&mut self) {
        self.started = Some(self.clock.now());
        self.deci_seconds = 0;
        self.y_offset = 0.0;
        self.velocity = 0.0;
        self.obstacles.clear();
        for (x_pos, count) in STARTING_LAYOUT {
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle { id, x_pos, count });
        }
        self.phase = GamePhase::Playing;
        log::debug!("runner: session started");
    }

    fn update(&mut self, _dt: f32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(started) = self.started else {
            return;
        };

        // Timer reads the clock, not accumulated dt.
        let elapsed = self.clock.now().saturating_sub(started);
        self.deci_seconds = (elapsed.as_secs_f64() * 10.0) as u32;

        self.velocity += self.tuning.gravity;
        self.y_offset += self.velocity;
        if self.y_offset >= 0.0 {
            self.y_offset = 0.0;
        }

        let scroll = self.tuning.base_speed * self.speed_multiplier();
        let mut hit = false;

        for i in 0..self.obstacles.len() {
            self.obstacles[i].x_pos += scroll;

            // Tight collision window around the player column, skipped
            // while the player is clear of the ground.
            if (self.obstacles[i].x_pos - self.tuning.player_x).abs() < COLLISION_WINDOW
                && self.y_offset > NEAR_GROUND
            {
                hit = true;
            }

            if self.obstacles[i].x_pos < RECYCLE_X {
                self.recycle(i);
            }
        }

        if hit {
            self.end_game();
        }
    }

    fn impulse(&mut self) {
        self.jump();
    }
}

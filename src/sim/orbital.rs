//! Orbital engine: polar-coordinate dodge around a radial threat field
//!
//! The player orbits the canvas center at a fixed radius; a tap reverses the
//! orbit direction instead of applying an impulse. Enemies approach along
//! fixed bearings and are the one entity kind that is destroyed rather than
//! recycled — anything past the center is filtered out so the list stays
//! bounded. Positions live in polar space and convert to Cartesian only for
//! collision.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{GamePhase, Session};
use crate::polar_to_cartesian;
use crate::scores::{ORBITAL_KEY, ScoreStore};
use crate::tuning::OrbitalTuning;

/// Enemies whose distance falls below this are past the center and dropped
const DESPAWN_DISTANCE: f32 = -20.0;
/// One spawn per this many tick rolls on average (~1.2 enemies/second at 60 Hz)
const SPAWN_ODDS: u32 = 50;

/// One inbound threat on a fixed bearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable identity for rendering correlation
    pub id: u32,
    /// Approach bearing (radians)
    pub angle: f32,
    /// Radial distance from the canvas center
    pub distance: f32,
}

/// Polar-motion dodge engine.
pub struct OrbitalEngine {
    pub phase: GamePhase,
    /// Player bearing on the orbit circle (radians)
    pub angle: f32,
    /// Orbit direction: 1 clockwise, -1 counter-clockwise
    pub direction: f32,
    pub enemies: Vec<Enemy>,
    /// Survival time in seconds
    pub score: f64,
    pub high_score: f64,
    canvas_size: Vec2,
    tuning: OrbitalTuning,
    store: Box<dyn ScoreStore>,
    rng: Pcg32,
    next_id: u32,
}

impl OrbitalEngine {
    pub fn new(seed: u64, store: Box<dyn ScoreStore>) -> Self {
        Self::with_tuning(OrbitalTuning::default(), seed, store)
    }

    pub fn with_tuning(tuning: OrbitalTuning, seed: u64, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.read(ORBITAL_KEY);
        Self {
            phase: GamePhase::Idle,
            angle: 0.0,
            direction: 1.0,
            enemies: Vec::new(),
            score: 0.0,
            high_score,
            canvas_size: Vec2::ZERO,
            tuning,
            store,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Record the measured canvas size. The tick is a no-op until this is
    /// non-zero; updates land between ticks.
    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = size;
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn player_radius(&self) -> f32 {
        self.tuning.player_size / 2.0
    }

    pub fn enemy_radius(&self) -> f32 {
        self.tuning.enemy_size / 2.0
    }

    /// Player position in Cartesian canvas coordinates.
    pub fn player_position(&self) -> Vec2 {
        self.canvas_size * 0.5 + polar_to_cartesian(self.tuning.orbit_radius, self.angle)
    }

    /// Enemy position in Cartesian canvas coordinates.
    pub fn enemy_position(&self, enemy: &Enemy) -> Vec2 {
        self.canvas_size * 0.5 + polar_to_cartesian(enemy.distance, enemy.angle)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_enemy_if_needed(&mut self) {
        if self.rng.random_range(0..=SPAWN_ODDS) == 0 {
            // Spawns sit just off-screen at the larger canvas dimension.
            let distance = self.canvas_size.max_element();
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let id = self.next_entity_id();
            self.enemies.push(Enemy {
                id,
                angle,
                distance,
            });
        }
    }

    fn check_collision(&self) -> bool {
        let player = self.player_position();
        let hit_range = self.player_radius() + self.enemy_radius();
        self.enemies
            .iter()
            .any(|enemy| self.enemy_position(enemy).distance(player) < hit_range)
    }

    fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.write(ORBITAL_KEY, self.high_score);
            log::info!("orbital: new high score {:.1}s", self.high_score);
        }
    }
}

impl Session for OrbitalEngine {
    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn restart(&mut self) {
        self.enemies.clear();
        self.score = 0.0;
        self.angle = 0.0;
        self.direction = 1.0;
        self.phase = GamePhase::Playing;
        log::debug!("orbital: session started");
    }

    fn update(&mut self, dt: f32) {
        // Layout must be known before anything can move.
        if self.phase != GamePhase::Playing || self.canvas_size == Vec2::ZERO {
            return;
        }

        self.angle += dt * self.tuning.rotation_speed * self.direction;

        // Advance the threat field and drop anything past the center in the
        // same tick it crosses the threshold.
        let approach = dt * self.tuning.enemy_speed;
        for enemy in &mut self.enemies {
            enemy.distance -= approach;
        }
        self.enemies.retain(|e| e.distance > DESPAWN_DISTANCE);

        self.spawn_enemy_if_needed();

        if self.check_collision() {
            self.end_game();
            return;
        }

        self.score += f64::from(dt);
    }

    /// Reverse the orbit direction.
    fn impulse(&mut self) {
        self.direction = -self.direction;
    }
}

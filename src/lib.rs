//! Arcade Cabinet - simulation engines for a collection of arcade mini-games
//!
//! Core modules:
//! - `sim`: the four game engines and the shared session lifecycle contract
//! - `driver`: fixed-cadence tick utilities (accumulator, cancellable loop)
//! - `input`: gesture-to-action adapters
//! - `scores`: injected high-score persistence port
//! - `tuning`: data-driven game balance
//!
//! Presentation is out of scope: engines expose their state as plain fields
//! for a renderer to read between ticks and never draw anything themselves.

pub mod driver;
pub mod input;
pub mod scores;
pub mod sim;
pub mod tuning;

pub use scores::{JsonFileStore, MemoryStore, ScoreStore};
pub use sim::{FlightEngine, GamePhase, GridEngine, OrbitalEngine, RunnerEngine, Session};

use glam::Vec2;

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

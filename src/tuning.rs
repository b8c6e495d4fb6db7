//! Data-driven game balance
//!
//! Each engine is constructed from a tuning value; the `Default` impls carry
//! the shipped balance. Every struct deserializes from JSON with
//! `#[serde(default)]` so a balance file only needs to name the fields it
//! overrides.

use serde::{Deserialize, Serialize};

/// Runner engine balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Jump impulse (negative = upward)
    pub jump_strength: f32,
    /// Base obstacle scroll per tick (negative = toward the player)
    pub base_speed: f32,
    /// Fixed player column in scene space
    pub player_x: f32,
    /// Minimum spawn gap ahead of the other obstacle, scaled by the
    /// current speed multiplier on recycle
    pub min_gap: f32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_strength: -14.0,
            base_speed: -7.0,
            player_x: -150.0,
            min_gap: 280.0,
        }
    }
}

/// Flight engine balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Flap impulse (negative = upward)
    pub flap_strength: f32,
    /// Terminal fall velocity
    pub max_fall_speed: f32,
    /// Pipe scroll per tick
    pub pipe_speed: f32,
    /// Vertical size of the safe gap in each pipe
    pub pipe_gap_height: f32,
    /// Background scroll per tick; slower than pipes to create depth
    pub bg_speed: f32,
    /// Background width before the seamless loop reset
    pub loop_width: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            gravity: 0.45,
            flap_strength: -8.5,
            max_fall_speed: 10.0,
            pipe_speed: 4.0,
            pipe_gap_height: 170.0,
            bg_speed: 0.6,
            loop_width: 400.0,
        }
    }
}

/// Orbital engine balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalTuning {
    /// Player orbit radius around the canvas center
    pub orbit_radius: f32,
    /// Player diameter, used for circular collision
    pub player_size: f32,
    /// Enemy diameter, used for circular collision
    pub enemy_size: f32,
    /// Player angular speed (radians per second)
    pub rotation_speed: f32,
    /// Enemy approach speed toward the center (points per second)
    pub enemy_speed: f32,
}

impl Default for OrbitalTuning {
    fn default() -> Self {
        Self {
            orbit_radius: 120.0,
            player_size: 40.0,
            enemy_size: 30.0,
            rotation_speed: 2.2,
            enemy_speed: 180.0,
        }
    }
}

/// Grid engine balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            columns: 25,
            rows: 30,
        }
    }
}

//! Shared session lifecycle
//!
//! Every mini-game runs the same three-state loop: a session sits idle until
//! the first action, plays until it terminates, and stays terminal until the
//! next action re-seeds it. The contract surfaces no errors; operations that
//! do not apply in the current phase are silent no-ops.

use serde::{Deserialize, Serialize};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start action; ticks are ignored
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended; terminal until restart
    GameOver,
}

/// Lifecycle capability implemented by every engine.
pub trait Session {
    /// Current lifecycle phase.
    fn phase(&self) -> GamePhase;

    /// Reset all mutable state to initial-session values, re-seed the
    /// obstacle pool, and enter `Playing`. Safe to call repeatedly.
    fn restart(&mut self);

    /// Advance the simulation by one tick. No-op unless `Playing`.
    fn update(&mut self, dt: f32);

    /// Game-specific mid-run action (jump, flap, reverse). No-op for games
    /// whose only input is a heading change.
    fn impulse(&mut self);

    /// The one discrete action forwarded by the input adapter: starts a new
    /// run from `Idle` or `GameOver`, otherwise applies the game impulse.
    fn primary_action(&mut self) {
        match self.phase() {
            GamePhase::Idle | GamePhase::GameOver => self.restart(),
            GamePhase::Playing => self.impulse(),
        }
    }
}

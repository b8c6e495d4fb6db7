//! Deterministic simulation module
//!
//! All gameplay logic lives here. Each engine owns its state exclusively and
//! must stay pure simulation:
//! - Fixed-cadence ticks only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The engines share one lifecycle contract (`Session`) but are tuned and
//! structured independently; there is deliberately no generic pool or physics
//! layer underneath them.

pub mod flight;
pub mod grid;
pub mod orbital;
pub mod runner;
pub mod session;

pub use flight::{FlightEngine, Pipe};
pub use grid::{GridEngine, Heading};
pub use orbital::{Enemy, OrbitalEngine};
pub use runner::{Obstacle, RunnerEngine};
pub use session::{GamePhase, Session};

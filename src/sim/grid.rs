//! Grid engine: discrete snake movement on a fixed grid
//!
//! Cells are linear indices into a columns × rows grid, head first. The
//! engine is stepped by an external fixed-interval driver, slower than the
//! ~16 ms cadence the other games run at, and keeps a plain terminal flag
//! instead of the three-phase machine: a fresh engine is already live.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{GamePhase, Session};
use crate::scores::{GRID_KEY, ScoreStore};
use crate::tuning::GridTuning;

/// Body layout seeded on restart, head first
const STARTING_BODY: [usize; 3] = [45, 44, 43];
/// Initial food cell
const STARTING_FOOD: usize = 100;

/// Four-way movement heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Snake engine on a fixed grid.
pub struct GridEngine {
    pub columns: usize,
    pub rows: usize,
    /// Occupied cells, head at index 0
    pub snake_body: Vec<usize>,
    pub food_position: usize,
    pub heading: Heading,
    pub game_over: bool,
    pub high_score: u32,
    store: Box<dyn ScoreStore>,
    rng: Pcg32,
}

impl GridEngine {
    pub fn new(seed: u64, store: Box<dyn ScoreStore>) -> Self {
        Self::with_tuning(GridTuning::default(), seed, store)
    }

    pub fn with_tuning(tuning: GridTuning, seed: u64, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.read(GRID_KEY) as u32;
        Self {
            columns: tuning.columns,
            rows: tuning.rows,
            snake_body: STARTING_BODY.to_vec(),
            food_position: STARTING_FOOD,
            heading: Heading::Right,
            game_over: false,
            high_score,
            store,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Body growth since restart; the session score.
    pub fn score(&self) -> u32 {
        self.snake_body.len().saturating_sub(STARTING_BODY.len()) as u32
    }

    /// Record a heading change; it takes effect on the next step. A heading
    /// opposite to the current one is ignored — a reversal would always be
    /// an instant self-collision on the neck.
    pub fn set_heading(&mut self, heading: Heading) {
        if heading != self.heading.opposite() {
            self.heading = heading;
        }
    }

    /// Advance one step: move, grow on food, or terminate.
    ///
    /// Bounds are checked in row/column space, so walking off a lateral edge
    /// is out of bounds rather than wrapping onto the adjacent row. Illegal
    /// moves (wall or body) end the session.
    pub fn step(&mut self) {
        if self.game_over {
            return;
        }

        let head = self.snake_body[0];
        let row = head / self.columns;
        let col = head % self.columns;

        let new_head = match self.heading {
            Heading::Up if row > 0 => Some(head - self.columns),
            Heading::Down if row + 1 < self.rows => Some(head + self.columns),
            Heading::Left if col > 0 => Some(head - 1),
            Heading::Right if col + 1 < self.columns => Some(head + 1),
            _ => None,
        };

        let Some(new_head) = new_head else {
            self.end_game();
            return;
        };
        if self.snake_body.contains(&new_head) {
            self.end_game();
            return;
        }

        self.snake_body.insert(0, new_head);

        if new_head == self.food_position {
            // Grow: the tail stays this step.
            self.spawn_food();
        } else {
            self.snake_body.pop();
        }
    }

    fn spawn_food(&mut self) {
        self.food_position = self.rng.random_range(0..self.columns * self.rows);
    }

    fn end_game(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        let score = self.score();
        if score > self.high_score {
            self.high_score = score;
            self.store.write(GRID_KEY, f64::from(score));
            log::info!("grid: new high score {score}");
        }
    }
}

impl Session for GridEngine {
    fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else {
            GamePhase::Playing
        }
    }

    fn restart(&mut self) {
        self.snake_body = STARTING_BODY.to_vec();
        self.food_position = STARTING_FOOD;
        self.heading = Heading::Right;
        self.game_over = false;
        log::debug!("grid: session started");
    }

    fn update(&mut self, _dt: f32) {
        self.step();
    }

    /// Movement comes from `set_heading`; there is no mid-run impulse.
    fn impulse(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::MemoryStore;
    use proptest::prelude::*;

    fn engine() -> GridEngine {
        GridEngine::new(21, Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_step_moves_head_and_trims_tail() {
        let mut e = engine();
        assert_eq!(e.snake_body, vec![45, 44, 43]);
        e.step();
        assert_eq!(e.snake_body, vec![46, 45, 44]);
    }

    #[test]
    fn test_food_grows_snake_by_one_and_resamples() {
        let mut e = engine();
        e.food_position = 46;
        e.step();
        assert_eq!(e.snake_body, vec![46, 45, 44, 43]);
        assert_eq!(e.score(), 1);
        assert!(e.food_position < e.columns * e.rows);
    }

    #[test]
    fn test_heading_takes_effect_next_step() {
        let mut e = engine();
        e.set_heading(Heading::Down);
        assert_eq!(e.heading, Heading::Down);
        e.step();
        assert_eq!(e.snake_body[0], 45 + e.columns);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut e = engine();
        e.set_heading(Heading::Left);
        assert_eq!(e.heading, Heading::Right);
        e.step();
        assert_eq!(e.snake_body[0], 46);
        assert!(!e.game_over);
    }

    #[test]
    fn test_wall_ends_session() {
        let mut e = engine();
        // Head at 45 = row 1: one step up is legal, the next leaves the grid.
        e.set_heading(Heading::Up);
        e.step();
        assert!(!e.game_over);
        e.step();
        assert!(e.game_over);

        // Terminal flag blocks further movement.
        let body = e.snake_body.clone();
        e.step();
        assert_eq!(e.snake_body, body);
    }

    #[test]
    fn test_lateral_edge_does_not_wrap() {
        let mut e = engine();
        // Walk to the right edge of row 1: head 49 is the last column.
        for _ in 0..4 {
            e.step();
        }
        assert_eq!(e.snake_body[0], 49);
        assert!(!e.game_over);
        e.step();
        assert!(e.game_over, "right edge must not wrap onto the next row");
    }

    #[test]
    fn test_self_collision_ends_session() {
        let mut e = engine();
        // Body coiled so that stepping down from 46 lands on 71, which the
        // tail still occupies.
        e.snake_body = vec![46, 45, 44, 69, 70, 71];
        e.set_heading(Heading::Down);
        e.step();
        assert!(e.game_over);
    }

    #[test]
    fn test_session_trait_restart_reseeds() {
        let mut e = engine();
        e.set_heading(Heading::Up);
        e.step();
        e.step();
        assert_eq!(e.phase(), GamePhase::GameOver);

        e.primary_action();
        assert_eq!(e.phase(), GamePhase::Playing);
        assert_eq!(e.snake_body, vec![45, 44, 43]);
        assert_eq!(e.heading, Heading::Right);
        assert_eq!(e.food_position, 100);
    }

    #[test]
    fn test_high_score_written_iff_beaten() {
        let mut store = MemoryStore::new();
        store.write(GRID_KEY, 2.0);
        let mut e = GridEngine::new(21, Box::new(store.clone()));

        // Eat one food then die: score 1 < 2, no write. Food is parked on a
        // far cell after each eat so the walk upward cannot grow the snake.
        e.food_position = 46;
        e.step();
        e.food_position = 700;
        e.set_heading(Heading::Up);
        e.step();
        e.step();
        assert!(e.game_over);
        assert_eq!(store.read(GRID_KEY), 2.0);

        // Eat three then die: written through.
        e.restart();
        for target in [46, 47, 48] {
            e.food_position = target;
            e.step();
        }
        assert_eq!(e.score(), 3);
        e.food_position = 700;
        e.set_heading(Heading::Up);
        e.step();
        e.step();
        assert!(e.game_over);
        assert_eq!(store.read(GRID_KEY), 3.0);
        assert_eq!(e.high_score, 3);
    }

    proptest! {
        #[test]
        fn prop_food_resamples_within_grid(seed in 0u64..1_000) {
            let mut e = GridEngine::new(seed, Box::new(MemoryStore::new()));
            for _ in 0..32 {
                e.spawn_food();
                prop_assert!(e.food_position < e.columns * e.rows);
            }
        }
    }
}

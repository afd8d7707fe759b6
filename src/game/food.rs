//! Food placement
//!
//! Food is drawn uniformly from the free cells of the grid. While the snake is
//! short, rejection sampling is cheap and almost always succeeds on the first
//! try. Once the snake covers most of the board, the free cells are enumerated
//! and one is picked directly, so placement always terminates.

use rand::Rng;
use rand::seq::SliceRandom;

use super::config::GRID_SIZE;
use super::state::{Point, Snake};

/// Attempts made by rejection sampling before enumerating free cells
pub const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Occupancy (in percent of the grid) above which sampling is skipped
pub const DENSE_OCCUPANCY_PERCENT: usize = 80;

/// Pick a random cell not occupied by `snake`.
///
/// Returns `None` only when the snake fills the whole grid.
pub fn spawn_food<R: Rng + ?Sized>(rng: &mut R, snake: &Snake) -> Option<Point> {
    let cells = (GRID_SIZE * GRID_SIZE) as usize;

    if snake.len() * 100 < cells * DENSE_OCCUPANCY_PERCENT {
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let pos = Point::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
        log::debug!(
            "food sampling missed {} times, enumerating free cells",
            MAX_SAMPLING_ATTEMPTS
        );
    }

    free_cells(snake).choose(rng).copied()
}

/// All cells of the grid not covered by the snake, row by row
pub fn free_cells(snake: &Snake) -> Vec<Point> {
    (0..GRID_SIZE)
        .flat_map(|y| (0..GRID_SIZE).map(move |x| Point::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect()
}

//! Constructors for [`Grid`] values

use rand::Rng;

use super::grid::Grid;
use crate::error::LifeResult;

/// Probability that a cell starts alive in a randomised grid
pub const ALIVE_PROBABILITY: f64 = 0.5;

/// Creates [`Grid`] objects
pub struct GridFactory;

impl GridFactory {
    pub fn create_using_bool_array(
        cells: Vec<bool>,
        width: usize,
        height: usize,
    ) -> LifeResult<Grid> {
        let mut grid = Grid::default();
        grid.set_using_bool_array(cells, width, height)?;
        Ok(grid)
    }

    pub fn create_using_text_grid(
        text: &str,
        live_char: char,
        dead_char: char,
    ) -> LifeResult<Grid> {
        let mut grid = Grid::default();
        grid.set_using_text_grid(text, live_char, dead_char)?;
        Ok(grid)
    }

    /// All cells dead
    pub fn create_empty(width: usize, height: usize) -> Grid {
        Grid::new(width, height)
    }

    /// Each cell independently alive with [`ALIVE_PROBABILITY`]
    pub fn create_randomised(width: usize, height: usize) -> Grid {
        Self::create_randomised_with(&mut rand::rng(), width, height)
    }

    /// Randomised grid drawn from a caller-supplied source
    pub fn create_randomised_with<R: Rng + ?Sized>(
        rng: &mut R,
        width: usize,
        height: usize,
    ) -> Grid {
        let cells = (0..width * height)
            .map(|_| rng.random_bool(ALIVE_PROBABILITY))
            .collect();
        Grid::from_cells_unchecked(width, height, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn empty_grid_has_width_times_height_cells() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (3, 5), (64, 48)] {
            let grid = GridFactory::create_empty(w, h);
            assert_eq!(grid.cells().len(), w * h);
            assert_eq!(grid.live_count(), 0);
        }
    }

    #[test]
    fn randomised_grid_is_roughly_half_alive() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridFactory::create_randomised_with(&mut rng, 100, 100);

        assert_eq!(grid.cells().len(), 10_000);
        let live = grid.live_count();
        assert!((4_500..=5_500).contains(&live), "live = {live}");
    }

    #[test]
    fn seeded_randomisation_is_reproducible() {
        let a = GridFactory::create_randomised_with(&mut StdRng::seed_from_u64(3), 16, 9);
        let b = GridFactory::create_randomised_with(&mut StdRng::seed_from_u64(3), 16, 9);
        assert_eq!(a, b);
    }
}

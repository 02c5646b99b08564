//! Host-side B3/S23 transition
//!
//! Mirrors the Next-State fragment shader cell for cell: the same neighbour
//! offsets, the same wraparound rule and the same birth/survival counts. The
//! GPU engine is checked against it.

use super::grid::Grid;

/// Live neighbours of `(x, y)`
///
/// With `wrap` the grid is a torus; without it, cells beyond an edge are dead.
pub fn live_neighbours(grid: &Grid, x: usize, y: usize, wrap: bool) -> u8 {
    let (width, height) = (grid.width() as i64, grid.height() as i64);
    let cells = grid.cells();
    let mut count = 0;

    for dy in -1..=1_i64 {
        for dx in -1..=1_i64 {
            if dx == 0 && dy == 0 {
                continue;
            }

            let mut nx = x as i64 + dx;
            let mut ny = y as i64 + dy;

            if wrap {
                nx = nx.rem_euclid(width);
                ny = ny.rem_euclid(height);
            } else if nx < 0 || ny < 0 || nx >= width || ny >= height {
                continue;
            }

            if cells[(ny * width + nx) as usize] {
                count += 1;
            }
        }
    }

    count
}

/// Next state of a single cell given its current state and neighbour count
pub fn next_cell_state(alive: bool, neighbours: u8) -> bool {
    match neighbours {
        3 => true,
        2 => alive,
        _ => false,
    }
}

/// One generation of the whole grid
pub fn next_generation(grid: &Grid, wrap: bool) -> Grid {
    let width = grid.width();
    let cells = grid
        .cells()
        .iter()
        .enumerate()
        .map(|(i, &alive)| next_cell_state(alive, live_neighbours(grid, i % width, i / width, wrap)))
        .collect();

    Grid::from_cells_unchecked(width, grid.height(), cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridFactory;

    fn parse(text: &str) -> Grid {
        GridFactory::create_using_text_grid(text, '#', '.').unwrap()
    }

    #[test]
    fn isolated_cell_dies() {
        let grid = parse(".....\n.....\n..#..\n.....\n.....");
        let next = next_generation(&grid, false);
        assert_eq!(next.live_count(), 0);
    }

    #[test]
    fn block_is_still_life() {
        let grid = parse(".....\n.##..\n.##..\n.....\n.....");
        assert_eq!(next_generation(&grid, false), grid);
        assert_eq!(next_generation(&grid, true), grid);
    }

    #[test]
    fn blinker_oscillates() {
        let vertical = parse(".....\n..#..\n..#..\n..#..\n.....");
        let horizontal = parse(".....\n.....\n.###.\n.....\n.....");

        assert_eq!(next_generation(&vertical, false), horizontal);
        assert_eq!(next_generation(&horizontal, false), vertical);
    }

    #[test]
    fn wraparound_joins_left_and_right_edges() {
        let grid = parse("#...#\n.....\n.....\n.....\n.....");

        assert_eq!(live_neighbours(&grid, 0, 0, true), 1);
        assert_eq!(live_neighbours(&grid, 0, 0, false), 0);
        assert_eq!(live_neighbours(&grid, 4, 0, true), 1);
        assert_eq!(live_neighbours(&grid, 4, 0, false), 0);
    }

    #[test]
    fn wrapped_glider_returns_after_full_lap() {
        let mut grid = GridFactory::create_empty(6, 6);
        grid.paste(&parse(".#.\n..#\n###"), 0, 0).unwrap();
        let start = grid.clone();

        // A glider moves one cell diagonally every 4 generations
        for _ in 0..24 {
            grid = next_generation(&grid, true);
        }

        assert_eq!(grid, start);
    }
}

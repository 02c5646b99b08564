//! Classic starting patterns for Patterns mode
//!
//! Each pattern is stored as a `#`/`.` text grid and parsed on demand.

use super::{factory::GridFactory, grid::Grid};
use crate::error::LifeResult;

/// Classic Game of Life patterns
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pattern {
    Glider,
    Blinker,
    Pulsar,
    RPentomino,
    LightweightSpaceship,
    GosperGliderGun,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::Glider,
        Pattern::Blinker,
        Pattern::Pulsar,
        Pattern::RPentomino,
        Pattern::LightweightSpaceship,
        Pattern::GosperGliderGun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Glider => "Glider",
            Pattern::Blinker => "Blinker",
            Pattern::Pulsar => "Pulsar",
            Pattern::RPentomino => "R-pentomino",
            Pattern::LightweightSpaceship => "Lightweight spaceship",
            Pattern::GosperGliderGun => "Gosper glider gun",
        }
    }

    /// Pattern whose name matches `name`, ignoring case, spaces and hyphens
    pub fn from_name(name: &str) -> Option<Pattern> {
        let key = normalise(name);
        Pattern::ALL
            .into_iter()
            .find(|pattern| normalise(pattern.name()) == key)
    }

    /// Text grid with `#` for live and `.` for dead cells
    pub fn text(&self) -> &'static str {
        match self {
            Pattern::Glider => ".#.\n..#\n###\n",
            Pattern::Blinker => "###\n",
            Pattern::Pulsar => concat!(
                "..###...###..\n",
                ".............\n",
                "#....#.#....#\n",
                "#....#.#....#\n",
                "#....#.#....#\n",
                "..###...###..\n",
                ".............\n",
                "..###...###..\n",
                "#....#.#....#\n",
                "#....#.#....#\n",
                "#....#.#....#\n",
                ".............\n",
                "..###...###..\n",
            ),
            Pattern::RPentomino => ".##\n##.\n.#.\n",
            Pattern::LightweightSpaceship => ".#..#\n#....\n#...#\n####.\n",
            Pattern::GosperGliderGun => concat!(
                "........................#...........\n",
                "......................#.#...........\n",
                "............##......##............##\n",
                "...........#...#....##............##\n",
                "##........#.....#...##..............\n",
                "##........#...#.##....#.#...........\n",
                "..........#.....#.......#...........\n",
                "...........#...#....................\n",
                "............##......................\n",
            ),
        }
    }

    pub fn grid(&self) -> LifeResult<Grid> {
        GridFactory::create_using_text_grid(self.text(), '#', '.')
    }
}

fn normalise(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::rules::next_generation;

    #[test]
    fn every_pattern_parses() {
        for pattern in Pattern::ALL {
            let grid = pattern.grid().unwrap();
            assert!(grid.live_count() > 0, "{}", pattern.name());
        }
    }

    #[test]
    fn lookup_by_name_is_lenient() {
        assert_eq!(Pattern::from_name("glider"), Some(Pattern::Glider));
        assert_eq!(Pattern::from_name("r_pentomino"), Some(Pattern::RPentomino));
        assert_eq!(
            Pattern::from_name("Gosper Glider-Gun"),
            Some(Pattern::GosperGliderGun)
        );
        assert_eq!(Pattern::from_name("toad"), None);
    }

    #[test]
    fn gun_dimensions_and_population() {
        let gun = Pattern::GosperGliderGun.grid().unwrap();
        assert_eq!((gun.width(), gun.height()), (36, 9));
        assert_eq!(gun.live_count(), 36);
    }

    #[test]
    fn pulsar_has_period_three() {
        let mut board = Grid::new(17, 17);
        board.paste(&Pattern::Pulsar.grid().unwrap(), 2, 2).unwrap();
        let start = board.clone();

        let mut next = board;
        for _ in 0..3 {
            next = next_generation(&next, false);
        }

        assert_eq!(next, start);
    }
}

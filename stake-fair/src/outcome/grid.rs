use crate::{FairError, Result, RoundSeed};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Largest accepted side length
pub const MAX_GRID_SIZE: usize = 100;

/// Zero-based grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn from_index(index: usize, grid_size: usize) -> Self {
        Self {
            row: index / grid_size,
            col: index % grid_size,
        }
    }

    pub fn is_within(&self, grid_size: usize) -> bool {
        self.row < grid_size && self.col < grid_size
    }
}

impl fmt::Display for Cell {
    // one-based, the way players read the board
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub grid_size: usize,
    pub mine_count: usize,
    pub gem_count: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            mine_count: 5,
            gem_count: 3,
        }
    }
}

impl GridConfig {
    pub fn new(grid_size: usize, mine_count: usize, gem_count: usize) -> Result<Self> {
        let config = Self {
            grid_size,
            mine_count,
            gem_count,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// At least one cell must stay empty after placing mines and gems, and
    /// the side may not exceed [`MAX_GRID_SIZE`]
    pub fn validate(&self) -> Result<()> {
        let placed = self.mine_count.checked_add(self.gem_count);
        let cells = self.grid_size.checked_mul(self.grid_size);

        match (placed, cells) {
            (Some(placed), Some(cells)) if placed < cells && self.grid_size <= MAX_GRID_SIZE => {
                Ok(())
            }
            _ => Err(FairError::InvalidConfiguration {
                grid_size: self.grid_size,
                mine_count: self.mine_count,
                gem_count: self.gem_count,
            }),
        }
    }
}

/// Mine and gem layout for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOutcome {
    pub grid_size: usize,
    pub mines: BTreeSet<Cell>,
    pub gems: BTreeSet<Cell>,
}

impl GridOutcome {
    pub fn is_mine(&self, cell: &Cell) -> bool {
        self.mines.contains(cell)
    }

    pub fn is_gem(&self, cell: &Cell) -> bool {
        self.gems.contains(cell)
    }

    /// Board rendered row by row: `*` mine, `+` gem, `.` empty
    pub fn rows(&self) -> Vec<String> {
        (0..self.grid_size)
            .map(|row| {
                (0..self.grid_size)
                    .map(|col| {
                        let cell = Cell::new(row, col);
                        if self.is_mine(&cell) {
                            "*"
                        } else if self.is_gem(&cell) {
                            "+"
                        } else {
                            "."
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

/// Place mines, then gems on the remaining cells.
///
/// The generator is seeded with the round digest and lives only for this call.
pub fn draw(seed: &RoundSeed, config: &GridConfig) -> Result<GridOutcome> {
    config.validate()?;

    let mut rng = ChaCha20Rng::from_seed(seed.digest());
    let cell_count = config.cell_count();

    let mut mine_indices = index::sample(&mut rng, cell_count, config.mine_count).into_vec();
    mine_indices.sort_unstable();
    let mines: BTreeSet<Cell> = mine_indices
        .iter()
        .map(|&i| Cell::from_index(i, config.grid_size))
        .collect();

    // gem indices count only the cells left free by the mines
    let free_count = cell_count - config.mine_count;
    let gems: BTreeSet<Cell> = index::sample(&mut rng, free_count, config.gem_count)
        .into_iter()
        .map(|i| Cell::from_index(skip_mines(i, &mine_indices), config.grid_size))
        .collect();

    Ok(GridOutcome {
        grid_size: config.grid_size,
        mines,
        gems,
    })
}

/// Position of the `free_index`-th cell that is not in `sorted_mines`
fn skip_mines(free_index: usize, sorted_mines: &[usize]) -> usize {
    let mut position = free_index;
    for &mine in sorted_mines {
        if mine > position {
            break;
        }
        position += 1;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(GridConfig::default().validate().is_ok());
        assert!(GridConfig::new(5, 20, 4).is_ok());
        assert_eq!(
            GridConfig::new(5, 20, 5),
            Err(FairError::InvalidConfiguration {
                grid_size: 5,
                mine_count: 20,
                gem_count: 5,
            })
        );
        assert!(GridConfig::new(0, 0, 0).is_err());
        assert!(GridConfig::new(2, 3, 1).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        assert!(GridConfig::new(MAX_GRID_SIZE, 1, 1).is_ok());
        assert_eq!(
            GridConfig::new(30_000, 1, 1),
            Err(FairError::InvalidConfiguration {
                grid_size: 30_000,
                mine_count: 1,
                gem_count: 1,
            })
        );

        let seed = RoundSeed::new("abc", "xyz", 1).unwrap();
        let oversized = GridConfig {
            grid_size: 30_000,
            mine_count: 1,
            gem_count: 1,
        };
        assert!(draw(&seed, &oversized).is_err());
    }

    #[test]
    fn test_draw_known_layout() {
        let seed = RoundSeed::new("abc", "xyz", 1).unwrap();
        let outcome = draw(&seed, &GridConfig::default()).unwrap();

        let mines: BTreeSet<Cell> = [(0, 1), (1, 2), (1, 3), (2, 1), (3, 3)]
            .into_iter()
            .map(|(r, c)| Cell::new(r, c))
            .collect();
        let gems: BTreeSet<Cell> = [(0, 4), (1, 0), (3, 4)]
            .into_iter()
            .map(|(r, c)| Cell::new(r, c))
            .collect();
        assert_eq!(outcome.mines, mines);
        assert_eq!(outcome.gems, gems);

        let seed = RoundSeed::new("client", "server", 1).unwrap();
        let outcome = draw(&seed, &GridConfig::new(3, 6, 2).unwrap()).unwrap();
        let gems: BTreeSet<Cell> = [Cell::new(0, 0), Cell::new(0, 1)].into_iter().collect();
        assert_eq!(outcome.gems, gems);
    }

    #[test]
    fn test_skip_mines() {
        let mines = [0, 2, 3, 7];
        let free: Vec<usize> = (0..6).map(|i| skip_mines(i, &mines)).collect();
        assert_eq!(free, vec![1, 4, 5, 6, 8, 9]);
        assert_eq!(skip_mines(3, &[]), 3);
    }

    #[test]
    fn test_draw_is_reproducible() {
        let seed = RoundSeed::new("abc", "xyz", 1).unwrap();
        let config = GridConfig::default();

        let first = draw(&seed, &config).unwrap();
        let second = draw(&seed, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.mines.len(), 5);
        assert_eq!(first.gems.len(), 3);
        assert!(first.mines.is_disjoint(&first.gems));
    }

    #[test]
    fn test_draw_fills_all_but_one_cell() {
        let config = GridConfig::new(3, 6, 2).unwrap();
        for round in 1..=20 {
            let seed = RoundSeed::new("client", "server", round).unwrap();
            let outcome = draw(&seed, &config).unwrap();

            assert_eq!(outcome.mines.len(), 6);
            assert_eq!(outcome.gems.len(), 2);
            assert!(outcome.mines.is_disjoint(&outcome.gems));
            assert!(outcome
                .mines
                .iter()
                .chain(outcome.gems.iter())
                .all(|c| c.is_within(3)));
        }
    }

    #[test]
    fn test_rows_render() {
        let seed = RoundSeed::new("abc", "xyz", 4).unwrap();
        let outcome = draw(&seed, &GridConfig::default()).unwrap();
        let rows = outcome.rows();

        assert_eq!(rows.len(), 5);
        let joined = rows.join(" ");
        assert_eq!(joined.matches('*').count(), 5);
        assert_eq!(joined.matches('+').count(), 3);
    }

    #[test]
    fn test_cell_display_is_one_based() {
        assert_eq!(Cell::new(0, 4).to_string(), "(1,5)");
    }
}

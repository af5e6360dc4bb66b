use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};

use super::{error::GameError, types::Coord};

/// Pure board geometry. Holds no game state, only dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width:  i64,
    pub height: i64,
}

impl Grid {
    /// Fails fast when the board could never hold a snake/food pair.
    pub const fn new(width: i64, height: i64) -> Result<Grid, GameError> {
        if width < 1 || height < 1 || width * height < 2 {
            return Err(GameError::InvalidConfiguration { width, height });
        }
        Ok(Grid { width, height })
    }

    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width
            && coord.y < self.height
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Coord { x, y }))
    }

    /// Picks uniformly among the cells not in `occupied`.
    pub fn random_empty_cell<R: Rng>(
        &self,
        occupied: &VecDeque<Coord>,
        rng: &mut R,
    ) -> Result<Coord, GameError> {
        let free: Vec<Coord> =
            self.cells().filter(|c| !occupied.contains(c)).collect();
        free.choose(rng).copied().ok_or(GameError::NoSpaceAvailable)
    }
}

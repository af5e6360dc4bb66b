use std::collections::VecDeque;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    error::GameError,
    grid::Grid,
    types::{Coord, Direction},
};

/// Read-only, point-in-time copy of the game state. This is everything a
/// move proposer is allowed to see, and it doubles as the wire model for
/// remote proposers. Snake segments are ordered head first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width:     i64,
    pub height:    i64,
    pub snake:     Vec<Coord>,
    pub food:      Coord,
    pub direction: Direction,
    pub score:     u64,
    pub over:      bool,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Coord {
        self.snake[0]
    }

    const fn grid(&self) -> Grid {
        Grid {
            width:  self.width,
            height: self.height,
        }
    }

    /// Reversal tie-break: proposing the exact opposite of the current
    /// direction keeps the current direction instead. A snake cannot turn
    /// back into its own neck, but the game does not end over it either.
    #[must_use]
    pub fn resolve(&self, proposed: Direction) -> Direction {
        if proposed == self.direction.opposite() {
            self.direction
        } else {
            proposed
        }
    }

    /// The one legality rule, shared by the engine's own transition and by
    /// any proposer that wants to pre-filter its candidates. A move is legal
    /// iff, after reversal resolution, the new head lands in bounds and on
    /// no snake segment. The tail is exempt because it vacates its cell this
    /// step, except on a food-eating move where the snake grows instead.
    #[must_use]
    pub fn is_legal_move(&self, proposed: Direction) -> bool {
        let Some(&head) = self.snake.first() else {
            return false;
        };
        let next = head.neighbour(self.resolve(proposed));
        if !self.grid().contains(next) {
            return false;
        }
        let blocking = if next == self.food {
            self.snake.len()
        } else {
            self.snake.len() - 1
        };
        !self.snake.iter().take(blocking).any(|c| *c == next)
    }

    /// The subset of the four directions that pass [`Self::is_legal_move`].
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Direction> {
        Direction::iter()
            .copied()
            .filter(|d| self.is_legal_move(*d))
            .collect()
    }
}

/// Owns the mutable game state and is its only writer. External code gets
/// value copies via [`Engine::snapshot`] and feeds directions back through
/// [`Engine::step`].
pub struct Engine {
    grid:      Grid,
    snake:     VecDeque<Coord>,
    food:      Coord,
    direction: Direction,
    score:     u64,
    over:      bool,
    rng:       StdRng,
}

impl Engine {
    /// A fresh game with an entropy-seeded generator.
    pub fn new(width: i64, height: i64) -> Result<Engine, GameError> {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// A fresh game with an injected generator. Every random decision (food
    /// placement, nothing else) flows through it, so a fixed seed makes the
    /// whole game deterministic.
    pub fn with_rng(
        width: i64,
        height: i64,
        mut rng: StdRng,
    ) -> Result<Engine, GameError> {
        let grid = Grid::new(width, height)?;
        let snake = VecDeque::from([Coord {
            x: width / 2,
            y: height / 2,
        }]);
        let food = grid.random_empty_cell(&snake, &mut rng)?;
        Ok(Engine {
            grid,
            snake,
            food,
            direction: Direction::Right,
            score: 0,
            over: false,
            rng,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width:     self.grid.width,
            height:    self.grid.height,
            snake:     self.snake.iter().copied().collect(),
            food:      self.food,
            direction: self.direction,
            score:     self.score,
            over:      self.over,
        }
    }

    #[must_use]
    pub const fn over(&self) -> bool {
        self.over
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Advances the game by one move. A no-op once the game is over.
    ///
    /// Rule violations never come back as errors: an illegal move (after
    /// reversal resolution) simply ends the game. The only error is
    /// [`GameError::NoSpaceAvailable`] when food replacement finds the board
    /// saturated; the engine marks itself over first, and the caller decides
    /// whether that counts as a win.
    pub fn step(&mut self, proposed: Direction) -> Result<(), GameError> {
        if self.over {
            return Ok(());
        }

        let snap = self.snapshot();
        if !snap.is_legal_move(proposed) {
            self.over = true;
            return Ok(());
        }

        let resolved = snap.resolve(proposed);
        let new_head = snap.head().neighbour(resolved);
        self.snake.push_front(new_head);

        if new_head == self.food {
            self.score += 1;
            match self.grid.random_empty_cell(&self.snake, &mut self.rng) {
                Ok(food) => self.food = food,
                Err(err) => {
                    self.over = true;
                    return Err(err);
                }
            }
        } else {
            self.snake.pop_back();
        }

        self.direction = resolved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::Rng;

    use super::*;

    const SEED: u64 = 0x5eed;

    fn engine(width: i64, height: i64) -> Engine {
        Engine::with_rng(width, height, StdRng::seed_from_u64(SEED)).unwrap()
    }

    #[test]
    fn new_game_starts_centered() {
        let game = engine(5, 5);
        let snap = game.snapshot();
        assert_eq!(snap.snake, vec![Coord { x: 2, y: 2 }]);
        assert_eq!(snap.direction, Direction::Right);
        assert_eq!(snap.score, 0);
        assert!(!snap.over);
        assert_ne!(snap.food, snap.head());
        assert!(game.grid.contains(snap.food));
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let game = engine(5, 5);
        let mut snap = game.snapshot();
        snap.snake.push(Coord { x: 0, y: 0 });
        snap.score = 99;
        assert_eq!(game.snapshot().snake.len(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn reversal_is_overridden_not_fatal() {
        let mut game = engine(5, 5);
        game.food = Coord { x: 0, y: 0 };
        game.step(Direction::Left).unwrap();
        let snap = game.snapshot();
        assert!(!snap.over);
        assert_eq!(snap.head(), Coord { x: 3, y: 2 });
        assert_eq!(snap.direction, Direction::Right);
    }

    #[test]
    fn wall_collision_ends_the_game() {
        let mut game = engine(3, 3);
        game.snake = VecDeque::from([Coord { x: 0, y: 1 }]);
        game.direction = Direction::Left;
        game.food = Coord { x: 2, y: 2 };

        game.step(Direction::Left).unwrap();

        assert!(game.over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.snapshot().snake, vec![Coord { x: 0, y: 1 }]);
    }

    #[test]
    fn eating_grows_by_exactly_one() {
        let mut game = engine(5, 5);
        game.food = Coord { x: 4, y: 2 };

        game.step(Direction::Right).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.head(), Coord { x: 3, y: 2 });
        assert_eq!(snap.score, 0);
        assert_eq!(snap.snake.len(), 1);

        game.step(Direction::Right).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.head(), Coord { x: 4, y: 2 });
        assert_eq!(snap.score, 1);
        assert_eq!(
            snap.snake,
            vec![Coord { x: 4, y: 2 }, Coord { x: 3, y: 2 }]
        );
        assert!(!snap.snake.contains(&snap.food));
        assert!(game.grid.contains(snap.food));
    }

    #[test]
    fn stepping_into_the_vacating_tail_is_legal() {
        let mut game = engine(5, 5);
        game.snake = VecDeque::from([
            Coord { x: 2, y: 2 },
            Coord { x: 2, y: 3 },
            Coord { x: 3, y: 3 },
            Coord { x: 3, y: 2 },
        ]);
        game.direction = Direction::Up;
        game.food = Coord { x: 0, y: 0 };

        assert!(game.snapshot().is_legal_move(Direction::Right));
        game.step(Direction::Right).unwrap();

        let snap = game.snapshot();
        assert!(!snap.over);
        assert_eq!(snap.head(), Coord { x: 3, y: 2 });
        assert_eq!(snap.snake.len(), 4);
        assert!(snap.snake.iter().all_unique());
    }

    #[test]
    fn tail_cell_is_fatal_when_the_move_would_eat() {
        let mut game = engine(5, 5);
        game.snake = VecDeque::from([
            Coord { x: 2, y: 2 },
            Coord { x: 2, y: 3 },
            Coord { x: 3, y: 3 },
            Coord { x: 3, y: 2 },
        ]);
        game.direction = Direction::Up;
        // food on the tail cell: the tail will not vacate this step
        game.food = Coord { x: 3, y: 2 };

        assert!(!game.snapshot().is_legal_move(Direction::Right));
        game.step(Direction::Right).unwrap();
        assert!(game.over());
    }

    #[test]
    fn hitting_a_non_tail_segment_is_fatal() {
        let mut game = engine(5, 5);
        game.snake = VecDeque::from([
            Coord { x: 2, y: 2 },
            Coord { x: 3, y: 2 },
            Coord { x: 3, y: 3 },
            Coord { x: 2, y: 3 },
            Coord { x: 1, y: 3 },
        ]);
        game.direction = Direction::Left;
        game.food = Coord { x: 0, y: 0 };
        let before = game.snapshot();

        // (2, 3) is segment index 3 of 5, not the tail
        game.step(Direction::Down).unwrap();

        let snap = game.snapshot();
        assert!(snap.over);
        assert_eq!(snap.score, before.score);
        assert_eq!(snap.snake, before.snake);
        assert_eq!(snap.direction, before.direction);
    }

    #[test]
    fn terminal_state_is_frozen() {
        let mut game = engine(3, 3);
        game.snake = VecDeque::from([Coord { x: 0, y: 1 }]);
        game.direction = Direction::Left;
        game.food = Coord { x: 2, y: 2 };
        game.step(Direction::Left).unwrap();
        assert!(game.over());

        let frozen = game.snapshot();
        for direction in Direction::iter() {
            game.step(*direction).unwrap();
            assert_eq!(game.snapshot(), frozen);
        }
    }

    #[test]
    fn filling_the_board_surfaces_no_space() {
        let mut game = engine(1, 2);
        // the only free cell is (0, 0); eating it saturates the board
        assert_eq!(game.snapshot().head(), Coord { x: 0, y: 1 });
        assert_eq!(game.snapshot().food, Coord { x: 0, y: 0 });

        let result = game.step(Direction::Up);

        assert_eq!(result, Err(GameError::NoSpaceAvailable));
        assert!(game.over());
        assert_eq!(game.score(), 1);
        assert_eq!(game.snapshot().snake.len(), 2);
    }

    #[test]
    fn invariants_hold_over_a_random_playout() {
        let mut game = engine(6, 6);
        let mut move_rng = StdRng::seed_from_u64(SEED ^ 1);
        let mut last_score = 0;
        let mut last_len = 1;

        for _ in 0..500 {
            let snap = game.snapshot();
            let legal = snap.legal_moves();
            let proposed = if legal.is_empty() {
                snap.direction
            } else {
                legal[move_rng.gen_range(0..legal.len())]
            };
            let ate = snap.is_legal_move(proposed)
                && snap.head().neighbour(snap.resolve(proposed)) == snap.food;

            if game.step(proposed).is_err() {
                // board saturated; the game froze itself
                assert!(game.over());
                break;
            }

            let after = game.snapshot();
            assert!(after.score >= last_score);
            if after.over {
                break;
            }

            let grid = Grid::new(6, 6).unwrap();
            assert!(after.snake.iter().all(|c| grid.contains(*c)));
            assert!(after.snake.iter().all_unique());
            assert!(!after.snake.contains(&after.food));
            if ate {
                assert_eq!(after.score, last_score + 1);
                assert_eq!(after.snake.len(), last_len + 1);
            } else {
                assert_eq!(after.snake.len(), last_len);
            }
            last_score = after.score;
            last_len = after.snake.len();
        }
    }
}

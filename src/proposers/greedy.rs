use color_eyre::Result;

use super::Proposer;
use crate::gridsnake::{Direction, Snapshot};

/// Scripted proposer: among the legal directions, pick the one whose next
/// head cell is closest to the food. Ties resolve in the fixed scan order
/// Up, Right, Down, Left; with no legal move it keeps the current
/// direction and lets the engine end the game.
pub struct Greedy;

impl Proposer for Greedy {
    fn next_move(&mut self, snap: &Snapshot) -> Result<Direction> {
        let head = snap.head();
        let pick = snap
            .legal_moves()
            .into_iter()
            .filter(|d| *d != snap.direction.opposite())
            .min_by_key(|d| {
                head.neighbour(*d).manhattan_distance(snap.food)
            });
        Ok(pick.unwrap_or(snap.direction))
    }
}

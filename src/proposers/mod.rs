pub mod greedy;
pub mod human;
pub mod llm;
pub mod remote;

use color_eyre::Result;
pub use greedy::Greedy;
pub use human::Human;
pub use llm::{Llm, Provider};
pub use remote::Remote;

use crate::gridsnake::{Direction, Snapshot};

/// A source of proposed moves. Implementations see only an immutable
/// snapshot and answer with one of the four directions; the engine treats
/// the answer as untrusted and validates it itself.
pub trait Proposer {
    /// # Errors
    ///
    /// Fails when the source cannot produce a direction at all: closed
    /// stdin, a failed HTTP round-trip, or an unparsable model reply.
    fn next_move(&mut self, snap: &Snapshot) -> Result<Direction>;
}

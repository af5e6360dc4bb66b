pub mod engine;
pub mod error;
pub mod grid;
pub mod models;
pub mod types;

pub use engine::{Engine, Snapshot};
pub use error::GameError;
pub use grid::Grid;
pub use types::{Coord, Direction};

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
pub mod gridsnake;
pub mod proposers;
pub mod render;
pub mod telemetry;

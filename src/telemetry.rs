use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use chrono::Local;
use color_eyre::Result;
use csv::Writer;
use serde::Serialize;

use crate::{
    gridsnake::{Direction, Snapshot},
    render,
};

/// One CSV row per game step. Fire-and-forget: the engine never depends on
/// these being consumed.
#[derive(Serialize, Debug)]
pub struct StepRecord<'a> {
    pub timestamp:      String,
    pub proposer:       &'a str,
    pub step:           u64,
    pub score:          u64,
    pub snake_length:   usize,
    pub head:           String,
    pub food:           String,
    pub direction:      String,
    pub requested_move: String,
    pub board:          String,
    pub legal:          bool,
    pub over:           bool,
}

impl<'a> StepRecord<'a> {
    #[must_use]
    pub fn new(
        proposer: &'a str,
        step: u64,
        snap: &Snapshot,
        requested: Direction,
        legal: bool,
    ) -> StepRecord<'a> {
        StepRecord {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            proposer,
            step,
            score: snap.score,
            snake_length: snap.snake.len(),
            head: snap.head().to_string(),
            food: snap.food.to_string(),
            direction: snap.direction.to_string(),
            requested_move: requested.to_string(),
            board: render::board_text(snap),
            legal,
            over: snap.over,
        }
    }
}

/// Appends step records to `<dir>/snake_game_<label>_<timestamp>.csv`.
pub struct StepLogger {
    writer: Writer<File>,
    label:  String,
    path:   PathBuf,
}

impl StepLogger {
    pub fn create(dir: &Path, label: &str) -> Result<StepLogger> {
        fs::create_dir_all(dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("snake_game_{label}_{stamp}.csv"));
        let writer = Writer::from_path(&path)?;
        Ok(StepLogger {
            writer,
            label: label.to_owned(),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &mut self,
        step: u64,
        snap: &Snapshot,
        requested: Direction,
        legal: bool,
    ) -> Result<()> {
        self.writer.serialize(StepRecord::new(
            &self.label,
            step,
            snap,
            requested,
            legal,
        ))?;
        self.writer.flush()?;
        Ok(())
    }
}

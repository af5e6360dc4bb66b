use color_eyre::{eyre::WrapErr, Result};
use log::debug;
use reqwest::blocking::Client;

use super::Proposer;
use crate::gridsnake::{models::MoveResponse, Direction, Snapshot};

/// Proposer living in another process: POSTs the snapshot to a move
/// server and reads the direction out of the reply.
pub struct Remote {
    client: Client,
    url:    String,
}

impl Remote {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Remote {
        Remote {
            client: Client::new(),
            url:    url.into(),
        }
    }
}

impl Proposer for Remote {
    fn next_move(&mut self, snap: &Snapshot) -> Result<Direction> {
        let response: MoveResponse = self
            .client
            .post(format!("{}/move", self.url.trim_end_matches('/')))
            .json(snap)
            .send()?
            .error_for_status()?
            .json()
            .wrap_err("move server answered with an unreadable body")?;
        debug!("move server chose {}", response.movement);
        Ok(response.movement)
    }
}

use serde::{Deserialize, Serialize};

use super::types::Direction;

/// Answer to `GET /` on a move server.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServerInfo {
    pub name:    String,
    pub version: String,
}

/// Answer to `POST /move`. The request body is a [`super::Snapshot`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub movement: Direction,
}

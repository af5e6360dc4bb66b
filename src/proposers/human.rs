use std::io::{self, BufRead, Write};

use color_eyre::{eyre::eyre, Result};
use log::warn;

use super::Proposer;
use crate::gridsnake::{Direction, Snapshot};

/// Reads moves from stdin. Accepts `w`/`a`/`s`/`d` as well as the
/// direction words, case-insensitively, and keeps asking until it gets
/// one of them.
pub struct Human;

fn parse_key(input: &str) -> Option<Direction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "w" => Some(Direction::Up),
        "s" => Some(Direction::Down),
        "a" => Some(Direction::Left),
        "d" => Some(Direction::Right),
        other => other.parse().ok(),
    }
}

impl Proposer for Human {
    fn next_move(&mut self, _snap: &Snapshot) -> Result<Direction> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("move (w/a/s/d or up/down/left/right): ");
            io::stdout().flush()?;
            let line = lines.next().ok_or_else(|| eyre!("stdin closed"))??;
            match parse_key(&line) {
                Some(direction) => return Ok(direction),
                None => warn!("could not read a direction from {line:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_keys_and_words() {
        assert_eq!(parse_key("w"), Some(Direction::Up));
        assert_eq!(parse_key("A"), Some(Direction::Left));
        assert_eq!(parse_key(" s "), Some(Direction::Down));
        assert_eq!(parse_key("d"), Some(Direction::Right));
        assert_eq!(parse_key("down"), Some(Direction::Down));
        assert_eq!(parse_key("RIGHT"), Some(Direction::Right));
        assert_eq!(parse_key("q"), None);
        assert_eq!(parse_key(""), None);
    }
}

use std::collections::HashSet;

use color_eyre::{eyre::WrapErr, Result};
use itertools::Itertools;
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::Proposer;
use crate::{
    gridsnake::{Coord, Direction, Snapshot},
    render,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 1.0;

/// Which chat-completion dialect to speak. DeepSeek and friends are
/// [`Provider::OpenAi`] with a different base URL.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAi,
}

/// Proposer backed by a remote language model. Builds a prompt from the
/// snapshot, asks for exactly one direction word, parses the reply.
pub struct Llm {
    client:   Client,
    provider: Provider,
    base_url: String,
    model:    String,
    api_key:  String,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model:       &'a str,
    max_tokens:  u32,
    temperature: f32,
    messages:    Vec<ChatMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContent {
    text: String,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: String,
}

impl Llm {
    #[must_use]
    pub fn new(
        provider: Provider,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Llm {
        let base_url = base_url.unwrap_or_else(|| {
            match provider {
                Provider::Anthropic => ANTHROPIC_BASE_URL,
                Provider::OpenAi => OPENAI_BASE_URL,
            }
            .to_owned()
        });
        Llm {
            client: Client::new(),
            provider,
            base_url,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model:       &self.model,
            max_tokens:  MAX_TOKENS,
            temperature: TEMPERATURE,
            messages:    vec![ChatMessage {
                role:    "user",
                content: prompt,
            }],
        };
        let base = self.base_url.trim_end_matches('/');

        match self.provider {
            Provider::Anthropic => {
                let response: AnthropicResponse = self
                    .client
                    .post(format!("{base}/v1/messages"))
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&request)
                    .send()?
                    .error_for_status()?
                    .json()
                    .wrap_err("unreadable response from the messages API")?;
                response
                    .content
                    .into_iter()
                    .map(|block| block.text)
                    .next()
                    .ok_or_else(|| {
                        color_eyre::eyre::eyre!("the model answered nothing")
                    })
            }
            Provider::OpenAi => {
                let response: OpenAiResponse = self
                    .client
                    .post(format!("{base}/v1/chat/completions"))
                    .bearer_auth(&self.api_key)
                    .json(&request)
                    .send()?
                    .error_for_status()?
                    .json()
                    .wrap_err("unreadable response from the completions API")?;
                response
                    .choices
                    .into_iter()
                    .map(|choice| choice.message.content)
                    .next()
                    .ok_or_else(|| {
                        color_eyre::eyre::eyre!("the model answered nothing")
                    })
            }
        }
    }
}

impl Proposer for Llm {
    fn next_move(&mut self, snap: &Snapshot) -> Result<Direction> {
        let prompt = build_prompt(snap);
        let reply = self.complete(&prompt)?;
        debug!("model {} answered {reply:?}", self.model);
        let direction = reply
            .parse()
            .wrap_err_with(|| format!("model answered {reply:?}"))?;
        Ok(direction)
    }
}

/// Cells that one more move could turn fatal: the border ring plus every
/// in-bounds neighbour of a body segment.
fn danger_positions(snap: &Snapshot) -> Vec<Coord> {
    let mut danger = HashSet::new();
    for x in 0..snap.width {
        danger.insert(Coord { x, y: 0 });
        danger.insert(Coord {
            x,
            y: snap.height - 1,
        });
    }
    for y in 0..snap.height {
        danger.insert(Coord { x: 0, y });
        danger.insert(Coord {
            x: snap.width - 1,
            y,
        });
    }
    for segment in snap.snake.iter().skip(1) {
        for direction in Direction::iter() {
            let cell = segment.neighbour(*direction);
            if cell.x >= 0
                && cell.x < snap.width
                && cell.y >= 0
                && cell.y < snap.height
            {
                danger.insert(cell);
            }
        }
    }
    danger
        .into_iter()
        .sorted_by_key(|c| (c.y, c.x))
        .collect()
}

fn build_prompt(snap: &Snapshot) -> String {
    let head = snap.head();
    let body = snap.snake.iter().skip(1).join(", ");
    let danger = danger_positions(snap).iter().join(", ");
    let free_cells = snap.width * snap.height - snap.snake.len() as i64;

    format!(
        "You are playing a snake game. Choose the optimal move based on \
         the current state.\n\
         \n\
         Game Environment:\n\
         - Game Boundary: {width}x{height} (x: 0 to {max_x}, y: 0 to {max_y})\n\
         - Current Score: {score}\n\
         - Snake Length: {length}\n\
         - Available Space: {free_cells} cells\n\
         \n\
         Game Board (H=snake head, B=snake body, F=food, .=empty):\n\
         {board}\n\
         \n\
         Key Position Information:\n\
         - Snake Head: {head}\n\
         - Snake Body: [{body}]\n\
         - Food Position: {food}\n\
         - Current Direction: {direction}\n\
         - Dangerous Positions: [{danger}]\n\
         \n\
         Decision Priority (High to Low):\n\
         1. Survival: absolutely avoid walls and self-collision\n\
         2. Mobility: avoid dead ends and confined spaces\n\
         3. Food Chase: approach food when safe\n\
         4. Space Utilization: keep the game area accessible\n\
         \n\
         Basic Rules:\n\
         - You cannot move directly opposite to the current direction \
         {direction}\n\
         - Hitting a wall or the snake body ends the game\n\
         - Valid moves are: UP, DOWN, LEFT, RIGHT only\n\
         \n\
         Strict Requirement: respond with only one direction word \
         (UP/DOWN/LEFT/RIGHT), no additional text or explanation.",
        width = snap.width,
        height = snap.height,
        max_x = snap.width - 1,
        max_y = snap.height - 1,
        score = snap.score,
        length = snap.snake.len(),
        board = render::board_text(snap),
        head = head,
        food = snap.food,
        direction = snap.direction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            width:     5,
            height:    5,
            snake:     vec![
                Coord { x: 2, y: 2 },
                Coord { x: 1, y: 2 },
            ],
            food:      Coord { x: 4, y: 2 },
            direction: Direction::Right,
            score:     1,
            over:      false,
        }
    }

    #[test]
    fn prompt_carries_the_board_and_the_contract() {
        let prompt = build_prompt(&snapshot());
        assert!(prompt.contains("Game Boundary: 5x5"));
        assert!(prompt.contains(". B H . F"));
        assert!(prompt.contains("Snake Head: (2, 2)"));
        assert!(prompt.contains("Snake Body: [(1, 2)]"));
        assert!(prompt.contains("Current Direction: RIGHT"));
        assert!(prompt.contains("Available Space: 23 cells"));
        assert!(prompt.contains("(UP/DOWN/LEFT/RIGHT)"));
    }

    #[test]
    fn danger_covers_the_border_and_the_body_ring() {
        let danger = danger_positions(&snapshot());
        // border cell
        assert!(danger.contains(&Coord { x: 0, y: 0 }));
        // neighbours of the body segment at (1, 2)
        assert!(danger.contains(&Coord { x: 1, y: 1 }));
        assert!(danger.contains(&Coord { x: 1, y: 3 }));
        assert!(danger.contains(&Coord { x: 2, y: 2 }));
        // interior cell away from the snake
        assert!(!danger.contains(&Coord { x: 3, y: 3 }));
    }

    #[test]
    fn responses_deserialize() {
        let anthropic: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"UP"}]}"#,
        )
        .unwrap();
        assert_eq!(anthropic.content[0].text, "UP");

        let openai: OpenAiResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"left"}}]}"#,
        )
        .unwrap();
        assert_eq!(openai.choices[0].message.content, "left");
    }

    #[test]
    fn base_urls_follow_the_provider() {
        let llm = Llm::new(Provider::Anthropic, "m", "k", None);
        assert_eq!(llm.base_url, ANTHROPIC_BASE_URL);
        let llm = Llm::new(
            Provider::OpenAi,
            "deepseek-chat",
            "k",
            Some("https://api.deepseek.com".to_owned()),
        );
        assert_eq!(llm.base_url, "https://api.deepseek.com");
    }
}

use std::{io, path::PathBuf, thread, time::Duration};

use clap::{Parser, ValueEnum};
use color_eyre::{eyre::eyre, Result};
use log::{error, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use snake_arbiter::{
    gridsnake::{Engine, GameError},
    proposers::{Greedy, Human, Llm, Proposer, Provider, Remote},
    render,
    telemetry::StepLogger,
};

const NAME: &str = env!("CARGO_PKG_NAME");

const CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";
const GPT_MODEL: &str = "gpt-4o";
const DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

#[derive(ValueEnum, Copy, Clone, Debug)]
enum ProposerKind {
    /// scripted bot that walks toward the food
    Greedy,
    /// moves typed on stdin
    Human,
    /// Anthropic messages API
    Claude,
    /// OpenAI chat completions
    Gpt,
    /// DeepSeek (OpenAI dialect)
    Deepseek,
    /// another process speaking the move-server protocol
    Remote,
}

#[derive(Parser, Debug)]
#[command(name = NAME, version, about = "grid snake with pluggable move proposers")]
struct Args {
    /// board width in cells
    #[arg(long, default_value_t = 20)]
    width: i64,

    /// board height in cells
    #[arg(long, default_value_t = 20)]
    height: i64,

    /// fixed seed for food placement; omit for entropy
    #[arg(long)]
    seed: Option<u64>,

    /// who proposes the moves
    #[arg(long, value_enum, default_value_t = ProposerKind::Greedy)]
    proposer: ProposerKind,

    /// model name for the LLM proposers
    #[arg(long)]
    model: Option<String>,

    /// API base URL override for the LLM proposers
    #[arg(long)]
    base_url: Option<String>,

    /// move server URL for --proposer remote
    #[arg(long, default_value = "http://localhost:7878")]
    server_url: String,

    /// pause between steps, in milliseconds
    #[arg(long, default_value_t = 500)]
    step_delay_ms: u64,

    /// where CSV step records go
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// disable CSV step records
    #[arg(long)]
    no_log: bool,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    deepseek_api_key: Option<String>,
}

fn build_proposer(args: &Args) -> Result<(Box<dyn Proposer>, String)> {
    Ok(match args.proposer {
        ProposerKind::Greedy => (Box::new(Greedy), "greedy".to_owned()),
        ProposerKind::Human => (Box::new(Human), "human".to_owned()),
        ProposerKind::Claude => {
            let key = args
                .anthropic_api_key
                .clone()
                .ok_or_else(|| eyre!("ANTHROPIC_API_KEY is not set"))?;
            let model =
                args.model.clone().unwrap_or_else(|| CLAUDE_MODEL.to_owned());
            let llm = Llm::new(
                Provider::Anthropic,
                model.clone(),
                key,
                args.base_url.clone(),
            );
            (Box::new(llm), model)
        }
        ProposerKind::Gpt => {
            let key = args
                .openai_api_key
                .clone()
                .ok_or_else(|| eyre!("OPENAI_API_KEY is not set"))?;
            let model =
                args.model.clone().unwrap_or_else(|| GPT_MODEL.to_owned());
            let llm = Llm::new(
                Provider::OpenAi,
                model.clone(),
                key,
                args.base_url.clone(),
            );
            (Box::new(llm), model)
        }
        ProposerKind::Deepseek => {
            let key = args
                .deepseek_api_key
                .clone()
                .ok_or_else(|| eyre!("DEEPSEEK_API_KEY is not set"))?;
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| DEEPSEEK_MODEL.to_owned());
            let base_url = args
                .base_url
                .clone()
                .unwrap_or_else(|| DEEPSEEK_BASE_URL.to_owned());
            let llm =
                Llm::new(Provider::OpenAi, model.clone(), key, Some(base_url));
            (Box::new(llm), model)
        }
        ProposerKind::Remote => (
            Box::new(Remote::new(args.server_url.clone())),
            "remote".to_owned(),
        ),
    })
}

enum Outcome {
    GameOver,
    BoardFull,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();
    let args = Args::parse();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = Engine::with_rng(args.width, args.height, rng)?;
    let (mut proposer, label) = build_proposer(&args)?;

    let mut logger = if args.no_log {
        None
    } else {
        Some(StepLogger::create(&args.log_dir, &label)?)
    };
    if let Some(logger) = &logger {
        info!("step records go to {}", logger.path().display());
    }

    let delay = Duration::from_millis(args.step_delay_ms);
    let mut stdout = io::stdout();
    let mut step = 0u64;

    let outcome = loop {
        let snap = engine.snapshot();
        render::draw(&mut stdout, &snap, &label)?;

        let requested = match proposer.next_move(&snap) {
            Ok(direction) => direction,
            Err(err) => {
                error!("{label} failed to propose a move: {err:#}");
                println!(
                    "Game terminated abnormally. Final score: {}",
                    engine.score()
                );
                return Err(err);
            }
        };
        let legal = snap.is_legal_move(requested);
        if !legal {
            warn!("{label} proposed the illegal move {requested}");
        }

        let result = engine.step(requested);
        let after = engine.snapshot();
        if let Some(logger) = logger.as_mut() {
            if let Err(err) = logger.record(step, &after, requested, legal) {
                warn!("dropping a step record: {err}");
            }
        }
        step += 1;

        match result {
            Err(GameError::NoSpaceAvailable) => break Outcome::BoardFull,
            Err(err) => return Err(err.into()),
            Ok(()) if after.over => break Outcome::GameOver,
            Ok(()) => {}
        }
        thread::sleep(delay);
    };

    render::draw(&mut stdout, &engine.snapshot(), &label)?;
    match outcome {
        Outcome::BoardFull => {
            println!("The snake filled the board after {step} steps - a win.");
        }
        Outcome::GameOver => info!("game over after {step} steps"),
    }
    Ok(())
}

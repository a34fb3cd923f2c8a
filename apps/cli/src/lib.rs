//! Terminal front end for the flashcard collection.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod prompt;
pub mod state;

use anyhow::Context as _;
use clap::Parser;
use cli::Cli;
use commands::Context;
use config::Config;
use db::SqliteRepository;
use console::Term;
use prompt::{ConsolePrompt, LinePrompt};
use std::io::IsTerminal;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_db_path(cli.db.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    tracing::debug!(path = %config.db_path.display(), "opening database");
    let repository = SqliteRepository::open(&config.db_path)
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;

    let state = AppState::load(repository);
    let command = cli.command.unwrap_or_default();
    let stdin = std::io::stdin();

    if stdin.is_terminal() && Term::stderr().is_term() {
        let mut ctx = Context::new(state, ConsolePrompt::new(cli.json), config.pacing, cli.json);
        commands::dispatch(command, &mut ctx).await?;
    } else {
        let mut prompt = LinePrompt::new(stdin.lock(), std::io::stdout());
        if cli.json {
            prompt = prompt.with_prompts_on_stderr();
        }
        let mut ctx = Context::new(state, prompt, config.pacing, cli.json);
        commands::dispatch(command, &mut ctx).await?;
    }
    Ok(())
}

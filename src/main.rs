mod config;
mod food;
mod game;
mod grid;
mod input;
mod render;
mod snake;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::{error, info};
use simplelog::WriteLogger;

use config::Config;
use game::{FixedRateClock, SnakeGame};
use term::{with_session, TermInput, TermRenderer};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // stdout belongs to the board, so logs go to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("error creating log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, simplelog::Config::default(), log_file)
        .context("error initializing logger")?;

    let mut renderer = TermRenderer::new(config.grid())?;
    let title = config.title.clone();
    let mut clock = FixedRateClock::new(config.tick_interval());
    let mut game = SnakeGame::new(config, rand::thread_rng());

    let result = with_session(&mut renderer, &title, |renderer| {
        game.run(renderer, &mut TermInput, &mut clock)
    });

    match &result {
        Ok(()) => info!("exiting cleanly"),
        Err(e) => error!("game loop failed: {:#}", e),
    }

    result
}

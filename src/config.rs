use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use log::LevelFilter;

use crate::grid::Grid;
use crate::render::Color;

const SCREEN_WIDTH: i32 = 640;
const SCREEN_HEIGHT: i32 = 480;
const CELL_SIZE: i32 = 20;
const TICKS_PER_SECOND: u32 = 20;

const LOG_LEVEL_VAR: &str = "SNAKE_LOG_LEVEL";
const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub border: Color,
    pub food: Color,
    pub snake: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Color::rgb(0, 0, 0),
            border: Color::rgb(93, 216, 228),
            food: Color::rgb(255, 0, 0),
            snake: Color::rgb(0, 255, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub screen_width: i32,
    pub screen_height: i32,
    pub cell_size: i32,
    pub ticks_per_second: u32,
    pub palette: Palette,
    pub title: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            cell_size: CELL_SIZE,
            ticks_per_second: TICKS_PER_SECOND,
            palette: Palette::default(),
            title: "Snake".to_string(),
            log_file: PathBuf::from("snake.log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Defaults, with the logging knobs overridable from the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(level) = env::var(LOG_LEVEL_VAR) {
            config.log_level = LevelFilter::from_str(&level)
                .with_context(|| format!("invalid {} value {:?}", LOG_LEVEL_VAR, level))?;
        }

        if let Some(path) = env::var_os(LOG_FILE_VAR) {
            config.log_file = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_second == 0 {
            bail!("tick rate must be at least one tick per second");
        }

        if self.cell_size <= 0
            || self.screen_width < self.cell_size
            || self.screen_height < self.cell_size
        {
            bail!(
                "cell size {} does not fit a {}x{} board",
                self.cell_size,
                self.screen_width,
                self.screen_height
            );
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.screen_width, self.screen_height, self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second
    }
}

//! Whackatui: whack-a-mole in the terminal.

mod app;
mod assets;
mod figure;
mod game;
mod grid;
mod highscores;
mod input;
mod scheduler;
mod session;
mod theme;
mod timeline;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

/// Game rules derived from the CLI: grid size, lives and pop-up cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub start_lives: u32,
    pub min_move_delay_ms: u64,
    pub max_move_delay_ms: u64,
    pub min_pull_down_delay_ms: u64,
    pub max_pull_down_delay_ms: u64,
    /// Independent pop-up chains started by one start command.
    pub moves_per_time: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            start_lives: 3,
            min_move_delay_ms: 500,
            max_move_delay_ms: 1500,
            min_pull_down_delay_ms: 500,
            max_pull_down_delay_ms: 1500,
            moves_per_time: 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("{name} range is empty: min {min} ms > max {max} ms")]
    EmptyRange {
        name: &'static str,
        min: u64,
        max: u64,
    },
    #[error("grid of {rows}x{cols} is larger than {max}x{max}")]
    GridTooLarge { rows: usize, cols: usize, max: usize },
    #[error("{value} lives is more than {max}")]
    TooManyLives { value: u32, max: u32 },
}

/// Largest grid side the terminal scene can lay out.
pub const MAX_GRID_SIDE: usize = 6;
/// Most lives the scoreboard can show as hearts.
pub const MAX_LIVES: u32 = 15;

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::Zero("rows"));
        }
        if self.cols == 0 {
            return Err(ConfigError::Zero("cols"));
        }
        if self.start_lives == 0 {
            return Err(ConfigError::Zero("lives"));
        }
        if self.moves_per_time == 0 {
            return Err(ConfigError::Zero("moves-per-time"));
        }
        if self.rows > MAX_GRID_SIDE || self.cols > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: MAX_GRID_SIDE,
            });
        }
        if self.start_lives > MAX_LIVES {
            return Err(ConfigError::TooManyLives {
                value: self.start_lives,
                max: MAX_LIVES,
            });
        }
        if self.min_move_delay_ms > self.max_move_delay_ms {
            return Err(ConfigError::EmptyRange {
                name: "move delay",
                min: self.min_move_delay_ms,
                max: self.max_move_delay_ms,
            });
        }
        if self.min_pull_down_delay_ms > self.max_pull_down_delay_ms {
            return Err(ConfigError::EmptyRange {
                name: "pull-down delay",
                min: self.min_pull_down_delay_ms,
                max: self.max_pull_down_delay_ms,
            });
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.log_level)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "theme not loaded, using defaults");
        theme::Theme::default()
    });
    let config = GameConfig {
        rows: args.rows,
        cols: args.cols,
        start_lives: args.lives,
        min_move_delay_ms: args.min_move_delay_ms,
        max_move_delay_ms: args.max_move_delay_ms,
        min_pull_down_delay_ms: args.min_pull_down_delay_ms,
        max_pull_down_delay_ms: args.max_pull_down_delay_ms,
        moves_per_time: args.moves_per_time,
    };
    config.validate()?;
    tracing::info!(?config, "starting");
    let mut app = App::new(args, config, theme);
    app.run()?;
    Ok(())
}

/// Install a file subscriber. The terminal belongs to the game, so nothing is logged without `--log-file`.
fn init_logging(path: Option<&std::path::Path>, level: LogLevel) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level.as_tracing())
        .init();
    Ok(())
}

/// Whack-a-mole in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "whackatui",
    version,
    about = "Whack-a-mole in the terminal. Place the grid on the table, press start, whack the figures that pop up.",
    long_about = "Whackatui is a terminal whack-a-mole.\n\n\
        Tap (click or Enter) the table to place the grid, then press S to start. Figures \
        pop up at random; whack a raised one for 100 points. Whacking a lowered figure or \
        the bare table costs 50 points and a life. The game ends when no lives are left.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Space / Enter  Whack   T  Tap table\n  \
        S  Start   P  Pause   Q / Esc  Quit\n\n\
        The mouse works too: click figures, the table, or the start button."
)]
pub struct Args {
    /// Grid rows (ROW_NUM).
    #[arg(long, default_value = "3", value_name = "N")]
    pub rows: usize,

    /// Grid columns (COL_NUM).
    #[arg(long, default_value = "3", value_name = "N")]
    pub cols: usize,

    /// Lives at the start of each session (START_LIVES, at most 15).
    #[arg(long, default_value = "3", value_name = "N")]
    pub lives: u32,

    /// Shortest pause between two pop-ups of one chain.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub min_move_delay_ms: u64,

    /// Longest pause between two pop-ups of one chain.
    #[arg(long, default_value = "1500", value_name = "MS")]
    pub max_move_delay_ms: u64,

    /// Shortest time a figure stays raised.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub min_pull_down_delay_ms: u64,

    /// Longest time a figure stays raised.
    #[arg(long, default_value = "1500", value_name = "MS")]
    pub max_pull_down_delay_ms: u64,

    /// Independent pop-up chains per start (MOVES_PER_TIME).
    #[arg(long, default_value = "1", value_name = "N")]
    pub moves_per_time: usize,

    /// Seed for the pop-up sequence (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Plain-text sprite for the figures (at most 8 columns x 3 lines).
    #[arg(long, value_name = "FILE")]
    pub figure_sprite: Option<PathBuf>,

    /// Plain-text banner for the scoreboard (at most 20 columns x 2 lines).
    #[arg(long, value_name = "FILE")]
    pub scoreboard_sprite: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity when --log-file is set.
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

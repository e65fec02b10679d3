use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Pixel size of one board cell.
pub const DEFAULT_CELL_SIZE_PX: u32 = 30;

/// Pixel size of one side of the square board.
pub const DEFAULT_BOARD_SIZE_PX: u32 = 600;

/// Tick period at score zero, in milliseconds.
pub const DEFAULT_BASE_PERIOD_MS: u64 = 300;

/// Lower bound of the tick period, in milliseconds.
pub const DEFAULT_MIN_PERIOD_MS: u64 = 100;

/// Milliseconds removed from the period per food eaten.
pub const DEFAULT_SPEED_INCREMENT_MS: u64 = 10;

/// Points granted per food.
pub const DEFAULT_SCORE_INCREMENT: u32 = 10;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Creates a square grid with `cells` cells per side.
    #[must_use]
    pub fn square(cells: u16) -> Self {
        Self {
            width: cells,
            height: cells,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Board and timing constants the engine is parameterized by.
///
/// Every field may be omitted from a config file; missing fields keep their
/// defaults.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size_px: u32,
    pub board_size_px: u32,
    pub base_period_ms: u64,
    pub min_period_ms: u64,
    pub speed_increment_ms: u64,
    pub score_increment: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size_px: DEFAULT_CELL_SIZE_PX,
            board_size_px: DEFAULT_BOARD_SIZE_PX,
            base_period_ms: DEFAULT_BASE_PERIOD_MS,
            min_period_ms: DEFAULT_MIN_PERIOD_MS,
            speed_increment_ms: DEFAULT_SPEED_INCREMENT_MS,
            score_increment: DEFAULT_SCORE_INCREMENT,
        }
    }
}

impl GameConfig {
    /// Returns the number of cells per board side.
    ///
    /// Callers are expected to have run [`GameConfig::validate`]; an
    /// out-of-range value saturates at `u16::MAX`.
    #[must_use]
    pub fn board_cells(&self) -> u16 {
        let cells = self
            .board_size_px
            .checked_div(self.cell_size_px)
            .unwrap_or(0);
        u16::try_from(cells).unwrap_or(u16::MAX)
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::square(self.board_cells())
    }

    /// Returns the tick period implied by `score`.
    ///
    /// Each food eaten shortens the period by `speed_increment_ms` until the
    /// `min_period_ms` floor is reached.
    #[must_use]
    pub fn tick_period(&self, score: u32) -> Duration {
        let foods_eaten = u64::from(score.checked_div(self.score_increment).unwrap_or(0));
        let speedup_ms = foods_eaten.saturating_mul(self.speed_increment_ms);
        let period_ms = self
            .base_period_ms
            .saturating_sub(speedup_ms)
            .max(self.min_period_ms);
        Duration::from_millis(period_ms)
    }

    /// Checks the constants for combinations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size_px == 0 {
            return Err(ConfigError::Invalid("cell_size_px must be positive".into()));
        }

        let cells = self.board_size_px / self.cell_size_px;
        if cells < 2 {
            return Err(ConfigError::Invalid(format!(
                "board must be at least 2 cells wide, got {cells}"
            )));
        }
        if cells > u32::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "board must be at most {} cells wide, got {cells}",
                u16::MAX
            )));
        }

        if self.min_period_ms == 0 {
            return Err(ConfigError::Invalid("min_period_ms must be positive".into()));
        }
        if self.min_period_ms > self.base_period_ms {
            return Err(ConfigError::Invalid(format!(
                "min_period_ms ({}) exceeds base_period_ms ({})",
                self.min_period_ms, self.base_period_ms
            )));
        }
        if self.score_increment == 0 {
            return Err(ConfigError::Invalid(
                "score_increment must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads and validates the config at `path`.
///
/// Returns the defaults when the file does not exist. Returns `Err` when the
/// file exists but cannot be read, parsed, or validated.
pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(GameConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config =
        serde_json::from_str::<GameConfig>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::game::{
    TrayArea, GRID_SIZE_DEFAULT, GRID_SIZE_MAX, PIECE_SIZE_DEFAULT, TRAY_MARGIN_DEFAULT,
    TRAY_SEED_DEFAULT,
};
use crate::rules::EngineRules;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("grid_size must be between 1 and {max}, got {value}")]
    GridSize { value: u32, max: u32 },
    #[error("piece_size must be a positive finite number, got {0}")]
    PieceSize(f32),
    #[error("{name} must be a positive finite number, got {value}")]
    Threshold { name: &'static str, value: f32 },
    #[error("tray width and height must be positive, got {width}x{height}")]
    TrayArea { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    pub seed: u32,
    pub margin: f32,
    pub min_x: Option<f32>,
    pub min_y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            seed: TRAY_SEED_DEFAULT,
            margin: TRAY_MARGIN_DEFAULT,
            min_x: None,
            min_y: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub grid_size: u32,
    pub piece_size: f32,
    pub rules: EngineRules,
    pub tray: TrayConfig,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE_DEFAULT,
            piece_size: PIECE_SIZE_DEFAULT,
            rules: EngineRules::default(),
            tray: TrayConfig::default(),
        }
    }
}

impl PuzzleConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > GRID_SIZE_MAX {
            return Err(ConfigError::GridSize {
                value: self.grid_size,
                max: GRID_SIZE_MAX,
            });
        }
        if !is_positive(self.piece_size) {
            return Err(ConfigError::PieceSize(self.piece_size));
        }
        if !is_positive(self.rules.snap_threshold) {
            return Err(ConfigError::Threshold {
                name: "snap_threshold",
                value: self.rules.snap_threshold,
            });
        }
        if !is_positive(self.rules.board_lock_threshold) {
            return Err(ConfigError::Threshold {
                name: "board_lock_threshold",
                value: self.rules.board_lock_threshold,
            });
        }
        let tray = self.tray_area();
        if !is_positive(tray.width) || !is_positive(tray.height) {
            return Err(ConfigError::TrayArea {
                width: tray.width,
                height: tray.height,
            });
        }
        Ok(())
    }

    pub fn tray_area(&self) -> TrayArea {
        let beside = TrayArea::beside_board(self.grid_size, self.piece_size);
        TrayArea {
            min_x: self.tray.min_x.unwrap_or(beside.min_x),
            min_y: self.tray.min_y.unwrap_or(beside.min_y),
            width: self.tray.width.unwrap_or(beside.width),
            height: self.tray.height.unwrap_or(beside.height),
            margin: self.tray.margin,
        }
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

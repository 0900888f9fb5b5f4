//! Editor settings.
//!
//! Every field has a built-in default, so a config file only needs the values
//! it changes:
//!
//! ```json
//! { "window": { "width": 1024 }, "wheel_rotation_factor": 45.0 }
//! ```

use glam::Vec4;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use ui::{TreeViewColors, TreeViewLayout};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },
    #[error("scene width must be positive, got {0}")]
    InvalidSceneWidth(f32),
    #[error("unknown log level `{0}`")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Scene Graph Visualization".to_string(),
        }
    }
}

/// Colors of the demo scene and the frame clear color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub red_car: Vec4,
    pub blue_car: Vec4,
    pub wheel: Vec4,
    pub hubcap: Vec4,
    pub clear: Vec4,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red_car: Vec4::new(0.8, 0.2, 0.2, 1.0),
            blue_car: Vec4::new(0.2, 0.4, 0.8, 1.0),
            wheel: Vec4::new(0.2, 0.2, 0.2, 1.0),
            hubcap: Vec4::new(0.8, 0.8, 0.8, 1.0),
            clear: Vec4::new(0.2, 0.3, 0.3, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    /// Visible scene width in scene units
    pub scene_width: f32,
    pub tree_view: TreeViewLayout,
    pub tree_view_colors: TreeViewColors,
    pub palette: Palette,
    /// Degrees a wheel turns per scene unit of horizontal drag
    pub wheel_rotation_factor: f32,
    pub circle_segments: usize,
    pub log_level: String,
    /// Where run logs go; a directory under the system temp dir when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene_width: canvas::DEFAULT_SCENE_WIDTH,
            tree_view: TreeViewLayout::default(),
            tree_view_colors: TreeViewColors::default(),
            palette: Palette::default(),
            wheel_rotation_factor: 90.0,
            circle_segments: canvas::CIRCLE_SEGMENTS,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl EditorConfig {
    /// Reads and validates a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidWindowSize { width, height });
        }
        if !(self.scene_width > 0.0 && self.scene_width.is_finite()) {
            return Err(ConfigError::InvalidSceneWidth(self.scene_width));
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("scene-editor").join("logs"))
    }
}

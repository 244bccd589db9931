//! Configuration for the zpaceway shell

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zpaceway_core::input::Button;

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub video: VideoConfig,
    pub audio: AudioConfig,
    pub rom: RomConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Registry name of the engine to start sessions on.
    pub name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "testcard".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Window size as a multiple of the handheld design size.
    pub scale: u32,
    /// Filtered scaling of the screen. Off keeps pixels crisp.
    pub smoothing: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            smoothing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomConfig {
    /// Load the first file inside `.zip` archives.
    pub extract_zip: bool,
}

impl Default for RomConfig {
    fn default() -> Self {
        Self { extract_zip: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Button name → host key name.
    pub keys: BTreeMap<String, String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        let keys = [
            ("left", "Left"),
            ("right", "Right"),
            ("up", "Up"),
            ("down", "Down"),
            ("a", "X"),
            ("b", "Z"),
            ("select", "Backspace"),
            ("start", "Return"),
        ]
        .into_iter()
        .map(|(button, key)| (button.to_string(), key.to_string()))
        .collect();
        Self { keys }
    }
}

impl InputConfig {
    /// Key bindings with recognised button names. Unknown names are skipped.
    pub fn bindings(&self) -> impl Iterator<Item = (Button, &str)> {
        self.keys
            .iter()
            .filter_map(|(button, key)| Button::from_name(button).map(|b| (b, key.as_str())))
    }
}

impl Config {
    /// `<config dir>/zpaceway/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zpaceway").join("config.toml"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.audio.volume = config.audio.volume.clamp(0.0, 1.0);
        config.video.scale = config.video.scale.max(1);
        Ok(config)
    }
}

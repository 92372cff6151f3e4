// Difficulty presets and user preferences
// Preferences persist as TOML in the per-user config directory; game state never does

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tms_error::ConfigError;

/// Difficulty presets and custom settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,                        // 9x9, 10 mines
    Intermediate,                // 16x16, 40 mines
    Hard,                        // 30x16, 99 mines
    Custom(usize, usize, usize), // width, height, mines
}

impl Serialize for Difficulty {
    /// Serialize difficulty as its name; custom sizes live in custom_w/h/n
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "easy" => Ok(Difficulty::Easy),
            "intermediate" => Ok(Difficulty::Intermediate),
            "hard" => Ok(Difficulty::Hard),
            // Dimensions are filled in from custom_w/h/n after loading
            "custom" => Ok(Difficulty::Custom(0, 0, 0)),
            other => Err(serde::de::Error::custom(format!("unknown difficulty '{other}'"))),
        }
    }
}

impl Difficulty {
    /// Board width, height and mine count
    pub fn params(&self) -> (usize, usize, usize) {
        match self {
            Difficulty::Easy => (9, 9, 10),
            Difficulty::Intermediate => (16, 16, 40),
            Difficulty::Hard => (30, 16, 99),
            Difficulty::Custom(w, h, n) => (*w, *h, *n),
        }
    }

    /// Stable identifier, used in the config file and the board title
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
            Difficulty::Custom(_, _, _) => "custom",
        }
    }
}

/// User preferences, persisted to disk as TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,

    // Custom difficulty parameters
    pub custom_w: usize,
    pub custom_h: usize,
    pub custom_n: usize,

    pub ascii_icons: bool,    // Plain characters instead of emoji
    pub dark_mode: bool,
    pub framerate: u32,       // Redraw cap per second, 0 = uncapped
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: Difficulty::Intermediate,
            custom_w: 20,
            custom_h: 12,
            custom_n: 40,
            ascii_icons: false,
            dark_mode: false,
            framerate: 0,
        }
    }
}

impl Config {
    /// Parse a config file body, restoring custom dimensions
    pub fn from_toml(s: &str) -> Result<Config, ConfigError> {
        let mut cfg: Config = toml::from_str(s)?;
        if matches!(cfg.difficulty, Difficulty::Custom(_, _, _)) {
            cfg.difficulty = Difficulty::Custom(cfg.custom_w, cfg.custom_h, cfg.custom_n);
        }
        Ok(cfg)
    }

    /// Select a difficulty, keeping custom_w/h/n in sync for saving
    pub fn set_difficulty(&mut self, d: Difficulty) {
        if let Difficulty::Custom(w, h, n) = d {
            self.custom_w = w;
            self.custom_h = h;
            self.custom_n = n;
        }
        self.difficulty = d;
    }

    /// Load the file at `path`, or write defaults there if it does not exist yet
    pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            let s = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            return Config::from_toml(&s);
        }
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let s = toml::to_string(self)?;
        let write_err = |source: std::io::Error| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, s).map_err(write_err)
    }
}

/// Location of the preferences file, e.g. ~/.config/tmines/tmines.toml on Linux
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from("", "", "tmines").ok_or(ConfigError::NoConfigDir)?;
    Ok(proj.config_dir().join("tmines.toml"))
}

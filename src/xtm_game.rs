// Difficulty presets, per-session settings and configuration persistence

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::xtm_board::bomb_count_for;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,   // 6x6, 15% bombs
    Medium, // 8x8, 18% bombs
    Hard,   // 12x12, 20% bombs
}

impl Serialize for Difficulty {
    /// Serialize difficulty as its label (not an index)
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
        Difficulty::from_name(&s).ok_or_else(|| serde::de::Error::custom("unknown difficulty"))
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Board side length and bomb density (percent of cells)
    pub fn params(&self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (6, 15),
            Difficulty::Medium => (8, 18),
            Difficulty::Hard => (12, 20),
        }
    }

    /// Label stored in the score log; must stay a single token
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_name(s: &str) -> Option<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
    }

    /// Menu number (1-3)
    pub fn to_choice(&self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_choice(n: i64) -> Option<Difficulty> {
        match n {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Immutable configuration of one playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub size: usize,
    pub density: usize,
    pub bomb_count: usize,
    pub difficulty: Difficulty,
}

impl GameSettings {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (size, density) = difficulty.params();
        GameSettings {
            size,
            density,
            bomb_count: bomb_count_for(size, density),
            difficulty,
        }
    }
}

/// User preferences, persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,      // last chosen difficulty, pre-fills the prompt
    pub player_name: String,         // last player name, pre-fills the prompt
    pub ascii_icons: bool,           // plain ASCII glyphs for flags and bombs
    pub colors: bool,                // colored board cells
    pub score_file: Option<PathBuf>, // overrides the default score log location
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: Difficulty::Easy,
            player_name: String::new(),
            ascii_icons: false,
            colors: true,
            score_file: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem()?.to_str()?.to_string();
    ProjectDirs::from("com", "xhbl", &name)
}

fn exe_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .unwrap_or_else(|| "xtmines".to_string())
}

/// Get the configuration file path
/// Uses the platform config directory (e.g., ~/.config/xtmines/xtmines.toml on Linux)
/// and falls back to the current directory
pub fn config_path() -> Option<PathBuf> {
    let file = format!("{}.toml", exe_name());
    match project_dirs() {
        Some(proj) => Some(proj.config_dir().join(file)),
        None => env::current_dir().ok().map(|d| d.join(file)),
    }
}

/// Location of a data file (score log, log output) under the platform data directory
pub fn data_path(file: &str) -> PathBuf {
    match project_dirs() {
        Some(proj) => proj.data_dir().join(file),
        None => PathBuf::from(file),
    }
}

/// Load configuration from disk, or create the default one if missing or unreadable
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if let Ok(s) = fs::read_to_string(&path) {
            match toml::from_str::<Config>(&s) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {}", path.display(), e),
            }
        }
        let cfg = Config::default();
        save_config(&cfg);
        return cfg;
    }
    Config::default()
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        save_config_to(cfg, &path);
    }
}

/// Save configuration to an explicit file
pub fn save_config_to(cfg: &Config, path: &Path) {
    match toml::to_string(cfg) {
        Ok(s) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(e) = fs::write(path, s) {
                log::warn!("could not save config to {}: {}", path.display(), e);
            }
        }
        Err(e) => log::warn!("could not serialize config: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_derive_bomb_counts() {
        let counts: Vec<_> = Difficulty::ALL
            .iter()
            .map(|d| {
                let s = GameSettings::for_difficulty(*d);
                (s.size, s.bomb_count)
            })
            .collect();
        assert_eq!(counts, vec![(6, 5), (8, 11), (12, 28)]);
    }

    #[test]
    fn difficulty_labels_are_case_insensitive() {
        assert_eq!(Difficulty::from_name("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("expert"), None);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_choice(d.to_choice()), Some(d));
        }
        assert_eq!(Difficulty::from_choice(4), None);
    }

    #[test]
    fn config_survives_toml() {
        let cfg = Config {
            difficulty: Difficulty::Medium,
            player_name: "alice".to_string(),
            ascii_icons: true,
            colors: false,
            score_file: Some(PathBuf::from("/tmp/scores.txt")),
        };
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("difficulty = \"Medium\""));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("difficulty = \"Hard\"\n").unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert!(cfg.colors);
        assert_eq!(cfg.score_file, None);
        assert!(toml::from_str::<Config>("difficulty = \"Expert\"\n").is_err());
    }
}

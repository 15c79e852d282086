use crate::error::{VoiceError, VoiceResult};
use chess::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Rules
    pub rules_engine: String,
    pub start_fen: Option<String>,
    /// "white", "black" or "both"
    pub player_color: String,

    // Speech
    pub voice_corrections: HashMap<String, String>,

    // Meta
    pub log_level: String,
    pub audit_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_engine: "standard".to_string(),
            start_fen: None,
            player_color: "both".to_string(),
            voice_corrections: HashMap::from([
                ("night".to_string(), "knight".to_string()),
                ("rock".to_string(), "rook".to_string()),
            ]),
            log_level: "INFO".to_string(),
            audit_enabled: true,
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> VoiceResult<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`; a corrupt file is set aside and defaults used
    pub fn load_from(path: &Path) -> VoiceResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> VoiceResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> VoiceResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The side the player moves; `None` means both sides
    pub fn player_side(&self) -> VoiceResult<Option<Color>> {
        parse_side(&self.player_color)
    }
}

/// Parse "white", "black" or "both"
pub fn parse_side(text: &str) -> VoiceResult<Option<Color>> {
    match text.trim().to_lowercase().as_str() {
        "white" | "w" => Ok(Some(Color::White)),
        "black" | "b" => Ok(Some(Color::Black)),
        "both" | "" => Ok(None),
        other => Err(VoiceError::Config(format!(
            "unknown player color '{}' (expected white, black or both)",
            other
        ))),
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chessvoice")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

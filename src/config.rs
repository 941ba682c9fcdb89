use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_model() -> String {
    crate::client::DEFAULT_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            model: default_model(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pumsa")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty() {
        // Simulates loading an old config file with no fields
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let config: Config = toml::from_str(r#"theme = "terminal-default""#).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.model = "gemini-1.5-pro".to_string();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.model, deserialized.model);
    }
}

use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub dim: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub correct: String,
    pub incorrect: String,
    pub warning: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("pumsa")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(theme) = toml::from_str::<Theme>(content) {
                    return Some(theme);
                }
            }
        }

        None
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            dim: "#585b70".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            correct: "#a6e3a1".to_string(),
            incorrect: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color {
        Self::parse_color(&self.bg)
    }
    pub fn fg(&self) -> Color {
        Self::parse_color(&self.fg)
    }
    pub fn dim(&self) -> Color {
        Self::parse_color(&self.dim)
    }
    pub fn accent(&self) -> Color {
        Self::parse_color(&self.accent)
    }
    pub fn border(&self) -> Color {
        Self::parse_color(&self.border)
    }
    pub fn border_focused(&self) -> Color {
        Self::parse_color(&self.border_focused)
    }
    pub fn header_bg(&self) -> Color {
        Self::parse_color(&self.header_bg)
    }
    pub fn header_fg(&self) -> Color {
        Self::parse_color(&self.header_fg)
    }
    pub fn correct(&self) -> Color {
        Self::parse_color(&self.correct)
    }
    pub fn incorrect(&self) -> Color {
        Self::parse_color(&self.incorrect)
    }
    pub fn warning(&self) -> Color {
        Self::parse_color(&self.warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_valid_hex() {
        assert_eq!(ThemeColors::parse_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(ThemeColors::parse_color("00ff7f"), Color::Rgb(0, 255, 127));
    }

    #[test]
    fn parse_color_invalid_falls_back_to_reset() {
        assert_eq!(ThemeColors::parse_color("red"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("#ff"), Color::Reset);
    }

    #[test]
    fn bundled_themes_parse() {
        for name in Theme::available_themes() {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to load");
        }
    }
}

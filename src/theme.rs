//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One Dark palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Adjacency number colours, index 0 is "1".
    pub numbers: [Color; 8],
    /// Flags and mines.
    pub danger: Color,
    pub bg: Color,
    /// Board border.
    pub div_line: Color,
    /// Text (messages, help, clock).
    pub main_fg: Color,
    /// Title bar.
    pub title: Color,
    /// Cleared zero cells.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// Hardcoded One Dark defaults.
    pub fn onedark_default() -> Self {
        Self {
            numbers: [
                Color::Rgb(0x61, 0xAF, 0xEF), // blue
                Color::Rgb(0x98, 0xC3, 0x79), // green
                Color::Rgb(0xC6, 0x78, 0xDD), // magenta
                Color::Rgb(0xE5, 0xC0, 0x7B), // yellow
                Color::Rgb(0x56, 0xB6, 0xC2), // cyan
                Color::Rgb(0xD1, 0x9A, 0x66), // orange
                Color::Rgb(0xAB, 0xB2, 0xBF), // fg
                Color::Rgb(0x5C, 0x63, 0x70), // comment grey
            ],
            danger: Color::Rgb(0xE0, 0x6C, 0x75),
            bg: Color::Rgb(0x28, 0x2C, 0x34),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map)?;
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override number and danger colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.numbers = [
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0xFF, 0xFF, 0xFF),
                    Color::Rgb(0xAA, 0xAA, 0xAA),
                ];
                self.danger = Color::Rgb(0xFF, 0x00, 0x00);
            }
            crate::Palette::Colorblind => {
                // Paul Tol's bright scheme; danger stays distinct from every number.
                self.numbers = [
                    Color::Rgb(0x44, 0x77, 0xAA),
                    Color::Rgb(0x22, 0x88, 0x33),
                    Color::Rgb(0xAA, 0x33, 0x77),
                    Color::Rgb(0xCC, 0xBB, 0x44),
                    Color::Rgb(0x66, 0xCC, 0xEE),
                    Color::Rgb(0xBB, 0xBB, 0xBB),
                    Color::Rgb(0xEE, 0xEE, 0xEE),
                    Color::Rgb(0x77, 0x77, 0x77),
                ];
                self.danger = Color::Rgb(0xEE, 0x66, 0x77);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let defaults = Self::onedark_default();
        let get = |key: &str, fallback: Color| -> Result<Color, ThemeError> {
            map.get(key).map_or(Ok(fallback), |v| parse_hex(v))
        };
        Ok(Self {
            numbers: [
                get("cpu_box", defaults.numbers[0])?,
                get("mem_box", defaults.numbers[1])?,
                get("net_box", defaults.numbers[2])?,
                get("cpu_mid", defaults.numbers[3])?,
                get("hi_fg", defaults.numbers[4])?,
                get("temp_mid", defaults.numbers[5])?,
                get("main_fg", defaults.numbers[6])?,
                get("inactive_fg", defaults.numbers[7])?,
            ],
            danger: get("cpu_end", defaults.danger)?,
            bg: get("main_bg", defaults.bg)?,
            div_line: get("div_line", defaults.div_line)?,
            main_fg: get("main_fg", defaults.main_fg)?,
            title: get("title", defaults.title)?,
            inactive_fg: get("inactive_fg", defaults.inactive_fg)?,
        })
    }

    /// Colour for an adjacency count 1..=8.
    #[inline]
    pub fn number_color(&self, count: u8) -> Color {
        match count {
            0 => self.inactive_fg,
            n => self.numbers[usize::from(n - 1) % 8],
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.main_fg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn danger_style(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.div_line).bg(self.bg)
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 if s.is_ascii() => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 if s.is_ascii() => (
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GGGGGG"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[cpu_end]="#31353F""##);
        assert_eq!(map.get("cpu_end"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_overrides_danger() {
        let map = parse_theme_file("# comment\ntheme[cpu_end]='#FF0000'\n");
        let theme = Theme::from_map(&map).unwrap();
        assert_eq!(theme.danger, Color::Rgb(255, 0, 0));
        assert_eq!(theme.div_line, Theme::default().div_line);
    }

    #[test]
    fn test_number_color() {
        let theme = Theme::default();
        assert_eq!(theme.number_color(1), theme.numbers[0]);
        assert_eq!(theme.number_color(8), theme.numbers[7]);
        assert_eq!(theme.number_color(0), theme.inactive_fg);
    }

    #[test]
    fn test_missing_file_uses_palette_defaults() {
        let theme = Theme::load(
            Some(Path::new("/nonexistent/sweeptui.theme")),
            crate::Palette::HighContrast,
        )
        .unwrap();
        assert_eq!(theme.danger, Color::Rgb(0xFF, 0x00, 0x00));
    }
}

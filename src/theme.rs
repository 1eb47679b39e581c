//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Scene and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Figure body.
    pub figure: Color,
    /// Hole a lowered figure hides in.
    pub hole: Color,
    /// Failure light and lost lives.
    pub alert: Color,
    /// Upward-facing table top (where the grid goes).
    pub table: Color,
    /// Vertical wall behind the table.
    pub wall: Color,
    /// Downward-facing ceiling strip.
    pub ceiling: Color,
    /// Sidebar / overlay background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Text (score, lives).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Hints and secondary text.
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

/// `Color::Rgb` from a 0xRRGGBB literal.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// One Dark defaults (values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            figure: rgb(0x98C379),
            hole: rgb(0x1E2127),
            alert: rgb(0xE06C75),
            table: rgb(0x4B3F35),
            wall: rgb(0x31353F),
            ceiling: rgb(0x282C34),
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
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
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override figure and alert colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.figure = rgb(0x00FF00);
                self.alert = rgb(0xFF0000);
                self.hole = Color::Black;
                self.main_fg = Color::White;
            }
            crate::Palette::Colorblind => {
                // Blue figure against an orange alert.
                self.figure = rgb(0x0077BB);
                self.alert = rgb(0xEE7733);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let d = Self::onedark_default();
        let get = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(|v| parse_hex(v).ok()))
                .unwrap_or(fallback)
        };
        Self {
            figure: get(&["mem_box", "cpu_start"], d.figure),
            hole: get(&["main_bg"], d.hole),
            alert: get(&["cpu_end", "temp_end"], d.alert),
            table: get(&["selected_bg", "proc_box"], d.table),
            wall: get(&["meter_bg"], d.wall),
            ceiling: get(&["graph_text", "main_bg"], d.ceiling),
            bg: get(&["meter_bg"], d.bg),
            div_line: get(&["div_line"], d.div_line),
            main_fg: get(&["main_fg"], d.main_fg),
            title: get(&["title"], d.title),
            inactive_fg: get(&["inactive_fg"], d.inactive_fg),
        }
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
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

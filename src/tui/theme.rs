use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::ops::group::Bucket;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub gold: Color,
    pub green: Color,
    pub selection_bg: Color,
    /// Drop indicator while dragging
    pub drop_marker: Color,
    /// Per-category pill colors
    pub category_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut category_colors = HashMap::new();
        category_colors.insert("Venue".into(), Color::Rgb(0xC9, 0xA2, 0x27));
        category_colors.insert("Florist".into(), Color::Rgb(0x7F, 0xB0, 0x69));
        category_colors.insert("Photographer".into(), Color::Rgb(0x6C, 0x9B, 0xD2));
        category_colors.insert("Caterer".into(), Color::Rgb(0xE0, 0x8E, 0x45));

        Theme {
            background: Color::Rgb(0x1A, 0x14, 0x23),
            text: Color::Rgb(0xE8, 0xDD, 0xEB),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xE0, 0x7A, 0x9B),
            dim: Color::Rgb(0x7A, 0x6E, 0x80),
            red: Color::Rgb(0xE5, 0x48, 0x4D),
            gold: Color::Rgb(0xC9, 0xA2, 0x27),
            green: Color::Rgb(0x7F, 0xB0, 0x69),
            selection_bg: Color::Rgb(0x3A, 0x28, 0x40),
            drop_marker: Color::Rgb(0xFF, 0xD7, 0x00),
            category_colors,
        }
    }
}

/// Parse a hex color string like "#E07A9B" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Defaults with the `[ui]` overrides from aisle.toml applied
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "gold" => theme.gold = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "drop_marker" => theme.drop_marker = color,
                _ => {}
            }
        }

        for (category, value) in &ui.category_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.category_colors.insert(category.clone(), color);
            }
        }

        theme
    }

    /// Pill color for a category, falling back to dim text
    pub fn category_color(&self, category: &str) -> Color {
        self.category_colors.get(category).copied().unwrap_or(self.dim)
    }

    /// Header color for a deadline group
    pub fn bucket_color(&self, bucket: Bucket) -> Color {
        match bucket {
            Bucket::Overdue => self.red,
            Bucket::Today | Bucket::Tomorrow => self.gold,
            Bucket::NoDateYet => self.dim,
            _ => self.highlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#E07A9B"), Some(Color::Rgb(0xE0, 0x7A, 0x9B)));
        assert_eq!(parse_hex_color("E07A9B"), None);
        assert_eq!(parse_hex_color("#E07A"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("text".into(), "not-a-color".into());
        ui.category_colors.insert("Baker".into(), "#112233".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.text, Theme::default().text);
        assert_eq!(theme.category_color("Baker"), Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.category_color("Venue"), Color::Rgb(0xC9, 0xA2, 0x27));
    }

    #[test]
    fn test_category_color_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.category_color("Calligrapher"), theme.dim);
    }

    #[test]
    fn test_bucket_colors() {
        let theme = Theme::default();
        assert_eq!(theme.bucket_color(Bucket::Overdue), theme.red);
        assert_eq!(theme.bucket_color(Bucket::Today), theme.gold);
        assert_eq!(theme.bucket_color(Bucket::Later), theme.highlight);
    }
}

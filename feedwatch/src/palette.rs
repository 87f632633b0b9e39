//! Category palette: which categories are drawn, in what order and colour.
//!
//! The default matches the writer's categories. A TOML file can replace it:
//!
//! ```toml
//! [[category]]
//! name = "tech"
//! color = "blue"
//!
//! [[category]]
//! name = "food"
//! color = "#4EC9B0"
//! label = "Food & Drink"
//! ```

use std::{collections::HashSet, path::Path, str::FromStr};

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;

pub mod colors {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(0xD1, 0x69, 0x69); // #D16969
    pub const BLUE: Color = Color::Rgb(0x56, 0x9C, 0xD6); // #569CD6
    pub const GREEN: Color = Color::Rgb(0x60, 0x8B, 0x4E); // #608B4E
    pub const ORANGE: Color = Color::Rgb(0xD1, 0x9A, 0x66); // #D19A66
    pub const PURPLE: Color = Color::Rgb(0xC5, 0x86, 0xC0); // #C586C0
    pub const BROWN: Color = Color::Rgb(0x9C, 0x6B, 0x43); // #9C6B43
    pub const GRAY: Color = Color::Rgb(0x80, 0x80, 0x80); // #808080
}

/// Display identity of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub name: String,
    pub label: String,
    pub color: Color,
}

impl CategoryStyle {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        let name = name.into();
        let label = capitalize(&name);
        Self { name, label, color }
    }
}

/// Ordered set of known categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<CategoryStyle>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: vec![
                CategoryStyle::new("humor", colors::RED),
                CategoryStyle::new("tech", colors::BLUE),
                CategoryStyle::new("food", colors::GREEN),
                CategoryStyle::new("travel", colors::ORANGE),
                CategoryStyle::new("entertainment", colors::PURPLE),
                CategoryStyle::new("gaming", colors::BROWN),
                CategoryStyle::new("other", colors::GRAY),
            ],
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    #[serde(default)]
    category: Vec<CategoryEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    name: String,
    color: String,
    label: Option<String>,
}

impl Palette {
    pub fn new(entries: Vec<CategoryStyle>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: PaletteFile = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let entries = file
            .category
            .into_iter()
            .map(|entry| {
                let color = parse_color(&entry.color).ok_or_else(|| ConfigError::UnknownColor {
                    category: entry.name.clone(),
                    color: entry.color.clone(),
                })?;
                let mut style = CategoryStyle::new(entry.name, color);
                if let Some(label) = entry.label {
                    style.label = label;
                }
                Ok::<_, ConfigError>(style)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source, path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryStyle> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CategoryStyle> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Colour names used by the writer's palette, then anything ratatui parses
/// (`red`, `lightblue`, `#RRGGBB`, `42`).
pub fn parse_color(value: &str) -> Option<Color> {
    match value.trim().to_ascii_lowercase().as_str() {
        "red" => Some(colors::RED),
        "blue" => Some(colors::BLUE),
        "green" => Some(colors::GREEN),
        "orange" => Some(colors::ORANGE),
        "purple" => Some(colors::PURPLE),
        "brown" => Some(colors::BROWN),
        "gray" | "grey" => Some(colors::GRAY),
        other => Color::from_str(other).ok(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

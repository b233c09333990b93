use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::colors::{fallback_color, parse_hex_color, rgb_to_hex};

/// Session-static root table: civilisations, symbol artwork config, and
/// global style flags. Loaded once at startup, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtlasMeta {
    #[serde(default)]
    pub civilisations: Vec<Civilisation>,
    #[serde(default)]
    pub symbols: HashMap<String, SymbolConfig>,
    #[serde(default)]
    pub styles: StyleFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Civilisation {
    pub name: String,
    pub color: String,
    /// Feature collection file, relative to the atlas data root.
    pub file: String,
}

impl Civilisation {
    /// Case-insensitive registry key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Configured color, normalized to `#rrggbb`. A color string that fails
    /// to parse falls back to a deterministic name-derived color rather
    /// than dropping the civilisation.
    pub fn color_hex(&self) -> String {
        let rgb = parse_hex_color(&self.color).unwrap_or_else(|| fallback_color(&self.name));
        rgb_to_hex(rgb)
    }
}

/// Per-symbol artwork descriptor from the symbols table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
    #[serde(rename = "iconSize")]
    pub icon_size: [f64; 2],
    #[serde(rename = "iconAnchor")]
    pub icon_anchor: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    /// Requests the blurred-edge treatment on territory polygons.
    #[serde(rename = "territoryBlur", default)]
    pub territory_blur: bool,
}

/// Fixed badge position for one civilisation. Field names match the
/// upstream position table's capitalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmblemPosition {
    #[serde(rename = "Civilization")]
    pub civilization: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Title-case every word: `"holy roman empire"` → `"Holy Roman Empire"`.
/// Used for emblem file names and popups.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

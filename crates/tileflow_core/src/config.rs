//! Editor configuration and entity defaults.
//!
//! # Responsibility
//! - Hold tunables callers may override (`EditorConfig`).
//! - Hold default values applied when entities omit optional styling.

use crate::model::geometry::Coords;
use serde::{Deserialize, Serialize};

/// Default bound for undo history depth.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 50;

pub const CONNECTOR_DEFAULT_WIDTH: i32 = 10;
/// Margin added around anchor tiles before routing a connector.
pub const CONNECTOR_SEARCH_OFFSET: Coords = Coords::new(1, 1);

pub const VIEW_ITEM_DEFAULT_LABEL_HEIGHT: i32 = 80;

pub const TEXTBOX_DEFAULT_CONTENT: &str = "Text";
/// Font size in tile units.
pub const TEXTBOX_DEFAULT_FONT_SIZE: f64 = 0.6;
/// Horizontal padding on each side of a text box, in tile units.
pub const TEXTBOX_PADDING: f64 = 0.2;
/// Average glyph advance relative to font size.
pub const TEXTBOX_GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Runtime options for one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps kept in `past`.
    pub max_history_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
        }
    }
}

impl EditorConfig {
    pub fn with_max_history_size(max_history_size: usize) -> Self {
        Self { max_history_size }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorConfig, DEFAULT_MAX_HISTORY_SIZE};

    #[test]
    fn missing_fields_use_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_history_size, DEFAULT_MAX_HISTORY_SIZE);

        let config: EditorConfig = serde_json::from_str(r#"{"maxHistorySize": 5}"#).unwrap();
        assert_eq!(config.max_history_size, 5);
    }
}

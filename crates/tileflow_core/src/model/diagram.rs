//! Canonical persisted diagram model.
//!
//! # Responsibility
//! - Define the normalized `Model` and every entity it owns.
//! - Fix the persisted JSON shape (camelCase keys, optional fields omitted).
//!
//! # Invariants
//! - `ModelItem`, `Icon` and `Color` are shared resources referenced by id,
//!   never embedded by value inside views.
//! - `ViewItem.id` equals the id of the `ModelItem` it projects.
//! - A `ConnectorAnchor` references exactly one target; see [`AnchorRef`].
//! - `View.items` order is the z-order: later entries render on top.

use crate::config::{
    CONNECTOR_DEFAULT_WIDTH, TEXTBOX_DEFAULT_CONTENT, TEXTBOX_DEFAULT_FONT_SIZE,
    VIEW_ITEM_DEFAULT_LABEL_HEIGHT,
};
use crate::model::geometry::Coords;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root document: every entity the editor persists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ModelItem>,
    #[serde(default)]
    pub icons: Vec<Icon>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Model {
    /// Creates an empty model with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn item(&self, id: &str) -> Option<&ModelItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn icon(&self, id: &str) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    pub fn color(&self, id: &str) -> Option<&Color> {
        self.colors.iter().find(|color| color.id == id)
    }

    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|view| view.id == id)
    }

    pub(crate) fn view_index(&self, id: &str) -> Option<usize> {
        self.views.iter().position(|view| view.id == id)
    }
}

/// Semantic node shared by every view that places it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must name an existing `Icon.id` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<BTreeMap<String, String>>,
}

impl ModelItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            icon: None,
            tags: None,
            custom_properties: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_isometric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Palette entry; `value` is a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: String,
    pub value: String,
}

/// Named layout of a subset of model items on the tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ViewItem>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub rectangles: Vec<Rectangle>,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    /// Epoch milliseconds of the last structural change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

impl View {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            items: Vec::new(),
            connectors: Vec::new(),
            rectangles: Vec::new(),
            text_boxes: Vec::new(),
            last_updated: None,
        }
    }

    pub fn item(&self, id: &str) -> Option<&ViewItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|connector| connector.id == id)
    }

    pub fn rectangle(&self, id: &str) -> Option<&Rectangle> {
        self.rectangles.iter().find(|rectangle| rectangle.id == id)
    }

    pub fn text_box(&self, id: &str) -> Option<&TextBox> {
        self.text_boxes.iter().find(|text_box| text_box.id == id)
    }

    /// Finds an anchor by id across all connectors, with its owning connector.
    pub fn anchor(&self, anchor_id: &str) -> Option<(&Connector, &ConnectorAnchor)> {
        self.connectors.iter().find_map(|connector| {
            connector
                .anchors
                .iter()
                .find(|anchor| anchor.id == anchor_id)
                .map(|anchor| (connector, anchor))
        })
    }
}

/// Placement of one `ModelItem` inside a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    /// Same id as the projected `ModelItem`.
    pub id: String,
    pub tile: Coords,
    #[serde(default = "default_label_height")]
    pub label_height: i32,
}

impl ViewItem {
    pub fn new(id: impl Into<String>, tile: Coords) -> Self {
        Self {
            id: id.into(),
            tile,
            label_height: VIEW_ITEM_DEFAULT_LABEL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineType {
    #[default]
    Single,
    Double,
    DoubleWithCircle,
}

/// Edge between two or more anchors, routed over the tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    /// Ordered route endpoints; at least two.
    pub anchors: Vec<ConnectorAnchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default = "default_connector_width")]
    pub width: i32,
    #[serde(default)]
    pub style: ConnectorStyle,
    #[serde(default)]
    pub line_type: LineType,
    #[serde(default = "default_true")]
    pub show_arrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<ConnectorLabel>>,
}

impl Connector {
    /// Creates a connector with default styling.
    pub fn new(id: impl Into<String>, anchors: Vec<ConnectorAnchor>) -> Self {
        Self {
            id: id.into(),
            anchors,
            color: None,
            custom_color: None,
            width: CONNECTOR_DEFAULT_WIDTH,
            style: ConnectorStyle::default(),
            line_type: LineType::default(),
            show_arrow: true,
            description: None,
            start_label: None,
            end_label: None,
            labels: None,
        }
    }
}

/// Free-text label placed along a connector path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorLabel {
    pub id: String,
    pub text: String,
    /// Percentage along the path, `0..=100`.
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

/// One endpoint of a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorAnchor {
    pub id: String,
    #[serde(rename = "ref")]
    pub target: AnchorRef,
}

impl ConnectorAnchor {
    pub fn new(id: impl Into<String>, target: AnchorRef) -> Self {
        Self {
            id: id.into(),
            target,
        }
    }

    pub fn to_item(id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self::new(id, AnchorRef::Item(item_id.into()))
    }

    pub fn to_anchor(id: impl Into<String>, anchor_id: impl Into<String>) -> Self {
        Self::new(id, AnchorRef::Anchor(anchor_id.into()))
    }

    pub fn to_tile(id: impl Into<String>, tile: Coords) -> Self {
        Self::new(id, AnchorRef::Tile(tile))
    }
}

/// What an anchor attaches to. Persisted as a single-key object, e.g.
/// `{"item": "server-1"}` or `{"tile": {"x": 2, "y": 3}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorRef {
    /// A view item in the same view.
    Item(String),
    /// An anchor of another connector in the same view.
    Anchor(String),
    /// A free tile.
    Tile(Coords),
}

/// Axis-aligned tile region, typically used as a zone backdrop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: String,
    pub from: Coords,
    pub to: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
}

impl Rectangle {
    pub fn new(id: impl Into<String>, from: Coords, to: Coords) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            color: None,
            custom_color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextBoxOrientation {
    #[default]
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub id: String,
    pub tile: Coords,
    #[serde(default = "default_text_box_content")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<TextBoxOrientation>,
}

impl TextBox {
    pub fn new(id: impl Into<String>, tile: Coords, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tile,
            content: content.into(),
            font_size: None,
            orientation: None,
        }
    }

    /// Font size in tile units, falling back to the default.
    pub fn effective_font_size(&self) -> f64 {
        self.font_size.unwrap_or(TEXTBOX_DEFAULT_FONT_SIZE)
    }
}

fn default_label_height() -> i32 {
    VIEW_ITEM_DEFAULT_LABEL_HEIGHT
}

fn default_connector_width() -> i32 {
    CONNECTOR_DEFAULT_WIDTH
}

fn default_true() -> bool {
    true
}

fn default_text_box_content() -> String {
    TEXTBOX_DEFAULT_CONTENT.to_string()
}

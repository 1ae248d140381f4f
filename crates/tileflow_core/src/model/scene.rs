//! Derived per-process scene data.
//!
//! # Responsibility
//! - Hold data computed from the canonical model: connector routes and
//!   text-box sizes, keyed by view id and then by entity id.
//! - Hold user-defined groups, which reference view entities by id.
//!
//! # Invariants
//! - Connector and text-box entries are never authoritative; they can be
//!   rebuilt from the model at any time.
//! - Entity ids are only unique within a view, so two views owning the same
//!   connector or text-box id never share an entry.
//! - No view is kept with an empty entry map.
//! - Maps are ordered so serialized output is stable across syncs.

use crate::model::geometry::{Coords, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routed connector geometry.
///
/// `tiles` are relative to `rectangle.from`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectorPath {
    pub tiles: Vec<Coords>,
    pub rectangle: Rect,
}

impl ConnectorPath {
    /// Placeholder path used when routing fails.
    pub fn empty() -> Self {
        Self {
            tiles: Vec::new(),
            rectangle: Rect::zero(),
        }
    }

    /// Path tiles translated back to absolute grid positions.
    pub fn absolute_tiles(&self) -> Vec<Coords> {
        self.tiles
            .iter()
            .map(|tile| tile.add(self.rectangle.from))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneConnector {
    pub path: ConnectorPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTextBox {
    pub size: Size,
}

/// Named, flat, non-exclusive set of view entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub item_ids: Vec<String>,
}

/// Entries grouped by view id, then by entity id.
pub type PerView<T> = BTreeMap<String, BTreeMap<String, T>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub connectors: PerView<SceneConnector>,
    #[serde(default)]
    pub text_boxes: PerView<SceneTextBox>,
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connector(&self, view_id: &str, id: &str) -> Option<&SceneConnector> {
        self.connectors.get(view_id)?.get(id)
    }

    pub fn text_box(&self, view_id: &str, id: &str) -> Option<&SceneTextBox> {
        self.text_boxes.get(view_id)?.get(id)
    }

    /// Number of routed connectors across all views.
    pub fn connector_count(&self) -> usize {
        self.connectors.values().map(BTreeMap::len).sum()
    }

    pub fn text_box_count(&self) -> usize {
        self.text_boxes.values().map(BTreeMap::len).sum()
    }

    pub(crate) fn insert_connector(&mut self, view_id: &str, id: &str, entry: SceneConnector) {
        self.connectors
            .entry(view_id.to_string())
            .or_default()
            .insert(id.to_string(), entry);
    }

    pub(crate) fn remove_connector(&mut self, view_id: &str, id: &str) {
        remove_entry(&mut self.connectors, view_id, id);
    }

    pub(crate) fn insert_text_box(&mut self, view_id: &str, id: &str, entry: SceneTextBox) {
        self.text_boxes
            .entry(view_id.to_string())
            .or_default()
            .insert(id.to_string(), entry);
    }

    pub(crate) fn remove_text_box(&mut self, view_id: &str, id: &str) {
        remove_entry(&mut self.text_boxes, view_id, id);
    }

    /// Drops every derived entry of one view. Groups are untouched.
    pub(crate) fn remove_view(&mut self, view_id: &str) {
        self.connectors.remove(view_id);
        self.text_boxes.remove(view_id);
    }
}

fn remove_entry<T>(map: &mut PerView<T>, view_id: &str, id: &str) {
    if let Some(entries) = map.get_mut(view_id) {
        entries.remove(id);
        if entries.is_empty() {
            map.remove(view_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectorPath, Scene, SceneConnector};
    use crate::model::geometry::{Coords, Rect};

    #[test]
    fn same_connector_id_in_two_views_keeps_two_entries() {
        let mut scene = Scene::new();
        let route = |x| SceneConnector {
            path: ConnectorPath {
                tiles: vec![Coords::zero(), Coords::new(x, 0)],
                rectangle: Rect::zero(),
            },
        };
        scene.insert_connector("v1", "c1", route(1));
        scene.insert_connector("v2", "c1", route(2));
        assert_eq!(scene.connector_count(), 2);

        scene.remove_connector("v1", "c1");
        assert!(scene.connector("v1", "c1").is_none());
        assert!(!scene.connectors.contains_key("v1"));
        assert_eq!(scene.connector("v2", "c1"), Some(&route(2)));
    }

    #[test]
    fn absolute_tiles_offsets_by_rectangle_origin() {
        let path = ConnectorPath {
            tiles: vec![Coords::new(1, 1), Coords::new(2, 1)],
            rectangle: Rect::new(Coords::new(-3, 4), Coords::new(0, 6)),
        };
        assert_eq!(
            path.absolute_tiles(),
            vec![Coords::new(-2, 5), Coords::new(-1, 5)]
        );
    }
}

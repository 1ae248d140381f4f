//! Connector reducers and route synchronization.

use crate::model::diagram::{
    AnchorRef, Connector, ConnectorAnchor, ConnectorLabel, ConnectorStyle, LineType, View,
};
use crate::model::scene::{ConnectorPath, Scene, SceneConnector};
use crate::reducer::cascade::prune_connectors;
use crate::reducer::group::prune_unplaced_members;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State, ViewContext};
use crate::routing::connector_path::get_connector_path;
use log::{debug, warn};
use std::collections::HashSet;

/// Field-wise connector update; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorPatch {
    pub anchors: Option<Vec<ConnectorAnchor>>,
    pub color: Option<Option<String>>,
    pub custom_color: Option<Option<String>>,
    pub width: Option<i32>,
    pub style: Option<ConnectorStyle>,
    pub line_type: Option<LineType>,
    pub show_arrow: Option<bool>,
    pub description: Option<Option<String>>,
    pub start_label: Option<Option<String>>,
    pub end_label: Option<Option<String>>,
    pub labels: Option<Option<Vec<ConnectorLabel>>>,
}

impl ConnectorPatch {
    fn apply(self, connector: &mut Connector) {
        if let Some(anchors) = self.anchors {
            connector.anchors = anchors;
        }
        if let Some(color) = self.color {
            connector.color = color;
        }
        if let Some(custom_color) = self.custom_color {
            connector.custom_color = custom_color;
        }
        if let Some(width) = self.width {
            connector.width = width;
        }
        if let Some(style) = self.style {
            connector.style = style;
        }
        if let Some(line_type) = self.line_type {
            connector.line_type = line_type;
        }
        if let Some(show_arrow) = self.show_arrow {
            connector.show_arrow = show_arrow;
        }
        if let Some(description) = self.description {
            connector.description = description;
        }
        if let Some(start_label) = self.start_label {
            connector.start_label = start_label;
        }
        if let Some(end_label) = self.end_label {
            connector.end_label = end_label;
        }
        if let Some(labels) = self.labels {
            connector.labels = labels;
        }
    }
}

/// Adds a connector at the front of the view's list and routes it.
pub fn create_connector(connector: Connector, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &next.model.views[index];

    if view.connector(&connector.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::Connector,
            id: connector.id,
        });
    }
    ensure_min_anchors(&connector.id, &connector.anchors)?;
    ensure_unique_anchor_ids(view, None, &connector.anchors)?;

    let id = connector.id.clone();
    next.model.views[index].connectors.insert(0, connector);
    sync_connectors_in(&mut next, index, [id]);
    Ok(next)
}

/// Merges `patch` into a connector. Routes are recomputed only when the
/// anchor list changes, together with connectors anchored onto it.
pub fn update_connector(
    id: &str,
    patch: ConnectorPatch,
    ctx: &ViewContext<'_>,
) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &next.model.views[index];
    let current = view.connector(id).ok_or_else(|| ReducerError::NotFound {
        kind: EntityKind::Connector,
        id: id.to_string(),
    })?;

    let anchors_changed = match &patch.anchors {
        Some(anchors) => {
            ensure_min_anchors(id, anchors)?;
            ensure_unique_anchor_ids(view, Some(id), anchors)?;
            *anchors != current.anchors
        }
        None => false,
    };
    let previous_anchor_ids: HashSet<String> =
        current.anchors.iter().map(|anchor| anchor.id.clone()).collect();

    let view = &mut next.model.views[index];
    if let Some(connector) = view.connectors.iter_mut().find(|c| c.id == id) {
        patch.apply(connector);
    }

    if anchors_changed {
        // Anchors dropped by the patch may strand connectors that pointed at them.
        let outcome = prune_connectors(&mut next, index);
        prune_unplaced_members(&mut next, outcome.removed);

        let view = &next.model.views[index];
        let mut seeds = previous_anchor_ids;
        if let Some(connector) = view.connector(id) {
            seeds.extend(connector.anchors.iter().map(|anchor| anchor.id.clone()));
        }
        let mut targets = dependent_connectors(view, seeds);
        targets.extend(outcome.trimmed);
        sync_connectors_in(&mut next, index, targets);
    }

    Ok(next)
}

/// Removes a connector, its scene entry and any connectors left dangling.
pub fn delete_connector(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    let before = view.connectors.len();
    view.connectors.retain(|connector| connector.id != id);
    if view.connectors.len() == before {
        return Ok(next);
    }

    let view_id = next.model.views[index].id.clone();
    next.scene.remove_connector(&view_id, id);
    let outcome = prune_connectors(&mut next, index);
    let mut removed = outcome.removed;
    removed.insert(id.to_string());
    prune_unplaced_members(&mut next, removed);
    sync_connectors_in(&mut next, index, outcome.trimmed);
    Ok(next)
}

/// Recomputes the scene route of one connector.
pub fn sync_connector(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &next.model.views[index];
    let connector = view.connector(id).ok_or_else(|| ReducerError::NotFound {
        kind: EntityKind::Connector,
        id: id.to_string(),
    })?;
    sync_connector_into(&mut next.scene, view, connector);
    Ok(next)
}

/// Writes the route of `connector` into `scene`. Routing failures store the
/// empty path.
pub(crate) fn sync_connector_into(scene: &mut Scene, view: &View, connector: &Connector) {
    let path = match get_connector_path(&connector.anchors, view) {
        Ok(path) => path,
        Err(err) => {
            warn!(
                "event=connector_sync module=reducer status=error view={} connector={} error={}",
                view.id, connector.id, err
            );
            ConnectorPath::empty()
        }
    };
    debug!(
        "event=connector_sync module=reducer status=ok view={} connector={} tiles={}",
        view.id,
        connector.id,
        path.tiles.len()
    );
    scene.insert_connector(&view.id, &connector.id, SceneConnector { path });
}

/// Re-routes the listed connectors that still exist in the view.
pub(crate) fn sync_connectors_in<I>(state: &mut State, view_index: usize, ids: I)
where
    I: IntoIterator<Item = String>,
{
    let view = &state.model.views[view_index];
    for id in ids {
        if let Some(connector) = view.connector(&id) {
            sync_connector_into(&mut state.scene, view, connector);
        }
    }
}

/// Connectors whose routes depend on any of `seeds`, directly or through
/// anchor-to-anchor chains. Returned in view order.
pub(crate) fn dependent_connectors(view: &View, seeds: HashSet<String>) -> Vec<String> {
    let mut affected = seeds;
    loop {
        let mut grew = false;
        for anchor in view.connectors.iter().flat_map(|c| c.anchors.iter()) {
            if let AnchorRef::Anchor(target) = &anchor.target {
                if affected.contains(target) && !affected.contains(&anchor.id) {
                    affected.insert(anchor.id.clone());
                    grew = true;
                }
            }
        }
        if !grew {
            break;
        }
    }

    view.connectors
        .iter()
        .filter(|connector| {
            connector
                .anchors
                .iter()
                .any(|anchor| affected.contains(&anchor.id))
        })
        .map(|connector| connector.id.clone())
        .collect()
}

fn ensure_min_anchors(id: &str, anchors: &[ConnectorAnchor]) -> ReducerResult<()> {
    if anchors.len() < 2 {
        return Err(ReducerError::TooFewAnchors {
            connector: id.to_string(),
            count: anchors.len(),
        });
    }
    Ok(())
}

/// Anchor ids are unique across every connector of a view.
fn ensure_unique_anchor_ids(
    view: &View,
    owner: Option<&str>,
    anchors: &[ConnectorAnchor],
) -> ReducerResult<()> {
    let mut seen: HashSet<&str> = view
        .connectors
        .iter()
        .filter(|connector| Some(connector.id.as_str()) != owner)
        .flat_map(|connector| connector.anchors.iter().map(|anchor| anchor.id.as_str()))
        .collect();
    for anchor in anchors {
        if !seen.insert(anchor.id.as_str()) {
            return Err(ReducerError::DuplicateId {
                kind: EntityKind::Anchor,
                id: anchor.id.clone(),
            });
        }
    }
    Ok(())
}

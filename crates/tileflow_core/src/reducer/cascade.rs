//! Anchor cascade after view entities disappear.
//!
//! # Invariants
//! - After [`prune_connectors`] every remaining anchor in the view targets an
//!   existing view item, an existing anchor, or a tile.
//! - Every remaining connector has at least two anchors.
//! - Removed connectors lose their scene entries in the same pass.

use crate::model::diagram::{AnchorRef, View};
use crate::reducer::State;
use log::info;
use std::collections::{BTreeSet, HashSet};

/// Connectors touched by a cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CascadeOutcome {
    /// Deleted because fewer than two anchors survived.
    pub removed: BTreeSet<String>,
    /// Kept, but lost at least one anchor.
    pub trimmed: BTreeSet<String>,
}

impl CascadeOutcome {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.trimmed.is_empty()
    }
}

/// Drops dangling anchors and under-anchored connectors until nothing changes.
pub(crate) fn prune_connectors(state: &mut State, view_index: usize) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();

    loop {
        let view = &mut state.model.views[view_index];
        let live_items: HashSet<String> = view.items.iter().map(|item| item.id.clone()).collect();
        let live_anchors = anchor_ids(view);
        let mut changed = false;

        for connector in &mut view.connectors {
            let before = connector.anchors.len();
            connector.anchors.retain(|anchor| match &anchor.target {
                AnchorRef::Item(id) => live_items.contains(id),
                AnchorRef::Anchor(id) => live_anchors.contains(id),
                AnchorRef::Tile(_) => true,
            });
            if connector.anchors.len() != before {
                changed = true;
                outcome.trimmed.insert(connector.id.clone());
            }
        }

        let mut removed_now = Vec::new();
        view.connectors.retain(|connector| {
            let keep = connector.anchors.len() >= 2;
            if !keep {
                removed_now.push(connector.id.clone());
            }
            keep
        });

        let view_id = view.id.clone();
        for id in removed_now {
            changed = true;
            state.scene.remove_connector(&view_id, &id);
            outcome.trimmed.remove(&id);
            outcome.removed.insert(id);
        }

        if !changed {
            break;
        }
    }

    if !outcome.is_empty() {
        info!(
            "event=cascade_delete module=reducer status=ok view={} removed_connectors={} trimmed_connectors={}",
            state.model.views[view_index].id,
            outcome.removed.len(),
            outcome.trimmed.len()
        );
    }

    outcome
}

fn anchor_ids(view: &View) -> HashSet<String> {
    view.connectors
        .iter()
        .flat_map(|connector| connector.anchors.iter().map(|anchor| anchor.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::prune_connectors;
    use crate::model::diagram::{Connector, ConnectorAnchor, Model, View, ViewItem};
    use crate::model::geometry::Coords;
    use crate::model::scene::{ConnectorPath, Scene, SceneConnector};
    use crate::reducer::State;

    #[test]
    fn cascade_follows_anchor_chains_to_a_fixed_point() {
        let mut view = View::new("v1", "Main");
        view.items.push(ViewItem::new("b", Coords::new(2, 0)));
        // c1 loses its item anchor and falls below two anchors.
        view.connectors.push(Connector::new(
            "c1",
            vec![
                ConnectorAnchor::to_item("c1-a", "gone"),
                ConnectorAnchor::to_item("c1-b", "b"),
            ],
        ));
        // c2 hangs off c1 and must follow it.
        view.connectors.push(Connector::new(
            "c2",
            vec![
                ConnectorAnchor::to_anchor("c2-a", "c1-a"),
                ConnectorAnchor::to_tile("c2-b", Coords::new(5, 5)),
            ],
        ));
        // c3 keeps two anchors after losing one.
        view.connectors.push(Connector::new(
            "c3",
            vec![
                ConnectorAnchor::to_anchor("c3-a", "c2-b"),
                ConnectorAnchor::to_item("c3-b", "b"),
                ConnectorAnchor::to_tile("c3-c", Coords::new(0, 4)),
            ],
        ));
        let mut model = Model::new("Test");
        model.views.push(view);
        let mut scene = Scene::new();
        for id in ["c1", "c2", "c3"] {
            scene.insert_connector(
                "v1",
                id,
                SceneConnector {
                    path: ConnectorPath::empty(),
                },
            );
        }
        let mut state = State::new(model, scene);

        let outcome = prune_connectors(&mut state, 0);

        let view = &state.model.views[0];
        let remaining: Vec<_> = view.connectors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, vec!["c3"]);
        assert_eq!(view.connectors[0].anchors.len(), 2);
        assert!(outcome.removed.contains("c1") && outcome.removed.contains("c2"));
        assert!(outcome.trimmed.contains("c3"));
        assert_eq!(state.scene.connector_count(), 1);
        assert!(state.scene.connector("v1", "c3").is_some());
    }
}

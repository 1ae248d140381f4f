//! View reducers and whole-scene derivation.
//!
//! # Responsibility
//! - Create, rename and delete views.
//! - Derive scene entries for one view (`sync_scene`) or for the whole model
//!   (`rebuild_scene`).
//!
//! # Invariants
//! - Deleting a view drops the scene entries of its connectors and text
//!   boxes in the same transition.
//! - Derivation is idempotent: syncing twice yields the same scene.

use crate::model::diagram::{Model, View};
use crate::model::scene::Scene;
use crate::reducer::connector::sync_connector_into;
use crate::reducer::group::{entity_ids, prune_group_members, prune_unplaced_members, unplaced_ids};
use crate::reducer::text_box::sync_text_box_into;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State, ViewContext};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Appends a view and derives scene data for whatever it already contains.
pub fn create_view(view: View, state: &State) -> ReducerResult<State> {
    if state.model.view(&view.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::View,
            id: view.id,
        });
    }

    let mut next = state.clone();
    sync_view_into(&mut next.scene, &view);
    next.model.views.push(view);
    Ok(next)
}

pub fn update_view(id: &str, patch: ViewPatch, state: &State) -> ReducerResult<State> {
    let mut next = state.clone();
    let view = next
        .model
        .views
        .iter_mut()
        .find(|view| view.id == id)
        .ok_or_else(|| ReducerError::ViewNotFound(id.to_string()))?;

    if let Some(name) = patch.name {
        view.name = name;
    }
    if let Some(description) = patch.description {
        view.description = description;
    }
    Ok(next)
}

pub fn delete_view(id: &str, state: &State) -> ReducerResult<State> {
    let Some(index) = state.model.view_index(id) else {
        return Ok(state.clone());
    };

    let mut next = state.clone();
    let view = next.model.views.remove(index);
    next.scene.remove_view(&view.id);
    prune_unplaced_members(&mut next, entity_ids(&view));
    Ok(next)
}

/// Recomputes every connector route and text-box size of the context view.
pub fn sync_scene(ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    sync_view_into(&mut next.scene, &next.model.views[index]);
    Ok(next)
}

/// Derives a fresh scene for every view of `model`, carrying over the groups
/// of `scene` with members that no longer exist removed.
pub fn rebuild_scene(model: &Model, scene: &Scene) -> Scene {
    let mut rebuilt = Scene {
        groups: scene.groups.clone(),
        ..Scene::default()
    };
    for view in &model.views {
        sync_view_into(&mut rebuilt, view);
    }

    let members: BTreeSet<String> = rebuilt
        .groups
        .values()
        .flat_map(|group| group.item_ids.iter().cloned())
        .collect();
    let stale = unplaced_ids(model, members);
    prune_group_members(&mut rebuilt, &stale);
    rebuilt
}

/// Replaces every derived entry of `view`, dropping entries of entities the
/// view no longer has.
pub(crate) fn sync_view_into(scene: &mut Scene, view: &View) {
    scene.remove_view(&view.id);
    for connector in &view.connectors {
        sync_connector_into(scene, view, connector);
    }
    for text_box in &view.text_boxes {
        sync_text_box_into(scene, &view.id, text_box);
    }
}

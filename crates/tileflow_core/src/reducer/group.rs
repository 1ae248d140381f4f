//! User-defined groups of view entities.
//!
//! # Responsibility
//! - Create, extend, shrink and dissolve groups stored in the scene.
//! - Keep group membership free of deleted entity ids.
//!
//! # Invariants
//! - Member ids are unique within a group and keep insertion order.
//! - A group never persists with zero members.
//! - Groups are non-exclusive: one id may belong to several groups.
//! - Member ids are not view-qualified; an id leaves its groups only once no
//!   view contains an entity with that id.

use crate::model::diagram::{Model, View};
use crate::model::scene::{Group, Scene};
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State};
use std::collections::BTreeSet;

const DEFAULT_NAME_ID_CHARS: usize = 8;

/// Creates group `id` over `item_ids`. The default name is derived from the
/// first characters of the id.
pub fn create_group(
    id: &str,
    item_ids: Vec<String>,
    name: Option<String>,
    state: &State,
) -> ReducerResult<State> {
    let members = dedup(item_ids);
    if members.is_empty() {
        return Err(ReducerError::EmptyGroup);
    }
    if state.scene.groups.contains_key(id) {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::Group,
            id: id.to_string(),
        });
    }

    let name = name.unwrap_or_else(|| {
        let short: String = id.chars().take(DEFAULT_NAME_ID_CHARS).collect();
        format!("Group {short}")
    });
    let mut next = state.clone();
    next.scene.groups.insert(
        id.to_string(),
        Group {
            id: id.to_string(),
            name,
            item_ids: members,
        },
    );
    Ok(next)
}

/// Dissolves a group. Members themselves are untouched.
pub fn ungroup(group_id: &str, state: &State) -> ReducerResult<State> {
    let mut next = state.clone();
    next.scene.groups.remove(group_id);
    Ok(next)
}

pub fn add_to_group(group_id: &str, item_ids: Vec<String>, state: &State) -> ReducerResult<State> {
    let mut next = state.clone();
    let group = next
        .scene
        .groups
        .get_mut(group_id)
        .ok_or_else(|| ReducerError::GroupNotFound(group_id.to_string()))?;
    for id in item_ids {
        if !group.item_ids.contains(&id) {
            group.item_ids.push(id);
        }
    }
    Ok(next)
}

/// Removes members; a group emptied this way is deleted.
pub fn remove_from_group(
    group_id: &str,
    item_ids: &[String],
    state: &State,
) -> ReducerResult<State> {
    let mut next = state.clone();
    let group = next
        .scene
        .groups
        .get_mut(group_id)
        .ok_or_else(|| ReducerError::GroupNotFound(group_id.to_string()))?;
    group.item_ids.retain(|id| !item_ids.contains(id));
    if group.item_ids.is_empty() {
        next.scene.groups.remove(group_id);
    }
    Ok(next)
}

/// Groups containing `item_id`, in group id order.
pub fn groups_for_item<'a>(scene: &'a Scene, item_id: &str) -> Vec<&'a Group> {
    scene
        .groups
        .values()
        .filter(|group| group.item_ids.iter().any(|id| id == item_id))
        .collect()
}

/// Groups containing any of `item_ids`, each listed once.
pub fn groups_for_items<'a>(scene: &'a Scene, item_ids: &[String]) -> Vec<&'a Group> {
    scene
        .groups
        .values()
        .filter(|group| group.item_ids.iter().any(|id| item_ids.contains(id)))
        .collect()
}

/// Strips `removed` ids from every group and drops groups left empty.
pub(crate) fn prune_group_members(scene: &mut Scene, removed: &BTreeSet<String>) {
    if removed.is_empty() {
        return;
    }
    for group in scene.groups.values_mut() {
        group.item_ids.retain(|id| !removed.contains(id));
    }
    scene.groups.retain(|_, group| !group.item_ids.is_empty());
}

/// Prunes those of `candidates` that no view of the model still contains.
pub(crate) fn prune_unplaced_members(state: &mut State, candidates: BTreeSet<String>) {
    let unplaced = unplaced_ids(&state.model, candidates);
    prune_group_members(&mut state.scene, &unplaced);
}

pub(crate) fn unplaced_ids(model: &Model, candidates: BTreeSet<String>) -> BTreeSet<String> {
    candidates
        .into_iter()
        .filter(|id| !model.views.iter().any(|view| view_contains(view, id)))
        .collect()
}

/// Ids that a group may reference within `view`.
pub(crate) fn entity_ids(view: &View) -> BTreeSet<String> {
    view.items
        .iter()
        .map(|item| item.id.clone())
        .chain(view.connectors.iter().map(|connector| connector.id.clone()))
        .chain(view.rectangles.iter().map(|rectangle| rectangle.id.clone()))
        .chain(view.text_boxes.iter().map(|text_box| text_box.id.clone()))
        .collect()
}

fn view_contains(view: &View, id: &str) -> bool {
    view.item(id).is_some()
        || view.connector(id).is_some()
        || view.rectangle(id).is_some()
        || view.text_box(id).is_some()
}

fn dedup(item_ids: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    item_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

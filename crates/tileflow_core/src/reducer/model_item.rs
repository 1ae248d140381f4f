//! Model item reducers.
//!
//! Deleting a model item removes its placements from every view, then runs
//! the anchor cascade in each affected view. Views that lost a placement get
//! `last_updated` stamped.

use crate::model::diagram::ModelItem;
use crate::reducer::group::prune_unplaced_members;
use crate::reducer::view_item::remove_view_item_in;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State};
use log::info;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelItemPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub tags: Option<Option<Vec<String>>>,
    pub custom_properties: Option<Option<BTreeMap<String, String>>>,
}

pub fn create_model_item(item: ModelItem, state: &State) -> ReducerResult<State> {
    if state.model.item(&item.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::ModelItem,
            id: item.id,
        });
    }
    let mut next = state.clone();
    next.model.items.push(item);
    Ok(next)
}

pub fn update_model_item(id: &str, patch: ModelItemPatch, state: &State) -> ReducerResult<State> {
    let mut next = state.clone();
    let item = next
        .model
        .items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| ReducerError::NotFound {
            kind: EntityKind::ModelItem,
            id: id.to_string(),
        })?;

    if let Some(name) = patch.name {
        item.name = name;
    }
    if let Some(description) = patch.description {
        item.description = description;
    }
    if let Some(icon) = patch.icon {
        item.icon = icon;
    }
    if let Some(tags) = patch.tags {
        item.tags = tags;
    }
    if let Some(custom_properties) = patch.custom_properties {
        item.custom_properties = custom_properties;
    }
    Ok(next)
}

pub fn delete_model_item(id: &str, state: &State, timestamp_ms: i64) -> ReducerResult<State> {
    let mut next = state.clone();
    let before = next.model.items.len();
    next.model.items.retain(|item| item.id != id);
    let mut changed = next.model.items.len() != before;

    let mut views_touched = 0usize;
    for index in 0..next.model.views.len() {
        if remove_view_item_in(&mut next, index, id) {
            next.model.views[index].last_updated = Some(timestamp_ms);
            views_touched += 1;
        }
    }
    changed |= views_touched > 0;

    if changed {
        prune_unplaced_members(&mut next, BTreeSet::from([id.to_string()]));
        info!(
            "event=cascade_delete module=reducer status=ok kind=model_item views={}",
            views_touched
        );
    }
    Ok(next)
}

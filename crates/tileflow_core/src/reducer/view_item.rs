//! View item placement, movement and stacking order.
//!
//! # Invariants
//! - Moving an item re-routes every connector that resolves through it,
//!   including connectors chained onto those connectors' anchors.
//! - `View.items` order is the persisted z-order.

use crate::model::diagram::{AnchorRef, ViewItem};
use crate::model::geometry::Coords;
use crate::reducer::cascade::prune_connectors;
use crate::reducer::connector::{dependent_connectors, sync_connectors_in};
use crate::reducer::group::prune_unplaced_members;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State, ViewContext};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewItemPatch {
    pub tile: Option<Coords>,
    pub label_height: Option<i32>,
}

pub fn create_view_item(item: ViewItem, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    if view.item(&item.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::ViewItem,
            id: item.id,
        });
    }
    view.items.push(item);
    Ok(next)
}

pub fn update_view_item(
    id: &str,
    patch: ViewItemPatch,
    ctx: &ViewContext<'_>,
) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let item = next.model.views[index]
        .items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| ReducerError::NotFound {
            kind: EntityKind::ViewItem,
            id: id.to_string(),
        })?;

    let moved = patch.tile.is_some_and(|tile| tile != item.tile);
    if let Some(tile) = patch.tile {
        item.tile = tile;
    }
    if let Some(label_height) = patch.label_height {
        item.label_height = label_height;
    }

    if moved {
        let view = &next.model.views[index];
        let seeds: HashSet<String> = view
            .connectors
            .iter()
            .flat_map(|connector| connector.anchors.iter())
            .filter(|anchor| matches!(&anchor.target, AnchorRef::Item(target) if target == id))
            .map(|anchor| anchor.id.clone())
            .collect();
        let targets = dependent_connectors(view, seeds);
        sync_connectors_in(&mut next, index, targets);
    }
    Ok(next)
}

/// Removes an item from one view. Connectors attached to it lose those
/// anchors; connectors left with fewer than two anchors are deleted.
pub fn delete_view_item(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    if remove_view_item_in(&mut next, index, id) {
        prune_unplaced_members(&mut next, BTreeSet::from([id.to_string()]));
    }
    Ok(next)
}

/// Moves an item to the top of the stacking order.
pub fn bring_to_front(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    reorder(id, ctx, |items, item| items.push(item))
}

/// Moves an item to the bottom of the stacking order.
pub fn send_to_back(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    reorder(id, ctx, |items, item| items.insert(0, item))
}

fn reorder<F>(id: &str, ctx: &ViewContext<'_>, place: F) -> ReducerResult<State>
where
    F: FnOnce(&mut Vec<ViewItem>, ViewItem),
{
    let (mut next, index) = ctx.begin()?;
    let items = &mut next.model.views[index].items;
    let position = items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| ReducerError::NotFound {
            kind: EntityKind::ViewItem,
            id: id.to_string(),
        })?;
    let item = items.remove(position);
    place(items, item);
    Ok(next)
}

/// Removes the item from the view at `view_index` and runs the anchor
/// cascade. Returns `false` when the view had no such item.
pub(crate) fn remove_view_item_in(state: &mut State, view_index: usize, id: &str) -> bool {
    let items = &mut state.model.views[view_index].items;
    let before = items.len();
    items.retain(|item| item.id != id);
    if items.len() == before {
        return false;
    }

    let outcome = prune_connectors(state, view_index);
    prune_unplaced_members(state, outcome.removed);
    sync_connectors_in(state, view_index, outcome.trimmed);
    true
}

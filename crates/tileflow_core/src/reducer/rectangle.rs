//! Rectangle reducers. Rectangles carry no derived scene data.

use crate::model::diagram::Rectangle;
use crate::model::geometry::Coords;
use crate::reducer::group::prune_unplaced_members;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State, ViewContext};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectanglePatch {
    pub from: Option<Coords>,
    pub to: Option<Coords>,
    pub color: Option<Option<String>>,
    pub custom_color: Option<Option<String>>,
}

pub fn create_rectangle(rectangle: Rectangle, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    if view.rectangle(&rectangle.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::Rectangle,
            id: rectangle.id,
        });
    }
    view.rectangles.push(rectangle);
    Ok(next)
}

pub fn update_rectangle(
    id: &str,
    patch: RectanglePatch,
    ctx: &ViewContext<'_>,
) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let rectangle = next.model.views[index]
        .rectangles
        .iter_mut()
        .find(|rectangle| rectangle.id == id)
        .ok_or_else(|| ReducerError::NotFound {
            kind: EntityKind::Rectangle,
            id: id.to_string(),
        })?;

    if let Some(from) = patch.from {
        rectangle.from = from;
    }
    if let Some(to) = patch.to {
        rectangle.to = to;
    }
    if let Some(color) = patch.color {
        rectangle.color = color;
    }
    if let Some(custom_color) = patch.custom_color {
        rectangle.custom_color = custom_color;
    }
    Ok(next)
}

pub fn delete_rectangle(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let rectangles = &mut next.model.views[index].rectangles;
    let before = rectangles.len();
    rectangles.retain(|rectangle| rectangle.id != id);
    if rectangles.len() != before {
        prune_unplaced_members(&mut next, BTreeSet::from([id.to_string()]));
    }
    Ok(next)
}

//! Text-box reducers and size synchronization.

use crate::model::diagram::{TextBox, TextBoxOrientation};
use crate::model::geometry::Coords;
use crate::model::scene::{Scene, SceneTextBox};
use crate::reducer::group::prune_unplaced_members;
use crate::reducer::{EntityKind, ReducerError, ReducerResult, State, ViewContext};
use crate::routing::text_box::text_box_size;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBoxPatch {
    pub tile: Option<Coords>,
    pub content: Option<String>,
    pub font_size: Option<Option<f64>>,
    pub orientation: Option<Option<TextBoxOrientation>>,
}

impl TextBoxPatch {
    fn apply(self, text_box: &mut TextBox) {
        if let Some(tile) = self.tile {
            text_box.tile = tile;
        }
        if let Some(content) = self.content {
            text_box.content = content;
        }
        if let Some(font_size) = self.font_size {
            text_box.font_size = font_size;
        }
        if let Some(orientation) = self.orientation {
            text_box.orientation = orientation;
        }
    }
}

pub fn create_text_box(text_box: TextBox, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    if view.text_box(&text_box.id).is_some() {
        return Err(ReducerError::DuplicateId {
            kind: EntityKind::TextBox,
            id: text_box.id,
        });
    }

    sync_text_box_into(&mut next.scene, &view.id, &text_box);
    view.text_boxes.insert(0, text_box);
    Ok(next)
}

/// Merges `patch`; the scene size is recomputed when content or font size
/// actually changed.
pub fn update_text_box(
    id: &str,
    patch: TextBoxPatch,
    ctx: &ViewContext<'_>,
) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    let text_box = view
        .text_boxes
        .iter_mut()
        .find(|text_box| text_box.id == id)
        .ok_or_else(|| ReducerError::NotFound {
            kind: EntityKind::TextBox,
            id: id.to_string(),
        })?;

    let before = (text_box.content.clone(), text_box.font_size);
    patch.apply(text_box);
    if before != (text_box.content.clone(), text_box.font_size) {
        sync_text_box_into(&mut next.scene, &view.id, text_box);
    }
    Ok(next)
}

pub fn delete_text_box(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &mut next.model.views[index];
    let before = view.text_boxes.len();
    view.text_boxes.retain(|text_box| text_box.id != id);
    if view.text_boxes.len() == before {
        return Ok(next);
    }

    let view_id = view.id.clone();
    next.scene.remove_text_box(&view_id, id);
    prune_unplaced_members(&mut next, BTreeSet::from([id.to_string()]));
    Ok(next)
}

/// Recomputes the scene size of one text box.
pub fn sync_text_box(id: &str, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let (mut next, index) = ctx.begin()?;
    let view = &next.model.views[index];
    let text_box = view.text_box(id).ok_or_else(|| ReducerError::NotFound {
        kind: EntityKind::TextBox,
        id: id.to_string(),
    })?;
    sync_text_box_into(&mut next.scene, &view.id, text_box);
    Ok(next)
}

pub(crate) fn sync_text_box_into(scene: &mut Scene, view_id: &str, text_box: &TextBox) {
    scene.insert_text_box(
        view_id,
        &text_box.id,
        SceneTextBox {
            size: text_box_size(text_box),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::{create_text_box, delete_text_box, update_text_box, TextBoxPatch};
    use crate::model::diagram::{Model, TextBox, View};
    use crate::model::geometry::{Coords, Size};
    use crate::model::scene::Scene;
    use crate::reducer::group::create_group;
    use crate::reducer::{State, ViewContext};

    fn state_with_text_box() -> State {
        let mut model = Model::new("Test");
        model.views.push(View::new("v1", "Main"));
        let state = State::new(model, Scene::new());
        let ctx = ViewContext::new("v1", &state, 0);
        create_text_box(TextBox::new("t1", Coords::zero(), "Hello world"), &ctx).unwrap()
    }

    #[test]
    fn create_derives_size() {
        let state = state_with_text_box();
        assert_eq!(state.scene.text_box("v1", "t1").unwrap().size, Size::new(5, 1));
    }

    #[test]
    fn content_change_resizes_but_move_does_not() {
        let state = state_with_text_box();
        let ctx = ViewContext::new("v1", &state, 0);
        let moved = update_text_box(
            "t1",
            TextBoxPatch {
                tile: Some(Coords::new(3, 3)),
                ..TextBoxPatch::default()
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(moved.scene, state.scene);
        assert_eq!(moved.model.views[0].text_boxes[0].tile, Coords::new(3, 3));

        let ctx = ViewContext::new("v1", &moved, 0);
        let grown = update_text_box(
            "t1",
            TextBoxPatch {
                font_size: Some(Some(1.2)),
                ..TextBoxPatch::default()
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(grown.scene.text_box("v1", "t1").unwrap().size, Size::new(9, 1));
    }

    #[test]
    fn delete_drops_scene_entry() {
        let state = state_with_text_box();
        let ctx = ViewContext::new("v1", &state, 0);
        let next = delete_text_box("t1", &ctx).unwrap();
        assert!(next.model.views[0].text_boxes.is_empty());
        assert!(next.scene.text_boxes.is_empty());
    }

    #[test]
    fn deleting_in_one_view_keeps_same_id_in_another() {
        let mut model = Model::new("Test");
        model.views.push(View::new("v1", "Main"));
        model.views.push(View::new("v2", "Other"));
        let mut state = State::new(model, Scene::new());
        for (view_id, content) in [("v1", "Hi"), ("v2", "Hello world")] {
            let ctx = ViewContext::new(view_id, &state, 0);
            state = create_text_box(TextBox::new("t1", Coords::zero(), content), &ctx).unwrap();
        }
        let state = create_group("g1", vec!["t1".to_string()], None, &state).unwrap();
        assert_eq!(state.scene.text_box_count(), 2);

        let ctx = ViewContext::new("v1", &state, 0);
        let next = delete_text_box("t1", &ctx).unwrap();
        assert!(next.scene.text_box("v1", "t1").is_none());
        assert_eq!(next.scene.text_box("v2", "t1").unwrap().size, Size::new(5, 1));
        assert!(next.scene.groups.contains_key("g1"));
    }
}

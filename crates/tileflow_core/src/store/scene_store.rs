//! Holder of derived scene data. Carries no history.

use crate::model::diagram::Model;
use crate::model::scene::{Group, PerView, Scene, SceneConnector, SceneTextBox};
use crate::reducer::view::{rebuild_scene, sync_view_into};
use std::collections::BTreeMap;

/// Top-level replacement of scene maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePatch {
    pub connectors: Option<PerView<SceneConnector>>,
    pub text_boxes: Option<PerView<SceneTextBox>>,
    pub groups: Option<BTreeMap<String, Group>>,
}

#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    scene: Scene,
}

impl SceneStore {
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }

    pub fn get(&self) -> &Scene {
        &self.scene
    }

    pub fn set(&mut self, patch: ScenePatch) {
        if let Some(connectors) = patch.connectors {
            self.scene.connectors = connectors;
        }
        if let Some(text_boxes) = patch.text_boxes {
            self.scene.text_boxes = text_boxes;
        }
        if let Some(groups) = patch.groups {
            self.scene.groups = groups;
        }
    }

    pub fn replace(&mut self, scene: Scene) {
        self.scene = scene;
    }

    /// Re-derives entries for one view, leaving other views untouched.
    /// Returns `false` for an unknown view.
    pub fn sync(&mut self, model: &Model, view_id: &str) -> bool {
        match model.view(view_id) {
            Some(view) => {
                sync_view_into(&mut self.scene, view);
                true
            }
            None => false,
        }
    }

    /// Re-derives every entry from `model`, keeping groups that still apply.
    pub fn rebuild(&mut self, model: &Model) {
        self.scene = rebuild_scene(model, &self.scene);
    }
}

//! Editor use-case facade.
//!
//! # Responsibility
//! - Run reducers against the current model and scene and commit results to
//!   the model store (with history) and the scene store.
//! - Expose gestures (transactions) and undo/redo, keeping the scene
//!   derived from whichever model snapshot is present.
//!
//! # Invariants
//! - A failed reducer commits nothing.
//! - An edit that leaves the model unchanged records no history step.
//! - After undo, redo or a cancelled gesture the scene is rebuilt from the
//!   restored model.
//!
//! # See also
//! - `store::history` for transaction semantics.

use crate::config::EditorConfig;
use crate::model::diagram::{Connector, Model, ModelItem, Rectangle, TextBox, View, ViewItem};
use crate::model::geometry::Coords;
use crate::model::id::generate_id;
use crate::model::scene::{Group, Scene};
use crate::reducer::group::{
    add_to_group, create_group, groups_for_item, remove_from_group, ungroup,
};
use crate::reducer::model_item::{create_model_item, delete_model_item, update_model_item};
use crate::reducer::view::{create_view, delete_view};
use crate::reducer::{
    reduce_view, ConnectorPatch, ModelItemPatch, RectanglePatch, ReducerError, State,
    TextBoxPatch, ViewAction, ViewContext, ViewItemPatch, ViewPatch,
};
use crate::store::history::{HistoryState, ModelPatch, ModelStore};
use crate::store::scene_store::SceneStore;
use crate::validation::{validate_model, Issue};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type EditorResult<T> = Result<T, EditorError>;

/// Errors from editor service operations.
#[derive(Debug)]
pub enum EditorError {
    /// Reducer rejected the change.
    Reducer(ReducerError),
    /// Model JSON could not be parsed or produced.
    Serde(serde_json::Error),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reducer(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "model json error: {err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reducer(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<ReducerError> for EditorError {
    fn from(value: ReducerError) -> Self {
        Self::Reducer(value)
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Time source for `View.last_updated`.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Constant time, for reproducible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Parses a model from its persisted JSON form.
pub fn model_from_json(json: &str) -> EditorResult<Model> {
    serde_json::from_str(json).map_err(Into::into)
}

/// Serializes a model to pretty-printed JSON.
pub fn model_to_json(model: &Model) -> EditorResult<String> {
    serde_json::to_string_pretty(model).map_err(Into::into)
}

/// Editor facade over the model store and scene store.
pub struct EditorService<C: Clock = SystemClock> {
    config: EditorConfig,
    store: ModelStore,
    scene: SceneStore,
    clock: C,
}

impl EditorService<SystemClock> {
    /// Creates an editor over `model` with default configuration.
    pub fn new(model: Model) -> Self {
        Self::with_clock(model, EditorConfig::default(), SystemClock)
    }
}

impl<C: Clock> EditorService<C> {
    /// Creates an editor with explicit configuration and time source. The
    /// scene is derived from `model` immediately.
    pub fn with_clock(model: Model, config: EditorConfig, clock: C) -> Self {
        let mut scene = SceneStore::default();
        scene.rebuild(&model);
        Self {
            store: ModelStore::with_config(model, &config),
            config,
            scene,
            clock,
        }
    }

    pub fn model(&self) -> &Model {
        self.store.present()
    }

    pub fn scene(&self) -> &Scene {
        self.scene.get()
    }

    pub fn history(&self) -> &HistoryState {
        self.store.get()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Integrity issues of the present model.
    pub fn validate(&self) -> Vec<Issue> {
        validate_model(self.store.present())
    }

    /// Replaces the model, drops history and groups, and derives a new scene.
    pub fn load_model(&mut self, model: Model) {
        info!(
            "event=model_load module=service status=ok views={} items={}",
            model.views.len(),
            model.items.len()
        );
        self.store = ModelStore::with_config(model, &self.config);
        self.scene.replace(Scene::new());
        self.scene.rebuild(self.store.present());
    }

    /// Parses and loads a model from JSON.
    pub fn load_json(&mut self, json: &str) -> EditorResult<()> {
        let model = model_from_json(json)?;
        self.load_model(model);
        Ok(())
    }

    pub fn export_json(&self) -> EditorResult<String> {
        model_to_json(self.store.present())
    }

    // Model items.

    pub fn create_model_item(&mut self, item: ModelItem) -> EditorResult<()> {
        let next = create_model_item(item, &self.snapshot())?;
        self.commit(next);
        Ok(())
    }

    pub fn update_model_item(&mut self, id: &str, patch: ModelItemPatch) -> EditorResult<()> {
        let next = update_model_item(id, patch, &self.snapshot())?;
        self.commit(next);
        Ok(())
    }

    /// Deletes a model item and every placement of it.
    pub fn delete_model_item(&mut self, id: &str) -> EditorResult<()> {
        let next = delete_model_item(id, &self.snapshot(), self.clock.now_ms())?;
        self.commit(next);
        Ok(())
    }

    /// Creates a model item and places it in a view as one undo step.
    pub fn place_item(&mut self, view_id: &str, item: ModelItem, tile: Coords) -> EditorResult<()> {
        self.transaction(|editor| {
            let id = item.id.clone();
            editor.create_model_item(item)?;
            editor.create_view_item(view_id, ViewItem::new(id, tile))
        })
    }

    // Views.

    pub fn create_view(&mut self, view: View) -> EditorResult<()> {
        let next = create_view(view, &self.snapshot())?;
        self.commit(next);
        Ok(())
    }

    pub fn update_view(&mut self, id: &str, patch: ViewPatch) -> EditorResult<()> {
        self.apply_view(id, ViewAction::UpdateView(patch))
    }

    pub fn delete_view(&mut self, id: &str) -> EditorResult<()> {
        let next = delete_view(id, &self.snapshot())?;
        self.commit(next);
        Ok(())
    }

    // View items.

    pub fn create_view_item(&mut self, view_id: &str, item: ViewItem) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::CreateViewItem(item))
    }

    pub fn update_view_item(
        &mut self,
        view_id: &str,
        id: &str,
        patch: ViewItemPatch,
    ) -> EditorResult<()> {
        self.apply_view(
            view_id,
            ViewAction::UpdateViewItem {
                id: id.to_string(),
                patch,
            },
        )
    }

    pub fn delete_view_item(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::DeleteViewItem(id.to_string()))
    }

    pub fn bring_to_front(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::BringToFront(id.to_string()))
    }

    pub fn send_to_back(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::SendToBack(id.to_string()))
    }

    // Connectors.

    pub fn create_connector(&mut self, view_id: &str, connector: Connector) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::CreateConnector(connector))
    }

    pub fn update_connector(
        &mut self,
        view_id: &str,
        id: &str,
        patch: ConnectorPatch,
    ) -> EditorResult<()> {
        self.apply_view(
            view_id,
            ViewAction::UpdateConnector {
                id: id.to_string(),
                patch,
            },
        )
    }

    pub fn delete_connector(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::DeleteConnector(id.to_string()))
    }

    // Rectangles.

    pub fn create_rectangle(&mut self, view_id: &str, rectangle: Rectangle) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::CreateRectangle(rectangle))
    }

    pub fn update_rectangle(
        &mut self,
        view_id: &str,
        id: &str,
        patch: RectanglePatch,
    ) -> EditorResult<()> {
        self.apply_view(
            view_id,
            ViewAction::UpdateRectangle {
                id: id.to_string(),
                patch,
            },
        )
    }

    pub fn delete_rectangle(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::DeleteRectangle(id.to_string()))
    }

    // Text boxes.

    pub fn create_text_box(&mut self, view_id: &str, text_box: TextBox) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::CreateTextBox(text_box))
    }

    pub fn update_text_box(
        &mut self,
        view_id: &str,
        id: &str,
        patch: TextBoxPatch,
    ) -> EditorResult<()> {
        self.apply_view(
            view_id,
            ViewAction::UpdateTextBox {
                id: id.to_string(),
                patch,
            },
        )
    }

    pub fn delete_text_box(&mut self, view_id: &str, id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::DeleteTextBox(id.to_string()))
    }

    /// Re-derives the scene entries of one view.
    pub fn sync_view(&mut self, view_id: &str) -> EditorResult<()> {
        self.apply_view(view_id, ViewAction::SyncScene)
    }

    // Groups. These live in the scene and are not part of undo history.

    /// Creates a group and returns its generated id.
    pub fn create_group(&mut self, item_ids: Vec<String>, name: Option<String>) -> EditorResult<String> {
        let id = generate_id();
        let next = create_group(&id, item_ids, name, &self.snapshot())?;
        self.scene.replace(next.scene);
        Ok(id)
    }

    pub fn ungroup(&mut self, group_id: &str) -> EditorResult<()> {
        let next = ungroup(group_id, &self.snapshot())?;
        self.scene.replace(next.scene);
        Ok(())
    }

    pub fn add_to_group(&mut self, group_id: &str, item_ids: Vec<String>) -> EditorResult<()> {
        let next = add_to_group(group_id, item_ids, &self.snapshot())?;
        self.scene.replace(next.scene);
        Ok(())
    }

    pub fn remove_from_group(&mut self, group_id: &str, item_ids: &[String]) -> EditorResult<()> {
        let next = remove_from_group(group_id, item_ids, &self.snapshot())?;
        self.scene.replace(next.scene);
        Ok(())
    }

    pub fn groups_for_item(&self, item_id: &str) -> Vec<&Group> {
        groups_for_item(self.scene.get(), item_id)
    }

    // Gestures.

    /// Opens a gesture; edits until the matching `end_gesture` form one
    /// undo step.
    pub fn begin_gesture(&mut self) {
        self.store.begin_transaction();
    }

    pub fn end_gesture(&mut self) -> bool {
        self.store.end_transaction()
    }

    /// Discards every edit of the open gesture.
    pub fn cancel_gesture(&mut self) -> bool {
        let cancelled = self.store.cancel_transaction();
        if cancelled {
            self.scene.rebuild(self.store.present());
        }
        cancelled
    }

    pub fn is_gesture_in_progress(&self) -> bool {
        self.store.is_in_transaction()
    }

    /// Runs `operation` as one gesture; an `Err` cancels it.
    pub fn transaction<T, F>(&mut self, operation: F) -> EditorResult<T>
    where
        F: FnOnce(&mut Self) -> EditorResult<T>,
    {
        self.begin_gesture();
        match operation(self) {
            Ok(value) => {
                self.end_gesture();
                Ok(value)
            }
            Err(err) => {
                self.cancel_gesture();
                Err(err)
            }
        }
    }

    // History.

    pub fn undo(&mut self) -> bool {
        let undone = self.store.undo();
        if undone {
            self.scene.rebuild(self.store.present());
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.store.redo();
        if redone {
            self.scene.rebuild(self.store.present());
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn save_to_history(&mut self) {
        self.store.save_to_history();
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    fn snapshot(&self) -> State {
        State::new(self.store.present().clone(), self.scene.get().clone())
    }

    fn apply_view(&mut self, view_id: &str, action: ViewAction) -> EditorResult<()> {
        let state = self.snapshot();
        let ctx = ViewContext::new(view_id, &state, self.clock.now_ms());
        let next = reduce_view(action, &ctx)?;
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: State) {
        let State { model, scene } = next;
        if model != *self.store.present() {
            self.store.set(ModelPatch::replace_with(model), false);
        }
        self.scene.replace(scene);
    }
}

//! Pure state transitions over `(Model, Scene)`.
//!
//! # Responsibility
//! - Apply one intended change and return the next state.
//! - Enforce structural invariants (unique ids, connector arity) and run
//!   cascades so the returned state never holds dangling connectors.
//! - Keep derived scene entries in step with the model entities they follow.
//!
//! # Invariants
//! - Input state is borrowed and never mutated; failures commit nothing.
//! - Deleting an unknown id is a no-op; updating one is `NotFound`.
//! - View-scoped changes go through [`reduce_view`], which stamps
//!   `View.last_updated`.

pub mod cascade;
pub mod connector;
pub mod group;
pub mod model_item;
pub mod rectangle;
pub mod text_box;
pub mod view;
pub mod view_item;

use crate::model::diagram::{Connector, Model, Rectangle, TextBox, ViewItem};
use crate::model::scene::Scene;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use connector::ConnectorPatch;
pub use model_item::ModelItemPatch;
pub use rectangle::RectanglePatch;
pub use text_box::TextBoxPatch;
pub use view::ViewPatch;
pub use view_item::ViewItemPatch;

pub type ReducerResult<T> = Result<T, ReducerError>;

/// Model plus the scene derived from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub model: Model,
    pub scene: Scene,
}

impl State {
    pub fn new(model: Model, scene: Scene) -> Self {
        Self { model, scene }
    }
}

/// Target view and the state a view-scoped reducer reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub view_id: &'a str,
    pub state: &'a State,
    /// Epoch milliseconds written to `View.last_updated` by [`reduce_view`].
    pub timestamp_ms: i64,
}

impl<'a> ViewContext<'a> {
    pub fn new(view_id: &'a str, state: &'a State, timestamp_ms: i64) -> Self {
        Self {
            view_id,
            state,
            timestamp_ms,
        }
    }

    /// Clones the state and resolves the view position in it.
    pub(crate) fn begin(&self) -> ReducerResult<(State, usize)> {
        let index = self
            .state
            .model
            .view_index(self.view_id)
            .ok_or_else(|| ReducerError::ViewNotFound(self.view_id.to_string()))?;
        Ok((self.state.clone(), index))
    }
}

/// Entity kinds named in reducer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ModelItem,
    View,
    ViewItem,
    Connector,
    Anchor,
    Rectangle,
    TextBox,
    Group,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ModelItem => "model item",
            Self::View => "view",
            Self::ViewItem => "view item",
            Self::Connector => "connector",
            Self::Anchor => "anchor",
            Self::Rectangle => "rectangle",
            Self::TextBox => "text box",
            Self::Group => "group",
        };
        f.write_str(name)
    }
}

/// Errors from reducer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReducerError {
    /// Context names a view that does not exist.
    ViewNotFound(String),
    /// Update target does not exist.
    NotFound { kind: EntityKind, id: String },
    /// Create would duplicate an id within its collection.
    DuplicateId { kind: EntityKind, id: String },
    /// Connector would be left with fewer than two anchors.
    TooFewAnchors { connector: String, count: usize },
    GroupNotFound(String),
    /// Group creation with no members.
    EmptyGroup,
}

impl Display for ReducerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ViewNotFound(id) => write!(f, "view not found: {id}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DuplicateId { kind, id } => write!(f, "{kind} id already exists: {id}"),
            Self::TooFewAnchors { connector, count } => write!(
                f,
                "connector {connector} needs at least two anchors, got {count}"
            ),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::EmptyGroup => write!(f, "group must contain at least one item"),
        }
    }
}

impl Error for ReducerError {}

/// One view-scoped change.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    UpdateView(ViewPatch),
    SyncScene,
    CreateViewItem(ViewItem),
    UpdateViewItem { id: String, patch: ViewItemPatch },
    DeleteViewItem(String),
    BringToFront(String),
    SendToBack(String),
    CreateConnector(Connector),
    UpdateConnector { id: String, patch: ConnectorPatch },
    DeleteConnector(String),
    SyncConnector(String),
    CreateRectangle(Rectangle),
    UpdateRectangle { id: String, patch: RectanglePatch },
    DeleteRectangle(String),
    CreateTextBox(TextBox),
    UpdateTextBox { id: String, patch: TextBoxPatch },
    DeleteTextBox(String),
    SyncTextBox(String),
}

/// Applies one view-scoped action. When the model changed, the view's
/// `last_updated` is stamped with the context timestamp.
pub fn reduce_view(action: ViewAction, ctx: &ViewContext<'_>) -> ReducerResult<State> {
    let mut next = match action {
        ViewAction::UpdateView(patch) => view::update_view(ctx.view_id, patch, ctx.state)?,
        ViewAction::SyncScene => view::sync_scene(ctx)?,
        ViewAction::CreateViewItem(item) => view_item::create_view_item(item, ctx)?,
        ViewAction::UpdateViewItem { id, patch } => {
            view_item::update_view_item(&id, patch, ctx)?
        }
        ViewAction::DeleteViewItem(id) => view_item::delete_view_item(&id, ctx)?,
        ViewAction::BringToFront(id) => view_item::bring_to_front(&id, ctx)?,
        ViewAction::SendToBack(id) => view_item::send_to_back(&id, ctx)?,
        ViewAction::CreateConnector(connector) => connector::create_connector(connector, ctx)?,
        ViewAction::UpdateConnector { id, patch } => {
            connector::update_connector(&id, patch, ctx)?
        }
        ViewAction::DeleteConnector(id) => connector::delete_connector(&id, ctx)?,
        ViewAction::SyncConnector(id) => connector::sync_connector(&id, ctx)?,
        ViewAction::CreateRectangle(rectangle) => rectangle::create_rectangle(rectangle, ctx)?,
        ViewAction::UpdateRectangle { id, patch } => {
            rectangle::update_rectangle(&id, patch, ctx)?
        }
        ViewAction::DeleteRectangle(id) => rectangle::delete_rectangle(&id, ctx)?,
        ViewAction::CreateTextBox(text_box) => text_box::create_text_box(text_box, ctx)?,
        ViewAction::UpdateTextBox { id, patch } => text_box::update_text_box(&id, patch, ctx)?,
        ViewAction::DeleteTextBox(id) => text_box::delete_text_box(&id, ctx)?,
        ViewAction::SyncTextBox(id) => text_box::sync_text_box(&id, ctx)?,
    };

    if next.model != ctx.state.model {
        let index = next
            .model
            .view_index(ctx.view_id)
            .ok_or_else(|| ReducerError::ViewNotFound(ctx.view_id.to_string()))?;
        next.model.views[index].last_updated = Some(ctx.timestamp_ms);
    }
    Ok(next)
}

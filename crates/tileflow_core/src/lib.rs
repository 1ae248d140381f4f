//! Diagram model and consistency core for tileflow.
//! This crate is the single source of truth for diagram invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod routing;
pub mod service;
pub mod store;
pub mod validation;

pub use config::EditorConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogLevel, LoggingConfig,
};
pub use model::diagram::{
    AnchorRef, Color, Connector, ConnectorAnchor, ConnectorLabel, ConnectorStyle, Icon, LineType,
    Model, ModelItem, Rectangle, TextBox, TextBoxOrientation, View, ViewItem,
};
pub use model::geometry::{Coords, Rect, Size};
pub use model::id::generate_id;
pub use model::scene::{ConnectorPath, Group, PerView, Scene, SceneConnector, SceneTextBox};
pub use reducer::view::rebuild_scene;
pub use reducer::{
    reduce_view, ConnectorPatch, EntityKind, ModelItemPatch, RectanglePatch, ReducerError,
    ReducerResult, State, TextBoxPatch, ViewAction, ViewContext, ViewItemPatch, ViewPatch,
};
pub use routing::connector_path::{get_anchor_tile, get_connector_path, PathError, PathResult};
pub use routing::pathfinder::find_path;
pub use routing::text_box::text_box_size;
pub use service::editor_service::{
    model_from_json, model_to_json, Clock, EditorError, EditorResult, EditorService, FixedClock,
    SystemClock,
};
pub use store::history::{HistoryState, ModelPatch, ModelStore};
pub use store::scene_store::{ScenePatch, SceneStore};
pub use validation::{validate_model, Issue, IssueKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

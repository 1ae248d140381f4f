//! Stateful holders for the model (with history) and the derived scene.

pub mod history;
pub mod scene_store;

//! Geometric derivations feeding the scene.
//!
//! # Responsibility
//! - Grid pathfinding between two tiles (`pathfinder`).
//! - Connector route derivation from anchors (`connector_path`).
//! - Text-box footprint estimation (`text_box`).
//!
//! # Invariants
//! - Every function here is pure and deterministic; none consults state
//!   beyond its arguments.

pub mod connector_path;
pub mod pathfinder;
pub mod text_box;

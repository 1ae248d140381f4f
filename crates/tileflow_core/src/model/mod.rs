//! Diagram domain model.
//!
//! # Responsibility
//! - Define canonical, persisted diagram entities (`diagram`).
//! - Define derived scene data kept beside the model (`scene`).
//! - Provide tile geometry and id helpers shared by every layer.
//!
//! # Invariants
//! - Every entity is identified by a stable string id.
//! - The model never embeds shared resources by value; views reference
//!   items, icons and colors by id.

pub mod diagram;
pub mod geometry;
pub mod id;
pub mod scene;

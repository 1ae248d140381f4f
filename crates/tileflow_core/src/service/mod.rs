//! Service layer entry points.
//!
//! # Responsibility
//! - Expose editor use-cases over the model and scene stores.
//!
//! # Invariants
//! - Services never mutate model data outside reducers.

pub mod editor_service;

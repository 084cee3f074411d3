//! Shared types for the gridscene pipeline: object kinds, entities,
//! model-matrix math, per-tick input samples, and scene configuration.
//!
//! # Invariants
//! - `ObjectKind::ORDERED` is the single source of draw/packing order.
//! - Configuration is validated at construction, never mid-tick.

pub mod config;
pub mod types;

pub use config::{CameraConfig, CapacitySlots, ConfigError, QuadGrid, SceneConfig, TriangleRow};
pub use types::{Entity, ObjectKind, TickInput, compute_model, wrap_degrees};

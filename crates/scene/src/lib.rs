//! Scene aggregator: owns the entity collections, the camera, and the flat
//! transform arena; each tick repacks every model matrix and emits a
//! render-ready snapshot.
//!
//! # Invariants
//! - Slot assignment and draw order both derive from `ObjectKind::ORDERED`
//!   via the layout computed once at construction.
//! - Entity counts never change after construction; capacity is validated
//!   up front, never mid-tick.
//! - The snapshot borrows the scene, so it cannot outlive the tick that
//!   produced it.

pub mod arena;
pub mod camera;
pub mod scene;

pub use arena::{FLOATS_PER_SLOT, KindRange, SceneLayout, TransformArena};
pub use camera::Camera;
pub use scene::{RenderSnapshot, Scene};

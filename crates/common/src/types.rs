use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Category of renderable object sharing one base mesh and material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Triangle,
    Quad,
}

impl ObjectKind {
    /// The one fixed kind order. Both the transform-packing pass and the
    /// draw-batching pass iterate this list; keeping a second copy of the
    /// ordering anywhere else corrupts rendering silently.
    pub const ORDERED: [ObjectKind; 2] = [ObjectKind::Triangle, ObjectKind::Quad];

    /// Vertices per instance of this kind's base mesh.
    pub fn vertices_per_instance(self) -> u32 {
        match self {
            ObjectKind::Triangle => 3,
            ObjectKind::Quad => 6,
        }
    }
}

/// A renderable entity: world position plus yaw orientation in degrees.
///
/// Entities are created once at scene construction and never destroyed.
/// `spin_rate` is degrees per tick; zero for static entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub position: Vec3,
    pub orientation_degrees: f32,
    pub spin_rate: f32,
}

impl Entity {
    /// A static entity at `position` with zero orientation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation_degrees: 0.0,
            spin_rate: 0.0,
        }
    }

    pub fn with_spin(position: Vec3, orientation_degrees: f32, spin_rate: f32) -> Self {
        Self {
            position,
            orientation_degrees: wrap_degrees(orientation_degrees),
            spin_rate,
        }
    }

    /// Advance one tick: apply the spin rate and wrap into [0, 360) so the
    /// angle magnitude stays bounded over long sessions.
    pub fn advance(&mut self) {
        self.orientation_degrees = wrap_degrees(self.orientation_degrees + self.spin_rate);
    }

    /// Current model matrix for this entity.
    pub fn model(&self) -> Mat4 {
        compute_model(self.position, self.orientation_degrees)
    }
}

/// Model matrix: translate to `position`, then rotate about the vertical
/// axis. An orientation of zero yields exactly the translation matrix.
pub fn compute_model(position: Vec3, orientation_degrees: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_rotation_y(orientation_degrees.to_radians())
}

/// Wrap an angle in degrees into [0, 360). Exactly 360 maps to 0.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Movement and spin deltas consumed by one tick.
///
/// Built by the input accumulator and read exactly once at tick start;
/// movement is a fixed per-tick magnitude while a key is held, spin is the
/// mouse motion accumulated since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub forward: f32,
    pub right: f32,
    pub spin_dx: f32,
    pub spin_dy: f32,
}

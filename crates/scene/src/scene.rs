use glam::{Mat4, Vec3};
use gridscene_common::{
    ConfigError, Entity, ObjectKind, QuadGrid, SceneConfig, TickInput, TriangleRow,
};

use crate::arena::{SceneLayout, TransformArena};
use crate::camera::Camera;

/// Render-ready bundle for one tick: the camera view matrix, the packed
/// transform floats, and the layout table the submitter batches from.
///
/// Borrows the scene, so the next tick's in-place mutation statically
/// invalidates it; a submitter cannot retain it across ticks.
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub view: Mat4,
    pub transforms: &'a [f32],
    pub layout: &'a SceneLayout,
}

/// The scene aggregator: entity collections grouped by kind, the camera,
/// the slot layout, and the transform arena.
#[derive(Debug, Clone)]
pub struct Scene {
    triangles: Vec<Entity>,
    quads: Vec<Entity>,
    camera: Camera,
    layout: SceneLayout,
    arena: TransformArena,
}

impl Scene {
    /// Generate the entity layout from configuration and validate it
    /// against the arena capacity. All `ConfigError`s surface here;
    /// ticking an already-constructed scene cannot fail.
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let triangles = triangle_row(&config.triangle_row);
        let quads = quad_grid(&config.quad_grid);

        let layout = SceneLayout::new(|kind| match kind {
            ObjectKind::Triangle => triangles.len(),
            ObjectKind::Quad => quads.len(),
        });
        layout.check_capacity(config.capacity_slots.0)?;

        tracing::debug!(
            triangles = triangles.len(),
            quads = quads.len(),
            capacity = config.capacity_slots.0,
            "scene constructed"
        );

        Ok(Self {
            triangles,
            quads,
            camera: Camera::new(&config.camera),
            layout,
            arena: TransformArena::new(config.capacity_slots.0),
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Arena capacity in slots, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn entities(&self, kind: ObjectKind) -> &[Entity] {
        match kind {
            ObjectKind::Triangle => &self.triangles,
            ObjectKind::Quad => &self.quads,
        }
    }

    /// Read a packed slot back from the arena (testing and inspection).
    pub fn packed_slot(&self, slot: usize) -> [f32; 16] {
        self.arena.read_slot(slot)
    }

    /// Advance one tick: update every entity in kind-then-insertion order
    /// and pack its model matrix into its assigned slot, then apply the
    /// tick's spin and movement to the camera and recompute it.
    pub fn tick(&mut self, input: TickInput) -> RenderSnapshot<'_> {
        for kind in ObjectKind::ORDERED {
            let base = self.layout.base_slot(kind);
            let entities = match kind {
                ObjectKind::Triangle => &mut self.triangles,
                ObjectKind::Quad => &mut self.quads,
            };
            for (i, entity) in entities.iter_mut().enumerate() {
                entity.advance();
                self.arena.write_slot(base + i, &entity.model());
            }
        }

        self.camera.spin(input.spin_dx, input.spin_dy);
        self.camera.advance(input.forward, input.right);
        self.camera.update();

        RenderSnapshot {
            view: self.camera.view(),
            transforms: self.arena.packed(self.layout.total_slots()),
            layout: &self.layout,
        }
    }
}

/// Triangles in a row along X, oriented by their configured start.
fn triangle_row(row: &TriangleRow) -> Vec<Entity> {
    let start = Vec3::from_array(row.start);
    (0..row.count)
        .map(|i| Entity::new(start + Vec3::X * (i as f32 * row.spacing)))
        .collect()
}

/// Floor quads on a square grid centered on the origin.
fn quad_grid(grid: &QuadGrid) -> Vec<Entity> {
    let h = grid.half_extent as i32;
    let mut quads = Vec::with_capacity(grid.quad_count());
    for x in -h..=h {
        for z in -h..=h {
            quads.push(Entity::new(Vec3::new(
                x as f32 * grid.spacing,
                grid.height,
                z as f32 * grid.spacing,
            )));
        }
    }
    quads
}

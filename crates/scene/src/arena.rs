use glam::Mat4;
use gridscene_common::{ConfigError, ObjectKind};

/// Floats per transform slot: one column-major 4x4 matrix.
pub const FLOATS_PER_SLOT: usize = 16;

/// Flat fixed-capacity buffer of packed model matrices, one 16-float slot
/// per entity. Matrices are stored column-major to match WGSL
/// `mat4x4<f32>` layout on the GPU side.
///
/// Capacity is fixed at construction; writes outside it are a programming
/// error, not a runtime condition, and panic via the slice bounds check.
#[derive(Debug, Clone)]
pub struct TransformArena {
    data: Vec<f32>,
    capacity: usize,
}

impl TransformArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity * FLOATS_PER_SLOT],
            capacity,
        }
    }

    /// Capacity in slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pack a model matrix into its slot.
    pub fn write_slot(&mut self, slot: usize, model: &Mat4) {
        debug_assert!(slot < self.capacity, "slot {slot} out of {}", self.capacity);
        let base = slot * FLOATS_PER_SLOT;
        self.data[base..base + FLOATS_PER_SLOT].copy_from_slice(&model.to_cols_array());
    }

    /// Read a slot back as raw floats.
    pub fn read_slot(&self, slot: usize) -> [f32; 16] {
        let base = slot * FLOATS_PER_SLOT;
        let mut out = [0.0; FLOATS_PER_SLOT];
        out.copy_from_slice(&self.data[base..base + FLOATS_PER_SLOT]);
        out
    }

    /// The first `slots` slots as a contiguous float slice.
    pub fn packed(&self, slots: usize) -> &[f32] {
        &self.data[..slots * FLOATS_PER_SLOT]
    }
}

/// One kind's contiguous slot range within the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRange {
    pub kind: ObjectKind,
    pub count: usize,
    pub base_slot: usize,
}

impl KindRange {
    /// One-past-the-end slot of this range.
    pub fn end_slot(&self) -> usize {
        self.base_slot + self.count
    }
}

/// Ordered per-kind base-offset table.
///
/// Computed once at construction by folding entity counts over
/// `ObjectKind::ORDERED`; both the packing pass and the draw-batching
/// pass read this table, which is what guarantees they agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLayout {
    ranges: Vec<KindRange>,
}

impl SceneLayout {
    /// Build the table: each kind's range starts where the previous one
    /// ends, in the fixed kind order.
    pub fn new(count_of: impl Fn(ObjectKind) -> usize) -> Self {
        let mut ranges = Vec::with_capacity(ObjectKind::ORDERED.len());
        let mut base = 0;
        for kind in ObjectKind::ORDERED {
            let count = count_of(kind);
            ranges.push(KindRange {
                kind,
                count,
                base_slot: base,
            });
            base += count;
        }
        Self { ranges }
    }

    pub fn ranges(&self) -> &[KindRange] {
        &self.ranges
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.range(kind).count
    }

    /// Slot index of entity 0 of `kind`: the sum of counts of all kinds
    /// ordered before it.
    pub fn base_slot(&self, kind: ObjectKind) -> usize {
        self.range(kind).base_slot
    }

    /// Total slots in use across all kinds.
    pub fn total_slots(&self) -> usize {
        self.ranges.last().map_or(0, KindRange::end_slot)
    }

    /// Reject layouts that would overflow an arena of `capacity` slots.
    pub fn check_capacity(&self, capacity: usize) -> Result<(), ConfigError> {
        let required = self.total_slots();
        if required > capacity {
            return Err(ConfigError::CapacityExceeded { required, capacity });
        }
        Ok(())
    }

    fn range(&self, kind: ObjectKind) -> KindRange {
        // ORDERED covers every kind, so the lookup always succeeds.
        self.ranges
            .iter()
            .copied()
            .find(|r| r.kind == kind)
            .unwrap_or(KindRange {
                kind,
                count: 0,
                base_slot: 0,
            })
    }
}

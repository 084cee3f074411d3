use glam::Mat4;
use gridscene_common::ObjectKind;
use gridscene_scene::{RenderSnapshot, SceneLayout};

/// Fixed perspective projection settings. Configuration, not derived
/// state: the aspect ratio does not track the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

impl ProjectionConfig {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// One instanced draw against a kind's base mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub kind: ObjectKind,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_instance: u32,
}

/// Batch one draw per kind in the layout's fixed order.
///
/// `first_instance` is the kind's base slot, so each instance reads its
/// own transform from the shared buffer via its instance index. Kinds
/// with no entities are skipped; their zero-width range still keeps
/// later offsets correct.
pub fn batch_draws(layout: &SceneLayout) -> Vec<DrawCall> {
    layout
        .ranges()
        .iter()
        .filter(|range| range.count > 0)
        .map(|range| DrawCall {
            kind: range.kind,
            vertex_count: range.kind.vertices_per_instance(),
            instance_count: range.count as u32,
            first_instance: range.base_slot as u32,
        })
        .collect()
}

/// Errors from submitting one frame.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The frame could not be presented. Recoverable: skip it, log,
    /// and continue the loop.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// The device is gone. Fatal; the loop must stop.
    #[error("device lost: {0}")]
    DeviceLost(String),
}

impl SubmitError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DeviceLost(_))
    }
}

/// Consumes one tick's snapshot: uploads the matrices and issues the
/// batched draws. GPU backends and the recording sink both implement
/// this, so the batching protocol is testable without a device.
pub trait FrameSink {
    fn submit(
        &mut self,
        snapshot: &RenderSnapshot<'_>,
        projection: &ProjectionConfig,
    ) -> Result<(), SubmitError>;
}

/// What a recording sink captured for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub view: Mat4,
    pub projection: Mat4,
    /// Length of the transform upload in floats.
    pub transform_floats: usize,
    pub draws: Vec<DrawCall>,
}

/// Records uploads and draw calls instead of touching a GPU. Used by
/// tests and the CLI to verify the batching protocol end to end.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<RecordedFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl FrameSink for RecordingSink {
    fn submit(
        &mut self,
        snapshot: &RenderSnapshot<'_>,
        projection: &ProjectionConfig,
    ) -> Result<(), SubmitError> {
        self.frames.push(RecordedFrame {
            view: snapshot.view,
            projection: projection.matrix(),
            transform_floats: snapshot.transforms.len(),
            draws: batch_draws(snapshot.layout),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(triangles: usize, quads: usize) -> SceneLayout {
        SceneLayout::new(move |kind| match kind {
            ObjectKind::Triangle => triangles,
            ObjectKind::Quad => quads,
        })
    }

    #[test]
    fn projection_defaults_match_configuration() {
        let p = ProjectionConfig::default();
        assert_eq!(p.fov_y, std::f32::consts::FRAC_PI_4);
        assert_eq!(p.aspect, 800.0 / 600.0);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 50.0);
        let m = p.matrix();
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn batch_offsets_are_running_counts() {
        let draws = batch_draws(&layout(11, 441));
        assert_eq!(
            draws,
            vec![
                DrawCall {
                    kind: ObjectKind::Triangle,
                    vertex_count: 3,
                    instance_count: 11,
                    first_instance: 0,
                },
                DrawCall {
                    kind: ObjectKind::Quad,
                    vertex_count: 6,
                    instance_count: 441,
                    first_instance: 11,
                },
            ]
        );
    }

    #[test]
    fn second_offset_equals_first_count() {
        let draws = batch_draws(&layout(7, 30));
        assert_eq!(draws[1].first_instance, draws[0].instance_count);
    }

    #[test]
    fn empty_kinds_are_skipped_but_offsets_hold() {
        let draws = batch_draws(&layout(0, 9));
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, ObjectKind::Quad);
        assert_eq!(draws[0].first_instance, 0);
    }

    #[test]
    fn fatal_classification() {
        assert!(!SubmitError::SurfaceUnavailable("lost".into()).is_fatal());
        assert!(SubmitError::DeviceLost("gone".into()).is_fatal());
    }
}

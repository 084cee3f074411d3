//! End-to-end scenarios across the scene aggregator and the frame
//! submission protocol, run against the recording sink.

use gridscene_common::{ObjectKind, SceneConfig, TickInput, compute_model};
use gridscene_render::{FrameSink, ProjectionConfig, RecordingSink};
use gridscene_scene::Scene;

#[test]
fn default_scene_batches_triangles_then_quads() {
    let mut scene = Scene::new(&SceneConfig::default()).expect("default scene");
    let mut sink = RecordingSink::new();
    let projection = ProjectionConfig::default();

    let snapshot = scene.tick(TickInput::default());
    sink.submit(&snapshot, &projection).expect("submit");

    let frame = sink.last_frame().expect("one frame");
    assert_eq!(frame.draws.len(), 2);

    let (vertex_counts, instance_counts, first_instances): (Vec<_>, Vec<_>, Vec<_>) = (
        frame.draws.iter().map(|d| d.vertex_count).collect(),
        frame.draws.iter().map(|d| d.instance_count).collect(),
        frame.draws.iter().map(|d| d.first_instance).collect(),
    );
    assert_eq!(vertex_counts, [3, 6]);
    assert_eq!(instance_counts, [11, 441]);
    assert_eq!(first_instances, [0, 11]);

    // The whole used transform range is uploaded.
    assert_eq!(frame.transform_floats, 452 * 16);
}

#[test]
fn submitter_offsets_agree_with_packing_slots() {
    let mut scene = Scene::new(&SceneConfig::default()).expect("default scene");
    scene.tick(TickInput::default());

    // For each kind, the draw's first_instance must be the slot of that
    // kind's entity 0, so the instances read their own transforms.
    for kind in ObjectKind::ORDERED {
        let base = scene.layout().base_slot(kind);
        let first = scene.entities(kind)[0];
        let expected = compute_model(first.position, first.orientation_degrees);
        assert_eq!(scene.packed_slot(base), expected.to_cols_array());
    }
}

#[test]
fn zero_input_frames_are_identical() {
    let mut scene = Scene::new(&SceneConfig::default()).expect("default scene");
    let mut sink = RecordingSink::new();
    let projection = ProjectionConfig::default();

    for _ in 0..3 {
        let snapshot = scene.tick(TickInput::default());
        sink.submit(&snapshot, &projection).expect("submit");
    }

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], frames[1]);
    assert_eq!(frames[1], frames[2]);
}

#[test]
fn spin_changes_view_but_not_draw_batches() {
    let mut scene = Scene::new(&SceneConfig::default()).expect("default scene");
    let mut sink = RecordingSink::new();
    let projection = ProjectionConfig::default();

    let snapshot = scene.tick(TickInput::default());
    sink.submit(&snapshot, &projection).expect("submit");

    let snapshot = scene.tick(TickInput {
        spin_dx: 250.0,
        spin_dy: -80.0,
        ..TickInput::default()
    });
    sink.submit(&snapshot, &projection).expect("submit");

    let frames = sink.frames();
    assert_ne!(frames[0].view, frames[1].view);
    assert_eq!(frames[0].draws, frames[1].draws);
}

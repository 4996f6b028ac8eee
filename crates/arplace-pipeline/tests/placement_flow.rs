//! End-to-end placement flows on synthetic tracking data.

use arplace_core::{
    AnchorId, FeatureQuality, Pose, Pt3, Ray3, TrackingFrame, Vec2, Viewport, synthetic::scene,
};
use arplace_pipeline::{
    HitSource, InMemoryScene, NodeKind, PlacementConfig, PlacementController, PlacementSession,
    SceneGraph, main_context,
};

const FOCAL_PX: f64 = 1000.0;

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

fn session() -> PlacementSession<InMemoryScene> {
    PlacementSession::new(
        PlacementConfig::default(),
        scene::camera_for_viewport(&viewport(), FOCAL_PX),
        &viewport(),
        InMemoryScene::new(),
    )
    .unwrap()
}

/// Observer orbiting a table top with a noisy floor feature cloud below it.
fn orbit_frames(anchors: Vec<arplace_core::SurfaceAnchor>) -> Vec<TrackingFrame> {
    let features = scene::scatter_features(
        42,
        300,
        Pt3::new(-3.0, -0.02, -3.0),
        Pt3::new(3.0, 0.02, 3.0),
        FeatureQuality::High,
        0,
    );
    scene::orbit_poses(Pt3::origin(), 1.5, 1.2, 12, 0.0, 0.2)
        .into_iter()
        .enumerate()
        .map(|(i, pose)| scene::frame(i as f64 / 30.0, pose, anchors.clone(), features.clone()))
        .collect()
}

#[test]
fn reticle_sticks_to_detected_surface_while_orbiting() {
    let mut s = session();
    let table = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(1.0, 1.0));
    for frame in orbit_frames(vec![table]) {
        let res = s.on_frame(frame).unwrap();
        assert!(res.hit_surface);
        assert_eq!(res.surface, Some(AnchorId(1)));
        assert!(res.position.unwrap().coords.norm() < 1e-9);
    }
    assert_eq!(s.hit_counts().get(&HitSource::ExistingPlane), Some(&12));
    let reticle = s.controller().reticle();
    assert!(reticle.is_visible());
    assert!(reticle.position().unwrap().coords.norm() < 1e-9);
}

#[test]
fn feature_cloud_without_anchors_resolves_on_line_of_sight() {
    let mut s = session();
    for frame in orbit_frames(vec![]) {
        let pose = frame.camera.unwrap();
        let res = s.on_frame(frame).unwrap();
        assert_eq!(res.source, Some(HitSource::HighQualityFeature));
        assert!(!res.hit_surface);
        assert!(res.surface.is_none());

        // Feature hits are projected onto the ray through the screen centre.
        let p = res.position.unwrap();
        let ray = Ray3::new(pose.position(), pose.forward()).unwrap();
        assert!(ray.distance_to_line(&p) < 1e-9);
        let t = ray.project_distance(&p);
        assert!(t >= 0.1 && t <= 20.0, "hit at distance {t}");
    }
    assert_eq!(s.misses(), 0);
}

#[test]
fn surface_detected_mid_session_takes_over() {
    let mut s = session();
    let pose = scene::look_at(Pt3::new(0.0, 1.4, 1.4), Pt3::new(0.0, 0.0, 0.0));
    let feature = arplace_core::FeaturePoint::new(7, Pt3::new(0.0, 0.7, 0.7), FeatureQuality::High);

    let res = s.on_frame(scene::frame(0.0, pose, vec![], vec![feature])).unwrap();
    assert_eq!(res.source, Some(HitSource::HighQualityFeature));
    assert!(!res.hit_surface);

    let floor = scene::floor_anchor(AnchorId(3), Pt3::origin(), Vec2::new(4.0, 4.0));
    let res = s
        .on_frame(scene::frame(0.1, pose, vec![floor], vec![feature]))
        .unwrap();
    assert_eq!(res.source, Some(HitSource::ExistingPlane));
    assert_eq!(res.surface, Some(AnchorId(3)));

    let id = s.tap().unwrap();
    let obj = s.controller().object(id).unwrap();
    assert!(obj.position().coords.norm() < 1e-9);
    assert_eq!(obj.transform.rotation, pose.rotation());
}

#[test]
fn controller_feeds_main_context_on_another_thread() {
    let (dispatcher, ctx) = main_context(InMemoryScene::new());
    let worker = std::thread::spawn(move || ctx.run());

    let camera = scene::camera_for_viewport(&viewport(), FOCAL_PX);
    let mut controller =
        PlacementController::new(PlacementConfig::default(), camera, dispatcher).unwrap();
    controller.set_screen_anchor(viewport().center());

    let pose = scene::look_at(Pt3::new(0.0, 1.5, 1.5), Pt3::origin());
    let floor = scene::floor_anchor(AnchorId(1), Pt3::origin(), Vec2::new(2.0, 2.0));
    let frame = scene::frame(0.0, pose, vec![floor], vec![]);

    controller.on_tracking_update(&frame);
    let first = controller.on_commit_trigger(&frame).unwrap();
    controller.commit_placement(first, &Pt3::new(0.0, 0.0, -100.0), Some(&pose));
    controller.on_commit_trigger(&frame).unwrap();
    controller.replace_reticle();

    let reticle_node = controller.reticle().node();
    let first_node = controller.object(first).unwrap().node;
    // Dropping the controller drops the last dispatcher and stops the worker.
    drop(controller);
    let scene = worker.join().unwrap();

    assert_eq!(scene.count_kind(NodeKind::PlacedObject), 2);
    assert_eq!(scene.count_kind(NodeKind::Reticle), 1);
    assert!(scene.contains(reticle_node));
    // Reticle twice plus two objects: the re-commit moved, not re-inserted.
    assert_eq!(scene.insertions(), 4);

    let moved = scene.node(first_node).unwrap();
    let offset = Pt3::from(moved.transform.translation.vector) - pose.position();
    assert!((offset.norm() - 30.0).abs() < 1e-9);
}

#[test]
fn commit_from_fixed_observer_is_clamped() {
    let (dispatcher, mut ctx) = main_context(InMemoryScene::new());
    let camera = scene::camera_for_viewport(&viewport(), FOCAL_PX);
    let mut c = PlacementController::new(PlacementConfig::default(), camera, dispatcher).unwrap();
    let id = c.spawn_object();
    let observer = Pose::new(arplace_core::Iso3::identity());
    let p = c
        .commit_placement(id, &Pt3::new(0.0, 0.0, -1000.0), Some(&observer))
        .unwrap();
    ctx.drain();
    assert!((p - Pt3::new(0.0, 0.0, -30.0)).norm() < 1e-9);
    assert_eq!(ctx.scene().count_kind(NodeKind::PlacedObject), 1);
}

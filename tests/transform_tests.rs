//! Transform Propagation Tests
//!
//! Tests for:
//! - Bind-pose fallback for untouched poses
//! - Bone delta composition (local * inverse(local) * pose)
//! - Non-bone nodes ignoring their pose
//! - End-to-end clip -> pose -> world matrix
//! - set_pose_from_world round trip
//! - Multi-root and subtree updates

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use gltf_pose::animation::clip::AnimationClip;
use gltf_pose::assets::animation::SourceAnimation;
use gltf_pose::scene::{Node, NodeKind, Scene};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.abs_diff_eq(*b, EPSILON)
}

fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

// ============================================================================
// Bind Pose Fallback
// ============================================================================

#[test]
fn untouched_mesh_node_uses_local_xform_exactly() {
    let parent_world = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));
    let local = Mat4::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_y(0.5),
        Vec3::new(1.0, 0.0, 0.0),
    );

    let mut scene = Scene::new();
    let mesh = scene.add_node(Node::mesh(0).with_local_xform(local));
    scene.propagate(mesh, parent_world);

    assert_eq!(*scene.get_node(mesh).unwrap().world_xform(), parent_world * local);
}

#[test]
fn untouched_bone_falls_back_to_bind_pose() {
    let parent_world = Mat4::from_rotation_z(FRAC_PI_2);
    let local = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));

    let mut scene = Scene::new();
    let bone = scene.add_node(Node::bone(local));
    scene.propagate(bone, parent_world);

    assert!(mat4_approx(scene.get_node(bone).unwrap().world_xform(), &(parent_world * local)));
}

#[test]
fn bone_posed_at_bind_pose_cancels_delta() {
    let parent_world = Mat4::from_translation(Vec3::new(-1.0, 0.0, 4.0));
    let (scale, rotation, translation) = (Vec3::splat(1.5), Quat::from_rotation_x(0.8), Vec3::new(0.0, 1.0, 2.0));
    let local = Mat4::from_scale_rotation_translation(scale, rotation, translation);

    let mut scene = Scene::new();
    let bone = scene.add_node(Node::bone(local));
    {
        let pose = &mut scene.get_node_mut(bone).unwrap().pose;
        pose.translation = translation;
        pose.rotation = rotation;
        pose.scale = scale;
    }
    scene.propagate(bone, parent_world);

    assert!(mat4_approx(scene.get_node(bone).unwrap().world_xform(), &(parent_world * local)));
}

#[test]
fn animated_bone_pose_replaces_bind_pose() {
    let mut scene = Scene::new();
    let bone = scene.add_node(Node::bone(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))));
    scene.get_node_mut(bone).unwrap().pose.translation = Vec3::new(1.0, 0.0, 0.0);

    scene.propagate(bone, Mat4::IDENTITY);

    let world = scene.get_node(bone).unwrap().world_xform();
    assert!(vec3_approx(translation_of(world), Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn non_bone_ignores_pose() {
    let local = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0));

    let mut scene = Scene::new();
    let empty = scene.add_node(Node::new(NodeKind::Empty).with_local_xform(local));
    scene.get_node_mut(empty).unwrap().pose.translation = Vec3::new(9.0, 9.0, 9.0);
    scene.propagate(empty, Mat4::IDENTITY);

    assert_eq!(*scene.get_node(empty).unwrap().world_xform(), local);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn children_inherit_parent_world() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::bone(Mat4::IDENTITY));
    let child = scene
        .add_child_bone(root, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
        .unwrap();
    let grandchild = scene
        .add_child_bone(child, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
        .unwrap();

    scene.get_node_mut(root).unwrap().pose.rotation = Quat::from_rotation_z(FRAC_PI_2);
    scene.propagate(root, Mat4::IDENTITY);

    // Rotating the root by 90 degrees about Z swings +Y onto -X.
    let child_pos = translation_of(scene.get_node(child).unwrap().world_xform());
    let grandchild_pos = translation_of(scene.get_node(grandchild).unwrap().world_xform());
    assert!(vec3_approx(child_pos, Vec3::new(-1.0, 0.0, 0.0)));
    assert!(vec3_approx(grandchild_pos, Vec3::new(-2.0, 0.0, 0.0)));
}

#[test]
fn update_world_transforms_visits_every_root() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::mesh(0).with_local_xform(Mat4::from_translation(Vec3::X)));
    let b = scene.add_node(Node::mesh(1).with_local_xform(Mat4::from_translation(Vec3::Y)));

    scene.update_world_transforms();

    assert_eq!(translation_of(scene.get_node(a).unwrap().world_xform()), Vec3::X);
    assert_eq!(translation_of(scene.get_node(b).unwrap().world_xform()), Vec3::Y);
}

#[test]
fn update_subtree_uses_parent_world() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new(NodeKind::Empty).with_local_xform(Mat4::from_translation(Vec3::X)));
    let bone = scene.add_child_bone(root, Mat4::from_translation(Vec3::Y)).unwrap();
    scene.update_world_transforms();

    scene.get_node_mut(bone).unwrap().pose.translation = Vec3::new(0.0, 0.0, 2.0);
    scene.update_subtree(bone);

    let world = scene.get_node(bone).unwrap().world_xform();
    assert!(vec3_approx(translation_of(world), Vec3::new(1.0, 0.0, 2.0)));
}

#[test]
fn deep_bone_chain_propagates() {
    const DEPTH: usize = 20_000;

    let mut scene = Scene::new();
    let root = scene.add_node(Node::bone(Mat4::IDENTITY));
    let mut tip = root;
    for _ in 0..DEPTH {
        tip = scene.add_child_bone(tip, Mat4::from_translation(Vec3::X)).unwrap();
    }

    scene.propagate(root, Mat4::IDENTITY);

    let world = scene.get_node(tip).unwrap().world_xform();
    assert!(approx(translation_of(world).x / DEPTH as f32, 1.0));
}

#[test]
fn propagate_reaches_every_sibling() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new(NodeKind::Empty));
    let offsets = [Vec3::X, Vec3::Y, Vec3::Z];
    let children: Vec<_> = offsets
        .iter()
        .map(|&offset| scene.add_child_bone(root, Mat4::from_translation(offset)).unwrap())
        .collect();

    scene.propagate(root, Mat4::from_translation(Vec3::ONE));

    for (child, offset) in children.into_iter().zip(offsets) {
        let world = scene.get_node(child).unwrap().world_xform();
        assert!(vec3_approx(translation_of(world), Vec3::ONE + offset));
    }
}

// ============================================================================
// End To End
// ============================================================================

#[test]
fn clip_drives_root_world_translation() -> anyhow::Result<()> {
    let source = SourceAnimation::from_json_str(
        r#"{
            "name": "slide",
            "samplers": [ { "interpolation": "LINEAR", "input": [0.0, 2.0] } ],
            "channels": [ { "target_node": 0, "target_path": "translation", "sampler": 0,
                            "output": [0.0, 0.0, 0.0, 4.0, 0.0, 0.0] } ]
        }"#,
    )?;
    let mut clip = AnimationClip::from_source(0, &source)?;
    assert_eq!(clip.min_time(), 0.0);
    assert_eq!(clip.max_time(), 2.0);

    let mut scene = Scene::new();
    let root = scene.add_node(Node::bone(Mat4::IDENTITY).with_gltf_index(0));
    assert_eq!(clip.bind(&scene, root), 0);

    clip.set_time(1.0);
    clip.apply_pose(&mut scene);
    scene.propagate(root, Mat4::IDENTITY);

    let world = scene.get_node(root).unwrap().world_xform();
    assert!(vec3_approx(translation_of(world), Vec3::new(2.0, 0.0, 0.0)));
    Ok(())
}

// ============================================================================
// Pose From World
// ============================================================================

#[test]
fn set_pose_from_world_reproduces_world_matrix() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::bone(Mat4::IDENTITY));
    let bone = scene
        .add_child_bone(root, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
        .unwrap();
    scene.propagate(root, Mat4::IDENTITY);

    let target = Mat4::from_scale_rotation_translation(
        Vec3::ONE,
        Quat::from_rotation_y(0.7),
        Vec3::new(3.0, 2.0, 1.0),
    );
    scene.set_pose_from_world(bone, target).unwrap();
    scene.propagate(root, Mat4::IDENTITY);

    assert!(mat4_approx(scene.get_node(bone).unwrap().world_xform(), &target));
}

#[test]
fn set_pose_from_world_is_relative_to_parent() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new(NodeKind::Empty).with_local_xform(Mat4::from_translation(Vec3::X)));
    let bone = scene.add_child_bone(root, Mat4::IDENTITY).unwrap();
    scene.update_world_transforms();

    scene
        .set_pose_from_world(bone, Mat4::from_translation(Vec3::new(1.0, 5.0, 0.0)))
        .unwrap();

    let pose = &scene.get_node(bone).unwrap().pose;
    assert!(vec3_approx(pose.translation, Vec3::new(0.0, 5.0, 0.0)));
}

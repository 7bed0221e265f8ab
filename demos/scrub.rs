use glam::Mat4;
use gltf_pose::animation::Timeline;
use gltf_pose::assets::animation::{SourceAnimation, load_animations};
use gltf_pose::assets::nodes::{SourceNode, find_skeleton_root, populate_skeleton_subgraph};
use gltf_pose::scene::{Node, Scene, Skeleton};
use gltf_pose::settings::ViewerSettings;

/// A two-bone arm: the shoulder swings around Z while the elbow slides out.
const NODES: &str = r#"[
    { "name": "arm", "children": [1], "mesh": 0 },
    { "name": "shoulder", "children": [2] },
    { "name": "elbow", "translation": [0.0, 1.0, 0.0] }
]"#;

const ANIMATIONS: &str = r#"[
    {
        "name": "wave",
        "samplers": [
            { "interpolation": "LINEAR", "input": [0.0, 1.0, 2.0] },
            { "interpolation": "CUBICSPLINE", "input": [0.0, 2.0] }
        ],
        "channels": [
            { "target_node": 1, "target_path": "rotation", "sampler": 0,
              "output": [0.0, 0.0, 0.0, 1.0,  0.0, 0.0, 0.3826834, 0.9238795,  0.0, 0.0, 0.0, 1.0] },
            { "target_node": 2, "target_path": "translation", "sampler": 1,
              "output": [0.0, 0.0, 0.0,  0.0, 1.0, 0.0,  0.0, 0.0, 0.0,
                         0.0, 0.0, 0.0,  0.0, 1.5, 0.0,  0.0, 0.0, 0.0] }
        ]
    }
]"#;

/// Scrub Example
///
/// Loads a clip from JSON, binds it to a small skeleton and prints the world
/// position of every joint at a few frames.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = ViewerSettings::from_json_str(r#"{ "playback": { "frames_per_second": 4.0 } }"#)?;
    let nodes: Vec<SourceNode> = serde_json::from_str(NODES)?;
    let sources: Vec<SourceAnimation> = serde_json::from_str(ANIMATIONS)?;

    let mut scene = Scene::new();
    let root = scene.add_node(Node::mesh(0).with_gltf_index(0).with_name("arm"));

    let joints = [1, 2];
    let skeleton_root = find_skeleton_root(&nodes, &joints, 0).ok_or_else(|| anyhow::anyhow!("no joint below node 0"))?;
    populate_skeleton_subgraph(&mut scene, &nodes, root, skeleton_root)?;
    let mut skeleton = Skeleton::from_graph("arm", &scene, root, &joints, Vec::new());

    let mut timeline = Timeline::new(load_animations(&sources)?, settings.playback);
    let unresolved = timeline.bind_all(&scene, root);
    println!("Bound {} clip(s), {unresolved} unresolved channel(s)", timeline.clips().len());

    let (first, last) = timeline.frame_range();
    for frame in first..=last {
        timeline.scrub_to_frame(frame);
        timeline.tick(0.0, &mut scene);
        scene.propagate(root, Mat4::IDENTITY);
        skeleton.compute_joint_matrices(&scene, Mat4::IDENTITY);

        print!("frame {frame:2}:");
        for handle in scene.collect_bones(root) {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };
            let p = node.world_xform().w_axis;
            print!("  {} ({:+.3}, {:+.3}, {:+.3})", node.name, p.x, p.y, p.z);
        }
        println!();
    }

    println!("Joint buffer: {} bytes", skeleton.joint_matrices_bytes().len());
    Ok(())
}

//! Robot - a two-part hierarchy
//!
//! Builds the classic scene graph robot (a body carrying a head) and ticks it
//! a few times while the body turns.
//!
//! This example demonstrates:
//! - Layered configuration and logger setup
//! - Registering actors in a Scene and building sub-hierarchies
//! - Incremental Affine3 transforms on an operational node
//! - A custom SceneObserver that projects every drawn mesh to the screen
//!
//! Run with: `cargo run --example robot`
//! More output: `SG_DEBUG__LOG_LEVEL=debug cargo run --example robot`

use scenegraph::config::SceneGraphConfig;
use scenegraph::{Affine3, Mat4, MeshHandle, NodeKey, SceneNode, SceneObserver, Vec3};

/// Prints where each drawn mesh lands in normalized device coordinates
struct ScreenProjector {
    view_projection: Mat4,
}

impl SceneObserver for ScreenProjector {
    fn on_draw(&mut self, _key: NodeKey, node: &SceneNode) {
        let (center, _) = node.bounding_sphere();
        let ndc = self.view_projection.project_point(center);
        log::info!(
            "Draw {} (mesh {:?}) at world ({:.2}, {:.2}, {:.2}) -> ndc ({:.3}, {:.3})",
            node.name(),
            node.mesh_handle().map(|m| m.id()),
            center.x,
            center.y,
            center.z,
            ndc.x,
            ndc.y,
        );
    }
}

fn main() {
    let config = SceneGraphConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        SceneGraphConfig::default()
    });
    if let Err(e) = config.debug.init_logger() {
        eprintln!("Logger already initialised: {}", e);
    }

    let mut scene = config.scene.create_scene();

    // Body: operational node registered as actor 2, with its mesh below it
    let body = scene
        .spawn(2, SceneNode::new("body", 2).with_transform(Mat4::translation(Vec3::ZERO)))
        .expect("fresh body attaches under the root");
    let body_mesh = scene.create_node(SceneNode::mesh("body mesh", 3).with_mesh(MeshHandle(3)));
    scene.attach(body, body_mesh).expect("body mesh attaches to body");

    // Head: five units up the body's Z axis, carrying its own mesh
    let head = scene.create_node(
        SceneNode::new("head", 4).with_transform(Mat4::translation(Vec3::new(0.0, 0.0, 5.0))),
    );
    let head_mesh = scene.create_node(SceneNode::mesh("head mesh", 5).with_mesh(MeshHandle(5)));
    scene.attach(head, head_mesh).expect("head mesh attaches to head");
    scene.attach(body, head).expect("head attaches to body");

    let eye = Vec3::new(12.0, 6.0, 8.0);
    let mut projector = ScreenProjector {
        view_projection: Mat4::perspective(60.0, 16.0 / 9.0, 0.1, 100.0)
            * Mat4::look_at(eye, Vec3::new(0.0, 0.0, 2.5), Vec3::Z),
    };

    // Turn the body 30 degrees about its own Z axis per tick
    let (sin, cos) = 30.0_f32.to_radians().sin_cos();
    let mut pose = Affine3::IDENTITY;

    for tick in 0..3 {
        log::info!("Tick {}", tick);
        if let Some(node) = scene.node_mut(body) {
            node.set_affine_transform(&pose);
        }
        scene
            .update(1.0, &mut projector)
            .expect("root is always present");
        pose.rotate_local_z(cos, sin);
    }

    // Default observer: logs draws through the log facade
    scene
        .update(1.0, &mut config.debug.observer())
        .expect("root is always present");

    if let Some(head) = scene.node(head) {
        let angles = head.world_transform().euler_degrees();
        log::info!(
            "Head euler angles: ({:.1}, {:.1}, {:.1})",
            angles.x,
            angles.y,
            angles.z
        );
    }
    log::info!("{} actor(s) registered", scene.actor_count());
}

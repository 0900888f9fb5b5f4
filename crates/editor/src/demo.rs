//! The two-car demo scene.

use glam::{Vec2, Vec4};
use scene_graph::{NodeId, Result, SceneGraph};

use crate::config::Palette;

pub const CAR_BODY_SIZE: Vec2 = Vec2::new(4.0, 1.5);
pub const CAR_WHEEL_RADIUS: f32 = 0.6;
pub const CAR_WHEEL_OFFSET: Vec2 = Vec2::new(1.5, -0.5);

const ROOF_SIZE_FACTOR: Vec2 = Vec2::new(0.5, 0.8);
const ROOF_HEIGHT_FACTOR: f32 = 0.7;
const HUBCAP_RADIUS_FACTOR: f32 = 0.4;

pub const RED_CAR_START: Vec2 = Vec2::new(-1.0, 5.0);
pub const BLUE_CAR_START: Vec2 = Vec2::new(6.0, -5.0);

/// Builds an orphaned car and returns its group node.
///
/// ```text
/// {name}
/// └── {name}_Body
///     ├── {name}_Roof
///     ├── {name}_FrontWheel
///     │   └── {name}_FrontHubcap
///     └── {name}_RearWheel
///         └── {name}_RearHubcap
/// ```
pub fn create_car(
    scene: &mut SceneGraph,
    name: &str,
    position: Vec2,
    body_color: Vec4,
    palette: &Palette,
) -> Result<NodeId> {
    let car = scene.create_node(name);
    set_position(scene, car, position);

    let body = scene.create_rectangle(format!("{name}_Body"), CAR_BODY_SIZE);
    set_color(scene, body, body_color);

    let roof = scene.create_rectangle(format!("{name}_Roof"), CAR_BODY_SIZE * ROOF_SIZE_FACTOR);
    set_position(
        scene,
        roof,
        Vec2::new(0.0, CAR_BODY_SIZE.y * ROOF_HEIGHT_FACTOR),
    );
    set_color(scene, roof, body_color);

    scene.add_child(car, body)?;
    scene.add_child(body, roof)?;

    for (side, offset_x) in [("Front", CAR_WHEEL_OFFSET.x), ("Rear", -CAR_WHEEL_OFFSET.x)] {
        let wheel = scene.create_circle(format!("{name}_{side}Wheel"), CAR_WHEEL_RADIUS);
        set_position(scene, wheel, Vec2::new(offset_x, CAR_WHEEL_OFFSET.y));
        set_color(scene, wheel, palette.wheel);

        let hubcap = scene.create_circle(
            format!("{name}_{side}Hubcap"),
            CAR_WHEEL_RADIUS * HUBCAP_RADIUS_FACTOR,
        );
        set_color(scene, hubcap, palette.hubcap);

        scene.add_child(body, wheel)?;
        scene.add_child(wheel, hubcap)?;
    }

    Ok(car)
}

/// Creates `Root` with the red and blue cars as its children
pub fn setup_scene(scene: &mut SceneGraph, palette: &Palette) -> Result<NodeId> {
    let root = scene.create_node("Root");
    let red = create_car(scene, "RedCar", RED_CAR_START, palette.red_car, palette)?;
    let blue = create_car(scene, "BlueCar", BLUE_CAR_START, palette.blue_car, palette)?;
    scene.add_child(root, red)?;
    scene.add_child(root, blue)?;
    Ok(root)
}

/// One line per node, indented two spaces per level: `name (pos: x, y)`
pub fn hierarchy_lines(scene: &SceneGraph, root: NodeId) -> Vec<String> {
    scene
        .depth_first(root)
        .filter_map(|(id, depth)| {
            let node = scene.node(id)?;
            let position = node.position();
            Some(format!(
                "{}{} (pos: {}, {})",
                "  ".repeat(depth),
                node.name(),
                position.x,
                position.y
            ))
        })
        .collect()
}

fn set_position(scene: &mut SceneGraph, id: NodeId, position: Vec2) {
    if let Some(node) = scene.node_mut(id) {
        node.set_position(position);
    }
}

fn set_color(scene: &mut SceneGraph, id: NodeId, color: Vec4) {
    if let Some(node) = scene.node_mut(id) {
        node.set_color(color);
    }
}

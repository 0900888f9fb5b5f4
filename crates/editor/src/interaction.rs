//! Press, move and release handling for dragging scene nodes.
//!
//! The canvas only answers hit tests and stores the selection; the grab and the
//! last pointer position live here.

use canvas::{Canvas, Renderer};
use glam::Vec2;
use log::{debug, trace};
use scene_graph::{NodeId, SceneGraph};

use crate::demo::CAR_BODY_SIZE;

/// Name fragment of nodes that spin while their owner is dragged
const WHEEL_MARKER: &str = "Wheel";
/// Name fragment of top-level nodes that can be grabbed by their body outline
const CAR_MARKER: &str = "Car";

#[derive(Clone, Copy, Debug)]
struct Grab {
    node: NodeId,
    last_position: Vec2,
}

#[derive(Debug)]
pub struct DragController {
    grab: Option<Grab>,
    /// Degrees per scene unit of horizontal movement
    wheel_rotation_factor: f32,
}

impl DragController {
    pub fn new(wheel_rotation_factor: f32) -> Self {
        Self {
            grab: None,
            wheel_rotation_factor,
        }
    }

    pub fn grabbed(&self) -> Option<NodeId> {
        self.grab.map(|grab| grab.node)
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Selects and grabs whatever is under `point`, or clears the selection.
    ///
    /// When no shape is hit, a top-level car under `point` is grabbed as a
    /// whole, using the body outline around the car's origin.
    pub fn press<R: Renderer>(
        &mut self,
        scene: &SceneGraph,
        canvas: &mut Canvas<R>,
        point: Vec2,
    ) -> Option<NodeId> {
        let hit = canvas
            .hit_test(scene, point)
            .or_else(|| canvas.root().and_then(|root| grab_car_outline(scene, root, point)));

        canvas.select_node(hit);
        self.grab = hit.map(|node| Grab {
            node,
            last_position: point,
        });

        match hit {
            Some(id) => debug!("grabbed node {id} at {point}"),
            None => trace!("press at {point} hit nothing"),
        }
        hit
    }

    /// Moves the grabbed node by the pointer delta. Returns false when nothing
    /// is grabbed.
    ///
    /// The world-space delta is mapped into the node's parent space, so a node
    /// under a rotated or scaled parent still follows the pointer. Wheels below
    /// the grabbed node turn by `-delta.x * wheel_rotation_factor` degrees.
    pub fn drag(&mut self, scene: &mut SceneGraph, point: Vec2) -> bool {
        let Some(grab) = self.grab.as_mut() else {
            return false;
        };
        let id = grab.node;
        let previous = grab.last_position;
        grab.last_position = point;

        let delta = point - previous;
        let parent = scene.parent_global_transform(id);
        let local_delta =
            parent.inverse_transform_point(point) - parent.inverse_transform_point(previous);

        let Some(node) = scene.node_mut(id) else {
            self.grab = None;
            return false;
        };
        node.set_position(node.position() + local_delta);

        let spin = -delta.x * self.wheel_rotation_factor;
        if spin != 0.0 {
            let wheels: Vec<NodeId> = scene
                .depth_first(id)
                .skip(1)
                .map(|(wheel, _)| wheel)
                .filter(|wheel| {
                    scene
                        .node(*wheel)
                        .is_some_and(|node| node.name().contains(WHEEL_MARKER))
                })
                .collect();
            for wheel in wheels {
                if let Some(node) = scene.node_mut(wheel) {
                    node.set_rotation(node.rotation() + spin);
                }
            }
        }

        true
    }

    pub fn release(&mut self) {
        if let Some(grab) = self.grab.take() {
            debug!("released node {}", grab.node);
        }
    }
}

/// Top-level car whose body-sized outline contains `point`, newest first
fn grab_car_outline(scene: &SceneGraph, root: NodeId, point: Vec2) -> Option<NodeId> {
    let root_global = scene.global_transform(root)?;
    let in_root = root_global.inverse_transform_point(point);
    let half = CAR_BODY_SIZE / 2.0;

    scene.children(root).iter().rev().copied().find(|id| {
        scene.node(*id).is_some_and(|node| {
            if !node.name().contains(CAR_MARKER) {
                return false;
            }
            let local = node.local_transform().inverse_transform_point(in_root);
            local.x.abs() <= half.x && local.y.abs() <= half.y
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use crate::demo::{create_car, setup_scene};
    use canvas::HeadlessRenderer;

    fn demo() -> (SceneGraph, Canvas<HeadlessRenderer>, NodeId) {
        let mut scene = SceneGraph::new();
        let root = setup_scene(&mut scene, &Palette::default()).unwrap();
        let mut canvas = Canvas::new();
        canvas.initialize(HeadlessRenderer::new());
        canvas.set_root(Some(root));
        (scene, canvas, root)
    }

    fn find(scene: &SceneGraph, root: NodeId, name: &str) -> NodeId {
        scene.find_by_name(root, name).unwrap()
    }

    #[test]
    fn test_press_selects_hit() {
        let (scene, mut canvas, root) = demo();
        let mut drag = DragController::new(90.0);

        let body = find(&scene, root, "RedCar_Body");
        assert_eq!(drag.press(&scene, &mut canvas, Vec2::new(-2.0, 5.0)), Some(body));
        assert_eq!(canvas.selected_node(), Some(body));
        assert!(drag.is_dragging());

        assert_eq!(drag.press(&scene, &mut canvas, Vec2::new(0.0, 0.0)), None);
        assert_eq!(canvas.selected_node(), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_moves_grabbed_node_and_spins_wheels() {
        let (mut scene, mut canvas, root) = demo();
        let mut drag = DragController::new(90.0);
        let body = find(&scene, root, "RedCar_Body");
        let wheel = find(&scene, root, "RedCar_FrontWheel");
        let hubcap = find(&scene, root, "RedCar_FrontHubcap");

        drag.press(&scene, &mut canvas, Vec2::new(-2.0, 5.0));
        assert!(drag.drag(&mut scene, Vec2::new(-1.0, 5.5)));

        let body_node = scene.node(body).unwrap();
        assert!(body_node.position().abs_diff_eq(Vec2::new(1.0, 0.5), 1e-5));
        // one unit to the right turns the wheels back by the factor
        assert!((scene.node(wheel).unwrap().rotation() - 270.0).abs() < 1e-3);
        assert_eq!(scene.node(hubcap).unwrap().rotation(), 0.0);

        let global = scene.global_transform(wheel).unwrap();
        assert!(global.position().abs_diff_eq(Vec2::new(1.5, 5.0), 1e-5));

        drag.release();
        assert!(!drag.drag(&mut scene, Vec2::new(5.0, 5.0)));
        assert!(scene
            .node(body)
            .unwrap()
            .position()
            .abs_diff_eq(Vec2::new(1.0, 0.5), 1e-5));
    }

    #[test]
    fn test_dragged_wheel_does_not_spin_itself() {
        let (mut scene, mut canvas, root) = demo();
        let mut drag = DragController::new(90.0);
        let wheel = find(&scene, root, "BlueCar_RearWheel");

        // rear wheel of the blue car sits at (4.5, -5.5) in world space
        assert_eq!(
            drag.press(&scene, &mut canvas, Vec2::new(4.5, -5.9)),
            Some(wheel)
        );
        drag.drag(&mut scene, Vec2::new(5.5, -5.9));

        let node = scene.node(wheel).unwrap();
        assert_eq!(node.rotation(), 0.0);
        assert!(node.position().abs_diff_eq(Vec2::new(-0.5, -0.5), 1e-5));
    }

    #[test]
    fn test_drag_under_rotated_parent_follows_pointer() {
        let mut scene = SceneGraph::new();
        let palette = Palette::default();
        let root = scene.create_node("Root");
        let car = create_car(&mut scene, "Car", Vec2::ZERO, palette.red_car, &palette).unwrap();
        scene.add_child(root, car).unwrap();
        scene.node_mut(car).unwrap().set_rotation(90.0);

        let mut canvas: Canvas<HeadlessRenderer> = Canvas::new();
        canvas.set_root(Some(root));
        let body = find(&scene, root, "Car_Body");

        let mut drag = DragController::new(0.0);
        assert_eq!(drag.press(&scene, &mut canvas, Vec2::new(0.0, 1.0)), Some(body));
        drag.drag(&mut scene, Vec2::new(0.0, 3.0));

        let global = scene.global_transform(body).unwrap();
        assert!(global.position().abs_diff_eq(Vec2::new(0.0, 2.0), 1e-4));
    }

    #[test]
    fn test_press_falls_back_to_car_outline() {
        let (mut scene, mut canvas, root) = demo();
        let red = find(&scene, root, "RedCar");
        let body = find(&scene, root, "RedCar_Body");
        // move the body away so only the car's outline covers its origin
        scene
            .node_mut(body)
            .unwrap()
            .set_position(Vec2::new(0.0, 4.0));

        let mut drag = DragController::new(90.0);
        assert_eq!(drag.press(&scene, &mut canvas, Vec2::new(-1.0, 5.0)), Some(red));
        drag.drag(&mut scene, Vec2::new(0.0, 5.0));
        assert!(scene
            .node(red)
            .unwrap()
            .position()
            .abs_diff_eq(Vec2::new(0.0, 5.0), 1e-5));
    }
}

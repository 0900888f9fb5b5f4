//! # Canvas
//!
//! The canvas is the view over a [`SceneGraph`]: it knows which hierarchy to
//! show (the root), which extra shapes float outside that hierarchy (the
//! standalone shapes), and which node is selected. It never owns nodes; every
//! operation that needs geometry borrows the graph.
//!
//! Draw order and hit order mirror each other. Rendering walks the root tree in
//! pre-order and then the standalone shapes, so later nodes paint over earlier
//! ones. Hit testing checks standalone shapes newest first and then walks the
//! tree with children reversed, so the topmost painted shape wins.

pub mod mesh;
pub mod renderer;
pub mod viewport;

pub use mesh::{Mesh, CIRCLE_SEGMENTS};
pub use renderer::{DrawCommand, HeadlessRenderer, Renderer, ShapeDraw};
pub use viewport::{SceneViewport, DEFAULT_SCENE_WIDTH};

use glam::Vec2;
use log::{debug, trace, warn};
use scene_graph::{NodeId, SceneGraph};

/// Selection, root and standalone shapes for one scene view.
#[derive(Debug)]
pub struct Canvas<R: Renderer> {
    renderer: Option<R>,
    root: Option<NodeId>,
    /// Shapes outside the root hierarchy, in z-order (back to front)
    shapes: Vec<NodeId>,
    selected: Option<NodeId>,
}

impl<R: Renderer> Default for Canvas<R> {
    fn default() -> Self {
        Self {
            renderer: None,
            root: None,
            shapes: Vec::new(),
            selected: None,
        }
    }
}

impl<R: Renderer> Canvas<R> {
    /// Creates a canvas without a renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the renderer. Returns false, leaving the canvas untouched,
    /// when `renderer` is `None`.
    pub fn initialize(&mut self, renderer: impl Into<Option<R>>) -> bool {
        match renderer.into() {
            Some(renderer) => {
                self.renderer = Some(renderer);
                debug!("canvas initialized");
                true
            }
            None => {
                warn!("canvas initialize called without a renderer");
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    /// Sets the hierarchy shown by this canvas. `None` detaches the scene.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Registers a standalone shape on top of the existing ones.
    ///
    /// Ids already registered are ignored.
    pub fn add_shape(&mut self, id: NodeId) {
        if !self.shapes.contains(&id) {
            self.shapes.push(id);
        }
    }

    /// Unregisters a standalone shape. Absent ids are ignored.
    pub fn remove_shape(&mut self, id: NodeId) {
        self.shapes.retain(|shape| *shape != id);
    }

    /// Standalone shapes in insertion order
    pub fn shapes(&self) -> &[NodeId] {
        &self.shapes
    }

    /// Records the selection. The id is not checked against the scene.
    pub fn select_node(&mut self, id: Option<NodeId>) {
        if self.selected != id {
            trace!("selection changed to {id:?}");
        }
        self.selected = id;
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    /// Finds the topmost shape under the world-space `point`.
    ///
    /// Standalone shapes are checked first, newest to oldest, then the root
    /// hierarchy depth-first with children newest to oldest. The first
    /// containing shape wins.
    pub fn hit_test(&self, scene: &SceneGraph, point: Vec2) -> Option<NodeId> {
        let standalone = self.shapes.iter().rev().copied().find(|id| {
            scene.node(*id).is_some_and(|node| {
                let in_parent = scene.parent_global_transform(*id).inverse_transform_point(point);
                node.contains_point(in_parent)
            })
        });
        if standalone.is_some() {
            trace!("hit standalone shape {standalone:?} at {point}");
            return standalone;
        }

        let hit = self.root.and_then(|root| {
            let in_parent = scene
                .parent_global_transform(root)
                .inverse_transform_point(point);
            Self::hit_node(scene, root, in_parent)
        });
        trace!("hit test at {point}: {hit:?}");
        hit
    }

    /// `point` is expressed in the parent space of `id`
    fn hit_node(scene: &SceneGraph, id: NodeId, point: Vec2) -> Option<NodeId> {
        let node = scene.node(id)?;
        if node.contains_point(point) {
            return Some(id);
        }

        let local = node.local_transform().inverse_transform_point(point);
        node.children()
            .iter()
            .rev()
            .find_map(|child| Self::hit_node(scene, *child, local))
    }

    /// Draws one frame: the root hierarchy in pre-order, then the standalone
    /// shapes. Does nothing without a renderer.
    pub fn render(&mut self, scene: &SceneGraph) {
        self.render_with(scene, |_| {});
    }

    /// Like [`Canvas::render`], with `overlay` drawing on top of the scene
    /// before the frame ends.
    pub fn render_with(&mut self, scene: &SceneGraph, overlay: impl FnOnce(&mut R)) {
        let Some(renderer) = self.renderer.as_mut() else {
            trace!("render skipped, no renderer");
            return;
        };

        renderer.begin_frame();

        let tree = self
            .root
            .into_iter()
            .flat_map(|root| scene.depth_first(root).map(|(id, _)| id));
        for id in tree.chain(self.shapes.iter().copied()) {
            let Some(node) = scene.node(id) else {
                continue;
            };
            let Some(shape) = node.as_shape() else {
                continue;
            };
            let Some(global) = scene.global_transform(id) else {
                continue;
            };
            renderer.render_shape(&ShapeDraw {
                id,
                name: node.name(),
                shape,
                global,
                selected: self.selected == Some(id),
            });
        }

        overlay(renderer);
        renderer.end_frame();
    }

    /// Drops root, selection and standalone shapes. Nodes stay in the scene.
    pub fn clear(&mut self) {
        self.root = None;
        self.selected = None;
        self.shapes.clear();
    }

    /// Forgets ids that were removed from `scene`
    pub fn retain_live(&mut self, scene: &SceneGraph) {
        self.shapes.retain(|id| scene.contains(*id));
        if self.root.is_some_and(|id| !scene.contains(id)) {
            self.root = None;
        }
        if self.selected.is_some_and(|id| !scene.contains(id)) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Car {
        root: NodeId,
        car: NodeId,
        body: NodeId,
        wheel: NodeId,
        hubcap: NodeId,
    }

    fn car_scene(scene: &mut SceneGraph) -> Car {
        let root = scene.create_node("Root");
        let car = scene.create_node("Car");
        let body = scene.create_rectangle("Car_Body", Vec2::new(4.0, 1.5));
        let wheel = scene.create_circle("Car_FrontWheel", 0.6);
        let hubcap = scene.create_circle("Car_FrontHubcap", 0.24);
        scene
            .node_mut(wheel)
            .unwrap()
            .set_position(Vec2::new(1.5, -0.5));

        scene.add_child(root, car).unwrap();
        scene.add_child(car, body).unwrap();
        scene.add_child(car, wheel).unwrap();
        scene.add_child(wheel, hubcap).unwrap();

        Car {
            root,
            car,
            body,
            wheel,
            hubcap,
        }
    }

    fn initialized_canvas() -> Canvas<HeadlessRenderer> {
        let mut canvas = Canvas::new();
        assert!(canvas.initialize(HeadlessRenderer::new()));
        canvas
    }

    #[test]
    fn test_initialize_without_renderer() {
        let mut canvas: Canvas<HeadlessRenderer> = Canvas::new();
        assert!(!canvas.initialize(None));
        assert!(!canvas.is_initialized());

        // rendering without a renderer is a no-op
        canvas.render(&SceneGraph::new());
        assert!(canvas.renderer().is_none());
    }

    #[test]
    fn test_last_added_shape_wins() {
        let mut scene = SceneGraph::new();
        let first = scene.create_rectangle("R1", Vec2::new(2.0, 2.0));
        let second = scene.create_rectangle("R2", Vec2::new(2.0, 2.0));
        scene
            .node_mut(second)
            .unwrap()
            .set_position(Vec2::new(1.0, 0.0));

        let mut canvas = initialized_canvas();
        canvas.add_shape(first);
        canvas.add_shape(second);

        assert_eq!(canvas.hit_test(&scene, Vec2::new(0.5, 0.0)), Some(second));
        assert_eq!(canvas.hit_test(&scene, Vec2::new(-0.5, 0.0)), Some(first));
        assert_eq!(canvas.hit_test(&scene, Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_standalone_shapes_are_checked_before_the_tree() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        let overlay = scene.create_rectangle("Overlay", Vec2::new(1.0, 1.0));

        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));
        assert_eq!(canvas.hit_test(&scene, Vec2::ZERO), Some(car.body));

        canvas.add_shape(overlay);
        assert_eq!(canvas.hit_test(&scene, Vec2::ZERO), Some(overlay));

        // standalone shapes are hit even with no root
        canvas.set_root(None);
        assert_eq!(canvas.hit_test(&scene, Vec2::ZERO), Some(overlay));
    }

    #[test]
    fn test_later_children_win_inside_the_tree() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));

        // the wheel overlaps the body's corner and was added after it
        assert_eq!(
            canvas.hit_test(&scene, Vec2::new(1.9, -0.6)),
            Some(car.wheel)
        );
        assert_eq!(canvas.hit_test(&scene, Vec2::new(-1.0, 0.5)), Some(car.body));
    }

    #[test]
    fn test_nested_shapes_hit_at_world_position() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        scene
            .node_mut(car.car)
            .unwrap()
            .set_position(Vec2::new(10.0, 0.0));

        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));

        // the wheel contains its own hubcap, so the wheel is reported first
        assert_eq!(
            canvas.hit_test(&scene, Vec2::new(11.5, -0.5)),
            Some(car.wheel)
        );
        assert_eq!(
            canvas.hit_test(&scene, Vec2::new(12.05, -0.5)),
            Some(car.wheel)
        );
        assert_eq!(canvas.hit_test(&scene, Vec2::new(1.5, -0.5)), None);
    }

    #[test]
    fn test_hubcap_is_reachable_when_wheel_misses() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        // shrink the wheel so the hubcap pokes out past its rim
        scene
            .node_mut(car.wheel)
            .unwrap()
            .as_shape_mut()
            .unwrap()
            .set_radius(0.1);
        scene
            .node_mut(car.hubcap)
            .unwrap()
            .set_position(Vec2::new(0.5, 0.0));

        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));
        assert_eq!(
            canvas.hit_test(&scene, Vec2::new(2.0, -0.5)),
            Some(car.hubcap)
        );
    }

    #[test]
    fn test_render_order_and_selection() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        let overlay = scene.create_rectangle("Overlay", Vec2::ONE);

        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));
        canvas.add_shape(overlay);
        canvas.select_node(Some(car.wheel));
        canvas.render(&scene);

        let renderer = canvas.renderer().unwrap();
        assert_eq!(renderer.frames_completed(), 1);
        assert_eq!(
            renderer.drawn_shape_names(),
            vec!["Car_Body", "Car_FrontWheel", "Car_FrontHubcap", "Overlay"]
        );

        let selected: Vec<bool> = renderer
            .last_frame()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Shape { selected, .. } => Some(*selected),
                _ => None,
            })
            .collect();
        assert_eq!(selected, vec![false, true, false, false]);
    }

    #[test]
    fn test_overlay_draws_last_in_the_same_frame() {
        let mut scene = SceneGraph::new();
        let dot = scene.create_circle("Dot", 1.0);
        let mut canvas = initialized_canvas();
        canvas.add_shape(dot);

        canvas.render_with(&scene, |renderer| {
            renderer.draw_text("overlay", Vec2::ZERO, glam::Vec4::ONE);
        });

        let frame = canvas.renderer().unwrap().last_frame();
        assert_eq!(frame.len(), 2);
        assert!(matches!(&frame[0], DrawCommand::Shape { name, .. } if name == "Dot"));
        assert!(matches!(&frame[1], DrawCommand::Text { text, .. } if text == "overlay"));
    }

    #[test]
    fn test_add_shape_ignores_duplicates() {
        let mut scene = SceneGraph::new();
        let shape = scene.create_circle("Dot", 1.0);
        let mut canvas = initialized_canvas();

        canvas.add_shape(shape);
        canvas.add_shape(shape);
        assert_eq!(canvas.shapes(), &[shape]);

        canvas.remove_shape(shape);
        canvas.remove_shape(shape);
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_clear_keeps_nodes() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));
        canvas.add_shape(car.body);
        canvas.select_node(Some(car.body));

        canvas.clear();
        assert_eq!(canvas.root(), None);
        assert_eq!(canvas.selected_node(), None);
        assert!(canvas.shapes().is_empty());
        assert!(scene.contains(car.body));
        assert!(canvas.is_initialized());
    }

    #[test]
    fn test_retain_live_forgets_removed_ids() {
        let mut scene = SceneGraph::new();
        let car = car_scene(&mut scene);
        let mut canvas = initialized_canvas();
        canvas.set_root(Some(car.root));
        canvas.add_shape(car.hubcap);
        canvas.select_node(Some(car.wheel));

        scene.remove_node(car.wheel);
        canvas.retain_live(&scene);

        assert_eq!(canvas.root(), Some(car.root));
        assert_eq!(canvas.selected_node(), None);
        assert!(canvas.shapes().is_empty());

        canvas.render(&scene);
        assert_eq!(
            canvas.renderer().unwrap().drawn_shape_names(),
            vec!["Car_Body"]
        );
    }
}

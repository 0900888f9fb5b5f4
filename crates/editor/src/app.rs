//! The editor: scene, canvas, tree view and pointer handling wired together.

use canvas::{Canvas, Renderer, SceneViewport};
use glam::Vec2;
use log::{debug, info};
use scene_graph::{NodeId, SceneGraph};
use ui::TreeView;

use crate::config::EditorConfig;
use crate::demo;
use crate::interaction::DragController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}

pub struct Editor<R: Renderer> {
    config: EditorConfig,
    scene: SceneGraph,
    root: NodeId,
    canvas: Canvas<R>,
    tree_view: TreeView,
    drag: DragController,
    viewport: SceneViewport,
    show_tree_view: bool,
    /// Last pointer position in window pixels
    cursor: Vec2,
}

impl<R: Renderer> Editor<R> {
    /// Builds the demo scene and attaches `renderer` to the canvas
    pub fn new(config: EditorConfig, renderer: R) -> scene_graph::Result<Self> {
        let mut scene = SceneGraph::new();
        let root = demo::setup_scene(&mut scene, &config.palette)?;

        let viewport = SceneViewport::new(config.window.width, config.window.height)
            .with_scene_width(config.scene_width);

        let mut canvas = Canvas::new();
        canvas.initialize(renderer);
        canvas.set_root(Some(root));

        let mut tree_view = TreeView::new(config.tree_view, config.tree_view_colors);
        tree_view.set_root(Some(root));

        let mut editor = Self {
            drag: DragController::new(config.wheel_rotation_factor),
            config,
            scene,
            root,
            canvas,
            tree_view,
            viewport,
            show_tree_view: true,
            cursor: Vec2::ZERO,
        };
        editor.resize(editor.viewport.width, editor.viewport.height);
        info!(
            "{} ready with {} nodes",
            editor.config.window.title,
            editor.scene.len()
        );
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn canvas(&self) -> &Canvas<R> {
        &self.canvas
    }

    pub fn tree_view(&self) -> &TreeView {
        &self.tree_view
    }

    pub fn viewport(&self) -> &SceneViewport {
        &self.viewport
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.canvas.selected_node()
    }

    pub fn is_tree_view_visible(&self) -> bool {
        self.show_tree_view
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Window pixels to scene units
    pub fn window_to_scene(&self, x: f32, y: f32) -> Vec2 {
        self.viewport.window_to_scene(Vec2::new(x, y))
    }

    /// Updates the window size, the renderer viewport and the tree view bounds
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        if let Some(renderer) = self.canvas.renderer_mut() {
            renderer.set_viewport(self.viewport.width, self.viewport.height);
            renderer.set_clear_color(self.config.palette.clear);
        }

        let half = self.viewport.half_extents();
        self.tree_view.set_bounds(
            Vec2::new(-half.x, half.y),
            Vec2::new(self.config.tree_view.width, half.y * 2.0),
        );
    }

    pub fn toggle_tree_view(&mut self) {
        self.show_tree_view = !self.show_tree_view;
        debug!("tree view visible: {}", self.show_tree_view);
    }

    /// Pointer moved to window pixel `(x, y)`
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
        let point = self.viewport.window_to_scene(self.cursor);

        if self.tree_view.is_scrolling() {
            self.tree_view.update_scroll_drag(point);
        } else {
            self.drag.drag(&mut self.scene, point);
        }
    }

    /// Button event at the last pointer position. Only the left button is used.
    ///
    /// Presses inside the visible tree view select through it; other presses
    /// hit-test the canvas and may start a drag. Both keep the canvas and tree
    /// view selections in sync.
    pub fn handle_mouse_button(&mut self, button: MouseButton, action: ButtonAction) {
        if button != MouseButton::Left {
            return;
        }
        let point = self.viewport.window_to_scene(self.cursor);

        match action {
            ButtonAction::Press => {
                if self.show_tree_view && self.tree_view.contains_point(point) {
                    self.press_tree_view(point);
                } else {
                    let hit = self.drag.press(&self.scene, &mut self.canvas, point);
                    self.tree_view.set_selected_node(hit);
                }
            }
            ButtonAction::Release => {
                self.drag.release();
                self.tree_view.end_scroll_drag();
            }
        }
    }

    /// Scrolls the tree view by `amount` scene units
    pub fn handle_scroll(&mut self, amount: f32) {
        if self.show_tree_view {
            self.tree_view.scroll(amount);
        }
    }

    fn press_tree_view(&mut self, point: Vec2) {
        if self.tree_view.is_point_in_scroll_bar(point) {
            self.tree_view.start_scroll_drag(point);
            return;
        }

        self.tree_view.layout(&self.scene);
        if let Some(id) = self.tree_view.select_at(point) {
            self.canvas.select_node(Some(id));
        }
    }

    /// Removes a node and its subtree, dropping any reference the views hold
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        if self.drag.grabbed().is_some_and(|grabbed| self.scene.is_ancestor(id, grabbed)) {
            self.drag.release();
        }
        let removed = self.scene.remove_node(id).is_some();
        self.canvas.retain_live(&self.scene);
        if self
            .tree_view
            .selected_node()
            .is_some_and(|selected| !self.scene.contains(selected))
        {
            self.tree_view.set_selected_node(None);
        }
        removed
    }

    /// Draws the scene and, when visible, the tree view on top
    pub fn render_frame(&mut self) {
        let Self {
            scene,
            canvas,
            tree_view,
            show_tree_view,
            ..
        } = self;

        canvas.render_with(scene, |renderer| {
            if *show_tree_view {
                tree_view.render(scene, renderer);
            }
        });
    }
}

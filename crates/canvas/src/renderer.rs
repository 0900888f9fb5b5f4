//! Renderer boundary used by the canvas and the tree view.
//!
//! The canvas only decides *what* to draw and in which order; a [`Renderer`]
//! decides how. [`HeadlessRenderer`] records every call as a [`DrawCommand`],
//! which is what tests and the command line tool run against.

use glam::{Mat4, Vec2, Vec3, Vec4};
use log::trace;
use scene_graph::{NodeId, Shape, ShapeKind, Transform};

/// Everything a renderer needs to draw one shape node.
#[derive(Clone, Copy, Debug)]
pub struct ShapeDraw<'a> {
    pub id: NodeId,
    pub name: &'a str,
    pub shape: &'a Shape,
    /// Composed transform of the node and all its ancestors
    pub global: Transform,
    /// Whether this node is the canvas selection
    pub selected: bool,
}

impl ShapeDraw<'_> {
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn color(&self) -> Vec4 {
        self.shape.color
    }

    /// Matrix that maps the unit mesh of this shape's kind into world space.
    ///
    /// `global * scale(size)` for rectangles, `global * scale(2r)` for circles.
    pub fn model_matrix(&self) -> Mat4 {
        let size = self.shape.geometry.unit_scale();
        self.global.matrix() * Mat4::from_scale(Vec3::new(size.x, size.y, 1.0))
    }
}

/// Drawing surface consumed by the canvas and the tree view.
///
/// Coordinates are scene units; the renderer owns the projection to pixels.
pub trait Renderer {
    /// Color the next frames start from
    fn set_clear_color(&mut self, color: Vec4);

    fn begin_frame(&mut self);

    fn end_frame(&mut self);

    /// Window size in pixels
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Draws a shape node, dispatching on its kind
    fn render_shape(&mut self, draw: &ShapeDraw<'_>);

    /// Axis-aligned filled rectangle with `origin` at its lower-left corner
    fn draw_rectangle(&mut self, origin: Vec2, size: Vec2, color: Vec4);

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Vec4, thickness: f32);

    fn draw_text(&mut self, text: &str, position: Vec2, color: Vec4);
}

/// A recorded renderer call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Shape {
        id: NodeId,
        name: String,
        kind: ShapeKind,
        model: Mat4,
        color: Vec4,
        selected: bool,
    },
    Rectangle {
        origin: Vec2,
        size: Vec2,
        color: Vec4,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Vec4,
        thickness: f32,
    },
    Text {
        text: String,
        position: Vec2,
        color: Vec4,
    },
}

/// Renderer that draws nothing and records every call.
///
/// Commands accumulate between `begin_frame` and `end_frame`; the finished
/// frame is then available from [`HeadlessRenderer::last_frame`].
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    viewport: (u32, u32),
    clear_color: Vec4,
    /// Clear color the last completed frame started from
    last_clear: Vec4,
    frames_completed: usize,
    in_frame: bool,
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn last_frame_clear_color(&self) -> Vec4 {
        self.last_clear
    }

    pub fn frames_completed(&self) -> usize {
        self.frames_completed
    }

    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }

    /// Commands of the most recently completed frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Commands recorded so far in the open frame
    pub fn pending(&self) -> &[DrawCommand] {
        &self.current
    }

    /// Names of the shapes drawn in the last frame, in draw order
    pub fn drawn_shape_names(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Shape { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        trace!("record {command:?}");
        self.current.push(command);
    }
}

impl Renderer for HeadlessRenderer {
    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    fn begin_frame(&mut self) {
        self.in_frame = true;
        self.current.clear();
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.last_frame = std::mem::take(&mut self.current);
        self.last_clear = self.clear_color;
        self.frames_completed += 1;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn render_shape(&mut self, draw: &ShapeDraw<'_>) {
        self.record(DrawCommand::Shape {
            id: draw.id,
            name: draw.name.to_string(),
            kind: draw.kind(),
            model: draw.model_matrix(),
            color: draw.color(),
            selected: draw.selected,
        });
    }

    fn draw_rectangle(&mut self, origin: Vec2, size: Vec2, color: Vec4) {
        self.record(DrawCommand::Rectangle {
            origin,
            size,
            color,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Vec4, thickness: f32) {
        self.record(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Vec4) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
        });
    }
}

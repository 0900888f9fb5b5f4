//! Scene hierarchy panel.
//!
//! Lists the nodes under a root as indented rows, one per node in pre-order,
//! and lets the user pick a node by clicking its row. The panel is laid out in
//! scene units (y up) so it can share the canvas renderer and the canvas
//! coordinate conversion.

use canvas::Renderer;
use glam::{Vec2, Vec4};
use log::{debug, trace};
use scene_graph::{NodeId, NodeKind, SceneGraph, ShapeKind};
use serde::{Deserialize, Serialize};

const TITLE: &str = "Scene Graph";
const EPSILON: f32 = 1e-4;

/// Sizes used to lay out the panel, in scene units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewLayout {
    /// Panel width
    pub width: f32,
    /// Space reserved above the rows for the title and separator
    pub header_height: f32,
    /// Horizontal offset per hierarchy level
    pub indent: f32,
    /// Distance between the tops of consecutive rows
    pub row_spacing: f32,
    pub row_height: f32,
    pub padding: f32,
    /// Baseline offset of a row label from the row bottom
    pub text_offset: f32,
    pub line_thickness: f32,
    pub scroll_bar_width: f32,
    pub scroll_bar_min_height: f32,
}

impl Default for TreeViewLayout {
    fn default() -> Self {
        Self {
            width: 6.0,
            header_height: 1.0,
            indent: 0.2,
            row_spacing: 0.8,
            row_height: 0.7,
            padding: 0.2,
            text_offset: 0.1,
            line_thickness: 0.02,
            scroll_bar_width: 0.2,
            scroll_bar_min_height: 0.5,
        }
    }
}

/// Panel colors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewColors {
    pub background: Vec4,
    pub text: Vec4,
    /// Separator and connector lines, scroll bar track
    pub line: Vec4,
    /// Highlight behind the selected row
    pub selected: Vec4,
    pub scroll_thumb: Vec4,
}

impl Default for TreeViewColors {
    fn default() -> Self {
        Self {
            background: Vec4::new(0.12, 0.14, 0.17, 1.0),
            text: Vec4::new(0.93, 0.94, 0.95, 1.0),
            line: Vec4::new(0.6, 0.6, 0.6, 0.8),
            selected: Vec4::new(0.3, 0.6, 1.0, 1.0),
            scroll_thumb: Vec4::new(0.93, 0.94, 0.95, 0.6),
        }
    }
}

/// One laid out node.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
    /// Index of the parent's row, `None` for the root
    pub parent_row: Option<usize>,
    pub label: String,
    /// Lower-left corner of the row, after indentation and scrolling
    pub origin: Vec2,
    pub size: Vec2,
}

impl TreeRow {
    fn top(&self) -> f32 {
        self.origin.y + self.size.y
    }

    fn middle(&self) -> f32 {
        self.origin.y + self.size.y / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct ScrollDrag {
    anchor_y: f32,
    start_position: f32,
}

/// Hierarchy panel anchored at a top-left corner in scene space.
#[derive(Debug)]
pub struct TreeView {
    root: Option<NodeId>,
    selected: Option<NodeId>,
    layout: TreeViewLayout,
    colors: TreeViewColors,
    /// Top-left corner of the panel
    origin: Vec2,
    size: Vec2,
    rows: Vec<TreeRow>,
    scroll_position: f32,
    content_height: f32,
    scroll_drag: Option<ScrollDrag>,
}

impl Default for TreeView {
    fn default() -> Self {
        Self::new(TreeViewLayout::default(), TreeViewColors::default())
    }
}

impl TreeView {
    /// Creates a panel covering the left edge of a 20x15 scene
    pub fn new(layout: TreeViewLayout, colors: TreeViewColors) -> Self {
        Self {
            root: None,
            selected: None,
            layout,
            colors,
            origin: Vec2::new(-10.0, 7.5),
            size: Vec2::new(layout.width, 15.0),
            rows: Vec::new(),
            scroll_position: 0.0,
            content_height: 0.0,
            scroll_drag: None,
        }
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        self.rows.clear();
        self.content_height = 0.0;
        self.scroll_position = 0.0;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected_node(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    /// Places the panel with its top-left corner at `origin`
    pub fn set_bounds(&mut self, origin: Vec2, size: Vec2) {
        self.origin = origin;
        self.size = size;
        self.clamp_scroll();
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.origin, self.size)
    }

    pub fn layout_config(&self) -> &TreeViewLayout {
        &self.layout
    }

    pub fn colors(&self) -> &TreeViewColors {
        &self.colors
    }

    /// Rows from the last [`TreeView::layout`]
    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Height available to rows below the header
    pub fn visible_height(&self) -> f32 {
        (self.size.y - self.layout.header_height).max(0.0)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.visible_height()).max(0.0)
    }

    /// True iff `point` lies inside the panel
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x <= self.right()
            && point.y <= self.origin.y
            && point.y >= self.bottom()
    }

    /// Rebuilds the rows from `scene`, one per node in pre-order below the root.
    pub fn layout(&mut self, scene: &SceneGraph) -> &[TreeRow] {
        self.rows.clear();

        if let Some(root) = self.root {
            let list_top = self.list_top();
            let row_right = self.right() - self.layout.scroll_bar_width - self.layout.padding;
            // row index of the most recent node at each depth
            let mut last_at_depth: Vec<usize> = Vec::new();

            for (id, depth) in scene.depth_first(root) {
                let Some(node) = scene.node(id) else {
                    continue;
                };
                let index = self.rows.len();
                let parent_row = depth
                    .checked_sub(1)
                    .and_then(|parent| last_at_depth.get(parent).copied());
                last_at_depth.truncate(depth);
                last_at_depth.push(index);

                let top = list_top - index as f32 * self.layout.row_spacing + self.scroll_position;
                let x = self.origin.x + self.layout.padding + depth as f32 * self.layout.indent;
                self.rows.push(TreeRow {
                    id,
                    depth,
                    parent_row,
                    label: format!("{} {}", kind_marker(node.kind()), node.name()),
                    origin: Vec2::new(x, top - self.layout.row_height),
                    size: Vec2::new((row_right - x).max(0.0), self.layout.row_height),
                });
            }
        }

        self.content_height = self.rows.len() as f32 * self.layout.row_spacing;
        let before = self.scroll_position;
        self.clamp_scroll();
        self.shift_rows(self.scroll_position - before);

        &self.rows
    }

    /// Selects the node whose row is under `point`.
    ///
    /// Uses the rows of the last layout. A miss leaves the selection as it was.
    pub fn select_at(&mut self, point: Vec2) -> Option<NodeId> {
        if !self.contains_point(point) || point.y > self.list_top() {
            return None;
        }
        if point.x > self.right() - self.layout.scroll_bar_width {
            return None;
        }

        let id = self
            .rows
            .iter()
            .filter(|row| self.is_row_visible(row))
            .find(|row| point.y >= row.origin.y && point.y <= row.top())
            .map(|row| row.id)?;

        debug!("tree view selected node {id}");
        self.selected = Some(id);
        Some(id)
    }

    /// Scrolls by `amount` scene units; positive values move down the list.
    pub fn scroll(&mut self, amount: f32) {
        let before = self.scroll_position;
        self.scroll_position += amount;
        self.clamp_scroll();
        self.shift_rows(self.scroll_position - before);
    }

    pub fn has_scroll_bar(&self) -> bool {
        self.content_height > self.visible_height() + EPSILON
    }

    pub fn is_point_in_scroll_bar(&self, point: Vec2) -> bool {
        let (origin, size) = self.scroll_track();
        self.has_scroll_bar()
            && point.x >= origin.x
            && point.x <= origin.x + size.x
            && point.y >= origin.y
            && point.y <= origin.y + size.y
    }

    pub fn start_scroll_drag(&mut self, position: Vec2) {
        trace!("scroll drag started at {position}");
        self.scroll_drag = Some(ScrollDrag {
            anchor_y: position.y,
            start_position: self.scroll_position,
        });
    }

    /// Moves the list so the thumb follows the pointer
    pub fn update_scroll_drag(&mut self, position: Vec2) {
        let Some(drag) = self.scroll_drag else {
            return;
        };
        let (_, thumb_size) = self.scroll_thumb();
        let travel = self.visible_height() - thumb_size.y;
        if travel <= EPSILON {
            return;
        }

        let target = drag.start_position + (drag.anchor_y - position.y) * self.max_scroll() / travel;
        let before = self.scroll_position;
        self.scroll_position = target;
        self.clamp_scroll();
        self.shift_rows(self.scroll_position - before);
    }

    pub fn end_scroll_drag(&mut self) {
        self.scroll_drag = None;
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll_drag.is_some()
    }

    /// Scroll bar thumb as (lower-left corner, size)
    pub fn scroll_thumb(&self) -> (Vec2, Vec2) {
        let visible = self.visible_height();
        let height = if self.content_height > 0.0 {
            (visible * visible / self.content_height)
                .max(self.layout.scroll_bar_min_height)
                .min(visible)
        } else {
            visible
        };
        let travel = visible - height;
        let progress = match self.max_scroll() {
            max if max > 0.0 => self.scroll_position / max,
            _ => 0.0,
        };
        let top = self.list_top() - progress * travel;
        (
            Vec2::new(self.right() - self.layout.scroll_bar_width, top - height),
            Vec2::new(self.layout.scroll_bar_width, height),
        )
    }

    /// Lays out and draws the panel.
    ///
    /// Does not open or close a frame; call inside the caller's frame.
    pub fn render<R: Renderer + ?Sized>(&mut self, scene: &SceneGraph, renderer: &mut R) {
        self.layout(scene);

        let layout = self.layout;
        let colors = self.colors;
        let list_top = self.list_top();

        renderer.draw_rectangle(
            Vec2::new(self.origin.x, self.bottom()),
            self.size,
            colors.background,
        );
        renderer.draw_text(
            TITLE,
            Vec2::new(
                self.origin.x + layout.padding,
                list_top + layout.header_height / 2.0,
            ),
            colors.text,
        );
        renderer.draw_line(
            Vec2::new(self.origin.x + layout.padding, list_top),
            Vec2::new(self.right() - layout.padding, list_top),
            colors.line,
            layout.line_thickness,
        );

        for row in self.rows.iter().filter(|row| self.is_row_visible(row)) {
            if self.selected == Some(row.id) {
                renderer.draw_rectangle(
                    Vec2::new(self.origin.x, row.origin.y),
                    Vec2::new(self.size.x - layout.scroll_bar_width, row.size.y),
                    colors.selected,
                );
            }

            if let Some(parent) = row.parent_row.and_then(|index| self.rows.get(index)) {
                let x = parent.origin.x + layout.indent / 2.0;
                let from = parent.origin.y.min(list_top);
                let middle = row.middle();
                renderer.draw_line(
                    Vec2::new(x, from),
                    Vec2::new(x, middle),
                    colors.line,
                    layout.line_thickness,
                );
                renderer.draw_line(
                    Vec2::new(x, middle),
                    Vec2::new(row.origin.x, middle),
                    colors.line,
                    layout.line_thickness,
                );
            }

            renderer.draw_text(
                &row.label,
                Vec2::new(row.origin.x, row.origin.y + layout.text_offset),
                colors.text,
            );
        }

        if self.has_scroll_bar() {
            let (track_origin, track_size) = self.scroll_track();
            renderer.draw_rectangle(track_origin, track_size, colors.line);
            let (thumb_origin, thumb_size) = self.scroll_thumb();
            renderer.draw_rectangle(thumb_origin, thumb_size, colors.scroll_thumb);
        }
    }

    fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    fn bottom(&self) -> f32 {
        self.origin.y - self.size.y
    }

    fn list_top(&self) -> f32 {
        self.origin.y - self.layout.header_height
    }

    fn scroll_track(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.right() - self.layout.scroll_bar_width, self.bottom()),
            Vec2::new(self.layout.scroll_bar_width, self.visible_height()),
        )
    }

    fn is_row_visible(&self, row: &TreeRow) -> bool {
        row.top() <= self.list_top() + EPSILON && row.origin.y >= self.bottom() - EPSILON
    }

    fn clamp_scroll(&mut self) {
        self.scroll_position = self.scroll_position.clamp(0.0, self.max_scroll());
    }

    fn shift_rows(&mut self, shift: f32) {
        for row in &mut self.rows {
            row.origin.y += shift;
        }
    }
}

fn kind_marker(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Group => "▣",
        NodeKind::Shape(shape) => match shape.kind() {
            ShapeKind::Rectangle => "▢",
            ShapeKind::Circle => "○",
        },
    }
}

//! Drawable geometry attached to scene nodes.
//!
//! Shapes are a closed set: every renderer matches on [`Geometry`]
//! exhaustively, so adding a kind is a compile-checked change.

use glam::{Vec2, Vec4};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Default circle radius in local units
pub const DEFAULT_CIRCLE_RADIUS: f32 = 0.5;

/// Opaque white
pub const DEFAULT_COLOR: Vec4 = Vec4::ONE;

/// The kind of shape, without its geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// Geometry in the shape's own untransformed local space, centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box of `size` (width, height)
    Rectangle { size: Vec2 },
    /// Disc of `radius`
    Circle { radius: f32 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Tests a point already expressed in local space. Boundaries are inclusive.
    pub fn contains_local(&self, local: Vec2) -> bool {
        match *self {
            Geometry::Rectangle { size } => {
                local.x.abs() <= size.x / 2.0 && local.y.abs() <= size.y / 2.0
            }
            Geometry::Circle { radius } => local.length() <= radius,
        }
    }

    /// Scale that maps the unit mesh (side or diameter 1) onto this geometry
    pub fn unit_scale(&self) -> Vec2 {
        match *self {
            Geometry::Rectangle { size } => size,
            Geometry::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }
}

/// Colored geometry carried by a shape node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    /// RGBA, each channel in `[0, 1]`
    pub color: Vec4,
    pub geometry: Geometry,
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            color: DEFAULT_COLOR,
            geometry,
        }
    }

    /// A rectangle of the given size
    pub fn rectangle(size: Vec2) -> Self {
        Self::new(Geometry::Rectangle { size })
    }

    /// A circle of the given radius
    pub fn circle(radius: f32) -> Self {
        Self::new(Geometry::Circle { radius })
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Rectangle size, if this is a rectangle
    pub fn size(&self) -> Option<Vec2> {
        match self.geometry {
            Geometry::Rectangle { size } => Some(size),
            Geometry::Circle { .. } => None,
        }
    }

    /// Circle radius, if this is a circle
    pub fn radius(&self) -> Option<f32> {
        match self.geometry {
            Geometry::Circle { radius } => Some(radius),
            Geometry::Rectangle { .. } => None,
        }
    }

    /// Replaces the rectangle size. Returns `false` for circles.
    pub fn set_size(&mut self, size: Vec2) -> bool {
        match &mut self.geometry {
            Geometry::Rectangle { size: current } => {
                *current = size;
                true
            }
            Geometry::Circle { .. } => false,
        }
    }

    /// Replaces the circle radius. Returns `false` for rectangles.
    pub fn set_radius(&mut self, radius: f32) -> bool {
        match &mut self.geometry {
            Geometry::Circle { radius: current } => {
                *current = radius;
                true
            }
            Geometry::Rectangle { .. } => false,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::rectangle(Vec2::ONE)
    }
}

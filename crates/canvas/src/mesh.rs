//! Unit meshes for the shape kinds.
//!
//! Both meshes are centered on the origin with extent 1 (a 1x1 square and a
//! disc of diameter 1). A renderer scales them by [`Geometry::unit_scale`] and
//! then by the shape's global matrix.
//!
//! [`Geometry::unit_scale`]: scene_graph::Geometry::unit_scale

use glam::{Mat4, Vec2, Vec4};
use scene_graph::ShapeKind;
use std::f32::consts::TAU;

/// Number of segments used to approximate a circle
pub const CIRCLE_SEGMENTS: usize = 32;

/// Indexed triangle list in local 2D space.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// 1x1 square as two triangles
    pub fn unit_rectangle() -> Self {
        Self {
            vertices: vec![
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Disc of diameter 1 as a triangle fan around the center vertex.
    ///
    /// `segments` is clamped to at least 3.
    pub fn unit_circle(segments: usize) -> Self {
        let segments = segments.max(3);

        let mut vertices = Vec::with_capacity(segments + 1);
        vertices.push(Vec2::ZERO);
        vertices.extend((0..segments).map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            Vec2::new(angle.cos(), angle.sin()) * 0.5
        }));

        let mut indices = Vec::with_capacity(segments * 3);
        for i in 0..segments as u32 {
            indices.extend_from_slice(&[0, i + 1, (i + 1) % segments as u32 + 1]);
        }

        Self { vertices, indices }
    }

    /// The unit mesh for `kind`
    pub fn for_kind(kind: ShapeKind, circle_segments: usize) -> Self {
        match kind {
            ShapeKind::Rectangle => Self::unit_rectangle(),
            ShapeKind::Circle => Self::unit_circle(circle_segments),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices mapped through `model`
    pub fn transformed(&self, model: &Mat4) -> Vec<Vec2> {
        self.vertices
            .iter()
            .map(|vertex| {
                let world = *model * Vec4::new(vertex.x, vertex.y, 0.0, 1.0);
                Vec2::new(world.x, world.y)
            })
            .collect()
    }

    /// Axis-aligned bounds of the vertices mapped through `model`, as (min, max)
    pub fn bounds(&self, model: &Mat4) -> Option<(Vec2, Vec2)> {
        let vertices = self.transformed(model);
        let first = *vertices.first()?;
        Some(
            vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

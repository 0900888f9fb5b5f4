//! 2D affine transformation for scene nodes
//!
//! A [`Transform`] stores position, rotation and scale and keeps the derived
//! 4x4 matrix in sync. The matrix is embedded in homogeneous 4x4 form so it can
//! be handed straight to a GPU backend as a model matrix.
//!
//! Matrices are always built in SRT order: scale first, then rotate, then
//! translate (`M = T * R * S`). A child attached to a rotated parent therefore
//! spins around its own origin before it is placed in the parent's space.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::angle::{normalize_degrees, wrap_angle};

/// Scale below which rotation cannot be recovered from a matrix.
const MIN_DECOMPOSE_SCALE: f32 = 1e-4;

/// Position, rotation and scale of a node relative to its parent.
///
/// Rotation is exposed in degrees normalized to `[0, 360)` and stored in
/// radians. Every setter rebuilds the cached matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vec2,
    /// Radians.
    rotation: f32,
    scale: Vec2,
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates an identity transform: origin, no rotation, unit scale
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            matrix: Mat4::IDENTITY,
        }
    }

    /// Creates a transform from its components, rotation given in degrees
    pub fn new(position: Vec2, rotation_degrees: f32, scale: Vec2) -> Self {
        let mut transform = Self {
            position,
            rotation: normalize_degrees(rotation_degrees).to_radians(),
            scale,
            matrix: Mat4::IDENTITY,
        };
        transform.update_matrix();
        transform
    }

    /// Creates a transform with only translation
    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0, Vec2::ONE)
    }

    /// Creates a transform by decomposing `matrix`, see [`Transform::set_matrix`]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let mut transform = Self::identity();
        transform.set_matrix(matrix);
        transform
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_matrix();
    }

    /// Rotation in degrees, normalized to `[0, 360)`
    pub fn rotation(&self) -> f32 {
        normalize_degrees(self.rotation.to_degrees())
    }

    /// Rotation in radians as stored
    pub fn rotation_radians(&self) -> f32 {
        self.rotation
    }

    /// Sets the rotation in degrees. Any value is accepted and wrapped into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees).to_radians();
        self.update_matrix();
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sets the scale. Zero or negative components are legal and produce a
    /// degenerate or mirrored matrix.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.update_matrix();
    }

    /// The cached `T * R * S` matrix
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Replaces the matrix and decomposes it into position, rotation and scale.
    ///
    /// The decomposition assumes `matrix` is a pure SRT composition:
    /// - position is the translation column
    /// - scale is the length of the first and second basis columns
    /// - rotation is read from the normalized first basis column, or `0` when
    ///   the x scale is too small to normalize
    ///
    /// The given matrix is kept as-is, so a matrix carrying shear still maps
    /// points exactly; the decomposed fields are lossy in that case.
    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;

        self.position = Vec2::new(matrix.w_axis.x, matrix.w_axis.y);

        let x_basis = Vec2::new(matrix.x_axis.x, matrix.x_axis.y);
        let y_basis = Vec2::new(matrix.y_axis.x, matrix.y_axis.y);
        self.scale = Vec2::new(x_basis.length(), y_basis.length());

        self.rotation = if self.scale.x > MIN_DECOMPOSE_SCALE {
            let cos_theta = x_basis.x / self.scale.x;
            let sin_theta = x_basis.y / self.scale.x;
            sin_theta.atan2(cos_theta)
        } else {
            0.0
        };
    }

    /// Returns the inverse transformation, decomposed from the inverse matrix
    pub fn inverse(&self) -> Transform {
        Transform::from_matrix(self.matrix.inverse())
    }

    /// Maps a point from this transform's local space into its parent space
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        let transformed = self.matrix * Vec4::new(point.x, point.y, 0.0, 1.0);
        Vec2::new(transformed.x, transformed.y)
    }

    /// Maps a point from parent space back into this transform's local space.
    ///
    /// Used to bring a world-space click into a shape's own geometry space.
    pub fn inverse_transform_point(&self, point: Vec2) -> Vec2 {
        let transformed = self.matrix.inverse() * Vec4::new(point.x, point.y, 0.0, 1.0);
        Vec2::new(transformed.x, transformed.y)
    }

    /// Composes `parent` and `child` into a single transform.
    ///
    /// Applying the result to a point is the same as applying `child` first and
    /// then `parent`: `result.matrix = parent.matrix * child.matrix`.
    pub fn combine(parent: &Transform, child: &Transform) -> Transform {
        Transform::from_matrix(parent.matrix * child.matrix)
    }

    /// Interpolates componentwise between `start` and `end`.
    ///
    /// Position and scale are interpolated linearly. Rotation follows the
    /// shortest arc: 170° to 190° passes through 180°, not through 0°.
    pub fn interpolate(start: &Transform, end: &Transform, factor: f32) -> Transform {
        let from = wrap_angle(start.rotation);
        let delta = wrap_angle(wrap_angle(end.rotation) - from);

        let mut result = Transform {
            position: start.position.lerp(end.position, factor),
            rotation: wrap_angle(from + delta * factor),
            scale: start.scale.lerp(end.scale, factor),
            matrix: Mat4::IDENTITY,
        };
        result.update_matrix();
        result
    }

    /// Maps `point` from `child` local space through `parent` into the
    /// parent's parent space: `parent.transform_point(child.transform_point(point))`
    pub fn local_to_global_coordinates(parent: &Transform, child: &Transform, point: Vec2) -> Vec2 {
        parent.transform_point(child.transform_point(point))
    }

    /// Inverse of [`Transform::local_to_global_coordinates`]
    pub fn global_to_local_coordinates(parent: &Transform, child: &Transform, point: Vec2) -> Vec2 {
        child.inverse_transform_point(parent.inverse_transform_point(point))
    }

    fn update_matrix(&mut self) {
        let scale = Mat4::from_scale(Vec3::new(self.scale.x, self.scale.y, 1.0));
        let rotation = Mat4::from_rotation_z(self.rotation);
        let translation = Mat4::from_translation(self.position.extend(0.0));
        self.matrix = translation * rotation * scale;
    }
}

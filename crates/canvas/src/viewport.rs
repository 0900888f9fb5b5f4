use glam::{Mat4, Vec2};

/// Logical width of the visible scene in scene units
pub const DEFAULT_SCENE_WIDTH: f32 = 20.0;

/// Mapping between window pixels and the fixed orthographic scene box.
///
/// The scene is `scene_width` units wide with its origin at the window center
/// and +y pointing up. Its height follows the window aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneViewport {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Visible scene width in scene units
    pub scene_width: f32,
}

impl Default for SceneViewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SceneViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scene_width: DEFAULT_SCENE_WIDTH,
        }
    }

    pub fn with_scene_width(mut self, scene_width: f32) -> Self {
        self.scene_width = scene_width;
        self
    }

    /// Resize to a new window size. Zero sizes are clamped to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Visible scene height in scene units
    pub fn scene_height(&self) -> f32 {
        self.scene_width * self.height as f32 / self.width as f32
    }

    /// Half extents of the visible scene box
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height()) / 2.0
    }

    /// Convert a window pixel position to scene coordinates.
    ///
    /// `x = px / w * scene_w - scene_w / 2`, `y = scene_h / 2 - py / h * scene_h`
    pub fn window_to_scene(&self, pixel: Vec2) -> Vec2 {
        let scene_height = self.scene_height();
        Vec2::new(
            pixel.x / self.width as f32 * self.scene_width - self.scene_width / 2.0,
            scene_height / 2.0 - pixel.y / self.height as f32 * scene_height,
        )
    }

    /// Convert a scene position back to window pixels
    pub fn scene_to_window(&self, scene: Vec2) -> Vec2 {
        let scene_height = self.scene_height();
        Vec2::new(
            (scene.x + self.scene_width / 2.0) / self.scene_width * self.width as f32,
            (scene_height / 2.0 - scene.y) / scene_height * self.height as f32,
        )
    }

    /// Orthographic projection from the scene box to clip space
    pub fn projection(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_window_center_is_scene_origin() {
        let viewport = SceneViewport::new(800, 600);
        assert!(viewport
            .window_to_scene(Vec2::new(400.0, 300.0))
            .abs_diff_eq(Vec2::ZERO, 1e-5));
    }

    #[test]
    fn test_window_corners() {
        let viewport = SceneViewport::new(800, 600);
        assert_eq!(viewport.scene_height(), 15.0);

        // top-left pixel is the top-left of the scene, y flipped
        assert!(viewport
            .window_to_scene(Vec2::ZERO)
            .abs_diff_eq(Vec2::new(-10.0, 7.5), 1e-5));
        assert!(viewport
            .window_to_scene(Vec2::new(800.0, 600.0))
            .abs_diff_eq(Vec2::new(10.0, -7.5), 1e-5));
    }

    #[test]
    fn test_round_trip() {
        let viewport = SceneViewport::new(1024, 768).with_scene_width(30.0);
        let pixel = Vec2::new(123.0, 456.0);
        let back = viewport.scene_to_window(viewport.window_to_scene(pixel));
        assert!(back.abs_diff_eq(pixel, 1e-3));
    }

    #[test]
    fn test_resize_clamps_zero() {
        let mut viewport = SceneViewport::default();
        viewport.resize(0, 0);
        assert_eq!((viewport.width, viewport.height), (1, 1));
        assert!(viewport.scene_height().is_finite());
    }

    #[test]
    fn test_projection_maps_scene_box_to_clip_space() {
        let viewport = SceneViewport::new(800, 600);
        let corner = viewport.projection() * Vec4::new(10.0, 7.5, 0.0, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }
}

//! Camera for primary ray generation.
//!
//! The camera is a world-space screen rectangle plus a view point behind it.
//! `position` is the screen's lower-left corner; every primary ray starts on
//! the screen and points away from the view point, which gives perspective.

use rtx_math::{Point3, Ray, Vec3, VecExt};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    // Screen placement
    position: Point3,
    vertical: Vec3,
    horizontal: Vec3,

    // Screen size in scene units and view point distance behind it
    width: f32,
    height: f32,
    screen_dist: f32,

    // Derived from the above (set by update())
    screen_center: Point3,
    view_point: Point3,
}

impl Camera {
    /// A camera whose screen spans `width` along `horizontal` and `height`
    /// along `vertical` from `position`.
    ///
    /// Both basis vectors are normalized; the view point sits `screen_dist`
    /// behind the screen center along `vertical x horizontal`.
    pub fn new(
        position: Point3,
        vertical: Vec3,
        horizontal: Vec3,
        width: f32,
        height: f32,
        screen_dist: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            vertical: vertical.unit(),
            horizontal: horizontal.unit(),
            width,
            height,
            screen_dist,
            screen_center: position,
            view_point: position,
        };
        camera.update();
        camera
    }

    fn update(&mut self) {
        self.screen_center =
            self.position + self.vertical * (self.height / 2.0) + self.horizontal * (self.width / 2.0);
        self.view_point = self.screen_center + self.view_plane_normal() * self.screen_dist;
    }

    /// Unit normal of the screen, pointing from the screen to the view point.
    pub fn view_plane_normal(&self) -> Vec3 {
        self.vertical.cross(self.horizontal).unit()
    }

    /// Point on the screen at normalized coordinates; `(0, 0)` is the
    /// lower-left corner and `(1, 1)` the upper-right.
    pub fn screen_point(&self, u: f32, v: f32) -> Point3 {
        self.position + self.horizontal * (u * self.width) + self.vertical * (v * self.height)
    }

    /// Primary ray through the screen at `(u, v)`.
    pub fn ray(&self, u: f32, v: f32) -> Ray {
        let origin = self.screen_point(u, v);
        Ray::new(origin, (origin - self.view_point).unit())
    }

    // Navigation

    pub fn move_x(&mut self, offset: f32) {
        self.translate(Vec3::X * offset);
    }

    pub fn move_y(&mut self, offset: f32) {
        self.translate(Vec3::Y * offset);
    }

    pub fn move_z(&mut self, offset: f32) {
        self.translate(Vec3::Z * offset);
    }

    /// Pan along the screen's horizontal axis.
    pub fn strafe(&mut self, offset: f32) {
        self.translate(self.horizontal * offset);
    }

    /// Pan along the screen's vertical axis.
    pub fn rise(&mut self, offset: f32) {
        self.translate(self.vertical * offset);
    }

    fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.screen_center += offset;
        self.view_point += offset;
    }

    /// Yaw: rotate the horizontal axis about the vertical one.
    pub fn turn_horizontal(&mut self, angle: f32) {
        self.horizontal = self.horizontal.rotate_about(self.vertical, angle).unit();
        self.update();
    }

    /// Pitch: rotate the vertical axis about the horizontal one.
    pub fn turn_vertical(&mut self, angle: f32) {
        self.vertical = self.vertical.rotate_about(self.horizontal, angle).unit();
        self.update();
    }

    pub fn set_position(&mut self, position: Point3) {
        self.position = position;
        self.update();
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn screen_center(&self) -> Point3 {
        self.screen_center
    }

    pub fn view_point(&self) -> Point3 {
        self.view_point
    }

    pub fn vertical(&self) -> Vec3 {
        self.vertical
    }

    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Default for Camera {
    /// An 800x600 screen at the origin looking down +Z.
    fn default() -> Self {
        Self::new(Point3::ORIGIN, Vec3::Y, Vec3::X, 800.0, 600.0, 1400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    fn close_point(a: Point3, b: Point3) -> bool {
        close(a.to_vec3(), b.to_vec3())
    }

    #[test]
    fn test_camera_geometry() {
        let camera = Camera::new(Point3::ORIGIN, Vec3::Y, Vec3::X, 800.0, 600.0, 1400.0);

        assert!(close_point(camera.screen_center(), Point3::new(400.0, 300.0, 0.0)));
        assert!(close(camera.view_plane_normal(), -Vec3::Z));
        assert!(close_point(camera.view_point(), Point3::new(400.0, 300.0, -1400.0)));
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = Camera::default();
        let ray = camera.ray(0.5, 0.5);

        assert!(close_point(ray.origin, camera.screen_center()));
        assert!(close(ray.direction, Vec3::Z));

        // Edges diverge
        let left = camera.ray(0.0, 0.5);
        let right = camera.ray(1.0, 0.5);
        assert!(left.direction.x < 0.0 && right.direction.x > 0.0);
        let top = camera.ray(0.5, 1.0);
        assert!(top.direction.y > 0.0);
    }

    #[test]
    fn test_move_keeps_view_direction() {
        let mut camera = Camera::default();
        let before = camera.ray(0.25, 0.75).direction;

        camera.move_x(-50.0);
        camera.move_z(20.0);
        camera.rise(10.0);

        assert!(close_point(camera.position(), Point3::new(-50.0, 10.0, 20.0)));
        assert!(close(camera.ray(0.25, 0.75).direction, before));
        assert!(close(
            camera.view_point() - camera.screen_center(),
            Vec3::new(0.0, 0.0, -1400.0)
        ));
    }

    #[test]
    fn test_turn_horizontal_is_yaw() {
        let mut camera = Camera::default();
        let vertical = camera.vertical();
        camera.turn_horizontal(0.05);

        // Vertical axis untouched, basis stays orthonormal
        assert_eq!(camera.vertical(), vertical);
        assert!(camera.horizontal().dot(camera.vertical()).abs() < 1e-4);
        assert!((camera.horizontal().length() - 1.0).abs() < 1e-4);

        // The view direction swings around the Y axis
        let dir = camera.ray(0.5, 0.5).direction;
        assert!(dir.y.abs() < 1e-4);
        assert!(dir.x.abs() > 0.01);
    }

    #[test]
    fn test_turn_vertical_is_pitch() {
        let mut camera = Camera::default();
        let horizontal = camera.horizontal();
        camera.turn_vertical(0.1);

        assert_eq!(camera.horizontal(), horizontal);
        let dir = camera.ray(0.5, 0.5).direction;
        assert!(dir.x.abs() < 1e-4);
        assert!(dir.y.abs() > 0.01);
    }

    #[test]
    fn test_set_position_rederives_screen() {
        let mut camera = Camera::default();
        camera.set_position(Point3::new(100.0, 0.0, 0.0));
        assert!(close_point(camera.screen_center(), Point3::new(500.0, 300.0, 0.0)));
    }
}

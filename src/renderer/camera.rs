//! Fly camera

use glam::{Mat4, Vec3};

/// Movement direction relative to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Perspective fly camera driven by keyboard, mouse motion, and scroll zoom
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space
    pub position: Vec3,
    /// Units per second for keyboard movement
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse motion
    pub sensitivity: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Vertical field of view in degrees; scroll zoom narrows it
    zoom: f32,
    /// Rotation around Y, degrees
    yaw: f32,
    /// Rotation around X, degrees, clamped to avoid gimbal lock
    pitch: f32,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
}

const WORLD_UP: Vec3 = Vec3::Y;
const MAX_PITCH: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

impl Camera {
    /// Create a camera at the given position looking down -Z
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            speed: 2.5,
            sensitivity: 0.1,
            near: 0.1,
            far: 100.0,
            aspect: 16.0 / 9.0,
            zoom: MAX_ZOOM,
            yaw: -90.0,
            pitch: 0.0,
            direction: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }

    /// View matrix for the current position and orientation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// Projection matrix for the current zoom and aspect ratio
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from a window size
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Move in a camera-relative direction scaled by delta time
    pub fn process_keyboard(&mut self, movement: Movement, dt: f32) {
        let velocity = self.speed * dt;
        match movement {
            Movement::Forward => self.position += self.direction * velocity,
            Movement::Backward => self.position -= self.direction * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
            Movement::Up => self.position += self.up * velocity,
            Movement::Down => self.position -= self.up * velocity,
        }
    }

    /// Rotate from a mouse motion delta in pixels
    pub fn process_mouse_motion(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch -= delta_y * self.sensitivity;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Zoom from a scroll delta; positive narrows the field of view
    pub fn process_scroll(&mut self, delta_y: f32) {
        self.zoom = (self.zoom - delta_y).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Vertical field of view in degrees
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// The direction the camera is facing
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.direction.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.direction).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_motion(0.0, -10_000.0);
        assert!(camera.direction().y <= 1.0);
        assert!((camera.pitch - MAX_PITCH).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::default();
        camera.process_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_forward_movement_follows_direction() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(Movement::Forward, 1.0);
        // Default orientation looks down -Z.
        assert!(camera.position.z < 0.0);
        assert!(camera.position.x.abs() < 1e-5);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(Movement::Right, 1.0);
        assert!(camera.position.x > 0.0);
        assert!(camera.position.z.abs() < 1e-5);
    }
}

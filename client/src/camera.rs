//! Viewport tracking for the world surface.

/// Camera whose origin follows the focused player, clamped so the viewport
/// never shows space outside the world.
pub struct CameraController {
    position: (f32, f32),
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            position: (0.0, 0.0),
        }
    }

    /// Centers the viewport on `focus` and caches the clamped origin for
    /// the rest of the frame.
    pub fn update(&mut self, focus: (f32, f32), viewport: (f32, f32), world: (f32, f32)) -> (f32, f32) {
        self.position = (
            Self::clamp_axis(focus.0 - viewport.0 / 2.0, world.0, viewport.0),
            Self::clamp_axis(focus.1 - viewport.1 / 2.0, world.1, viewport.1),
        );
        self.position
    }

    fn clamp_axis(origin: f32, world: f32, viewport: f32) -> f32 {
        // A viewport at least as large as the world pins the camera at 0.
        let max = (world - viewport).max(0.0);
        origin.clamp(0.0, max)
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Converts a point on the drawing surface to world coordinates using
    /// the origin cached by the last `update`.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (self.position.0 + sx, self.position.1 + sy)
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

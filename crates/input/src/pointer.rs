use glam::Vec2;

/// Normalized pointer position, each axis in `[-1, 1]`.
///
/// (0, 0) is the surface center; +x is right, +y is down (screen
/// convention, matching the pixel origin in the top-left corner).
/// Updated by whichever input source fired last; read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Normalize a pixel position against the surface extent.
    ///
    /// Positions outside the surface (a drag that left the window) clamp
    /// to the edge rather than producing out-of-range values.
    pub fn from_pixels(px: f32, py: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            x: ((px / width) * 2.0 - 1.0).clamp(-1.0, 1.0),
            y: ((py / height) * 2.0 - 1.0).clamp(-1.0, 1.0),
        }
    }

    /// Map device tilt to pointer space.
    ///
    /// `gamma` is left-right tilt in degrees (-90..90), `beta` front-back
    /// (-180..180). A comfortable 45 degree tilt reaches full deflection;
    /// holding the device upright (beta ~ 45) centers the y axis.
    pub fn from_orientation(gamma: f32, beta: f32) -> Self {
        Self {
            x: (gamma / 45.0).clamp(-1.0, 1.0),
            y: ((beta - 45.0) / 45.0).clamp(-1.0, 1.0),
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Pointer-down/move/up bookkeeping producing per-frame drag deltas.
///
/// Deltas are in pixels; the camera rig applies its own sensitivity.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    anchor: Option<Vec2>,
    pending: Vec2,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, px: f32, py: f32) {
        self.anchor = Some(Vec2::new(px, py));
        self.pending = Vec2::ZERO;
    }

    /// Accumulate motion since the last `take_delta` while pressed.
    pub fn movement(&mut self, px: f32, py: f32) {
        if let Some(anchor) = self.anchor {
            let position = Vec2::new(px, py);
            self.pending += position - anchor;
            self.anchor = Some(position);
        }
    }

    pub fn release(&mut self) {
        self.anchor = None;
        self.pending = Vec2::ZERO;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Drain the accumulated drag delta for this frame.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pixel_maps_to_origin() {
        let p = PointerState::from_pixels(400.0, 300.0, 800.0, 600.0);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn corners_map_to_unit_extremes() {
        let p = PointerState::from_pixels(0.0, 0.0, 800.0, 600.0);
        assert_eq!((p.x, p.y), (-1.0, -1.0));
        let p = PointerState::from_pixels(800.0, 600.0, 800.0, 600.0);
        assert_eq!((p.x, p.y), (1.0, 1.0));
    }

    #[test]
    fn out_of_surface_input_clamps() {
        let p = PointerState::from_pixels(-50.0, 900.0, 800.0, 600.0);
        assert_eq!((p.x, p.y), (-1.0, 1.0));
    }

    #[test]
    fn zero_extent_surface_yields_center() {
        let p = PointerState::from_pixels(10.0, 10.0, 0.0, 0.0);
        assert_eq!(p, PointerState::default());
    }

    #[test]
    fn orientation_tilt_maps_and_clamps() {
        let p = PointerState::from_orientation(22.5, 45.0);
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);

        let p = PointerState::from_orientation(90.0, 180.0);
        assert_eq!((p.x, p.y), (1.0, 1.0));
    }

    #[test]
    fn drag_accumulates_and_drains() {
        let mut drag = DragTracker::new();
        drag.press(100.0, 100.0);
        drag.movement(110.0, 95.0);
        drag.movement(120.0, 90.0);
        assert!(drag.is_dragging());

        let delta = drag.take_delta();
        assert_eq!(delta, Vec2::new(20.0, -10.0));
        // Drained; a second take with no motion is zero.
        assert_eq!(drag.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn movement_without_press_is_ignored() {
        let mut drag = DragTracker::new();
        drag.movement(50.0, 50.0);
        assert!(!drag.is_dragging());
        assert_eq!(drag.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn release_clears_pending_motion() {
        let mut drag = DragTracker::new();
        drag.press(0.0, 0.0);
        drag.movement(5.0, 5.0);
        drag.release();
        assert_eq!(drag.take_delta(), Vec2::ZERO);
    }
}

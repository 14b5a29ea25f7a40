use std::time::Duration;

use glam::{Mat4, Vec3};

/// What auto-rotate does after the user releases a drag.
///
/// The behavior is per-instance configuration, not a shared contract:
/// some embeddings resume spinning immediately, some after a cooldown,
/// and some freeze at the last user-set angle for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    #[default]
    Immediate,
    After(Duration),
    Never,
}

/// Orbit camera rig: azimuth/elevation around a fixed target.
///
/// Auto-rotates until a drag takes over; zoom is clamped; pan does not
/// exist.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per second while auto-rotating.
    pub auto_rotate_speed: f32,
    /// Radians per pixel of drag.
    pub drag_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub resume_policy: ResumePolicy,
    dragging: bool,
    /// Seconds until auto-rotate resumes after a drag ends.
    resume_cooldown: f32,
    /// Cleared permanently by a drag under `ResumePolicy::Never`.
    auto_rotate_armed: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 15.0,
            target: Vec3::ZERO,
            fov: 60.0_f32.to_radians(),
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
            auto_rotate_speed: 0.5,
            drag_sensitivity: 0.005,
            min_distance: 10.0,
            max_distance: 20.0,
            resume_policy: ResumePolicy::Immediate,
            dragging: false,
            resume_cooldown: 0.0,
            auto_rotate_armed: true,
        }
    }
}

impl OrbitCamera {
    pub fn with_resume_policy(resume_policy: ResumePolicy) -> Self {
        Self {
            resume_policy,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether auto-rotate would advance azimuth right now.
    pub fn auto_rotating(&self) -> bool {
        self.auto_rotate_armed && !self.dragging && self.resume_cooldown <= 0.0
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Apply a drag delta in pixels. Ignored while not dragging.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.dragging {
            return;
        }
        self.azimuth -= dx * self.drag_sensitivity;
        self.elevation = (self.elevation + dy * self.drag_sensitivity).clamp(
            -89.0_f32.to_radians(),
            89.0_f32.to_radians(),
        );
    }

    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        match self.resume_policy {
            ResumePolicy::Immediate => self.resume_cooldown = 0.0,
            ResumePolicy::After(cooldown) => self.resume_cooldown = cooldown.as_secs_f32(),
            ResumePolicy::Never => self.auto_rotate_armed = false,
        }
    }

    /// Advance auto-rotation by one frame of clamped time.
    pub fn update(&mut self, dt: f32) {
        if self.dragging {
            return;
        }
        if self.resume_cooldown > 0.0 {
            self.resume_cooldown = (self.resume_cooldown - dt).max(0.0);
            return;
        }
        if self.auto_rotate_armed {
            self.azimuth += self.auto_rotate_speed * dt;
        }
    }

    /// Dolly by `delta`, clamped to the configured distance range.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(self.min_distance, self.max_distance);
    }

    /// Camera position derived from the spherical parameters.
    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_produces_valid_matrices() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn auto_rotate_advances_azimuth() {
        let mut cam = OrbitCamera::default();
        let before = cam.azimuth;
        cam.update(1.0);
        assert!((cam.azimuth - before - cam.auto_rotate_speed).abs() < 1e-6);
    }

    #[test]
    fn drag_suspends_auto_rotate() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag();
        let before = cam.azimuth;
        cam.update(1.0);
        assert_eq!(cam.azimuth, before);
        assert!(!cam.auto_rotating());
    }

    #[test]
    fn drag_moves_azimuth_and_clamps_elevation() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag();
        cam.drag(10.0, 0.0);
        assert!(cam.azimuth != 0.0);
        // Huge vertical drag cannot flip over the pole.
        cam.drag(0.0, 1e6);
        assert!(cam.elevation <= 89.0_f32.to_radians() + 1e-6);
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut cam = OrbitCamera::default();
        cam.drag(100.0, 100.0);
        assert_eq!(cam.azimuth, 0.0);
        assert_eq!(cam.elevation, 0.0);
    }

    #[test]
    fn immediate_policy_resumes_right_away() {
        let mut cam = OrbitCamera::with_resume_policy(ResumePolicy::Immediate);
        cam.begin_drag();
        cam.end_drag();
        assert!(cam.auto_rotating());
    }

    #[test]
    fn cooldown_policy_waits_before_resuming() {
        let mut cam =
            OrbitCamera::with_resume_policy(ResumePolicy::After(Duration::from_secs(2)));
        cam.begin_drag();
        cam.end_drag();
        assert!(!cam.auto_rotating());

        let frozen = cam.azimuth;
        cam.update(1.0);
        assert_eq!(cam.azimuth, frozen);
        cam.update(1.5);
        assert!(cam.auto_rotating());
        cam.update(0.5);
        assert!(cam.azimuth > frozen);
    }

    #[test]
    fn never_policy_freezes_the_view_for_good() {
        let mut cam = OrbitCamera::with_resume_policy(ResumePolicy::Never);
        cam.begin_drag();
        cam.drag(25.0, 0.0);
        cam.end_drag();
        let frozen = cam.azimuth;
        for _ in 0..100 {
            cam.update(1.0);
        }
        assert_eq!(cam.azimuth, frozen);
        assert!(!cam.auto_rotating());
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(100.0);
        assert_eq!(cam.distance, cam.max_distance);
        cam.zoom(-100.0);
        assert_eq!(cam.distance, cam.min_distance);
    }

    #[test]
    fn eye_sits_at_distance_from_target() {
        let cam = OrbitCamera::default();
        assert!(((cam.eye() - cam.target).length() - cam.distance).abs() < 1e-4);
    }
}

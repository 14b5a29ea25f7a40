use glam::{EulerRot, Quat, Vec2, Vec3};
use mascot_common::{clamp_abs, lerp, Transform};
use mascot_geometry::{GeometryDesc, Material};
use mascot_input::PointerState;
use mascot_scene::{NodeId, SceneError, SceneGraph, SceneGraphBuilder, ShapeDesc};

// Chibi palette.
const SKIN: [f32; 4] = [1.0, 0.894, 0.839, 1.0];
const HAIR: [f32; 4] = [0.290, 0.216, 0.157, 1.0];
const HAIR_HIGHLIGHT: [f32; 4] = [0.420, 0.325, 0.267, 1.0];
const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const EYE_IRIS: [f32; 4] = [0.365, 0.612, 0.925, 1.0];
const PUPIL: [f32; 4] = [0.173, 0.243, 0.314, 1.0];
const BLUSH: [f32; 4] = [1.0, 0.714, 0.757, 0.4];
const MOUTH: [f32; 4] = [1.0, 0.482, 0.612, 1.0];
const OUTFIT: [f32; 4] = [0.608, 0.349, 0.714, 1.0];
const OUTFIT_LIGHT: [f32; 4] = [0.702, 0.439, 0.812, 1.0];
const AURA: [f32; 4] = [0.910, 0.835, 1.0, 0.3];
const HEART: [f32; 4] = [1.0, 0.420, 0.510, 1.0];

// Rest placement of the animated pivots.
const ROOT_REST: Vec3 = Vec3::new(0.0, -0.5, 0.0);
const HEAD_REST: Vec3 = Vec3::new(0.0, 0.55, 0.0);
const LEFT_ARM_REST: Vec3 = Vec3::new(-0.33, -0.15, 0.0);
const RIGHT_ARM_REST: Vec3 = Vec3::new(0.33, -0.15, 0.0);
const MOUTH_REST: Vec3 = Vec3::new(0.0, -0.18, 0.5);
const LEFT_EAR_REST: Vec3 = Vec3::new(-0.52, 0.0, 0.0);
const RIGHT_EAR_REST: Vec3 = Vec3::new(0.52, 0.0, 0.0);
const HEART_REST: Vec3 = Vec3::new(0.0, 1.8, 0.0);
const PUPIL_REST: Vec3 = Vec3::new(0.0, 0.0, 0.115);
const LEFT_EYE_REST: Vec3 = Vec3::new(-0.18, 0.05, 0.4);
const RIGHT_EYE_REST: Vec3 = Vec3::new(0.18, 0.05, 0.4);

// Pointer sensitivities and smoothing factors.
const ROOT_YAW_SENS: f32 = 0.6;
const ROOT_PITCH_SENS: f32 = 0.15;
const HEAD_YAW_SENS: f32 = 0.4;
const HEAD_PITCH_SENS: f32 = 0.3;
const ROOT_YAW_SMOOTH: f32 = 0.1;
const ROOT_PITCH_SMOOTH: f32 = 0.08;
const HEAD_YAW_SMOOTH: f32 = 0.15;
const HEAD_PITCH_SMOOTH: f32 = 0.12;
const ARM_SMOOTH: f32 = 0.1;

// Hard limits on pointer-reactive rotation channels. Idle oscillation and
// pointer offset are additive; the clamp keeps the sum bounded even with
// pointer input pinned at an extreme.
const ROOT_YAW_LIMIT: f32 = 0.65;
const ROOT_PITCH_LIMIT: f32 = 0.2;
const HEAD_YAW_LIMIT: f32 = 0.45;
const HEAD_PITCH_LIMIT: f32 = 0.4;
const HEAD_TILT_LIMIT: f32 = 15.0 * std::f32::consts::PI / 180.0;

/// Mood flags scaling amplitude/frequency multipliers. Not a state
/// machine: any mood can be set at any time, last set wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Idle,
    Excited,
    Thinking,
    Talking,
}

impl Mood {
    /// Scale applied to idle oscillation amplitudes.
    pub fn amplitude(self) -> f32 {
        match self {
            Self::Idle | Self::Talking => 1.0,
            Self::Excited => 1.3,
            Self::Thinking => 0.7,
        }
    }

    /// Scale applied to idle oscillation frequencies.
    pub fn frequency(self) -> f32 {
        match self {
            Self::Idle | Self::Talking => 1.0,
            Self::Excited => 1.5,
            Self::Thinking => 0.6,
        }
    }
}

/// External animation flags for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarFlags {
    pub mood: Mood,
    pub talking: bool,
}

/// Node handles for the animated parts of the chibi rig.
///
/// Construction fixes the structure; everything that moves afterward moves
/// through [`AvatarPose::apply`].
#[derive(Debug)]
pub struct AvatarRig {
    pub root: NodeId,
    pub body: NodeId,
    pub head: NodeId,
    pub left_arm: NodeId,
    pub right_arm: NodeId,
    pub left_eye: NodeId,
    pub right_eye: NodeId,
    pub left_pupil: NodeId,
    pub right_pupil: NodeId,
    pub mouth: NodeId,
    pub left_ear: NodeId,
    pub right_ear: NodeId,
    pub blush_left: NodeId,
    pub blush_right: NodeId,
    pub sparkles: NodeId,
    pub heart: NodeId,
}

impl AvatarRig {
    /// Build the chibi avatar subtree under `parent`.
    pub fn build(
        builder: &mut SceneGraphBuilder,
        parent: Option<NodeId>,
    ) -> Result<Self, SceneError> {
        let at = Transform::from_position;

        let root = builder.group(parent, "avatar", at(ROOT_REST))?;

        // Glow aura behind everything.
        builder.shape(
            Some(root),
            "aura",
            at(Vec3::new(0.0, 0.5, -0.8)),
            shape(
                GeometryDesc::Disc {
                    radius: 1.5,
                    segments: 32,
                },
                AURA,
            ),
        )?;

        // Body: small round hoodie torso.
        let body = builder.group(Some(root), "body", Transform::default())?;
        builder.shape(
            Some(body),
            "torso",
            at(Vec3::new(0.0, -0.3, 0.0)),
            shape(capsule(0.28, 0.175, 16), OUTFIT),
        )?;
        builder.shape(
            Some(body),
            "pocket",
            at(Vec3::new(0.0, -0.35, 0.22)),
            shape(
                GeometryDesc::Box {
                    half_extents: [0.15, 0.075, 0.025],
                },
                OUTFIT_LIGHT,
            ),
        )?;
        for (name, x) in [("string_left", -0.06), ("string_right", 0.06)] {
            builder.shape(
                Some(body),
                name,
                at(Vec3::new(x, -0.05, 0.28)),
                shape(
                    GeometryDesc::Cylinder {
                        radius: 0.01,
                        height: 0.18,
                        segments: 8,
                    },
                    EYE_WHITE,
                ),
            )?;
        }

        // Arms pivot at the shoulder node origin.
        let left_arm = builder.shape(
            Some(body),
            "left_arm",
            at(LEFT_ARM_REST),
            shape(capsule(0.07, 0.11, 12), OUTFIT),
        )?;
        let right_arm = builder.shape(
            Some(body),
            "right_arm",
            at(RIGHT_ARM_REST),
            shape(capsule(0.07, 0.11, 12), OUTFIT),
        )?;

        // Oversized chibi head.
        let head = builder.group(Some(root), "head", at(HEAD_REST))?;
        builder.shape(
            Some(head),
            "skull",
            Transform::default(),
            shape(sphere(0.55, 32), SKIN),
        )?;
        builder.shape(
            Some(head),
            "hair",
            at(Vec3::new(0.0, 0.15, -0.05)),
            shape(
                GeometryDesc::Dome {
                    radius: 0.58,
                    segments: 24,
                    sweep: 0.55,
                },
                HAIR,
            ),
        )?;
        for (name, x, tilt) in [
            ("bang_left", -0.2_f32, 0.3_f32),
            ("bang_center", 0.0, 0.0),
            ("bang_right", 0.2, -0.3),
        ] {
            builder.shape(
                Some(head),
                name,
                Transform {
                    position: Vec3::new(x, 0.36, 0.36),
                    rotation: Quat::from_euler(EulerRot::XYZ, 0.45, 0.0, tilt),
                    ..Transform::default()
                },
                shape(capsule(0.09, 0.07, 12), HAIR),
            )?;
        }
        builder.shape(
            Some(head),
            "hair_highlight",
            at(Vec3::new(0.2, 0.4, 0.1)),
            shape(sphere(0.08, 12), HAIR_HIGHLIGHT),
        )?;
        for (name, x, roll) in [
            ("tuft_left", -0.45_f32, 0.4_f32),
            ("tuft_right", 0.45, -0.4),
        ] {
            builder.shape(
                Some(head),
                name,
                Transform {
                    position: Vec3::new(x, 0.1, 0.2),
                    rotation: Quat::from_rotation_z(roll),
                    ..Transform::default()
                },
                shape(capsule(0.06, 0.1, 12), HAIR),
            )?;
        }

        // Eyes: white ball, iris, tracking pupil.
        let mut eyes = [NodeId(0); 4];
        for (i, (side, rest)) in [("left", LEFT_EYE_REST), ("right", RIGHT_EYE_REST)]
            .into_iter()
            .enumerate()
        {
            let eye_id = builder.shape(
                Some(head),
                format!("{side}_eye"),
                at(rest),
                shape(sphere(0.13, 16), EYE_WHITE),
            )?;
            builder.shape(
                Some(eye_id),
                format!("{side}_iris"),
                at(Vec3::new(0.0, 0.0, 0.07)),
                shape(sphere(0.08, 16), EYE_IRIS),
            )?;
            let pupil_id = builder.shape(
                Some(eye_id),
                format!("{side}_pupil"),
                at(PUPIL_REST),
                shape(sphere(0.04, 12), PUPIL),
            )?;
            eyes[i * 2] = eye_id;
            eyes[i * 2 + 1] = pupil_id;
        }

        let mouth = builder.shape(
            Some(head),
            "mouth",
            at(MOUTH_REST),
            shape(capsule(0.035, 0.02, 12), MOUTH),
        )?;

        let mut ears = [NodeId(0); 2];
        for (i, (name, rest)) in [("left_ear", LEFT_EAR_REST), ("right_ear", RIGHT_EAR_REST)]
            .into_iter()
            .enumerate()
        {
            ears[i] = builder.shape(Some(head), name, at(rest), shape(sphere(0.09, 12), SKIN))?;
        }

        let mut blushes = [NodeId(0); 2];
        for (i, (name, x)) in [("blush_left", -0.3_f32), ("blush_right", 0.3)]
            .into_iter()
            .enumerate()
        {
            blushes[i] = builder.shape(
                Some(head),
                name,
                at(Vec3::new(x, -0.1, 0.45)),
                shape(
                    GeometryDesc::Disc {
                        radius: 0.07,
                        segments: 16,
                    },
                    BLUSH,
                ),
            )?;
        }

        // Orbiting sparkles: a ring of tiny spheres spun as one group.
        let sparkles = builder.group(Some(head), "sparkles", Transform::default())?;
        for i in 0..6 {
            let angle = std::f32::consts::TAU * i as f32 / 6.0;
            builder.shape(
                Some(sparkles),
                format!("sparkle_{i}"),
                at(Vec3::new(angle.cos() * 0.75, 0.3, angle.sin() * 0.75)),
                shape(sphere(0.025, 8), EYE_WHITE),
            )?;
        }

        let heart = builder.shape(
            Some(root),
            "heart",
            Transform {
                position: HEART_REST,
                scale: Vec3::splat(0.8),
                ..Transform::default()
            },
            shape(sphere(0.06, 12), HEART),
        )?;

        tracing::debug!("avatar rig built");

        Ok(Self {
            root,
            body,
            head,
            left_arm,
            right_arm,
            left_eye: eyes[0],
            left_pupil: eyes[1],
            right_eye: eyes[2],
            right_pupil: eyes[3],
            mouth,
            left_ear: ears[0],
            right_ear: ears[1],
            blush_left: blushes[0],
            blush_right: blushes[1],
            sparkles,
            heart,
        })
    }
}

fn shape(geometry: GeometryDesc, color: [f32; 4]) -> ShapeDesc {
    ShapeDesc {
        geometry,
        material: Material::colored(color),
    }
}

fn sphere(radius: f32, segments: u32) -> GeometryDesc {
    GeometryDesc::Sphere { radius, segments }
}

fn capsule(radius: f32, half_height: f32, segments: u32) -> GeometryDesc {
    GeometryDesc::Capsule {
        radius,
        half_height,
        segments,
    }
}

/// Frame-scoped pose state for the avatar.
///
/// The lerped channels carry over between frames (that is what makes the
/// smoothing work); everything else is recomputed from scratch each
/// update. Owned by the render loop, destroyed with it.
#[derive(Debug, Default)]
pub struct AvatarPose {
    // Smoothed channels (persist across frames).
    root_yaw: f32,
    root_pitch: f32,
    head_yaw: f32,
    head_pitch: f32,
    left_arm_z: f32,
    left_arm_x: f32,
    // Wave override timer, in seconds of clamped time.
    wave_remaining: f32,

    // Computed outputs for the current frame.
    pub bounce: f32,
    pub head_tilt: f32,
    pub body_sway: f32,
    pub breathe_scale: f32,
    pub blink_scale: f32,
    pub pupil_offset: Vec2,
    pub pupil_scale: f32,
    pub mouth_scale: Vec2,
    pub blush_alpha: f32,
    pub ear_wiggle: f32,
    pub sparkle_spin: f32,
    pub heart_bob: f32,
    pub heart_tilt: f32,
    pub heart_scale: f32,
    pub right_arm_z: f32,
}

impl AvatarPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the waving override for `duration` seconds of clamped time.
    pub fn start_wave(&mut self, duration: f32) {
        self.wave_remaining = duration.max(0.0);
        tracing::debug!(duration, "wave started");
    }

    pub fn is_waving(&self) -> bool {
        self.wave_remaining > 0.0
    }

    pub fn root_yaw(&self) -> f32 {
        self.root_yaw
    }

    pub fn root_pitch(&self) -> f32 {
        self.root_pitch
    }

    pub fn head_yaw(&self) -> f32 {
        self.head_yaw
    }

    pub fn head_pitch(&self) -> f32 {
        self.head_pitch
    }

    pub fn left_arm_z(&self) -> f32 {
        self.left_arm_z
    }

    /// Advance the pose by one frame.
    ///
    /// `t` is accumulated clamped time, `dt` the clamped frame delta.
    /// Each channel is an idle oscillation plus a smoothed pointer offset,
    /// clamped to its limit.
    pub fn update(&mut self, t: f32, dt: f32, pointer: PointerState, flags: AvatarFlags) {
        let amp = flags.mood.amplitude();
        let freq = flags.mood.frequency();
        let excited = flags.mood == Mood::Excited;

        // Bouncy floating: two offset sines so the motion never loops
        // visibly.
        self.bounce =
            (t * 2.0 * freq).sin() * 0.08 * amp + (t * 3.5 * freq).sin() * 0.03 * amp;

        // Whole-body pointer follow.
        self.root_yaw = clamp_abs(
            lerp(self.root_yaw, pointer.x * ROOT_YAW_SENS, ROOT_YAW_SMOOTH),
            ROOT_YAW_LIMIT,
        );
        self.root_pitch = clamp_abs(
            lerp(
                self.root_pitch,
                pointer.y * -ROOT_PITCH_SENS,
                ROOT_PITCH_SMOOTH,
            ),
            ROOT_PITCH_LIMIT,
        );

        // Head follows harder than the body for an expressive look.
        self.head_yaw = clamp_abs(
            lerp(self.head_yaw, pointer.x * HEAD_YAW_SENS, HEAD_YAW_SMOOTH),
            HEAD_YAW_LIMIT,
        );
        let mut head_pitch_target = pointer.y * -HEAD_PITCH_SENS;
        if flags.talking {
            head_pitch_target += (t * 12.0).sin() * 0.04;
        }
        self.head_pitch = clamp_abs(
            lerp(self.head_pitch, head_pitch_target, HEAD_PITCH_SMOOTH),
            HEAD_PITCH_LIMIT,
        );
        // Idle tilt and pointer lean are additive; clamp the sum.
        self.head_tilt = clamp_abs(
            (t * 1.2).sin() * 0.08 + pointer.x * 0.1,
            HEAD_TILT_LIMIT,
        );

        // Waving overrides the left arm; otherwise it sways gently.
        self.wave_remaining = (self.wave_remaining - dt).max(0.0);
        if self.is_waving() {
            self.left_arm_z = (t * 15.0).sin() * 0.5 + 2.5;
            self.left_arm_x = (t * 10.0).sin() * 0.3;
        } else {
            self.left_arm_z = lerp(
                self.left_arm_z,
                0.4 + (t * 1.5).sin() * 0.1,
                ARM_SMOOTH,
            );
            self.left_arm_x = lerp(self.left_arm_x, 0.0, ARM_SMOOTH);
        }
        self.right_arm_z = -0.4 + (t * 1.5 + std::f32::consts::PI).sin() * 0.1;

        // Blink: closed for the last 0.2 s of a 3.5 s cycle.
        let blink_cycle = t % 3.5;
        self.blink_scale = if blink_cycle > 3.3 { 0.1 } else { 1.0 };

        // Pupils track the pointer inside the eye.
        self.pupil_offset = Vec2::new(pointer.x * 0.03, pointer.y * 0.02);
        self.pupil_scale = if excited {
            1.0 + (t * 10.0).sin() * 0.15
        } else {
            1.0
        };

        self.mouth_scale = if flags.talking {
            Vec2::new(1.0, 0.7 + (t * 20.0).sin().abs() * 0.8)
        } else if excited {
            Vec2::new(1.5, 1.3)
        } else {
            Vec2::new(1.2, 1.0)
        };

        self.blush_alpha = if excited {
            0.6 + (t * 4.0).sin() * 0.2
        } else {
            0.4
        };

        self.ear_wiggle = (t * 3.0).sin() * 0.1;
        self.sparkle_spin = t * 1.5;

        self.heart_bob = (t * 2.0).sin() * 0.1;
        self.heart_tilt = (t * 1.5).sin() * 0.2;
        self.heart_scale = if excited {
            1.0 + (t * 5.0).sin() * 0.2
        } else {
            0.8
        };

        self.body_sway = (t * 1.8).sin() * 0.05;

        let breathe = 1.0 + (t * 3.0 * freq).sin() * 0.02 * amp;
        let excitement = if excited {
            1.05 + (t * 8.0).sin() * 0.03
        } else {
            1.0
        };
        self.breathe_scale = breathe * excitement;
    }

    /// Write the computed pose into the rig's nodes.
    pub fn apply(&self, rig: &AvatarRig, graph: &mut SceneGraph) {
        graph.set_local(
            rig.root,
            Transform {
                position: ROOT_REST + Vec3::Y * self.bounce,
                rotation: Quat::from_euler(EulerRot::XYZ, self.root_pitch, self.root_yaw, 0.0),
                scale: Vec3::splat(self.breathe_scale),
            },
        );
        graph.set_local(
            rig.body,
            Transform {
                rotation: Quat::from_rotation_z(self.body_sway),
                ..Transform::default()
            },
        );
        graph.set_local(
            rig.head,
            Transform {
                position: HEAD_REST,
                rotation: Quat::from_euler(
                    EulerRot::XYZ,
                    self.head_pitch,
                    self.head_yaw,
                    self.head_tilt,
                ),
                ..Transform::default()
            },
        );
        graph.set_local(
            rig.left_arm,
            Transform {
                position: LEFT_ARM_REST,
                rotation: Quat::from_euler(EulerRot::XYZ, self.left_arm_x, 0.0, self.left_arm_z),
                ..Transform::default()
            },
        );
        graph.set_local(
            rig.right_arm,
            Transform {
                position: RIGHT_ARM_REST,
                rotation: Quat::from_rotation_z(self.right_arm_z),
                ..Transform::default()
            },
        );
        for (eye, rest) in [(rig.left_eye, LEFT_EYE_REST), (rig.right_eye, RIGHT_EYE_REST)] {
            graph.set_local(
                eye,
                Transform {
                    position: rest,
                    scale: Vec3::new(1.0, self.blink_scale, 1.0),
                    ..Transform::default()
                },
            );
        }
        for pupil in [rig.left_pupil, rig.right_pupil] {
            graph.set_local(
                pupil,
                Transform {
                    position: PUPIL_REST
                        + Vec3::new(self.pupil_offset.x, self.pupil_offset.y, 0.0),
                    scale: Vec3::splat(self.pupil_scale),
                    ..Transform::default()
                },
            );
        }
        graph.set_local(
            rig.mouth,
            Transform {
                position: MOUTH_REST,
                scale: Vec3::new(self.mouth_scale.x, self.mouth_scale.y, 1.0),
                ..Transform::default()
            },
        );
        for (ear, rest, sign) in [
            (rig.left_ear, LEFT_EAR_REST, 1.0_f32),
            (rig.right_ear, RIGHT_EAR_REST, -1.0),
        ] {
            graph.set_local(
                ear,
                Transform {
                    position: rest,
                    rotation: Quat::from_rotation_z(sign * (0.2 + self.ear_wiggle)),
                    ..Transform::default()
                },
            );
        }
        for blush in [rig.blush_left, rig.blush_right] {
            if let Some(material) = graph.material_mut(blush) {
                material.base_color[3] = self.blush_alpha;
            }
        }
        graph.set_local(
            rig.sparkles,
            Transform {
                rotation: Quat::from_rotation_y(self.sparkle_spin),
                ..Transform::default()
            },
        );
        graph.set_local(
            rig.heart,
            Transform {
                position: HEART_REST + Vec3::Y * self.heart_bob,
                rotation: Quat::from_rotation_z(self.heart_tilt),
                scale: Vec3::splat(self.heart_scale),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged_graph() -> (AvatarRig, SceneGraph) {
        let mut builder = SceneGraphBuilder::new();
        let rig = AvatarRig::build(&mut builder, None).unwrap();
        (rig, builder.build().unwrap())
    }

    fn run_frames(pose: &mut AvatarPose, frames: usize, pointer: PointerState, flags: AvatarFlags) {
        let dt = 1.0 / 60.0;
        for frame in 0..frames {
            pose.update(frame as f32 * dt, dt, pointer, flags);
        }
    }

    #[test]
    fn rig_builds_named_parts() {
        let (rig, graph) = rigged_graph();
        assert_eq!(graph.find("avatar"), Some(rig.root));
        assert_eq!(graph.find("head"), Some(rig.head));
        assert_eq!(graph.find("left_pupil"), Some(rig.left_pupil));
        assert!(graph.shape_count() > 20);
    }

    #[test]
    fn pointer_sweep_respects_rotation_clamps() {
        // Property: for all pointer positions in [-1,1]^2, every
        // pointer-reactive rotation stays inside its limit.
        let flags = AvatarFlags::default();
        let mut pose = AvatarPose::new();
        for ix in -10..=10 {
            for iy in -10..=10 {
                let pointer = PointerState {
                    x: ix as f32 / 10.0,
                    y: iy as f32 / 10.0,
                };
                run_frames(&mut pose, 240, pointer, flags);
                assert!(pose.root_yaw().abs() <= ROOT_YAW_LIMIT + 1e-5);
                assert!(pose.root_pitch().abs() <= ROOT_PITCH_LIMIT + 1e-5);
                assert!(pose.head_yaw().abs() <= HEAD_YAW_LIMIT + 1e-5);
                assert!(pose.head_pitch().abs() <= HEAD_PITCH_LIMIT + 1e-5);
                assert!(pose.head_tilt.abs() <= HEAD_TILT_LIMIT + 1e-5);
            }
        }
    }

    #[test]
    fn extreme_pointer_input_is_still_bounded() {
        // Input beyond the normalized range must not produce runaway
        // rotations either; the clamp is on the output channel.
        let mut pose = AvatarPose::new();
        let pointer = PointerState { x: 50.0, y: -50.0 };
        run_frames(&mut pose, 600, pointer, AvatarFlags::default());
        assert!(pose.root_yaw().abs() <= ROOT_YAW_LIMIT + 1e-5);
        assert!(pose.head_yaw().abs() <= HEAD_YAW_LIMIT + 1e-5);
    }

    #[test]
    fn wave_overrides_then_expires() {
        let mut pose = AvatarPose::new();
        let flags = AvatarFlags::default();
        pose.start_wave(1.0);
        assert!(pose.is_waving());

        // 90 frames at 1/60 s = 1.5 s of clamped time; the override must
        // have expired and arm control returned to the idle formula.
        run_frames(&mut pose, 90, PointerState::default(), flags);
        assert!(!pose.is_waving());

        // After settling, the arm hovers around the idle rest angle.
        run_frames(&mut pose, 240, PointerState::default(), flags);
        assert!((pose.left_arm_z() - 0.4).abs() < 0.2);
    }

    #[test]
    fn waving_arm_uses_high_frequency_formula() {
        let mut pose = AvatarPose::new();
        pose.start_wave(2.0);
        pose.update(0.5, 1.0 / 60.0, PointerState::default(), AvatarFlags::default());
        // Waving holds the arm raised: 2.5 +- 0.5.
        assert!(pose.left_arm_z() > 2.0);
    }

    #[test]
    fn blink_closes_late_in_cycle() {
        let mut pose = AvatarPose::new();
        let flags = AvatarFlags::default();
        pose.update(1.0, 1.0 / 60.0, PointerState::default(), flags);
        assert_eq!(pose.blink_scale, 1.0);
        pose.update(3.4, 1.0 / 60.0, PointerState::default(), flags);
        assert_eq!(pose.blink_scale, 0.1);
    }

    #[test]
    fn talking_animates_the_mouth() {
        let mut pose = AvatarPose::new();
        let flags = AvatarFlags {
            talking: true,
            ..AvatarFlags::default()
        };
        let mut saw_open = false;
        let mut saw_narrow = false;
        for frame in 0..60 {
            pose.update(frame as f32 / 60.0, 1.0 / 60.0, PointerState::default(), flags);
            if pose.mouth_scale.y > 1.2 {
                saw_open = true;
            }
            if pose.mouth_scale.y < 0.9 {
                saw_narrow = true;
            }
        }
        assert!(saw_open && saw_narrow);
    }

    #[test]
    fn excited_mood_scales_blush_and_heart() {
        let mut pose = AvatarPose::new();
        let excited = AvatarFlags {
            mood: Mood::Excited,
            ..AvatarFlags::default()
        };
        pose.update(0.4, 1.0 / 60.0, PointerState::default(), excited);
        assert!(pose.blush_alpha > 0.4);
        assert!(pose.heart_scale > 0.8);

        let mut idle_pose = AvatarPose::new();
        idle_pose.update(0.4, 1.0 / 60.0, PointerState::default(), AvatarFlags::default());
        assert_eq!(idle_pose.blush_alpha, 0.4);
        assert_eq!(idle_pose.heart_scale, 0.8);
    }

    #[test]
    fn apply_writes_rig_transforms() {
        let (rig, mut graph) = rigged_graph();
        let mut pose = AvatarPose::new();
        pose.update(
            1.0,
            1.0 / 60.0,
            PointerState { x: 1.0, y: 0.0 },
            AvatarFlags::default(),
        );
        pose.apply(&rig, &mut graph);
        graph.propagate();

        let root = graph.local(rig.root).unwrap();
        assert!((root.position.y - (-0.5 + pose.bounce)).abs() < 1e-6);
        // Pointer at +x turned the root toward it.
        let (_, yaw, _) = root.rotation.to_euler(EulerRot::XYZ);
        assert!(yaw.abs() > 0.0);
    }

    #[test]
    fn blush_alpha_lands_in_the_material() {
        let (rig, mut graph) = rigged_graph();
        let mut pose = AvatarPose::new();
        pose.update(
            0.4,
            1.0 / 60.0,
            PointerState::default(),
            AvatarFlags {
                mood: Mood::Excited,
                ..AvatarFlags::default()
            },
        );
        pose.apply(&rig, &mut graph);
        let alpha = graph
            .material_mut(rig.blush_left)
            .map(|m| m.base_color[3])
            .unwrap();
        assert!((alpha - pose.blush_alpha).abs() < 1e-6);
    }
}

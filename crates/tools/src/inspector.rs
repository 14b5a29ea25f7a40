use mascot_pose::AvatarPose;
use mascot_scene::SceneGraph;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the scene graph for debugging and
/// development UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene structure.
    pub fn summary(scene: &SceneGraph) -> SceneSummary {
        SceneSummary {
            node_count: scene.node_count(),
            shape_count: scene.shape_count(),
            depth: scene.depth(),
        }
    }
}

/// Summary of scene structure for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub node_count: usize,
    pub shape_count: usize,
    pub depth: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} shapes={} depth={}",
            self.node_count, self.shape_count, self.depth
        )
    }
}

/// Pose inspector: formatted per-channel readout of the avatar pose.
pub struct PoseInspector;

impl PoseInspector {
    pub fn readout(pose: &AvatarPose) -> PoseReadout {
        PoseReadout {
            root_yaw: pose.root_yaw(),
            root_pitch: pose.root_pitch(),
            head_yaw: pose.head_yaw(),
            head_pitch: pose.head_pitch(),
            head_tilt: pose.head_tilt,
            bounce: pose.bounce,
            breathe_scale: pose.breathe_scale,
            left_arm_z: pose.left_arm_z(),
            waving: pose.is_waving(),
        }
    }
}

/// Snapshot of the animated channels for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseReadout {
    pub root_yaw: f32,
    pub root_pitch: f32,
    pub head_yaw: f32,
    pub head_pitch: f32,
    pub head_tilt: f32,
    pub bounce: f32,
    pub breathe_scale: f32,
    pub left_arm_z: f32,
    pub waving: bool,
}

impl std::fmt::Display for PoseReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "root: yaw={:+.3} pitch={:+.3}  bounce={:+.3} scale={:.3}",
            self.root_yaw, self.root_pitch, self.bounce, self.breathe_scale
        )?;
        write!(
            f,
            "head: yaw={:+.3} pitch={:+.3} tilt={:+.3}  arm_z={:+.3}{}",
            self.head_yaw,
            self.head_pitch,
            self.head_tilt,
            self.left_arm_z,
            if self.waving { "  (waving)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascot_input::PointerState;
    use mascot_pose::{AvatarFlags, AvatarRig};
    use mascot_scene::SceneGraphBuilder;

    #[test]
    fn summary_counts_rig_nodes() {
        let mut builder = SceneGraphBuilder::new();
        AvatarRig::build(&mut builder, None).unwrap();
        let graph = builder.build().unwrap();
        let summary = SceneInspector::summary(&graph);
        assert!(summary.node_count > summary.shape_count);
        assert!(summary.depth >= 3);
        assert!(summary.to_string().contains("nodes="));
    }

    #[test]
    fn readout_mirrors_pose_channels() {
        let mut pose = AvatarPose::new();
        pose.update(
            1.0,
            1.0 / 60.0,
            PointerState { x: 0.5, y: 0.0 },
            AvatarFlags::default(),
        );
        let readout = PoseInspector::readout(&pose);
        assert_eq!(readout.root_yaw, pose.root_yaw());
        assert!(!readout.waving);
        assert!(readout.to_string().contains("head:"));
    }
}

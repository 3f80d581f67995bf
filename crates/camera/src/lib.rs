#![warn(missing_docs)]
//! Third-person follow camera driven by the movement controller.
//!
//! The world is Z-up. Yaw is measured counter-clockwise from +X seen from
//! above, so a body facing angle `a` (forward `(cos a, -sin a)`) looks along
//! yaw `-a`.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, TAU};
use voxwalk_physics::{CameraDelta, MotionState};

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Camera orbiting a target point at a fixed distance.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Horizontal rotation in radians, in `[0, 2pi)`.
    pub yaw: f32,
    /// Vertical rotation in radians, positive looks up.
    pub pitch: f32,
    /// Distance from the eye to the target.
    pub distance: f32,
    /// Height of the look-at point above the hip.
    pub height: f32,

    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 6.0,
            height: 1.0,
            fov: FRAC_PI_3,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl FollowCamera {
    /// Camera placed behind a character, looking where it faces.
    pub fn behind(state: &MotionState) -> Self {
        let mut camera = Self {
            yaw: (-state.angle()).rem_euclid(TAU),
            ..Self::default()
        };
        camera.follow(state);
        camera
    }

    /// Track the character's hip position.
    pub fn follow(&mut self, state: &MotionState) {
        self.target = state.position() + Vec3::new(0.0, 0.0, self.height);
    }

    /// Accumulate one tick's orientation change.
    pub fn apply(&mut self, delta: CameraDelta) {
        self.rotate(delta.yaw, delta.pitch);
    }

    /// Add to yaw and pitch. Pitch is clamped just short of vertical.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_yaw * cos_pitch, sin_pitch).normalize()
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        self.target - self.forward() * self.distance
    }

    /// World space -> camera space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Z)
    }

    /// Camera space -> clip space.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio (call when the viewport resizes).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxwalk_physics::{BodyGeometry, Intent, MovementController, MovementTuning};
    use voxwalk_world::{VoxelGrid, BLOCK_STONE};

    fn state(angle: f32) -> MotionState {
        MotionState::new(Vec3::new(4.0, 4.0, 1.175), IVec3::new(4, 4, 0)).with_angle(angle)
    }

    #[test]
    fn behind_looks_where_the_body_faces() {
        let angle = 0.7_f32;
        let camera = FollowCamera::behind(&state(angle));
        let facing = Vec3::new(angle.cos(), -angle.sin(), 0.0);
        assert!((camera.forward() - facing).length() < 1e-5);
        assert!((camera.target - Vec3::new(4.0, 4.0, 2.175)).length() < 1e-5);
        assert!((camera.eye() - (camera.target - facing * 6.0)).length() < 1e-4);
    }

    #[test]
    fn rotation_clamps_pitch_and_wraps_yaw() {
        let mut camera = FollowCamera::default();
        camera.rotate(-0.5, 10.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.yaw >= 0.0 && camera.yaw < TAU);
        camera.rotate(0.0, -20.0);
        assert!(camera.pitch > -FRAC_PI_2);
    }

    #[test]
    fn left_turn_keeps_camera_behind_the_body() {
        let mut grid = VoxelGrid::new(8, 8, 4, 1.0).unwrap();
        grid.fill_box((0, 0, 0), (7, 7, 0), BLOCK_STONE);
        let geometry = BodyGeometry::new(0.9, 1.0).unwrap();
        let mut controller =
            MovementController::new(geometry, MovementTuning::default(), state(0.0));
        let mut camera = FollowCamera::behind(controller.state());

        controller.set_intent(Intent {
            turn_left: true,
            ..Intent::default()
        });
        for _ in 0..3 {
            let report = controller.tick(&grid, 1.0 / 60.0);
            camera.apply(report.camera);
            camera.follow(controller.state());
        }

        let a = controller.state().angle();
        let facing = Vec3::new(a.cos(), -a.sin(), 0.0);
        assert!((camera.forward() - facing).length() < 1e-4);
    }

    #[test]
    fn matrices_are_finite() {
        let mut camera = FollowCamera::behind(&state(1.0));
        camera.set_aspect(1280, 720);
        camera.rotate(0.0, 0.4);
        for m in [camera.view_matrix(), camera.projection_matrix()] {
            assert!(m.to_cols_array().iter().all(|x| x.is_finite()));
            assert!(!m.to_cols_array().iter().all(|&x| x == 0.0));
        }
    }
}

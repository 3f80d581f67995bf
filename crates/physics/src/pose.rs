use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::state::MotionMode;

/// Limb swing angles in radians. Arms and legs swing about the lateral axis,
/// the head sways about the vertical axis. Left limbs mirror right ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimbPose {
    pub head: f32,
    pub arm_left: f32,
    pub arm_right: f32,
    pub leg_left: f32,
    pub leg_right: f32,
}

impl LimbPose {
    /// Neutral pose used while idle.
    pub const NEUTRAL: Self = Self {
        head: 0.0,
        arm_left: 0.0,
        arm_right: 0.0,
        leg_left: 0.0,
        leg_right: 0.0,
    };

    /// Pose for `mode` at animation clock `t`.
    pub fn sample(mode: MotionMode, t: f32) -> Self {
        if mode == MotionMode::Idle {
            return Self::NEUTRAL;
        }
        let stride = (TAU * (2.0 * t - 0.4)).sin();
        let arm = 0.4 * stride;
        let leg = 0.8 * stride;
        Self {
            head: 0.3 * (TAU * (t - 0.6)).sin(),
            arm_left: -arm,
            arm_right: arm,
            leg_left: -leg,
            leg_right: leg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_neutral() {
        assert_eq!(LimbPose::sample(MotionMode::Idle, 1.37), LimbPose::NEUTRAL);
    }

    #[test]
    fn walking_limbs_mirror_and_stay_bounded() {
        for i in 0..50 {
            let pose = LimbPose::sample(MotionMode::Walking, i as f32 * 0.05);
            assert_eq!(pose.arm_left, -pose.arm_right);
            assert_eq!(pose.leg_left, -pose.leg_right);
            assert!(pose.arm_right.abs() <= 0.4 + 1e-6);
            assert!(pose.leg_right.abs() <= 0.8 + 1e-6);
            assert!(pose.head.abs() <= 0.3 + 1e-6);
        }
    }
}

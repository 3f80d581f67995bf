//! Per-tick movement constants.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::geometry::BodyGeometry;

/// Movement constants, expressed relative to the grid step or body scale so
/// one table works for any world.
///
/// Every value is applied once per tick, not per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal speed in grid steps per tick.
    pub walk_speed: f32,
    /// Body yaw change per tick while turning, in radians.
    pub turn_speed: f32,
    /// Camera yaw change per tick while the body turns, in radians.
    pub camera_turn_speed: f32,
    /// Camera pitch change per tick from the pitch keys, in radians.
    pub camera_pitch_speed: f32,
    /// Camera yaw change per tick from the camera yaw keys, in radians.
    pub camera_yaw_speed: f32,
    /// Upward velocity added by a jump, in units of body scale.
    pub jump_impulse: f32,
    /// Downward velocity added per airborne tick, in grid steps.
    pub gravity: f32,
    /// Optional cap on downward speed, in grid steps per tick. Unset, gravity
    /// keeps accelerating until landing and a fast fall can carry the feet past
    /// a floor cell between two probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fall_speed: Option<f32>,
    /// Multiplier from frame delta to animation clock.
    pub anim_time_scale: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: 0.5,
            turn_speed: PI / 10.0,
            camera_turn_speed: PI / 10.0,
            camera_pitch_speed: 0.01,
            camera_yaw_speed: 0.05,
            jump_impulse: 0.8,
            gravity: 0.25,
            max_fall_speed: None,
            anim_time_scale: 0.5,
        }
    }
}

/// Tuning resolved against a concrete body and grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Kinematics {
    pub speed: f32,
    pub jump: f32,
    pub gravity: f32,
    pub max_fall: Option<f32>,
}

impl Kinematics {
    pub(crate) fn resolve(tuning: &MovementTuning, geometry: &BodyGeometry) -> Self {
        Self {
            speed: tuning.walk_speed * geometry.step,
            jump: tuning.jump_impulse * geometry.scale,
            gravity: tuning.gravity * geometry.step,
            max_fall: tuning.max_fall_speed.map(|cap| cap * geometry.step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let tuning: MovementTuning = serde_json::from_str(r#"{"walk_speed": 0.25}"#).unwrap();
        assert_eq!(tuning.walk_speed, 0.25);
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.turn_speed, PI / 10.0);
        assert_eq!(tuning.max_fall_speed, None);

        let capped: MovementTuning = serde_json::from_str(r#"{"max_fall_speed": 1.5}"#).unwrap();
        assert_eq!(capped.max_fall_speed, Some(1.5));
    }

    #[test]
    fn kinematics_scale_with_step_and_body() {
        let geometry = BodyGeometry::new(0.5, 2.0).unwrap();
        let k = Kinematics::resolve(&MovementTuning::default(), &geometry);
        assert_eq!(k.speed, 1.0);
        assert_eq!(k.jump, 0.4);
        assert_eq!(k.gravity, 0.5);
        assert_eq!(k.max_fall, None);

        let capped = MovementTuning {
            max_fall_speed: Some(1.0),
            ..MovementTuning::default()
        };
        assert_eq!(Kinematics::resolve(&capped, &geometry).max_fall, Some(2.0));
    }
}

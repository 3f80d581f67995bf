//! Mutable kinematic state of the character.

use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::pose::LimbPose;

/// Vertical phase. A jump request and a fall cannot coexist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPhase {
    /// Standing on a cell.
    #[default]
    Grounded,
    /// Jump key accepted; the impulse is applied on the next tick.
    JumpRequested,
    /// Airborne, including the rising part of a jump.
    Falling,
}

/// Observable movement mode, derived from phase and latched intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    #[default]
    Idle,
    Walking,
    Turning,
    Jumping,
    Falling,
}

/// Position, velocity, orientation and mode of the character.
///
/// Only [`crate::MovementController`] mutates a live state; renderers read it.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) angle: f32,
    pub(crate) camera_angle: f32,
    pub(crate) cell: IVec3,
    pub(crate) phase: VerticalPhase,
    pub(crate) intent: Intent,
    pub(crate) clock: f32,
}

impl MotionState {
    /// Grounded, motionless state at `position`, facing angle 0.
    pub fn new(position: Vec3, cell: IVec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angle: 0.0,
            camera_angle: 0.0,
            cell,
            phase: VerticalPhase::Grounded,
            intent: Intent::default(),
            clock: 0.0,
        }
    }

    /// Replace the facing angle.
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Replace the velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Replace the vertical phase.
    pub fn with_phase(mut self, phase: VerticalPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Facing angle in radians. Never normalized.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn camera_angle(&self) -> f32 {
        self.camera_angle
    }

    /// Grid cell cached by the last vertical snap.
    pub fn cell(&self) -> IVec3 {
        self.cell
    }

    pub fn phase(&self) -> VerticalPhase {
        self.phase
    }

    /// Intent latched by the last accepted input poll.
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Animation clock in seconds (already scaled).
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn is_falling(&self) -> bool {
        self.phase == VerticalPhase::Falling
    }

    /// Walking, jumping or airborne.
    pub fn is_moving(&self) -> bool {
        self.intent.is_walking() || self.phase != VerticalPhase::Grounded
    }

    pub fn is_turning(&self) -> bool {
        self.intent.is_turning()
    }

    pub fn mode(&self) -> MotionMode {
        match self.phase {
            VerticalPhase::Falling => MotionMode::Falling,
            VerticalPhase::JumpRequested => MotionMode::Jumping,
            VerticalPhase::Grounded if self.intent.is_walking() => MotionMode::Walking,
            VerticalPhase::Grounded if self.intent.is_turning() => MotionMode::Turning,
            VerticalPhase::Grounded => MotionMode::Idle,
        }
    }

    /// Body orientation: `angle` about the downward vertical axis.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::NEG_Z, self.angle)
    }

    /// Limb swing angles for the current mode and clock.
    pub fn pose(&self) -> LimbPose {
        LimbPose::sample(self.mode(), self.clock)
    }

    /// Serializable copy for traces and replays.
    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            position: self.position,
            velocity: self.velocity,
            angle: self.angle,
            camera_angle: self.camera_angle,
            cell: self.cell,
            mode: self.mode(),
        }
    }
}

/// Plain-data view of a [`MotionState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angle: f32,
    pub camera_angle: f32,
    pub cell: IVec3,
    pub mode: MotionMode,
}

//! Per-tick movement state machine.
//!
//! One call to [`MovementController::tick`] runs per rendered frame. Velocities
//! are per-tick position deltas; the frame delta only advances the animation
//! clock, so a fixed tick sequence always reproduces the same path.

use bitflags::bitflags;
use glam::{IVec3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use voxwalk_core::SimTick;
use voxwalk_world::VoxelWorld;

use crate::geometry::BodyGeometry;
use crate::intent::Intent;
use crate::probe::{CollisionProbe, Contacts};
use crate::spawn::{find_spawn, SpawnError};
use crate::state::{MotionMode, MotionState, VerticalPhase};
use crate::tuning::{Kinematics, MovementTuning};

bitflags! {
    /// Transitions that happened during one tick.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TickEvents: u8 {
        /// Jump impulse applied.
        const JUMPED = 0b0000_0001;
        /// Fall ended on a solid cell.
        const LANDED = 0b0000_0010;
        /// Upward motion stopped by a ceiling.
        const HEAD_BUMP = 0b0000_0100;
        /// Ground vanished under a walking body.
        const WALKED_OFF_EDGE = 0b0000_1000;
        /// Walk intent cancelled by an obstacle.
        const BLOCKED = 0b0001_0000;
    }
}

/// Camera orientation change produced by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraDelta {
    /// Yaw change in radians.
    pub yaw: f32,
    /// Pitch change in radians.
    pub pitch: f32,
}

impl CameraDelta {
    pub fn is_zero(&self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0
    }
}

/// Summary of one tick for renderers, loggers and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick that produced this report.
    pub tick: SimTick,
    /// Mode after the tick.
    pub mode: MotionMode,
    /// Probe answers; empty when the body did not translate.
    pub contacts: Contacts,
    pub events: TickEvents,
    pub camera: CameraDelta,
}

/// Owns the [`MotionState`] and advances it once per tick.
#[derive(Debug, Clone)]
pub struct MovementController {
    geometry: BodyGeometry,
    tuning: MovementTuning,
    kinematics: Kinematics,
    state: MotionState,
    tick: SimTick,
}

impl MovementController {
    /// Controller for an existing state.
    pub fn new(geometry: BodyGeometry, tuning: MovementTuning, state: MotionState) -> Self {
        Self {
            kinematics: Kinematics::resolve(&tuning, &geometry),
            geometry,
            tuning,
            state,
            tick: SimTick::ZERO,
        }
    }

    /// Place a new character at a random free column of `world`.
    pub fn spawn<W, R>(
        world: &W,
        geometry: BodyGeometry,
        tuning: MovementTuning,
        rng: &mut R,
    ) -> Result<Self, SpawnError>
    where
        W: VoxelWorld + ?Sized,
        R: Rng,
    {
        let spawn = find_spawn(world, &geometry, rng)?;
        info!(
            cell = ?spawn.cell,
            position = ?spawn.position,
            "character spawned"
        );
        Ok(Self::new(
            geometry,
            tuning,
            MotionState::new(spawn.position, spawn.cell),
        ))
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn geometry(&self) -> &BodyGeometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> SimTick {
        self.tick
    }

    /// Accept one input poll.
    ///
    /// Walk and jump keys are only read while the body is not falling; in the
    /// air the walk keys held at take-off stay latched and jump presses are
    /// dropped. Turn and camera keys are always read.
    pub fn set_intent(&mut self, intent: Intent) {
        let latched = &mut self.state.intent;
        if self.state.phase != VerticalPhase::Falling {
            latched.forward = intent.forward;
            latched.backward = intent.backward;
            self.state.phase = if intent.jump {
                VerticalPhase::JumpRequested
            } else {
                VerticalPhase::Grounded
            };
        }
        latched.jump = self.state.phase == VerticalPhase::JumpRequested;
        latched.turn_left = intent.turn_left;
        latched.turn_right = intent.turn_right;
        latched.camera_up = intent.camera_up;
        latched.camera_down = intent.camera_down;
        latched.camera_left = intent.camera_left;
        latched.camera_right = intent.camera_right;
    }

    /// Advance one tick. `dt` is the frame delta in seconds.
    pub fn tick<W: VoxelWorld + ?Sized>(&mut self, world: &W, dt: f32) -> TickReport {
        debug_assert!(
            (world.step() - self.geometry.step).abs() <= f32::EPSILON * world.step().max(1.0),
            "body geometry was derived for a different grid step"
        );

        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };
        let moving = self.state.is_moving();
        let turning = self.state.is_turning();
        self.state.clock += dt * self.tuning.anim_time_scale;

        if !moving && !turning {
            self.snap_to_rest();
            self.state.velocity = Vec3::ZERO;
        } else {
            match self.state.phase {
                VerticalPhase::JumpRequested => {
                    self.state.velocity.z += self.kinematics.jump;
                    self.state.phase = VerticalPhase::Falling;
                    self.state.intent.jump = false;
                    report.events |= TickEvents::JUMPED;
                }
                VerticalPhase::Falling => {
                    let vz = self.state.velocity.z - self.kinematics.gravity;
                    self.state.velocity.z = match self.kinematics.max_fall {
                        Some(cap) => vz.max(-cap),
                        None => vz,
                    };
                }
                VerticalPhase::Grounded => {}
            }
            if moving {
                report.contacts = self.translate(world, &mut report.events);
            }
            if turning {
                self.turn();
            }
        }

        report.camera = self.orient_camera();
        report.mode = self.state.mode();

        if !report.events.is_empty() {
            debug!(
                tick = self.tick.0,
                events = ?report.events,
                position = ?self.state.position,
                velocity = ?self.state.velocity,
                "movement transition"
            );
        }
        trace!(tick = self.tick.0, contacts = ?report.contacts, mode = ?report.mode);

        self.tick = self.tick.advance(1);
        report
    }

    fn translate<W: VoxelWorld + ?Sized>(&mut self, world: &W, events: &mut TickEvents) -> Contacts {
        let contacts = CollisionProbe::new(world, &self.geometry, &self.state).contacts();
        let intent = self.state.intent;
        let speed = self.kinematics.speed;
        let (sin, cos) = self.state.angle.sin_cos();
        let v = &mut self.state.velocity;

        if intent.forward {
            if contacts.contains(Contacts::AHEAD) {
                v.x = 0.0;
                v.y = 0.0;
                *events |= TickEvents::BLOCKED;
            } else {
                v.x = speed * cos;
                v.y = -speed * sin;
            }
        }
        if intent.backward {
            if contacts.contains(Contacts::BEHIND) {
                v.x = 0.0;
                v.y = 0.0;
                *events |= TickEvents::BLOCKED;
            } else {
                v.x = -speed * cos;
                v.y = speed * sin;
            }
        }

        if self.state.phase == VerticalPhase::Falling {
            if contacts.contains(Contacts::BELOW) && v.z < 0.0 {
                v.z = 0.0;
                self.state.phase = VerticalPhase::Grounded;
                *events |= TickEvents::LANDED;
            }
            if contacts.contains(Contacts::ABOVE) && v.z > 0.0 {
                v.z = 0.0;
                *events |= TickEvents::HEAD_BUMP;
            }
        }

        self.state.position += *v;

        let grounded = contacts.contains(Contacts::BELOW);
        if grounded {
            self.snap_to_rest();
        }
        if self.state.phase != VerticalPhase::Falling && !grounded {
            self.state.phase = VerticalPhase::Falling;
            *events |= TickEvents::WALKED_OFF_EDGE;
        }
        contacts
    }

    fn snap_to_rest(&mut self) {
        let g = &self.geometry;
        let p = &mut self.state.position;
        let z = g.snap_layer(p.z);
        p.z = g.rest_height(z);
        self.state.cell = IVec3::new(
            (p.x / g.step).floor() as i32,
            (p.y / g.step).floor() as i32,
            z,
        );
    }

    fn turn(&mut self) {
        let intent = self.state.intent;
        if intent.turn_left {
            self.state.angle -= self.tuning.turn_speed;
        }
        if intent.turn_right {
            self.state.angle += self.tuning.turn_speed;
        }
    }

    /// Camera keys and body turns feed the camera every tick, whatever the
    /// body did. Left has priority over right, up over down.
    fn orient_camera(&mut self) -> CameraDelta {
        let intent = self.state.intent;
        let t = &self.tuning;
        let mut delta = CameraDelta::default();

        if intent.turn_left {
            self.state.camera_angle += t.camera_turn_speed;
            delta.yaw += t.camera_turn_speed;
        } else if intent.turn_right {
            self.state.camera_angle -= t.camera_turn_speed;
            delta.yaw -= t.camera_turn_speed;
        }

        if intent.camera_up {
            delta.pitch += t.camera_pitch_speed;
        } else if intent.camera_down {
            delta.pitch -= t.camera_pitch_speed;
        }

        // The yaw keys move the camera opposite to the angle they report.
        if intent.camera_right {
            self.state.camera_angle -= t.camera_yaw_speed;
            delta.yaw += t.camera_yaw_speed;
        } else if intent.camera_left {
            self.state.camera_angle += t.camera_yaw_speed;
            delta.yaw -= t.camera_yaw_speed;
        }

        delta
    }
}

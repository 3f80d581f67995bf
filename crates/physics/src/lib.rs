//! Character movement on a voxel grid: body geometry, collision probes,
//! the per-tick movement state machine, spawn placement and limb animation.

mod controller;
mod geometry;
mod intent;
mod pose;
mod probe;
mod spawn;
mod state;
mod tuning;

pub use controller::{CameraDelta, MovementController, TickEvents, TickReport};
pub use geometry::{BodyGeometry, BodyProportions, GeometryError, PROBE_REACH};
pub use intent::Intent;
pub use pose::LimbPose;
pub use probe::{CollisionProbe, Contacts};
pub use spawn::{find_spawn, SpawnError, SpawnPoint, SPAWN_HEADROOM};
pub use state::{MotionMode, MotionSnapshot, MotionState, VerticalPhase};
pub use tuning::MovementTuning;

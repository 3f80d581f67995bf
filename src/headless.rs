use crate::config::SimConfig;
use crate::scripted_input::ScriptedInputPlayer;
use crate::terrain;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use voxwalk_camera::FollowCamera;
use voxwalk_core::seeded_rng;
use voxwalk_physics::{
    BodyGeometry, Intent, MotionSnapshot, MovementController, TickEvents, TickReport,
};
use voxwalk_testkit::{EventRecord, JsonlSink};
use voxwalk_world::VoxelGrid;

pub struct HeadlessConfig {
    pub sim: SimConfig,
    pub scripted_input: Option<PathBuf>,
    pub trace: Option<PathBuf>,
    pub spawn_seed: u64,
}

/// Payload of one trace line.
#[derive(Debug, Serialize)]
struct TickTrace {
    #[serde(flatten)]
    state: MotionSnapshot,
    events: TickEvents,
    camera_yaw: f32,
    camera_pitch: f32,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub jumps: u64,
    pub landings: u64,
    pub blocked_ticks: u64,
    pub final_state: MotionSnapshot,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let sim = &cfg.sim;
    let world = terrain::generate(&sim.world)?;
    let geometry =
        BodyGeometry::new(sim.body.scale, sim.world.step).context("invalid body configuration")?;

    let mut rng = seeded_rng(cfg.spawn_seed);
    let mut controller = MovementController::spawn(&world, geometry, sim.movement, &mut rng)
        .context("failed to place the character")?;
    let mut camera = FollowCamera::behind(controller.state());

    let mut script = cfg
        .scripted_input
        .as_deref()
        .map(ScriptedInputPlayer::from_path)
        .transpose()?;
    let mut sink = cfg.trace.as_deref().map(JsonlSink::create).transpose()?;

    let mut summary = RunSummary {
        ticks: 0,
        jumps: 0,
        landings: 0,
        blocked_ticks: 0,
        final_state: controller.state().snapshot(),
    };

    info!(
        ticks = sim.run.ticks,
        seed = cfg.spawn_seed,
        scripted = script.is_some(),
        "headless run starting"
    );

    for _ in 0..sim.run.ticks {
        let intent = script
            .as_mut()
            .map(ScriptedInputPlayer::advance)
            .unwrap_or_default();
        let report = step(&mut controller, &mut camera, &world, intent, sim.run.frame_dt);

        summary.ticks += 1;
        summary.jumps += u64::from(report.events.contains(TickEvents::JUMPED));
        summary.landings += u64::from(report.events.contains(TickEvents::LANDED));
        summary.blocked_ticks += u64::from(report.events.contains(TickEvents::BLOCKED));

        if let Some(sink) = sink.as_mut() {
            sink.write(&EventRecord {
                tick: report.tick,
                kind: "tick",
                payload: &TickTrace {
                    state: controller.state().snapshot(),
                    events: report.events,
                    camera_yaw: camera.yaw,
                    camera_pitch: camera.pitch,
                },
            })?;
        }
    }

    if script.as_ref().is_some_and(|s| !s.finished()) {
        debug!("run ended before the script played through");
    }

    if let Some(mut sink) = sink {
        sink.flush()?;
        debug!(lines = sink.lines(), "trace written");
    }

    summary.final_state = controller.state().snapshot();
    info!(
        ticks = summary.ticks,
        jumps = summary.jumps,
        landings = summary.landings,
        position = ?summary.final_state.position,
        "headless run finished"
    );
    Ok(summary)
}

fn step(
    controller: &mut MovementController,
    camera: &mut FollowCamera,
    world: &VoxelGrid,
    intent: Intent,
    dt: f32,
) -> TickReport {
    controller.set_intent(intent);
    let report = controller.tick(world, dt);
    camera.apply(report.camera);
    camera.follow(controller.state());
    report
}

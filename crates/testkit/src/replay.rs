//! Tick replay harness for determinism checks.
//!
//! A replay steps a small simulation for a fixed number of ticks and records
//! a snapshot of selected state each tick. Two replays built from the same
//! inputs must render to identical canonical JSON.

use crate::snapshot::canonical_json;
use anyhow::{bail, Result};
use serde::Serialize;
use tracing::debug;
use voxwalk_core::SimTick;

/// Configuration for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Number of ticks to step (report includes the initial snapshot at tick 0).
    pub ticks: u64,
}

impl ReplayConfig {
    /// Config named `name` stepping `ticks` times.
    pub fn new(name: impl Into<String>, ticks: u64) -> Self {
        Self {
            name: name.into(),
            ticks,
        }
    }
}

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Frames recorded by [`record_replay`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport<S> {
    /// Name from the config.
    pub name: String,
    /// `ticks + 1` frames, starting with the initial state.
    pub frames: Vec<ReplayFrame<S>>,
}

impl<S> ReplayReport<S> {
    /// Snapshot after the last tick.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }
}

/// Step `state` for `config.ticks` ticks and collect a frame per tick.
///
/// Captures the initial snapshot at tick 0, then steps `config.ticks` times,
/// capturing a snapshot after each step (so the report contains `ticks + 1` frames).
pub fn record_replay<State, Snapshot, StepFn, SnapFn>(
    config: &ReplayConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> ReplayReport<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(ReplayFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(ReplayFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    ReplayReport {
        name: config.name.clone(),
        frames,
    }
}

/// Run the replay twice from states built by `init` and fail on the first
/// frame whose canonical JSON differs. Returns the first report.
pub fn assert_replay_deterministic<State, Snapshot, InitFn, StepFn, SnapFn>(
    config: &ReplayConfig,
    mut init: InitFn,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Result<ReplayReport<Snapshot>>
where
    Snapshot: Serialize,
    InitFn: FnMut() -> State,
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let first = record_replay(config, init(), &mut step, &mut snapshot);
    let second = record_replay(config, init(), &mut step, &mut snapshot);

    for (a, b) in first.frames.iter().zip(&second.frames) {
        if canonical_json(a)? != canonical_json(b)? {
            bail!(
                "Replay `{}` diverged at tick {} of {}",
                config.name,
                a.tick,
                config.ticks
            );
        }
    }
    debug!(
        name = %config.name,
        frames = first.frames.len(),
        "replay reproduced"
    );
    Ok(first)
}

use anyhow::{bail, Context};
use serde::Deserialize;
use std::{fs, path::Path};
use voxwalk_physics::Intent;

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
struct ScriptedStep {
    /// How many ticks this step holds its keys.
    ticks: u64,
    #[serde(flatten)]
    keys: Intent,
}

/// Replays a JSON list of held keys, one intent per tick. The last step
/// repeats once the script runs out.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    ticks_in_step: u64,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            ticks_in_step: 0,
        })
    }

    /// Intent for the next tick.
    pub fn advance(&mut self) -> Intent {
        while self.ticks_in_step >= self.steps[self.index].ticks
            && self.index + 1 < self.steps.len()
        {
            self.index += 1;
            self.ticks_in_step = 0;
        }
        self.ticks_in_step += 1;
        self.steps[self.index].keys
    }

    /// Whether every step has played at least once.
    pub fn finished(&self) -> bool {
        self.index + 1 == self.steps.len() && self.ticks_in_step >= self.steps[self.index].ticks
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use voxwalk_physics::MovementTuning;

pub const DEFAULT_CONFIG_PATH: &str = "config/voxwalk.toml";

/// Everything the headless runner reads from `config/voxwalk.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub body: BodyConfig,
    pub movement: MovementTuning,
    pub run: RunConfig,
}

/// Demo terrain parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    /// Cell edge length in world units.
    pub step: f32,
    /// Terrain seed. The spawn seed is separate (`--seed`).
    pub seed: u64,
    /// Mean surface layer.
    pub base_height: i32,
    /// Maximum deviation from `base_height`, in cells.
    pub relief: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            nx: 32,
            ny: 32,
            nz: 16,
            step: 1.0,
            seed: 42,
            base_height: 3,
            relief: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Uniform body scale; the character is about 1.75 * scale tall.
    pub scale: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self { scale: 0.9 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub ticks: u64,
    /// Frame delta fed to the controller, in seconds.
    pub frame_dt: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("voxwalk-config-{nanos}")).join(name)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: SimConfig = toml::from_str(
            r#"
            [world]
            nx = 8

            [movement]
            gravity = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.nx, 8);
        assert_eq!(cfg.world.ny, WorldConfig::default().ny);
        assert_eq!(cfg.movement.gravity, 0.5);
        assert_eq!(cfg.movement.walk_speed, MovementTuning::default().walk_speed);
        assert_eq!(cfg.run, RunConfig::default());
    }

    #[test]
    fn malformed_or_missing_file_falls_back() {
        let missing = temp_path("missing.toml");
        assert_eq!(SimConfig::load_from_path(&missing), SimConfig::default());

        let broken = temp_path("broken.toml");
        fs::create_dir_all(broken.parent().unwrap()).unwrap();
        fs::write(&broken, "[world\nnx = ").unwrap();
        assert_eq!(SimConfig::load_from_path(&broken), SimConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = temp_path("voxwalk.toml");
        let mut cfg = SimConfig::default();
        cfg.body.scale = 1.25;
        cfg.run.ticks = 7;
        cfg.save_to_path(&path).unwrap();
        assert_eq!(SimConfig::load_from_path(&path), cfg);
    }
}

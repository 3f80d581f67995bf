//! Demo terrain for the headless runner.
//!
//! Rolling hills from two octaves of Perlin noise, stored in a
//! [`VoxelGrid`]. The physics core never sees this module; it only talks to
//! the grid through the voxel port.

use anyhow::{Context, Result};
use noise::{NoiseFn, Perlin};
use tracing::info;
use voxwalk_world::{VoxelGrid, BLOCK_STONE};

use crate::config::WorldConfig;

/// Horizontal frequency of the first octave, in cycles per cell.
const BASE_FREQUENCY: f64 = 0.08;

/// Per-column surface layers for `cfg`, indexed `y * nx + x`.
pub fn heights(cfg: &WorldConfig) -> Vec<i32> {
    let perlin = Perlin::new(cfg.seed as u32);
    let top = (cfg.nz - 1).max(0);
    let relief = cfg.relief.abs();
    let mut heights = Vec::with_capacity((cfg.nx.max(0) * cfg.ny.max(0)) as usize);
    for y in 0..cfg.ny {
        for x in 0..cfg.nx {
            let (fx, fy) = (x as f64 * BASE_FREQUENCY, y as f64 * BASE_FREQUENCY);
            let n = perlin.get([fx, fy]) * 0.7 + perlin.get([fx * 2.0, fy * 2.0]) * 0.3;
            let offset = ((n * relief as f64).round() as i32).clamp(-relief, relief);
            heights.push((cfg.base_height + offset).clamp(0, top));
        }
    }
    heights
}

/// Build the demo grid.
pub fn generate(cfg: &WorldConfig) -> Result<VoxelGrid> {
    let heights = heights(cfg);
    let grid = VoxelGrid::from_heights(cfg.nx, cfg.ny, cfg.nz, cfg.step, &heights, BLOCK_STONE)
        .context("failed to build demo terrain")?;
    info!(
        nx = cfg.nx,
        ny = cfg.ny,
        nz = cfg.nz,
        seed = cfg.seed,
        solid = grid.solid_count(),
        "terrain generated"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxwalk_world::VoxelWorld;

    #[test]
    fn same_seed_same_terrain() {
        let cfg = WorldConfig::default();
        assert_eq!(heights(&cfg), heights(&cfg));
        let other = WorldConfig {
            seed: cfg.seed + 1,
            ..cfg.clone()
        };
        assert_ne!(heights(&cfg), heights(&other));
    }

    #[test]
    fn heights_stay_inside_relief_band() {
        let cfg = WorldConfig::default();
        let grid = generate(&cfg).unwrap();
        for y in 0..cfg.ny {
            for x in 0..cfg.nx {
                let h = grid.surface_height(x, y);
                assert!((cfg.base_height - cfg.relief..=cfg.base_height + cfg.relief).contains(&h));
            }
        }
    }

    #[test]
    fn bad_dimensions_surface_as_errors() {
        let cfg = WorldConfig {
            nx: 0,
            ..WorldConfig::default()
        };
        assert!(generate(&cfg).is_err());
    }
}

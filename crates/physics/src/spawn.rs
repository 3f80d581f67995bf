//! Deterministic spawn placement.

use glam::{IVec3, Vec3};
use rand::Rng;
use thiserror::Error;
use tracing::debug;
use voxwalk_world::VoxelWorld;

use crate::geometry::BodyGeometry;

/// Empty cells required above the spawn cell.
pub const SPAWN_HEADROOM: i32 = 4;

/// Errors raised when no spawn position can be found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// The world has no columns to pick from.
    #[error("world has no columns ({nx}x{ny})")]
    EmptyWorld {
        /// X size.
        nx: i32,
        /// Y size.
        ny: i32,
    },
    /// The chosen column has no free headroom below the top of the grid.
    #[error("column ({x}, {y}) has no {SPAWN_HEADROOM}-cell gap below the top of the world")]
    NoHeadroom {
        /// Column X.
        x: i32,
        /// Column Y.
        y: i32,
    },
}

/// Where a character starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    /// Cell the character stands on.
    pub cell: IVec3,
    /// Hip position: the cell anchor raised by `dist_feet`.
    pub position: Vec3,
}

/// Pick a column with `rng` and climb from its surface until
/// [`SPAWN_HEADROOM`] cells above are empty.
///
/// The result depends only on the generator state and the grid content.
pub fn find_spawn<W, R>(
    world: &W,
    geometry: &BodyGeometry,
    rng: &mut R,
) -> Result<SpawnPoint, SpawnError>
where
    W: VoxelWorld + ?Sized,
    R: Rng,
{
    let (nx, ny, nz) = world.bounds();
    if nx <= 0 || ny <= 0 {
        return Err(SpawnError::EmptyWorld { nx, ny });
    }

    let x = rng.gen_range(0..nx);
    let y = rng.gen_range(0..ny);
    let mut z = world.surface_height(x, y);

    while (1..=SPAWN_HEADROOM).any(|dz| world.is_solid(x, y, z + dz)) {
        z += 1;
        if z + SPAWN_HEADROOM >= nz {
            return Err(SpawnError::NoHeadroom { x, y });
        }
    }

    debug!(x, y, z, "spawn column resolved");
    Ok(SpawnPoint {
        cell: IVec3::new(x, y, z),
        position: world.blocks_to_position(x, y, z) + Vec3::new(0.0, 0.0, geometry.dist_feet),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxwalk_core::seeded_rng;
    use voxwalk_world::{VoxelGrid, BLOCK_STONE};

    #[test]
    fn spawn_stands_on_the_surface() {
        let heights = vec![2; 8 * 8];
        let world = VoxelGrid::from_heights(8, 8, 12, 1.0, &heights, BLOCK_STONE).unwrap();
        let geometry = BodyGeometry::new(0.9, 1.0).unwrap();
        let spawn = find_spawn(&world, &geometry, &mut seeded_rng(5)).unwrap();

        assert_eq!(spawn.cell.z, 2);
        assert_eq!(spawn.position.x, spawn.cell.x as f32);
        assert_eq!(spawn.position.y, spawn.cell.y as f32);
        assert_eq!(spawn.position.z, 2.0 + geometry.dist_feet);
        assert!((spawn.position.z - geometry.rest_height(2)).abs() < 1e-6);
    }

    #[test]
    fn spawn_climbs_past_blocks_above_the_terrain() {
        let geometry = BodyGeometry::new(0.9, 1.0).unwrap();

        // Terrain surface at z = 0 with a floating slab at z = 3.
        let mut world = VoxelGrid::from_heights(1, 1, 16, 1.0, &[0], BLOCK_STONE).unwrap();
        world.set(0, 0, 3, BLOCK_STONE).unwrap();
        let spawn = find_spawn(&world, &geometry, &mut seeded_rng(1)).unwrap();
        assert_eq!(spawn.cell, IVec3::new(0, 0, 3));

        // A second slab four cells higher pushes the climb past it too.
        world.set(0, 0, 6, BLOCK_STONE).unwrap();
        let spawn = find_spawn(&world, &geometry, &mut seeded_rng(1)).unwrap();
        assert_eq!(spawn.cell, IVec3::new(0, 0, 6));
    }

    #[test]
    fn sealed_column_is_an_error() {
        let heights = vec![9];
        let world = VoxelGrid::from_heights(1, 1, 12, 1.0, &heights, BLOCK_STONE).unwrap();
        let geometry = BodyGeometry::new(0.9, 1.0).unwrap();
        assert_eq!(
            find_spawn(&world, &geometry, &mut seeded_rng(0)),
            Err(SpawnError::NoHeadroom { x: 0, y: 0 })
        );
    }
}

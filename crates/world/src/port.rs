//! Read-only occupancy queries consumed by the movement core.
//!
//! Cell `(i, j, k)` covers `[i*step, (i+1)*step)` on each axis. Its anchor is
//! the min corner. Anything outside the lattice reads as solid so a probe that
//! leaves the world can never report free space.

use glam::Vec3;

/// Block identifier stored per cell.
pub type BlockId = u16;

/// Reserved ID for empty space.
pub const BLOCK_AIR: BlockId = 0;

/// Generic solid block.
pub const BLOCK_STONE: BlockId = 1;

/// Occupancy reported for coordinates outside the lattice.
pub const BLOCK_OUT_OF_BOUNDS: BlockId = BlockId::MAX;

/// Occupancy and coordinate conversion for a uniform voxel lattice.
///
/// Implementors only provide raw lookups and dimensions; the conversions are
/// shared so every world floors world-space points the same way.
pub trait VoxelWorld {
    /// Occupancy of the cell at integer coordinates. Must return a nonzero
    /// value for any coordinate outside [`VoxelWorld::bounds`].
    fn occupancy_at(&self, ix: i32, iy: i32, iz: i32) -> BlockId;

    /// Uniform cell edge length.
    fn step(&self) -> f32;

    /// Lattice dimensions `(nx, ny, nz)`.
    fn bounds(&self) -> (i32, i32, i32);

    /// Whether the cell at integer coordinates blocks movement.
    fn is_solid(&self, ix: i32, iy: i32, iz: i32) -> bool {
        self.occupancy_at(ix, iy, iz) != BLOCK_AIR
    }

    /// Integer cell containing a world-space point.
    fn cell_of(&self, point: Vec3) -> (i32, i32, i32) {
        let step = self.step();
        (
            (point.x / step).floor() as i32,
            (point.y / step).floor() as i32,
            (point.z / step).floor() as i32,
        )
    }

    /// Occupancy of the cell containing `point`.
    fn position_to_block(&self, point: Vec3) -> BlockId {
        let (ix, iy, iz) = self.cell_of(point);
        self.occupancy_at(ix, iy, iz)
    }

    /// Anchor (min corner) of a cell in world space.
    fn blocks_to_position(&self, ix: i32, iy: i32, iz: i32) -> Vec3 {
        Vec3::new(ix as f32, iy as f32, iz as f32) * self.step()
    }

    /// Highest solid cell in a column, or `-1` when the column is empty.
    fn surface_height(&self, ix: i32, iy: i32) -> i32 {
        let (_, _, nz) = self.bounds();
        (0..nz)
            .rev()
            .find(|&iz| self.is_solid(ix, iy, iz))
            .unwrap_or(-1)
    }
}

impl<W: VoxelWorld + ?Sized> VoxelWorld for &W {
    fn occupancy_at(&self, ix: i32, iy: i32, iz: i32) -> BlockId {
        (**self).occupancy_at(ix, iy, iz)
    }

    fn step(&self) -> f32 {
        (**self).step()
    }

    fn bounds(&self) -> (i32, i32, i32) {
        (**self).bounds()
    }

    fn surface_height(&self, ix: i32, iy: i32) -> i32 {
        (**self).surface_height(ix, iy)
    }
}

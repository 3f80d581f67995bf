//! Dense in-memory voxel lattice.

use crate::port::{BlockId, VoxelWorld, BLOCK_AIR, BLOCK_OUT_OF_BOUNDS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or editing a [`VoxelGrid`].
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// A dimension was zero or negative, or the cell count overflows `i32`.
    #[error("grid dimensions must be positive with at most i32::MAX cells, got {nx}x{ny}x{nz}")]
    InvalidDimensions {
        /// Requested X size.
        nx: i32,
        /// Requested Y size.
        ny: i32,
        /// Requested Z size.
        nz: i32,
    },
    /// Cell edge length was not a positive finite number.
    #[error("grid step must be positive and finite, got {0}")]
    InvalidStep(f32),
    /// A write targeted a cell outside the lattice.
    #[error("cell ({x}, {y}, {z}) is outside the grid")]
    OutOfBounds {
        /// X index.
        x: i32,
        /// Y index.
        y: i32,
        /// Z index.
        z: i32,
    },
    /// Heightmap length does not match the column count.
    #[error("heightmap has {actual} columns, expected {expected}")]
    HeightmapSize {
        /// `nx * ny`.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
}

/// Uniform axis-aligned lattice stored as a flat array, X fastest.
///
/// A grid built from a heightmap remembers the terrain surface per column.
/// Blocks placed later (trees, structures) do not move it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelGrid {
    nx: i32,
    ny: i32,
    nz: i32,
    step: f32,
    cells: Vec<BlockId>,
    surface: Option<Vec<i32>>,
}

impl VoxelGrid {
    /// Create an empty grid.
    ///
    /// Cell indices are computed in `i32`, so the cell count must fit in one.
    pub fn new(nx: i32, ny: i32, nz: i32, step: f32) -> Result<Self, GridError> {
        let volume = match nx.checked_mul(ny).and_then(|area| area.checked_mul(nz)) {
            Some(volume) if nx > 0 && ny > 0 && nz > 0 => volume as usize,
            _ => return Err(GridError::InvalidDimensions { nx, ny, nz }),
        };
        if !step.is_finite() || step <= 0.0 {
            return Err(GridError::InvalidStep(step));
        }
        Ok(Self {
            nx,
            ny,
            nz,
            step,
            cells: vec![BLOCK_AIR; volume],
            surface: None,
        })
    }

    /// Build a grid whose column `(x, y)` is solid from `z = 0` up to and
    /// including `heights[y * nx + x]`. Negative heights leave the column empty.
    pub fn from_heights(
        nx: i32,
        ny: i32,
        nz: i32,
        step: f32,
        heights: &[i32],
        block: BlockId,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(nx, ny, nz, step)?;
        let expected = nx as usize * ny as usize;
        if heights.len() != expected {
            return Err(GridError::HeightmapSize {
                expected,
                actual: heights.len(),
            });
        }
        for y in 0..ny {
            for x in 0..nx {
                let top = heights[(y * nx + x) as usize].min(nz - 1);
                for z in 0..=top {
                    grid.set(x, y, z, block)?;
                }
            }
        }
        grid.surface = Some(heights.iter().map(|&h| h.clamp(-1, nz - 1)).collect());
        Ok(grid)
    }

    /// Whether integer coordinates fall inside the lattice.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.nx).contains(&x) && (0..self.ny).contains(&y) && (0..self.nz).contains(&z)
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(self.contains(x, y, z));
        ((z * self.ny + y) * self.nx + x) as usize
    }

    /// Block at integer coordinates, or `None` outside the lattice.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.contains(x, y, z).then(|| self.cells[self.index(x, y, z)])
    }

    /// Overwrite one cell.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> Result<(), GridError> {
        if !self.contains(x, y, z) {
            return Err(GridError::OutOfBounds { x, y, z });
        }
        let idx = self.index(x, y, z);
        self.cells[idx] = block;
        Ok(())
    }

    /// Fill the inclusive box `min..=max`, clipped to the lattice.
    pub fn fill_box(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), block: BlockId) {
        let (x0, y0, z0) = (min.0.max(0), min.1.max(0), min.2.max(0));
        let (x1, y1, z1) = (
            max.0.min(self.nx - 1),
            max.1.min(self.ny - 1),
            max.2.min(self.nz - 1),
        );
        for z in z0..=z1 {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let idx = self.index(x, y, z);
                    self.cells[idx] = block;
                }
            }
        }
    }

    /// Count of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b != BLOCK_AIR).count()
    }
}

impl VoxelWorld for VoxelGrid {
    fn occupancy_at(&self, ix: i32, iy: i32, iz: i32) -> BlockId {
        self.get(ix, iy, iz).unwrap_or(BLOCK_OUT_OF_BOUNDS)
    }

    fn step(&self) -> f32 {
        self.step
    }

    fn bounds(&self) -> (i32, i32, i32) {
        (self.nx, self.ny, self.nz)
    }

    fn surface_height(&self, ix: i32, iy: i32) -> i32 {
        match &self.surface {
            Some(surface) if self.contains(ix, iy, 0) => surface[(iy * self.nx + ix) as usize],
            _ => (0..self.nz)
                .rev()
                .find(|&iz| self.is_solid(ix, iy, iz))
                .unwrap_or(-1),
        }
    }
}

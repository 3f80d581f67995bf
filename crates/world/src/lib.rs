#![warn(missing_docs)]
//! Voxel occupancy port and a dense grid that implements it.

mod grid;
mod port;

pub use grid::*;
pub use port::*;

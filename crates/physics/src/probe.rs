//! Directional occupancy probes around the body.
//!
//! Probes sample a handful of points offset from the hip position `p` toward
//! a corner of the footprint. The ahead probe measures from the
//! forward-diagonal corner at `angle + teta`; the behind, up and down probes
//! measure from the side-diagonal corner at `pi/2 - angle - teta`. Keep the two
//! corners distinct: collapsing them lets the body clip block edges.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use voxwalk_world::{VoxelWorld, BLOCK_AIR};

use crate::geometry::BodyGeometry;
use crate::state::MotionState;

bitflags! {
    /// Probe answers for one tick.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Contacts: u8 {
        /// Solid cell in front of the body.
        const AHEAD = 0b0001;
        /// Solid cell behind the body.
        const BEHIND = 0b0010;
        /// Solid cell above the head.
        const ABOVE = 0b0100;
        /// Solid cell under the feet.
        const BELOW = 0b1000;
    }
}

/// Borrowed view answering occupancy questions for one body pose.
pub struct CollisionProbe<'a, W: VoxelWorld + ?Sized> {
    world: &'a W,
    geometry: &'a BodyGeometry,
    position: Vec3,
    angle: f32,
}

impl<'a, W: VoxelWorld + ?Sized> CollisionProbe<'a, W> {
    pub fn new(world: &'a W, geometry: &'a BodyGeometry, state: &MotionState) -> Self {
        Self::at(world, geometry, state.position(), state.angle())
    }

    /// Probe an arbitrary pose without a [`MotionState`].
    pub fn at(world: &'a W, geometry: &'a BodyGeometry, position: Vec3, angle: f32) -> Self {
        Self {
            world,
            geometry,
            position,
            angle,
        }
    }

    fn forward_corner(&self) -> Vec3 {
        let g = self.geometry;
        let (sin, cos) = (self.angle + g.teta).sin_cos();
        self.position + Vec3::new(g.diagonal * sin, g.diagonal * cos, 0.0)
    }

    fn side_corner(&self) -> Vec3 {
        let g = self.geometry;
        let (sin, cos) = (FRAC_PI_2 - self.angle - g.teta).sin_cos();
        self.position + Vec3::new(g.diagonal * cos, -g.diagonal * sin, 0.0)
    }

    /// Feet, hip and head heights for horizontal probes.
    fn column_offsets(&self) -> [f32; 3] {
        let g = self.geometry;
        [
            -g.leg_z + g.step / 2.0 + g.error,
            0.0,
            g.dist_head - g.error,
        ]
    }

    fn occupied(&self, point: Vec3) -> bool {
        self.world.position_to_block(point) != BLOCK_AIR
    }

    fn any_occupied(&self, corner: Vec3, reach: Vec3) -> bool {
        self.column_offsets()
            .iter()
            .any(|&dz| self.occupied(corner + reach + Vec3::new(0.0, 0.0, dz)))
    }

    fn reach(&self) -> Vec3 {
        let (sin, cos) = self.angle.sin_cos();
        Vec3::new(cos, -sin, 0.0) * self.geometry.distance
    }

    /// Whether anything blocks forward travel.
    pub fn check_ahead(&self) -> bool {
        self.any_occupied(self.forward_corner(), self.reach())
    }

    /// Whether anything blocks backward travel.
    pub fn check_behind(&self) -> bool {
        self.any_occupied(self.side_corner(), -self.reach())
    }

    /// Whether the feet rest on (or are entering) a solid cell.
    pub fn check_down(&self) -> bool {
        let g = self.geometry;
        let dz = -g.leg_z + g.step / 2.0 - g.error;
        self.occupied(self.side_corner() + Vec3::new(0.0, 0.0, dz))
    }

    /// Whether a solid cell sits right above the head.
    pub fn check_up(&self) -> bool {
        let g = self.geometry;
        self.occupied(self.side_corner() + Vec3::new(0.0, 0.0, g.dist_head + g.error))
    }

    /// All four answers.
    pub fn contacts(&self) -> Contacts {
        let mut contacts = Contacts::empty();
        contacts.set(Contacts::AHEAD, self.check_ahead());
        contacts.set(Contacts::BEHIND, self.check_behind());
        contacts.set(Contacts::ABOVE, self.check_up());
        contacts.set(Contacts::BELOW, self.check_down());
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxwalk_world::{VoxelGrid, BLOCK_STONE};

    // Scale 0.9 on a unit grid: leg_z 0.675, error 0.0675, hip rests at
    // z + 1.175, reach 1.08, footprint corner offsets (0.1125, +/-0.225).
    fn floor_world() -> VoxelGrid {
        let mut grid = VoxelGrid::new(16, 16, 8, 1.0).unwrap();
        grid.fill_box((0, 0, 0), (15, 15, 0), BLOCK_STONE);
        grid
    }

    fn geometry() -> BodyGeometry {
        BodyGeometry::new(0.9, 1.0).unwrap()
    }

    fn standing(g: &BodyGeometry) -> Vec3 {
        Vec3::new(8.0, 8.0, g.rest_height(0))
    }

    #[test]
    fn open_floor_only_reports_below() {
        let world = floor_world();
        let g = geometry();
        let probe = CollisionProbe::at(&world, &g, standing(&g), 0.0);
        assert_eq!(probe.contacts(), Contacts::BELOW);
    }

    #[test]
    fn wall_ahead_is_seen_at_hip_height() {
        let mut world = floor_world();
        world.set(9, 8, 1, BLOCK_STONE).unwrap();
        let g = geometry();
        let probe = CollisionProbe::at(&world, &g, standing(&g), 0.0);
        assert!(probe.check_ahead());
        assert!(!probe.check_behind());
    }

    #[test]
    fn head_level_block_ahead_is_seen() {
        let mut world = floor_world();
        world.set(9, 8, 2, BLOCK_STONE).unwrap();
        let g = geometry();
        assert!(CollisionProbe::at(&world, &g, standing(&g), 0.0).check_ahead());
    }

    #[test]
    fn behind_probe_uses_side_corner() {
        let g = geometry();
        let p = standing(&g);

        // Side corner sits at y - 0.225, so the sample lands in row 7.
        let mut world = floor_world();
        world.set(7, 7, 1, BLOCK_STONE).unwrap();
        assert!(CollisionProbe::at(&world, &g, p, 0.0).check_behind());

        let mut world = floor_world();
        world.set(7, 8, 1, BLOCK_STONE).unwrap();
        assert!(!CollisionProbe::at(&world, &g, p, 0.0).check_behind());
    }

    #[test]
    fn ceiling_and_gap_below() {
        let g = geometry();
        let p = standing(&g);

        let mut world = floor_world();
        world.set(8, 7, 2, BLOCK_STONE).unwrap();
        assert!(CollisionProbe::at(&world, &g, p, 0.0).check_up());

        let mut world = floor_world();
        world.set(8, 7, 0, BLOCK_AIR).unwrap();
        assert!(!CollisionProbe::at(&world, &g, p, 0.0).check_down());
    }

    #[test]
    fn turning_moves_the_ahead_sample() {
        let mut world = floor_world();
        world.set(9, 8, 1, BLOCK_STONE).unwrap();
        let g = geometry();
        // Facing +y (angle = -pi/2) the wall at +x is no longer ahead.
        let probe = CollisionProbe::at(&world, &g, standing(&g), -FRAC_PI_2);
        assert!(!probe.check_ahead());
    }

    #[test]
    fn leaving_the_world_reads_blocked() {
        let world = floor_world();
        let g = geometry();
        let p = Vec3::new(15.0, 8.0, g.rest_height(0));
        assert!(CollisionProbe::at(&world, &g, p, 0.0).check_ahead());
    }
}

//! Body dimensions derived once from a uniform scale factor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when deriving a [`BodyGeometry`].
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Scale was not a positive finite number.
    #[error("body scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    /// Grid step was not a positive finite number.
    #[error("grid step must be positive and finite, got {0}")]
    InvalidStep(f32),
    /// One of the proportions was negative or not finite.
    #[error("body extent `{name}` must be a non-negative number, got {value}")]
    InvalidExtent {
        /// Field name.
        name: &'static str,
        /// Offending value after scaling.
        value: f32,
    },
    /// The snapping tolerance would let a vertical snap skip a cell.
    #[error("snap tolerance {error} must be below half the grid step ({step})")]
    ToleranceTooLarge {
        /// `leg_z / 10`.
        error: f32,
        /// Grid step.
        step: f32,
    },
}

/// Unscaled body extents, in units of the body scale.
///
/// `size` is the body depth along the facing axis, `*_y` extents are lateral
/// widths and `*_z` extents are heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyProportions {
    pub size: f32,
    pub head_x: f32,
    pub head_y: f32,
    pub head_z: f32,
    pub body_y: f32,
    pub body_z: f32,
    pub leg_y: f32,
    pub leg_z: f32,
    pub arm_y: f32,
    pub arm_z: f32,
}

impl Default for BodyProportions {
    fn default() -> Self {
        Self {
            size: 0.25,
            head_x: 0.5,
            head_y: 0.5,
            head_z: 0.5,
            body_y: 0.5,
            body_z: 0.75,
            leg_y: 0.25,
            leg_z: 0.75,
            arm_y: 0.25,
            arm_z: 0.75,
        }
    }
}

/// Reach of the forward/backward probes, in units of the body scale.
pub const PROBE_REACH: f32 = 1.2;

/// Immutable body dimensions plus the constants derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyGeometry {
    pub scale: f32,
    /// Grid step the derived constants were computed for.
    pub step: f32,
    pub size: f32,
    pub head_x: f32,
    pub head_y: f32,
    pub head_z: f32,
    pub body_y: f32,
    pub body_z: f32,
    pub leg_y: f32,
    pub leg_z: f32,
    pub arm_y: f32,
    pub arm_z: f32,
    /// `leg_z + step / 2`: hip height above the anchor of the cell stood on.
    pub dist_feet: f32,
    /// `body_z + head_z`: top of the head above the hip.
    pub dist_head: f32,
    /// Horizontal reach of the ahead/behind probes.
    pub distance: f32,
    /// Vertical tolerance used by probes and snapping.
    pub error: f32,
    /// Half-diagonal of the footprint.
    pub diagonal: f32,
    /// Angle between the footprint diagonal and the lateral axis.
    pub teta: f32,
}

impl BodyGeometry {
    /// Derive geometry for the default proportions.
    pub fn new(scale: f32, step: f32) -> Result<Self, GeometryError> {
        Self::with_proportions(BodyProportions::default(), scale, step)
    }

    /// Derive geometry from explicit proportions.
    pub fn with_proportions(
        base: BodyProportions,
        scale: f32,
        step: f32,
    ) -> Result<Self, GeometryError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidScale(scale));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(GeometryError::InvalidStep(step));
        }

        let scaled = |name: &'static str, value: f32| {
            let value = value * scale;
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(GeometryError::InvalidExtent { name, value })
            }
        };

        let size = scaled("size", base.size)?;
        let body_y = scaled("body_y", base.body_y)?;
        let body_z = scaled("body_z", base.body_z)?;
        let head_z = scaled("head_z", base.head_z)?;
        let leg_z = scaled("leg_z", base.leg_z)?;

        let error = leg_z / 10.0;
        if error >= step / 2.0 {
            return Err(GeometryError::ToleranceTooLarge { error, step });
        }

        let half_size = size / 2.0;
        let half_body = body_y / 2.0;

        Ok(Self {
            scale,
            step,
            size,
            head_x: scaled("head_x", base.head_x)?,
            head_y: scaled("head_y", base.head_y)?,
            head_z,
            body_y,
            body_z,
            leg_y: scaled("leg_y", base.leg_y)?,
            leg_z,
            arm_y: scaled("arm_y", base.arm_y)?,
            arm_z: scaled("arm_z", base.arm_z)?,
            dist_feet: leg_z + step / 2.0,
            dist_head: body_z + head_z,
            distance: PROBE_REACH * scale,
            error,
            diagonal: (half_size * half_size + half_body * half_body).sqrt(),
            teta: half_size.atan2(half_body),
        })
    }

    /// Total height from feet to the top of the head.
    pub fn height(&self) -> f32 {
        self.leg_z + self.dist_head
    }

    /// Resting hip height when standing on cell layer `z`.
    #[inline]
    pub fn rest_height(&self, z: i32) -> f32 {
        z as f32 * self.step + self.leg_z + self.step / 2.0
    }

    /// Cell layer a hip height snaps onto.
    #[inline]
    pub fn snap_layer(&self, pz: f32) -> i32 {
        ((pz - self.leg_z + self.step / 2.0 - self.error) / self.step).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants_follow_scale() {
        let g = BodyGeometry::new(2.0, 1.0).unwrap();
        assert_eq!(g.leg_z, 1.5);
        assert_eq!(g.dist_feet, 2.0);
        assert_eq!(g.dist_head, 1.5 + 1.0);
        assert_eq!(g.distance, 2.4);
        assert!((g.error - 0.15).abs() < 1e-6);
        assert!((g.height() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_and_teta_match_footprint() {
        let g = BodyGeometry::new(1.0, 1.0).unwrap();
        let expected_d = (0.125f32 * 0.125 + 0.25 * 0.25).sqrt();
        assert!((g.diagonal - expected_d).abs() < 1e-6);
        assert!((g.teta - 0.5f32.atan()).abs() < 1e-6);
    }

    #[test]
    fn tolerance_must_stay_below_half_step() {
        // leg_z = 0.75 * 8 = 6, error = 0.6, step / 2 = 0.5
        let err = BodyGeometry::new(8.0, 1.0).unwrap_err();
        assert!(matches!(err, GeometryError::ToleranceTooLarge { .. }));
    }

    #[test]
    fn rejects_negative_extents_and_bad_scale() {
        let base = BodyProportions {
            arm_z: -0.1,
            ..BodyProportions::default()
        };
        let err = BodyGeometry::with_proportions(base, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidExtent { name: "arm_z", .. }
        ));
        assert_eq!(
            BodyGeometry::new(0.0, 1.0).unwrap_err(),
            GeometryError::InvalidScale(0.0)
        );
        assert_eq!(
            BodyGeometry::new(1.0, -1.0).unwrap_err(),
            GeometryError::InvalidStep(-1.0)
        );
    }

    #[test]
    fn snap_layer_inverts_rest_height() {
        let g = BodyGeometry::new(0.9, 1.0).unwrap();
        for z in -3..20 {
            assert_eq!(g.snap_layer(g.rest_height(z)), z);
        }
    }
}

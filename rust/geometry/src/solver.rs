// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Penetration angle solver
//!
//! Decomposes the direction of an element passing through a wall into the two
//! rotation parameters of a generic opening family:
//! - the vertical angle, measured from the wall normal in the plane
//!   perpendicular to the wall direction
//! - the horizontal angle, measured from the wall direction in the XY plane and
//!   offset by 90° so that a perpendicular penetration reads 0
//!
//! The insertion point is then shifted by a first-order thickness correction
//! (`tan(angle) * width / 2`) so the opening is centred through the wall depth.

use crate::error::{Error, Result};
use crate::vector::{
    angle_on_plane_to, checked_unit, fold_half_turn, is_parallel, DIRECTION_EPSILON,
};
use nalgebra::{Point3, Unit, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Default distance from ±90° at which an angle is considered divergent (1°)
pub const DEFAULT_DIVERGENCE_MARGIN: f64 = 1.0 * std::f64::consts::PI / 180.0;

/// Default bound on the translation length, in multiples of the wall width
pub const DEFAULT_MAX_TRANSLATION_FACTOR: f64 = 4.0;

/// Default plan-to-length ratio below which an intersector counts as a riser (sin 1°)
pub const DEFAULT_RISER_TOLERANCE: f64 = 0.017_452_406_437_283_512;

/// Relative slack on the half-width depth bound
const DEPTH_TOLERANCE: f64 = 1e-9;

/// Tunable thresholds for the solver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Directions shorter than this are rejected
    pub direction_epsilon: f64,
    /// Angular margin (radians) below ±90° that triggers `DivergentAngle`
    pub divergence_margin: f64,
    /// Translation lengths above `factor * width` trigger `DivergentAngle`
    pub max_translation_factor: f64,
    /// Intersectors whose horizontal component is at most this fraction of
    /// their length are treated as vertical risers with no plan skew
    pub riser_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            direction_epsilon: DIRECTION_EPSILON,
            divergence_margin: DEFAULT_DIVERGENCE_MARGIN,
            max_translation_factor: DEFAULT_MAX_TRANSLATION_FACTOR,
            riser_tolerance: DEFAULT_RISER_TOLERANCE,
        }
    }
}

/// Directions and wall data at a single intersection, all anchored at `mid_point`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverInput {
    pub wall_direction: Vector3<f64>,
    pub wall_normal: Vector3<f64>,
    pub intersection_direction: Vector3<f64>,
    pub wall_width: f64,
    pub mid_point: Point3<f64>,
}

/// Rotation parameters and corrected insertion point for an opening
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleResult {
    /// Rotation about the wall direction (radians, in `(-π/2, π/2]`)
    pub vertical_angle: f64,
    /// Skew in the horizontal plane relative to perpendicular (radians, in `(-π/2, π/2]`)
    pub horizontal_angle: f64,
    /// Offset from the intersection midpoint
    pub translation: Vector3<f64>,
    /// `mid_point + translation`
    pub location_point: Point3<f64>,
}

/// Computes opening rotation angles and the thickness-corrected insertion point.
///
/// The solver holds only configuration and is safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct AngleSolver {
    config: SolverConfig,
}

impl AngleSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve a single penetration.
    ///
    /// # Errors
    /// - `InvalidGeometry` when a direction is shorter than the configured
    ///   epsilon, the width is not positive, or a reference vector cannot be
    ///   measured in its plane (wall normal along the wall direction, vertical
    ///   wall direction)
    /// - `DivergentAngle` when the penetration grazes the wall nearly edge-on,
    ///   or when the corrected point would leave the wall depth (its offset
    ///   along the wall normal exceeds half the width); the error carries the
    ///   computed result
    ///
    /// A near-vertical intersector has no meaningful plan direction, so its
    /// horizontal angle is taken as 0 while its horizontal component stays
    /// within `riser_tolerance` of its length. Past that ratio the plan
    /// direction is measured as is, which for a steep pipe skewed along the
    /// wall reads close to ±90° and is reported as divergent.
    pub fn solve(&self, input: &SolverInput) -> Result<AngleResult> {
        let eps = self.config.direction_epsilon;
        let wall_direction = checked_unit(&input.wall_direction, eps, "wall direction")?;
        let wall_normal = checked_unit(&input.wall_normal, eps, "wall normal")?;
        let intersection =
            checked_unit(&input.intersection_direction, eps, "intersection direction")?;

        let width = input.wall_width;
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::geometry(format!("wall width must be positive, got {}", width)));
        }

        if is_parallel(&input.wall_normal, &input.wall_direction) {
            return Err(Error::geometry("wall normal is parallel to the wall direction"));
        }
        if is_parallel(&input.wall_direction, &Vector3::z()) {
            return Err(Error::geometry("wall direction is vertical"));
        }

        // An intersection direction with no component in a measuring plane
        // carries no rotation in that plane.
        let vertical_raw = angle_on_plane_to(
            &input.wall_normal,
            &input.intersection_direction,
            &wall_direction,
        )
        .unwrap_or(0.0);
        let horizontal_raw = if intersection.xy().norm() <= self.config.riser_tolerance {
            FRAC_PI_2
        } else {
            angle_on_plane_to(
                &input.wall_direction,
                &input.intersection_direction,
                &Vector3::z_axis(),
            )
            .unwrap_or(FRAC_PI_2)
        };

        let vertical_angle = fold_half_turn(-vertical_raw);
        let horizontal_angle = fold_half_turn(horizontal_raw - FRAC_PI_2);

        let half_width = width / 2.0;
        let translation = Vector3::new(
            vertical_angle.tan() * half_width,
            0.0,
            horizontal_angle.tan() * half_width,
        );

        let result = AngleResult {
            vertical_angle,
            horizontal_angle,
            translation,
            location_point: input.mid_point + translation,
        };

        if self.is_divergent(&result, &wall_normal, width) {
            return Err(Error::DivergentAngle {
                vertical: vertical_angle,
                horizontal: horizontal_angle,
                result: Box::new(result),
            });
        }

        Ok(result)
    }

    fn is_divergent(
        &self,
        result: &AngleResult,
        normal: &Unit<Vector3<f64>>,
        width: f64,
    ) -> bool {
        let limit = FRAC_PI_2 - self.config.divergence_margin;
        let depth = result.translation.dot(normal.as_ref());
        result.vertical_angle.abs() >= limit
            || result.horizontal_angle.abs() >= limit
            || !(result.translation.norm() <= self.config.max_translation_factor * width)
            || !(depth.abs() <= width / 2.0 * (1.0 + DEPTH_TOLERANCE))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector helpers shared by the frame builder, face analysis and solver.
//!
//! Points and directions are plain nalgebra `Point3<f64>` / `Vector3<f64>`.
//! This module adds the bounded `Line3` segment and the plane-relative angle
//! measurement used to decompose a penetration direction.

use crate::error::{Error, Result};
use nalgebra::{Point3, Unit, Vector3};
use std::f64::consts::{PI, TAU};

/// Default minimum length for a direction vector
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Tolerance for parallelism tests on unit vectors
const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Minimum z component for a normal to count as pointing upwards
pub const UPWARD_TOLERANCE: f64 = 1e-6;

/// Bounded line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line3 {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line3 {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Segment from `origin` to `origin + direction`
    pub fn from_origin(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            start: origin,
            end: origin + direction,
        }
    }

    /// Unnormalized direction (`end - start`)
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point3<f64> {
        midpoint(&self.start, &self.end)
    }

    /// Point at parameter `t`, with `t = 0` at `start` and `t = 1` at `end`
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.start + self.direction() * t
    }
}

#[inline]
pub fn midpoint(p: &Point3<f64>, q: &Point3<f64>) -> Point3<f64> {
    Point3::from((p.coords + q.coords) * 0.5)
}

/// Normalize `v`, failing with `InvalidGeometry` when it is shorter than `epsilon`.
///
/// `name` identifies the argument in the error message.
pub fn checked_unit(v: &Vector3<f64>, epsilon: f64, name: &str) -> Result<Unit<Vector3<f64>>> {
    if !v.iter().all(|c| c.is_finite()) {
        return Err(Error::geometry(format!("{} has non-finite components", name)));
    }
    Unit::try_new(*v, epsilon).ok_or_else(|| {
        Error::geometry(format!(
            "{} has near-zero length ({:e} < {:e})",
            name,
            v.norm(),
            epsilon
        ))
    })
}

/// Project `v` onto the plane through the origin with unit normal `normal`.
#[inline]
pub fn project_on_plane(v: &Vector3<f64>, normal: &Unit<Vector3<f64>>) -> Vector3<f64> {
    v - normal.as_ref() * v.dot(normal.as_ref())
}

/// Angle from `from` to `to` after projecting both onto the plane with the given
/// normal, measured counter-clockwise about the normal, in `[0, 2π)`.
///
/// Returns `None` when either projection vanishes (the vector is parallel to
/// the plane normal) and the angle is undefined.
pub fn angle_on_plane_to(
    from: &Vector3<f64>,
    to: &Vector3<f64>,
    normal: &Unit<Vector3<f64>>,
) -> Option<f64> {
    let a = project_on_plane(from, normal);
    let b = project_on_plane(to, normal);

    // Relative to the input length so scaled vectors behave identically
    if a.norm() <= from.norm() * PARALLEL_TOLERANCE || b.norm() <= to.norm() * PARALLEL_TOLERANCE {
        return None;
    }

    let sin = a.cross(&b).dot(normal.as_ref());
    let cos = a.dot(&b);
    let angle = sin.atan2(cos);

    Some(if angle < 0.0 { angle + TAU } else { angle })
}

/// Fold an angle into `(-π/2, π/2]`.
///
/// An opening's axis has no sense of direction, so angles that differ by a
/// half turn describe the same placement.
#[inline]
pub fn fold_half_turn(angle: f64) -> f64 {
    let folded = angle.rem_euclid(PI);
    if folded > PI / 2.0 {
        folded - PI
    } else {
        folded
    }
}

/// True when `a` and `b` are parallel or anti-parallel.
pub fn is_parallel(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    let (na, nb) = (a.norm(), b.norm());
    if na < DIRECTION_EPSILON || nb < DIRECTION_EPSILON {
        return false;
    }
    a.cross(b).norm() / (na * nb) < PARALLEL_TOLERANCE
}

/// True when the (unit) normal has a positive vertical component.
#[inline]
pub fn points_upwards(normal: &Vector3<f64>) -> bool {
    normal.z > UPWARD_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn line_direction_and_midpoint() {
        let line = Line3::new(Point3::new(1.0, 2.0, 3.0), Point3::new(3.0, 2.0, -1.0));
        assert_eq!(line.direction(), Vector3::new(2.0, 0.0, -4.0));
        assert_eq!(line.midpoint(), Point3::new(2.0, 2.0, 1.0));
        assert_relative_eq!(line.point_at(0.25).x, 1.5);
    }

    #[test]
    fn from_origin_keeps_vector() {
        let origin = Point3::new(10.0, -4.0, 2.5);
        let dir = Vector3::new(0.3, 0.4, 0.0);
        let line = Line3::from_origin(origin, dir);
        assert_relative_eq!(line.direction(), dir, epsilon = 1e-12);
        assert_relative_eq!(line.length(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn angle_on_plane_is_counter_clockwise() {
        let z = Vector3::z_axis();
        let angle = angle_on_plane_to(&Vector3::x(), &Vector3::y(), &z).unwrap();
        assert_relative_eq!(angle, FRAC_PI_2);

        let angle = angle_on_plane_to(&Vector3::y(), &Vector3::x(), &z).unwrap();
        assert_relative_eq!(angle, 3.0 * FRAC_PI_2);
    }

    #[test]
    fn angle_on_plane_ignores_normal_component() {
        let z = Vector3::z_axis();
        let angle =
            angle_on_plane_to(&Vector3::new(1.0, 0.0, 5.0), &Vector3::new(1.0, 1.0, -3.0), &z)
                .unwrap();
        assert_relative_eq!(angle, FRAC_PI_2 / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_on_plane_undefined_for_normal_vector() {
        let z = Vector3::z_axis();
        assert!(angle_on_plane_to(&Vector3::x(), &Vector3::new(0.0, 0.0, 2.0), &z).is_none());
    }

    #[test]
    fn fold_half_turn_range() {
        assert_relative_eq!(fold_half_turn(0.0), 0.0);
        assert_relative_eq!(fold_half_turn(PI), 0.0, epsilon = 1e-12);
        assert_relative_eq!(fold_half_turn(-0.3), -0.3, epsilon = 1e-12);
        assert_relative_eq!(fold_half_turn(TAU - 0.3), -0.3, epsilon = 1e-12);
        assert_relative_eq!(fold_half_turn(PI + 0.2), 0.2, epsilon = 1e-12);
        assert_relative_eq!(fold_half_turn(FRAC_PI_2), FRAC_PI_2);
    }

    #[test]
    fn checked_unit_rejects_short_and_nan() {
        assert!(checked_unit(&Vector3::zeros(), DIRECTION_EPSILON, "v").is_err());
        assert!(checked_unit(&Vector3::new(f64::NAN, 0.0, 1.0), DIRECTION_EPSILON, "v").is_err());
        let u = checked_unit(&Vector3::new(0.0, 3.0, 4.0), DIRECTION_EPSILON, "v").unwrap();
        assert_relative_eq!(u.norm(), 1.0);
    }

    #[test]
    fn parallel_and_upwards() {
        assert!(is_parallel(&Vector3::x(), &Vector3::new(-2.0, 0.0, 0.0)));
        assert!(!is_parallel(&Vector3::x(), &Vector3::new(1.0, 0.1, 0.0)));
        assert!(!is_parallel(&Vector3::x(), &Vector3::zeros()));
        assert!(points_upwards(&Vector3::new(0.0, 0.6, 0.8)));
        assert!(!points_upwards(&Vector3::new(1.0, 0.0, 0.0)));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall and intersection frames
//!
//! A wall is treated as a planar slab bounded by two parallel side faces. The
//! intersecting element's curve is clipped against that slab, and the wall
//! direction, wall normal and intersection direction are re-anchored at the
//! midpoint of the clipped segment so every angle is measured from a common
//! origin.

use crate::error::{Error, Result};
use crate::solver::{AngleResult, AngleSolver, SolverInput};
use crate::vector::{checked_unit, Line3, DIRECTION_EPSILON};
use nalgebra::{Point3, Vector3};

/// Parameter span below which a clipped segment is treated as empty
const CLIP_TOLERANCE: f64 = 1e-12;

/// Planar side face of a wall, given by a point on it and its outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideFace {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Host-supplied wall geometry.
///
/// The wall body lies behind `side_face`, between its plane and the parallel
/// plane `width` further along `-normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallGeometry {
    /// Wall centerline
    pub location_line: Line3,
    /// Interior side face
    pub side_face: SideFace,
    /// Wall thickness along the face normal
    pub width: f64,
}

impl WallGeometry {
    pub fn new(location_line: Line3, side_face: SideFace, width: f64) -> Self {
        Self {
            location_line,
            side_face,
            width,
        }
    }

    /// Straight wall from its centerline, thickness and interior face normal.
    pub fn from_centerline(
        location_line: Line3,
        width: f64,
        interior_normal: Vector3<f64>,
    ) -> Result<Self> {
        let normal = checked_unit(&interior_normal, DIRECTION_EPSILON, "wall normal")?;
        let wall = Self {
            location_line,
            side_face: SideFace {
                origin: location_line.start + normal.as_ref() * (width / 2.0),
                normal: normal.into_inner(),
            },
            width,
        };
        wall.validate()?;
        Ok(wall)
    }

    pub fn validate(&self) -> Result<()> {
        checked_unit(
            &self.location_line.direction(),
            DIRECTION_EPSILON,
            "wall location line",
        )?;
        checked_unit(&self.side_face.normal, DIRECTION_EPSILON, "wall normal")?;
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::geometry(format!(
                "wall width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }

    /// Signed distance of `p` from the side face plane, positive in front of the wall.
    pub fn depth_of(&self, p: &Point3<f64>) -> Result<f64> {
        let normal = checked_unit(&self.side_face.normal, DIRECTION_EPSILON, "wall normal")?;
        Ok((p - self.side_face.origin).dot(normal.as_ref()))
    }

    /// Clip `curve` to the wall slab.
    ///
    /// Returns the portion of the curve inside the slab, preserving the curve's
    /// orientation.
    pub fn clip(&self, curve: &Line3) -> Result<Line3> {
        self.validate()?;
        let normal = checked_unit(&self.side_face.normal, DIRECTION_EPSILON, "wall normal")?;
        let direction = checked_unit(&curve.direction(), DIRECTION_EPSILON, "intersecting curve")?;

        let rate = curve.direction().dot(normal.as_ref());
        if direction.dot(normal.as_ref()).abs() < DIRECTION_EPSILON {
            return Err(Error::NoIntersection(
                "curve runs parallel to the wall faces".to_string(),
            ));
        }

        // Slab: -width <= depth(t) <= 0, with depth(t) = start_depth + t * rate
        let start_depth = (curve.start - self.side_face.origin).dot(normal.as_ref());
        let t_face = -start_depth / rate;
        let t_back = (-self.width - start_depth) / rate;

        let t_min = t_face.min(t_back).max(0.0);
        let t_max = t_face.max(t_back).min(1.0);

        if t_max - t_min <= CLIP_TOLERANCE {
            return Err(Error::NoIntersection(format!(
                "curve does not cross the wall (slab span t=[{:.4}, {:.4}])",
                t_face.min(t_back),
                t_face.max(t_back)
            )));
        }

        Ok(Line3::new(curve.point_at(t_min), curve.point_at(t_max)))
    }
}

/// Direction re-anchored at the intersection midpoint
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionInfo {
    pub line: Line3,
    pub vector: Vector3<f64>,
}

impl DirectionInfo {
    /// Anchor `direction` at `origin`; `vector` is read back from the line.
    pub fn anchored(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        let line = Line3::from_origin(origin, direction);
        Self {
            vector: line.direction(),
            line,
        }
    }
}

/// Wall data at one intersection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallFrame {
    pub mid_point: Point3<f64>,
    pub wall_direction: DirectionInfo,
    pub wall_normal: DirectionInfo,
    pub width: f64,
}

/// Intersecting element data at one intersection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionFrame {
    pub intersection_direction: DirectionInfo,
    /// Portion of the intersecting curve inside the wall
    pub segment: Line3,
}

impl WallFrame {
    /// Combine with an intersection frame into solver input.
    pub fn solver_input(&self, intersection: &IntersectionFrame) -> SolverInput {
        SolverInput {
            wall_direction: self.wall_direction.vector,
            wall_normal: self.wall_normal.vector,
            intersection_direction: intersection.intersection_direction.vector,
            wall_width: self.width,
            mid_point: self.mid_point,
        }
    }
}

/// A (wall, intersecting curve) pairing ready for the angle solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallIntersection {
    wall_frame: WallFrame,
    intersection_frame: IntersectionFrame,
}

impl WallIntersection {
    /// Clip `curve` against `wall` and build both frames at the segment midpoint.
    pub fn new(wall: &WallGeometry, curve: &Line3) -> Result<Self> {
        let segment = wall.clip(curve)?;
        let mid_point = segment.midpoint();

        let wall_direction = checked_unit(
            &wall.location_line.direction(),
            DIRECTION_EPSILON,
            "wall location line",
        )?;
        let wall_normal = checked_unit(&wall.side_face.normal, DIRECTION_EPSILON, "wall normal")?;
        let intersection_direction =
            checked_unit(&curve.direction(), DIRECTION_EPSILON, "intersecting curve")?;

        Ok(Self {
            wall_frame: WallFrame {
                mid_point,
                wall_direction: DirectionInfo::anchored(mid_point, wall_direction.into_inner()),
                wall_normal: DirectionInfo::anchored(mid_point, wall_normal.into_inner()),
                width: wall.width,
            },
            intersection_frame: IntersectionFrame {
                intersection_direction: DirectionInfo::anchored(
                    mid_point,
                    intersection_direction.into_inner(),
                ),
                segment,
            },
        })
    }

    pub fn wall_frame(&self) -> &WallFrame {
        &self.wall_frame
    }

    pub fn intersection_frame(&self) -> &IntersectionFrame {
        &self.intersection_frame
    }

    pub fn mid_point(&self) -> Point3<f64> {
        self.wall_frame.mid_point
    }

    pub fn solver_input(&self) -> SolverInput {
        self.wall_frame.solver_input(&self.intersection_frame)
    }

    pub fn solve(&self, solver: &AngleSolver) -> Result<AngleResult> {
        solver.solve(&self.solver_input())
    }
}

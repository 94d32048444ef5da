// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face analysis for box-like intersecting instances
//!
//! Family instances that pass through a wall have no location curve. Their
//! axis and cross-section are recovered from planar faces instead:
//! 1. the top face is the one whose normal points most upward
//! 2. its longest edge gives the run direction of the element
//! 3. the faces whose normals are parallel to that edge are the cross-section
//!    ("side") faces; the line between their centroids is the centerline

use crate::error::{Error, Result};
use crate::opening::CrossSection;
use crate::vector::{checked_unit, is_parallel, points_upwards, Line3, DIRECTION_EPSILON};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Two normals whose vertical components differ by less than this are tied
const UPWARD_TIE_TOLERANCE: f64 = 1e-9;

/// Planar face with its outer boundary loop
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarFace {
    pub normal: Vector3<f64>,
    pub outer_loop: Vec<Point3<f64>>,
}

impl PlanarFace {
    pub fn new(normal: Vector3<f64>, outer_loop: Vec<Point3<f64>>) -> Self {
        Self { normal, outer_loop }
    }

    /// Vertex average of the outer loop
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.outer_loop.is_empty() {
            return None;
        }
        let sum = self
            .outer_loop
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.outer_loop.len() as f64))
    }

    /// Edges of the closed outer loop
    pub fn edges(&self) -> impl Iterator<Item = Line3> + '_ {
        let n = self.outer_loop.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| Line3::new(self.outer_loop[i], self.outer_loop[(i + 1) % n]))
    }

    pub fn longest_edge(&self) -> Option<Line3> {
        self.edges()
            .filter(|e| e.length() > DIRECTION_EPSILON)
            .fold(None, |best: Option<Line3>, e| match best {
                Some(b) if b.length() >= e.length() => Some(b),
                _ => Some(e),
            })
    }

    /// Horizontal and vertical extent of the face in its own plane.
    ///
    /// The in-plane axes are `u = n × Z` and `v = n × u`; faces lying flat fall
    /// back to the X axis for `u`.
    pub fn extents(&self) -> Result<(f64, f64)> {
        let normal = checked_unit(&self.normal, DIRECTION_EPSILON, "face normal")?;
        let origin = self
            .centroid()
            .ok_or_else(|| Error::InvalidFace("face has no vertices".to_string()))?;

        let u = {
            let u = normal.cross(&Vector3::z());
            if u.norm() > 1e-6 {
                u.normalize()
            } else {
                (Vector3::x() - normal.as_ref() * normal.x).normalize()
            }
        };
        let v = normal.cross(&u).normalize();

        let (mut u_min, mut u_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &self.outer_loop {
            let d = p - origin;
            let (pu, pv) = (d.dot(&u), d.dot(&v));
            u_min = u_min.min(pu);
            u_max = u_max.max(pu);
            v_min = v_min.min(pv);
            v_max = v_max.max(pv);
        }

        Ok((u_max - u_min, v_max - v_min))
    }
}

/// Pick the face whose normal points most upward.
///
/// Faces with equally upward normals keep their input order: the first wins.
pub fn top_face(faces: &[PlanarFace]) -> Result<&PlanarFace> {
    let mut best: Option<(&PlanarFace, f64)> = None;

    for face in faces {
        let Some(normal) = face.normal.try_normalize(DIRECTION_EPSILON) else {
            continue;
        };
        if !points_upwards(&normal) {
            continue;
        }
        match best {
            Some((_, z)) if normal.z <= z + UPWARD_TIE_TOLERANCE => {}
            _ => best = Some((face, normal.z)),
        }
    }

    best.map(|(face, _)| face)
        .ok_or_else(|| Error::InvalidFace("no face points upwards".to_string()))
}

/// Faces whose normals run along the longest edge of the top face.
pub fn side_faces(faces: &[PlanarFace]) -> Result<SmallVec<[&PlanarFace; 2]>> {
    let top = top_face(faces)?;
    let run = top
        .longest_edge()
        .ok_or_else(|| Error::InvalidFace("top face has no edges".to_string()))?
        .direction();

    let sides: SmallVec<[&PlanarFace; 2]> = faces
        .iter()
        .filter(|f| is_parallel(&f.normal, &run))
        .collect();

    if sides.len() < 2 {
        return Err(Error::InvalidFace(format!(
            "expected two side faces along the run direction, found {}",
            sides.len()
        )));
    }

    Ok(sides)
}

/// Centerline and cross-section of an instance recovered from its faces
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtrusionProfile {
    pub centerline: Line3,
    pub width: f64,
    pub height: f64,
}

impl ExtrusionProfile {
    pub fn from_faces(faces: &[PlanarFace]) -> Result<Self> {
        let sides = side_faces(faces)?;
        let (first, second) = (sides[0], sides[1]);

        let start = first
            .centroid()
            .ok_or_else(|| Error::InvalidFace("side face has no vertices".to_string()))?;
        let end = second
            .centroid()
            .ok_or_else(|| Error::InvalidFace("side face has no vertices".to_string()))?;
        let (width, height) = first.extents()?;

        Ok(Self {
            centerline: Line3::new(start, end),
            width,
            height,
        })
    }

    pub fn section(&self) -> CrossSection {
        CrossSection::Rectangular {
            width: self.width,
            height: self.height,
        }
    }
}

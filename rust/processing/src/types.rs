// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Job and report types exchanged with the host bridge.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use wallpen_geometry::{
    AngleResult, CrossSection, Line3, OpeningSize, PlanarFace, Point3, Vector3, WallGeometry,
};

/// Host element identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element passing through the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intersector {
    /// Pipe or duct with a location curve and connector section.
    MepCurve { curve: Line3, section: CrossSection },
    /// Box-like family instance described by its planar faces.
    Instance { faces: Vec<PlanarFace> },
}

/// One (wall, intersector) pairing to place an opening for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenetrationJob {
    /// Intersecting element.
    pub element_id: ElementId,
    /// Host wall.
    pub wall_id: ElementId,
    pub wall: WallGeometry,
    pub intersector: Intersector,
}

/// Opening placement ready for the host to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub element_id: ElementId,
    pub wall_id: ElementId,
    /// Insertion point (intersection midpoint plus thickness correction).
    pub location_point: Point3<f64>,
    /// Vertical rotation parameter (radians).
    pub vertical_angle: f64,
    /// Horizontal rotation parameter (radians).
    pub horizontal_angle: f64,
    /// Thickness correction applied to the midpoint.
    pub translation: Vector3<f64>,
    /// Opening size including clearance.
    pub opening: OpeningSize,
}

impl Placement {
    pub fn new(job: &PenetrationJob, angles: &AngleResult, opening: OpeningSize) -> Self {
        Self {
            element_id: job.element_id,
            wall_id: job.wall_id,
            location_point: angles.location_point,
            vertical_angle: angles.vertical_angle,
            horizontal_angle: angles.horizontal_angle,
            translation: angles.translation,
            opening,
        }
    }
}

/// Placement whose angles are too steep to trust; needs manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPlacement {
    pub placement: Placement,
    pub reason: String,
}

/// Pair that produced no placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPair {
    pub element_id: ElementId,
    pub wall_id: ElementId,
    pub reason: String,
}

/// Batch statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Total number of jobs submitted.
    pub total_jobs: usize,
    /// Placements computed without warnings.
    pub placed: usize,
    /// Placements flagged for review.
    pub flagged: usize,
    /// Pairs skipped because of an error.
    pub skipped: usize,
    /// Wall-clock time of the pass (ms).
    pub elapsed_ms: u64,
}

/// Result of a batch pass, in job order within each list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub placements: Vec<Placement>,
    pub flagged: Vec<FlaggedPlacement>,
    pub skipped: Vec<SkippedPair>,
    pub stats: ProcessingStats,
}

impl BatchReport {
    /// Number of openings (clean and flagged) per host wall.
    pub fn per_wall(&self) -> FxHashMap<ElementId, usize> {
        let mut counts: FxHashMap<ElementId, usize> = FxHashMap::default();
        let walls = self
            .placements
            .iter()
            .map(|p| p.wall_id)
            .chain(self.flagged.iter().map(|f| f.placement.wall_id));
        for wall_id in walls {
            *counts.entry(wall_id).or_default() += 1;
        }
        counts
    }

    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty() && self.skipped.is_empty()
    }
}

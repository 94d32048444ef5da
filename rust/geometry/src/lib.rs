// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WallPen Geometry
//!
//! Placement geometry for openings where ducts, pipes and box-shaped instances
//! pass through walls, using nalgebra for all vector math.
//!
//! The host supplies plain values (wall centerline, side face, width and the
//! intersecting curve or faces). Nothing here holds a document handle or any
//! shared state, so every type is `Send + Sync` and every call is pure.

pub mod error;
pub mod faces;
pub mod frame;
pub mod opening;
pub mod solver;
pub mod vector;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Unit, Vector3};

pub use error::{Error, Result};
pub use faces::{side_faces, top_face, ExtrusionProfile, PlanarFace};
pub use frame::{
    DirectionInfo, IntersectionFrame, SideFace, WallFrame, WallGeometry, WallIntersection,
};
pub use opening::{CrossSection, OpeningClearance, OpeningSize};
pub use solver::{AngleResult, AngleSolver, SolverConfig, SolverInput};
pub use vector::{angle_on_plane_to, Line3};

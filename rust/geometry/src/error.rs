// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::solver::AngleResult;
use thiserror::Error;

/// Result type for penetration geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing a penetration placement
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A direction, width or wall input is degenerate.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// One of the derived angles is too close to ±90° for the thickness
    /// correction to be trusted. The computed placement is kept for review.
    #[error(
        "Divergent angle: vertical {:.2}°, horizontal {:.2}°",
        vertical.to_degrees(),
        horizontal.to_degrees()
    )]
    DivergentAngle {
        vertical: f64,
        horizontal: f64,
        result: Box<AngleResult>,
    },

    /// The intersecting curve does not pass through the wall slab.
    #[error("No intersection: {0}")]
    NoIntersection(String),

    /// Face analysis could not resolve the top or side faces.
    #[error("Invalid face set: {0}")]
    InvalidFace(String),

    /// A cross-section dimension is zero, negative or not finite.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
}

impl Error {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::InvalidGeometry(msg.into())
    }

    /// Returns the placement carried by a divergence warning, if any.
    pub fn divergent_result(&self) -> Option<&AngleResult> {
        match self {
            Error::DivergentAngle { result, .. } => Some(result),
            _ => None,
        }
    }
}

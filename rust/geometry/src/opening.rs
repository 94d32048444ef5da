// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening sizing from the intersecting element's cross-section.

use crate::error::{Error, Result};

/// Cross-section of the element passing through the wall
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum CrossSection {
    Round { radius: f64 },
    Rectangular { width: f64, height: f64 },
}

/// Size of the opening family to place
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum OpeningSize {
    Round { diameter: f64 },
    Rectangular { width: f64, height: f64 },
}

/// Clearance added around the element, in model units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpeningClearance {
    /// Added to both width and height of rectangular sections
    pub rectangular_offset: f64,
    /// Multiplier applied to the diameter of round sections
    pub round_factor: f64,
}

impl Default for OpeningClearance {
    fn default() -> Self {
        Self {
            rectangular_offset: 0.1,
            round_factor: 1.2,
        }
    }
}

impl OpeningClearance {
    /// Clearance that reproduces the element's own size
    pub fn none() -> Self {
        Self {
            rectangular_offset: 0.0,
            round_factor: 1.0,
        }
    }

    pub fn with_rectangular_offset(mut self, offset: f64) -> Self {
        self.rectangular_offset = offset;
        self
    }
}

fn positive(value: f64, name: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDimension(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

impl OpeningSize {
    /// Opening size for `section` with `clearance` applied.
    pub fn for_section(section: &CrossSection, clearance: &OpeningClearance) -> Result<Self> {
        match *section {
            CrossSection::Round { radius } => {
                let radius = positive(radius, "radius")?;
                let diameter = positive(radius * 2.0 * clearance.round_factor, "opening diameter")?;
                Ok(OpeningSize::Round { diameter })
            }
            CrossSection::Rectangular { width, height } => {
                let width = positive(width, "width")?;
                let height = positive(height, "height")?;
                Ok(OpeningSize::Rectangular {
                    width: positive(width + clearance.rectangular_offset, "opening width")?,
                    height: positive(height + clearance.rectangular_offset, "opening height")?,
                })
            }
        }
    }

    pub fn is_round(&self) -> bool {
        matches!(self, OpeningSize::Round { .. })
    }
}

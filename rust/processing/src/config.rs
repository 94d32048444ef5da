// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

use wallpen_geometry::{OpeningClearance, SolverConfig};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Solver thresholds (epsilon, divergence margin, translation bound).
    pub solver: SolverConfig,
    /// Clearance for openings around pipes and ducts.
    pub clearance: OpeningClearance,
    /// Offset added to width and height of openings around instances.
    pub instance_offset: f64,
    /// Worker threads for the batch pass (0 uses the global rayon pool).
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            clearance: OpeningClearance::default(),
            instance_offset: 0.0,
            worker_threads: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `WALLPEN_DIRECTION_EPSILON` - minimum direction length
    /// - `WALLPEN_DIVERGENCE_MARGIN_DEG` - margin below ±90° flagged as divergent
    /// - `WALLPEN_MAX_TRANSLATION_FACTOR` - translation bound in wall widths
    /// - `WALLPEN_RISER_TOLERANCE` - plan-to-length ratio treated as a vertical riser
    /// - `WALLPEN_RECT_OFFSET` - clearance added to rectangular sections
    /// - `WALLPEN_ROUND_FACTOR` - diameter multiplier for round sections
    /// - `WALLPEN_INSTANCE_OFFSET` - clearance added to instance sections
    /// - `WALLPEN_WORKER_THREADS` - dedicated pool size
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse_f64 = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };

        Self {
            solver: SolverConfig {
                direction_epsilon: parse_f64(
                    "WALLPEN_DIRECTION_EPSILON",
                    defaults.solver.direction_epsilon,
                ),
                divergence_margin: parse_f64(
                    "WALLPEN_DIVERGENCE_MARGIN_DEG",
                    defaults.solver.divergence_margin.to_degrees(),
                )
                .to_radians(),
                max_translation_factor: parse_f64(
                    "WALLPEN_MAX_TRANSLATION_FACTOR",
                    defaults.solver.max_translation_factor,
                ),
                riser_tolerance: parse_f64(
                    "WALLPEN_RISER_TOLERANCE",
                    defaults.solver.riser_tolerance,
                ),
            },
            clearance: OpeningClearance {
                rectangular_offset: parse_f64(
                    "WALLPEN_RECT_OFFSET",
                    defaults.clearance.rectangular_offset,
                ),
                round_factor: parse_f64("WALLPEN_ROUND_FACTOR", defaults.clearance.round_factor),
            },
            instance_offset: parse_f64("WALLPEN_INSTANCE_OFFSET", defaults.instance_offset),
            worker_threads: lookup("WALLPEN_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.worker_threads),
        }
    }

    /// Clearance applied to sections recovered from instance faces.
    pub fn instance_clearance(&self) -> OpeningClearance {
        self.clearance.with_rectangular_offset(self.instance_offset)
    }
}

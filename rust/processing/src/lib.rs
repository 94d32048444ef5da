// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch penetration placement shared by host bridges.
//!
//! Takes plain job descriptions (wall geometry plus the intersecting element's
//! curve or faces), solves every pair in parallel and returns placements,
//! flagged placements and skipped pairs. The host is left to instantiate the
//! opening families inside its own edit session.

pub mod config;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use pipeline::{place_penetration, process_penetrations};
pub use types::{
    BatchReport, ElementId, FlaggedPlacement, Intersector, PenetrationJob, Placement,
    ProcessingStats, SkippedPair,
};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Penetration placement pass with parallel per-pair solving.
//!
//! Every (wall, intersector) pair is solved independently. A failing pair is
//! logged and recorded as skipped; a divergent one is recorded with its
//! placement so it can be reviewed. Neither stops the rest of the batch.

use crate::config::Config;
use crate::types::{
    BatchReport, FlaggedPlacement, Intersector, PenetrationJob, Placement, ProcessingStats,
    SkippedPair,
};
use rayon::prelude::*;
use wallpen_geometry::{
    AngleResult, AngleSolver, Error, ExtrusionProfile, Line3, OpeningSize, Result,
    WallIntersection,
};

enum Outcome {
    Placed(Placement),
    Flagged(FlaggedPlacement),
    Skipped(SkippedPair),
}

/// Curve and opening size for a job's intersector.
fn resolve(job: &PenetrationJob, config: &Config) -> Result<(Line3, OpeningSize)> {
    match &job.intersector {
        Intersector::MepCurve { curve, section } => {
            Ok((*curve, OpeningSize::for_section(section, &config.clearance)?))
        }
        Intersector::Instance { faces } => {
            let profile = ExtrusionProfile::from_faces(faces)?;
            let opening =
                OpeningSize::for_section(&profile.section(), &config.instance_clearance())?;
            Ok((profile.centerline, opening))
        }
    }
}

/// Resolve, intersect and solve; the inner result is the solver's verdict.
fn evaluate(
    job: &PenetrationJob,
    solver: &AngleSolver,
    config: &Config,
) -> Result<(OpeningSize, Result<AngleResult>)> {
    let (curve, opening) = resolve(job, config)?;
    let intersection = WallIntersection::new(&job.wall, &curve)?;
    Ok((opening, intersection.solve(solver)))
}

/// Place a single opening. Divergent placements are returned as errors.
pub fn place_penetration(
    job: &PenetrationJob,
    solver: &AngleSolver,
    config: &Config,
) -> Result<Placement> {
    let (opening, solved) = evaluate(job, solver, config)?;
    Ok(Placement::new(job, &solved?, opening))
}

fn process_job(job: &PenetrationJob, solver: &AngleSolver, config: &Config) -> Outcome {
    let skip = |err: Error| {
        tracing::warn!(
            element = %job.element_id,
            wall = %job.wall_id,
            error = %err,
            "Skipping penetration"
        );
        Outcome::Skipped(SkippedPair {
            element_id: job.element_id,
            wall_id: job.wall_id,
            reason: err.to_string(),
        })
    };

    match evaluate(job, solver, config) {
        Ok((opening, Ok(angles))) => {
            tracing::debug!(
                element = %job.element_id,
                wall = %job.wall_id,
                vertical_deg = angles.vertical_angle.to_degrees(),
                horizontal_deg = angles.horizontal_angle.to_degrees(),
                "Placed penetration"
            );
            Outcome::Placed(Placement::new(job, &angles, opening))
        }
        Ok((opening, Err(err @ Error::DivergentAngle { .. }))) => {
            let Some(angles) = err.divergent_result().copied() else {
                return skip(err);
            };
            tracing::warn!(
                element = %job.element_id,
                wall = %job.wall_id,
                vertical_deg = angles.vertical_angle.to_degrees(),
                horizontal_deg = angles.horizontal_angle.to_degrees(),
                "Penetration grazes the wall, flagged for review"
            );
            Outcome::Flagged(FlaggedPlacement {
                placement: Placement::new(job, &angles, opening),
                reason: err.to_string(),
            })
        }
        Ok((_, Err(err))) | Err(err) => skip(err),
    }
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    if threads == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::warn!(threads, error = %err, "Falling back to the global thread pool");
            None
        }
    }
}

/// Place openings for every job.
pub fn process_penetrations(jobs: &[PenetrationJob], config: &Config) -> BatchReport {
    let start = std::time::Instant::now();
    tracing::info!(
        jobs = jobs.len(),
        worker_threads = config.worker_threads,
        "Starting penetration placement"
    );

    let solver = AngleSolver::with_config(config.solver);
    let solve_all = || -> Vec<Outcome> {
        jobs.par_iter()
            .map(|job| process_job(job, &solver, config))
            .collect()
    };
    let outcomes = match build_pool(config.worker_threads) {
        Some(pool) => pool.install(solve_all),
        None => solve_all(),
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Placed(p) => report.placements.push(p),
            Outcome::Flagged(f) => report.flagged.push(f),
            Outcome::Skipped(s) => report.skipped.push(s),
        }
    }

    report.stats = ProcessingStats {
        total_jobs: jobs.len(),
        placed: report.placements.len(),
        flagged: report.flagged.len(),
        skipped: report.skipped.len(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        placed = report.stats.placed,
        flagged = report.stats.flagged,
        skipped = report.stats.skipped,
        elapsed_ms = report.stats.elapsed_ms,
        "Penetration placement complete"
    );

    report
}

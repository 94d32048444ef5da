// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch pass over a small mixed set of walls, pipes and instances.

use approx::assert_relative_eq;
use wallpen_geometry::{
    AngleSolver, CrossSection, Error, Line3, OpeningSize, PlanarFace, Point3, Vector3,
    WallGeometry,
};
use wallpen_processing::{
    place_penetration, process_penetrations, Config, ElementId, Intersector, PenetrationJob,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 0.2 thick wall along X, centred on y = 0
fn wall() -> WallGeometry {
    WallGeometry::from_centerline(
        Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)),
        0.2,
        Vector3::y(),
    )
    .unwrap()
}

fn quad(normal: Vector3<f64>, pts: [[f64; 3]; 4]) -> PlanarFace {
    PlanarFace::new(
        normal,
        pts.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
    )
}

/// Box 0.4 wide, 0.3 tall, running along Y from y = -1 to y = 1 around (3, *, 1)
fn instance_faces() -> Vec<PlanarFace> {
    let (x0, x1, y0, y1, z0, z1) = (2.8, 3.2, -1.0, 1.0, 0.85, 1.15);
    vec![
        quad(Vector3::new(0.0, -1.0, 0.0), [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
        quad(Vector3::new(0.0, 0.0, 1.0), [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
        quad(Vector3::new(-1.0, 0.0, 0.0), [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
        quad(Vector3::new(0.0, 1.0, 0.0), [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
        quad(Vector3::new(1.0, 0.0, 0.0), [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
        quad(Vector3::new(0.0, 0.0, -1.0), [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
    ]
}

fn pipe_job(id: u64, curve: Line3, radius: f64) -> PenetrationJob {
    PenetrationJob {
        element_id: ElementId(id),
        wall_id: ElementId(100),
        wall: wall(),
        intersector: Intersector::MepCurve {
            curve,
            section: CrossSection::Round { radius },
        },
    }
}

fn grazing_curve() -> Line3 {
    let a = 89.5f64.to_radians();
    let dir = Vector3::new(0.0, a.cos(), a.sin());
    let mid = Point3::new(7.0, 0.0, 1.0);
    Line3::new(mid - dir * 50.0, mid + dir * 50.0)
}

fn mixed_jobs() -> Vec<PenetrationJob> {
    vec![
        pipe_job(
            1,
            Line3::new(Point3::new(5.0, -2.0, 1.0), Point3::new(5.0, 2.0, 1.0)),
            0.05,
        ),
        pipe_job(2, grazing_curve(), 0.05),
        pipe_job(
            3,
            Line3::new(Point3::new(0.0, 0.0, 3.0), Point3::new(9.0, 0.0, 3.0)),
            0.05,
        ),
        PenetrationJob {
            element_id: ElementId(4),
            wall_id: ElementId(200),
            wall: wall(),
            intersector: Intersector::Instance {
                faces: instance_faces(),
            },
        },
        pipe_job(
            5,
            Line3::new(Point3::new(6.0, -2.0, 1.0), Point3::new(6.0, 2.0, 1.0)),
            0.0,
        ),
    ]
}

#[test]
fn mixed_batch_isolates_failures() {
    init_tracing();
    let report = process_penetrations(&mixed_jobs(), &Config::default());

    let placed: Vec<u64> = report.placements.iter().map(|p| p.element_id.0).collect();
    let flagged: Vec<u64> = report.flagged.iter().map(|f| f.placement.element_id.0).collect();
    let skipped: Vec<u64> = report.skipped.iter().map(|s| s.element_id.0).collect();
    assert_eq!(placed, vec![1, 4]);
    assert_eq!(flagged, vec![2]);
    assert_eq!(skipped, vec![3, 5]);

    assert_eq!(report.stats.total_jobs, 5);
    assert_eq!(report.stats.placed, 2);
    assert_eq!(report.stats.flagged, 1);
    assert_eq!(report.stats.skipped, 2);
    assert!(!report.is_clean());

    let per_wall = report.per_wall();
    assert_eq!(per_wall.get(&ElementId(100)), Some(&2));
    assert_eq!(per_wall.get(&ElementId(200)), Some(&1));
}

#[test]
fn pipe_and_instance_placements() {
    let report = process_penetrations(&mixed_jobs(), &Config::default());

    let pipe = &report.placements[0];
    assert_relative_eq!(pipe.location_point, Point3::new(5.0, 0.0, 1.0), epsilon = 1e-12);
    assert_relative_eq!(pipe.vertical_angle, 0.0, epsilon = 1e-12);
    assert_relative_eq!(pipe.horizontal_angle, 0.0, epsilon = 1e-12);
    match pipe.opening {
        OpeningSize::Round { diameter } => assert_relative_eq!(diameter, 0.12, epsilon = 1e-12),
        other => panic!("expected round opening, got {:?}", other),
    }

    let instance = &report.placements[1];
    assert_relative_eq!(instance.location_point, Point3::new(3.0, 0.0, 1.0), epsilon = 1e-12);
    match instance.opening {
        OpeningSize::Rectangular { width, height } => {
            assert_relative_eq!(width, 0.4, epsilon = 1e-12);
            assert_relative_eq!(height, 0.3, epsilon = 1e-12);
        }
        other => panic!("expected rectangular opening, got {:?}", other),
    }
}

#[test]
fn flagged_placement_keeps_geometry() {
    let report = process_penetrations(&mixed_jobs(), &Config::default());
    let flagged = &report.flagged[0];

    assert_relative_eq!(
        flagged.placement.vertical_angle.abs(),
        89.5f64.to_radians(),
        epsilon = 1e-9
    );
    assert!(flagged.reason.contains("Divergent angle"));
    assert!(report.skipped[0].reason.contains("No intersection"));
    assert!(report.skipped[1].reason.contains("radius"));
}

#[test]
fn dedicated_pool_matches_global_pool() {
    let jobs = mixed_jobs();
    let global = process_penetrations(&jobs, &Config::default());
    let pooled = process_penetrations(
        &jobs,
        &Config {
            worker_threads: 2,
            ..Config::default()
        },
    );

    assert_eq!(global.placements, pooled.placements);
    assert_eq!(global.flagged, pooled.flagged);
    assert_eq!(global.skipped, pooled.skipped);
}

#[test]
fn single_placement_reports_divergence_as_error() {
    let config = Config::default();
    let solver = AngleSolver::with_config(config.solver);

    let ok = place_penetration(&mixed_jobs()[0], &solver, &config).unwrap();
    assert_eq!(ok.wall_id, ElementId(100));

    let err = place_penetration(&pipe_job(2, grazing_curve(), 0.05), &solver, &config)
        .unwrap_err();
    assert!(matches!(err, Error::DivergentAngle { .. }));
}

#[test]
fn wider_margin_flags_more() {
    let mut config = Config::default();
    config.solver.divergence_margin = 60f64.to_radians();

    let a = 45f64.to_radians();
    let dir = Vector3::new(0.0, a.cos(), a.sin());
    let mid = Point3::new(5.0, 0.0, 1.0);
    let job = pipe_job(9, Line3::new(mid - dir * 2.0, mid + dir * 2.0), 0.05);

    assert!(process_penetrations(std::slice::from_ref(&job), &Config::default()).is_clean());
    let strict = process_penetrations(&[job], &config);
    assert_eq!(strict.stats.flagged, 1);
}

#[test]
fn job_serialization() {
    let job = &mixed_jobs()[0];
    let json = serde_json::to_value(job).unwrap();

    assert_eq!(json["element_id"], 1);
    assert_eq!(json["intersector"]["kind"], "mep_curve");
    assert_eq!(json["intersector"]["section"]["shape"], "round");

    let back: PenetrationJob = serde_json::from_value(json).unwrap();
    assert_eq!(&back, job);
}

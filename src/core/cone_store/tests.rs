use super::*;
use glam::Vec2;

fn obs(x: f32, y: f32, colour: ConeColour) -> ConeObservation {
    ConeObservation::new(x, y, colour)
}

#[test]
fn test_new_cones_are_staged_by_colour() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();

    let report = store
        .ingest(
            &[
                obs(5.0, 1.5, ConeColour::Left),
                obs(5.0, -1.5, ConeColour::Right),
                obs(6.0, 0.0, ConeColour::Timing),
            ],
            Vec2::ZERO,
            2.0,
            &mut boundaries,
        )
        .expect("Ingest darf nicht fehlschlagen");

    assert_eq!(store.len(), 3);
    assert_eq!(report.new_cones, 3);
    assert_eq!(report.staged, vec![ConeId(0), ConeId(1)]);
    assert_eq!(report.new_timing, vec![ConeId(2)]);
}

#[test]
fn test_unpassed_cone_follows_new_observation() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(&[obs(10.0, 1.5, ConeColour::Left)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    let report = store
        .ingest(&[obs(10.2, 1.4, ConeColour::Left)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    assert_eq!(store.position(ConeId(0)), Vec2::new(10.2, 1.4));
    assert_eq!(report.staged, vec![ConeId(0)]);
    assert_eq!(report.new_cones, 0);
}

#[test]
fn test_cone_in_range_is_marked_passed_and_frozen() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(&[obs(3.0, 1.5, ConeColour::Left)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    let report = store
        .ingest(
            &[obs(3.0, 1.5, ConeColour::Left)],
            Vec2::new(3.0, 0.0),
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");
    assert_eq!(report.newly_passed, 1);
    assert!(store.cone(ConeId(0)).passed_by);

    // Passiert, aber nie gepaart: erneut vorgemerkt, Position bleibt
    let report = store
        .ingest(
            &[obs(9.0, 9.0, ConeColour::Left)],
            Vec2::new(3.0, 0.0),
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");
    assert_eq!(store.position(ConeId(0)), Vec2::new(3.0, 1.5));
    assert_eq!(report.staged, vec![ConeId(0)]);
}

#[test]
fn test_passed_and_paired_cone_is_not_staged() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(
            &[obs(1.0, 1.5, ConeColour::Left), obs(1.0, -1.5, ConeColour::Right)],
            Vec2::new(5.0, 0.0),
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");
    store.record_pairing(ConePair::new(ConeId(0), ConeId(1)));

    let report = store
        .ingest(
            &[obs(1.0, 1.5, ConeColour::Left), obs(1.0, -1.5, ConeColour::Right)],
            Vec2::new(1.0, 0.0),
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");
    assert_eq!(report.newly_passed, 2);

    let report = store
        .ingest(
            &[obs(1.0, 1.5, ConeColour::Left), obs(1.0, -1.5, ConeColour::Right)],
            Vec2::new(4.0, 0.0),
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");
    assert!(report.staged.is_empty());
}

#[test]
fn test_timing_cone_movement_is_reported() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(&[obs(6.0, 0.5, ConeColour::Timing)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    let report = store
        .ingest(&[obs(6.1, 0.5, ConeColour::Timing)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    assert!(report.timing_moved);
    assert!(report.staged.is_empty());
    assert!(report.new_timing.is_empty());
}

#[test]
fn test_unchanged_timing_cone_is_not_reported_as_moved() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    let frame = [obs(6.0, 0.5, ConeColour::Timing)];
    store
        .ingest(&frame, Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    let report = store
        .ingest(&frame, Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    assert!(!report.timing_moved);
}

#[test]
fn test_shrinking_observation_list_is_an_error() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(
            &[obs(5.0, 1.5, ConeColour::Left), obs(5.0, -1.5, ConeColour::Right)],
            Vec2::ZERO,
            2.0,
            &mut boundaries,
        )
        .expect("Ingest erwartet");

    let err = store
        .ingest(&[obs(5.0, 1.5, ConeColour::Left)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect_err("Fehler erwartet");

    assert_eq!(
        err,
        PlannerError::ObservationsShrunk {
            previous: 2,
            received: 1
        }
    );
    assert_eq!(store.len(), 2);
}

#[test]
fn test_colour_change_at_known_index_is_an_error() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    store
        .ingest(&[obs(5.0, 1.5, ConeColour::Left)], Vec2::ZERO, 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    let err = store
        .ingest(
            &[obs(5.0, 1.5, ConeColour::Right), obs(8.0, 1.5, ConeColour::Left)],
            Vec2::ZERO,
            2.0,
            &mut boundaries,
        )
        .expect_err("Fehler erwartet");

    assert!(matches!(err, PlannerError::ColourChanged { index: 0, .. }));
    // Kein Teil-Update
    assert_eq!(store.len(), 1);
}

#[test]
fn test_nan_observation_is_rejected() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    let err = store
        .ingest(
            &[obs(f32::NAN, 1.0, ConeColour::Left)],
            Vec2::ZERO,
            2.0,
            &mut boundaries,
        )
        .expect_err("Fehler erwartet");
    assert_eq!(err, PlannerError::NonFiniteObservation { index: 0 });
}

#[test]
fn test_ingest_trims_unstable_boundary_tail() {
    let mut store = ConeStore::new();
    let mut boundaries = Boundaries::new();
    let frame = [
        obs(1.0, 1.5, ConeColour::Left),
        obs(4.0, 1.5, ConeColour::Left),
        obs(1.0, -1.5, ConeColour::Right),
    ];
    store
        .ingest(&frame, Vec2::new(10.0, 0.0), 2.0, &mut boundaries)
        .expect("Ingest erwartet");
    boundaries.left = vec![ConeId(0), ConeId(1)];
    boundaries.right = vec![ConeId(2)];
    store.record_pairing(ConePair::new(ConeId(0), ConeId(2)));

    // Fahrzeug neben dem ersten Paar: beide passiert, zweite linke Pylone nicht
    let report = store
        .ingest(&frame, Vec2::new(1.0, 0.0), 2.0, &mut boundaries)
        .expect("Ingest erwartet");
    assert_eq!(report.newly_passed, 2);

    let report = store
        .ingest(&frame, Vec2::new(1.5, 0.0), 2.0, &mut boundaries)
        .expect("Ingest erwartet");

    assert_eq!(boundaries.left, vec![ConeId(0)]);
    assert_eq!(boundaries.right, vec![ConeId(2)]);
    assert_eq!(boundaries.anchor(ConeColour::Left), 0);
    assert_eq!(report.staged, vec![ConeId(1)]);
}
